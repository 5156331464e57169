//! # Admin Console
//!
//! The education admin console's data layer: six REST collections kept in sync
//! through [`sync_framework`], an HTTP gateway, configuration, and a CLI.
//!
//! ## Core Components
//!
//! - **[resources]**: marker types describing each collection (path, search fields,
//!   pagination, toggle field).
//! - **[clients]**: typed wrappers such as [`PromoCodeClient`](clients::PromoCodeClient)
//!   that expose fetch, select, open_list and the allowed mutations.
//! - **[lifecycle]**: [`ConsoleSystem`](lifecycle::ConsoleSystem), which starts and
//!   stops the collection actors, plus tracing setup.
//! - **[http]**: the `reqwest`-backed [`HttpGateway`](http::HttpGateway).
//! - **[config]**: TOML file plus environment overrides.
//! - **[cli]**: argument parsing and command execution for the binary.
//!
//! ## Testing
//!
//! Build a [`ConsoleSystem`](lifecycle::ConsoleSystem) on a
//! [`MockGateway`](sync_framework::mock::MockGateway) to exercise whole flows without
//! a server.

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod resources;

pub use error::ConsoleError;
