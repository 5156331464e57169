//! # Sync Framework
//!
//! Building blocks for keeping local copies of remote REST collections in step with
//! the server. Every list screen of an admin console (enterprises, classes, promo
//! codes, ...) needs the same machinery: fetch a page, search it, filter it, page
//! through it, and apply create/update/delete/toggle once the server has said yes.
//! This crate writes that machinery once, generic over a [`Resource`] descriptor.
//!
//! ## Why an actor per collection?
//!
//! A collection is touched from many places at once: a debounced search fetch, an
//! immediate page fetch, a delete confirmed while the list is loading. Giving each
//! collection its own [`CollectionActor`] means:
//!
//! - the [`CollectionStore`] has exactly one owner and needs no lock;
//! - a token check and the mutation it guards can never interleave;
//! - readers get consistent snapshots while a request is in flight.
//!
//! The network never runs *inside* the actor. Gateway calls are made by the
//! [`MutationCoordinator`] and their outcome is applied through the actor afterwards.
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! ```text
//!  Screen ──QueryEvent──▶ QueryDebouncer ──fetch──▶ MutationCoordinator ──▶ Gateway ──▶ API
//!    │                                                   │
//!    │ select()                       begin/complete,    │
//!    ▼                                apply_* messages   ▼
//!  Selection ◀──project()── CollectionStore ◀── CollectionActor
//! ```
//!
//! | Component | Role |
//! |-----------|------|
//! | [`CollectionStore`] | Items, fetch status, error, pagination, request token |
//! | [`CollectionActor`] / [`CollectionClient`] | Sequential owner of a store and its handle |
//! | [`MutationCoordinator`] | Gateway call first, store mutation second |
//! | [`QueryDebouncer`] | Search debounce, immediate filter/page fetches |
//! | [`project`] | Pure search + filter + page projection |
//! | [`Gateway`] | Authenticated request seam; [`mock::MockGateway`] for tests |
//!
//! ## Stale results
//!
//! Each fetch takes a [`RequestToken`] before it leaves. A result is applied only if
//! its token is still the newest one, so when a user clicks page 2 and then page 3,
//! the page-2 response arriving last is dropped instead of overwriting page 3.
//!
//! ## Defining a resource
//!
//! ```rust
//! use sync_framework::{PaginationMode, Resource};
//!
//! struct Enterprises;
//!
//! impl Resource for Enterprises {
//!     const NAME: &'static str = "enterprises";
//!     const PATH: &'static str = "/enterprises";
//!     const SEARCH_FIELDS: &'static [&'static str] = &["name", "email"];
//!     const PAGINATION: PaginationMode = PaginationMode::Server;
//! }
//! ```
//!
//! ## Wiring a collection
//!
//! ```rust
//! use serde_json::json;
//! use sync_framework::mock::MockGateway;
//! use sync_framework::{
//!     CollectionActor, FilterState, Method, MutationCoordinator, Resource, RecordId,
//! };
//!
//! struct Classes;
//! impl Resource for Classes {
//!     const NAME: &'static str = "classes";
//!     const PATH: &'static str = "/classes";
//!     const SEARCH_FIELDS: &'static [&'static str] = &["name"];
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockGateway::new();
//!     mock.expect(Method::Get, "/classes")
//!         .return_ok(json!([{ "id": "c-1", "name": "Algebra" }]));
//!     mock.expect(Method::Delete, "/classes/c-1").return_ok(json!(null));
//!
//!     let (actor, collection) = CollectionActor::<Classes>::new(32);
//!     tokio::spawn(actor.run());
//!     let classes = MutationCoordinator::new(mock.shared(), collection);
//!
//!     classes.fetch(&FilterState::default()).await.unwrap();
//!     classes.remove(RecordId::new("c-1")).await.unwrap();
//!
//!     let selection = classes.select(&FilterState::default(), 10).await.unwrap();
//!     assert!(selection.visible_items.is_empty());
//!     mock.verify();
//! }
//! ```
//!
//! ## Testing
//!
//! - **Store and projection**: plain unit tests, no runtime needed.
//! - **Coordinator**: real actor plus [`mock::MockGateway`]; deferred responses force
//!   out-of-order completion.
//! - **Debouncer**: `#[tokio::test(start_paused = true)]` so the delay window passes
//!   in virtual time.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod message;
pub mod mock;
pub mod projection;
pub mod record;
pub mod resource;
pub mod settings;
pub mod store;
pub mod wire;

// Re-exports for convenience
pub use actor::CollectionActor;
pub use client::{CollectionClient, Selection};
pub use client_trait::{MutableResourceClient, ResourceClient};
pub use coordinator::MutationCoordinator;
pub use debounce::{DebounceState, QueryDebouncer, QueryEvent, QueryHandle};
pub use error::SyncError;
pub use filter::{FilterState, FilterValue};
pub use gateway::{Gateway, GatewayError, GatewayRequest, Method, SharedGateway};
pub use message::{CollectionRequest, Response};
pub use projection::{project, Projection, ProjectionOptions, DEFAULT_PAGE_SIZE};
pub use record::{Payload, Record, RecordId};
pub use resource::{PaginationMode, Resource};
pub use settings::SyncSettings;
pub use store::{CollectionStore, FetchOutcome, FetchStatus, Pagination, RequestToken};
pub use wire::{decode_optional_record, decode_page, decode_record, FetchPage};
