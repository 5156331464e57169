//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden; every event carries a `resource` field
//! instead.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: startup, shutdown and the final store size
//! - **Fetches**: token issued, result applied, stale result discarded, failure
//! - **Mutations**: create/update/delete/toggle once the server confirmed them
//! - **Debouncer**: query events and the reason each fetch was issued
//! - **HTTP**: method, URL, status and body size (never the bearer token)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Applied changes and failures
//! RUST_LOG=info admin-console list classes
//!
//! # Tokens, stale discards, query parameters
//! RUST_LOG=debug admin-console list enterprises --page 2
//!
//! # Only the sync layer
//! RUST_LOG=sync_framework=debug admin-console list roles
//! ```
//!
//! With `RUST_LOG=debug`, a page click that overtakes a slower request reads:
//!
//! ```text
//! DEBUG fetch: Sending list request token=#1 query=[("page", "2")]
//! DEBUG fetch: Sending list request token=#2 query=[("page", "3")]
//!  INFO Fetch applied resource="enterprises" token=#2 size=10
//! DEBUG Stale result discarded resource="enterprises" token=#1 current=Some(#2)
//! ```

/// Initializes the global subscriber. Call once, at the start of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
