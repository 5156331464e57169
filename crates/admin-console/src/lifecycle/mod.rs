//! # Console Lifecycle
//!
//! Starting, wiring and stopping the console's collection actors.
//!
//! [`ConsoleSystem::new`] creates one [`CollectionActor`](sync_framework::CollectionActor)
//! per resource, spawns it, and wraps its client in a
//! [`MutationCoordinator`](sync_framework::MutationCoordinator) bound to the shared
//! gateway. Actors have no dependencies on each other, so construction order does
//! not matter.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop list handles** - each open list screen keeps a coordinator alive
//! 2. **Drop all clients** - closes the sender side of the actor channels
//! 3. **Actors detect closure** - `receiver.recv()` returns `None` and the loop ends
//! 4. **Await completion** - [`ConsoleSystem::shutdown`] waits for every actor task

pub mod console_system;
pub mod tracing;

pub use console_system::ConsoleSystem;
pub use self::tracing::setup_tracing;
