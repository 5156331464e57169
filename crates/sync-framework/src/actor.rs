//! # Collection Actor
//!
//! This module defines the `CollectionActor`, the task that owns one resource's
//! [`CollectionStore`] and applies every change to it sequentially.
//!
//! # Architecture Note
//! The actor is the "server" half: it owns the store and the receiving end of the
//! channel. Because requests are processed one at a time, the store needs no lock,
//! and token checks plus mutations can never interleave. Network calls happen
//! *outside* the actor (in the [`MutationCoordinator`](crate::MutationCoordinator)),
//! so the store stays readable while a request is in flight.
//!
//! # Usage Pattern
//!
//! 1. **Create**: `CollectionActor::<R>::new(buffer)` returns the actor and its client.
//! 2. **Run**: spawn `actor.run()` on the runtime.
//! 3. **Use**: hand clones of the client to coordinators and screens.
//!
//! Dropping every client closes the channel and ends the loop.

use crate::client::CollectionClient;
use crate::message::CollectionRequest;
use crate::resource::Resource;
use crate::store::{CollectionStore, FetchOutcome};
use std::marker::PhantomData;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that owns the collection store of resource `R`.
pub struct CollectionActor<R: Resource> {
    receiver: mpsc::Receiver<CollectionRequest>,
    store: CollectionStore,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> CollectionActor<R> {
    /// Creates a new `CollectionActor` and its associated `CollectionClient`.
    ///
    /// `buffer_size` is the channel capacity; when full, client calls wait for room.
    pub fn new(buffer_size: usize) -> (Self, CollectionClient<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let actor = Self {
            receiver,
            store: CollectionStore::new(),
            _resource: PhantomData,
        };
        (actor, CollectionClient::new(sender))
    }

    /// Runs the event loop until every client is dropped.
    pub async fn run(mut self) {
        let resource = R::NAME;
        info!(resource, "Collection actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::BeginFetch { respond_to } => {
                    let token = self.store.begin_fetch();
                    debug!(resource, %token, "Fetch started");
                    let _ = respond_to.send(Ok(token));
                }
                CollectionRequest::CompleteFetch {
                    token,
                    result,
                    respond_to,
                } => {
                    let failed = result.as_ref().err().cloned();
                    let outcome = self.store.complete_fetch(token, result);
                    match (outcome, failed) {
                        (FetchOutcome::Stale, _) => {
                            debug!(
                                resource,
                                %token,
                                current = ?self.store.current_token(),
                                "Stale result discarded"
                            );
                        }
                        (FetchOutcome::Applied, None) => {
                            info!(resource, %token, size = self.store.len(), "Fetch applied");
                        }
                        (FetchOutcome::Applied, Some(error)) => {
                            warn!(resource, %token, %error, "Fetch failed");
                        }
                    }
                    let _ = respond_to.send(Ok(outcome));
                }
                CollectionRequest::ApplyCreate { record, respond_to } => {
                    let id = record.id().clone();
                    self.store.apply_create(record);
                    info!(resource, %id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(()));
                }
                CollectionRequest::ApplyUpdate { record, respond_to } => {
                    let id = record.id().clone();
                    let found = self.store.apply_update(record);
                    if found {
                        info!(resource, %id, "Updated");
                    } else {
                        debug!(resource, %id, "Update for record not in store");
                    }
                    let _ = respond_to.send(Ok(found));
                }
                CollectionRequest::ApplyDelete { id, respond_to } => {
                    let found = self.store.apply_delete(&id);
                    if found {
                        info!(resource, %id, size = self.store.len(), "Deleted");
                    } else {
                        debug!(resource, %id, "Delete for record not in store");
                    }
                    let _ = respond_to.send(Ok(found));
                }
                CollectionRequest::ApplyToggle {
                    id,
                    field,
                    respond_to,
                } => {
                    let value = self.store.apply_toggle(&id, field);
                    match value {
                        Some(value) => info!(resource, %id, field, value, "Toggled"),
                        None => debug!(resource, %id, "Toggle for record not in store"),
                    }
                    let _ = respond_to.send(Ok(value));
                }
                CollectionRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.clone()));
                }
            }
        }

        info!(resource, size = self.store.len(), "Shutdown");
    }
}
