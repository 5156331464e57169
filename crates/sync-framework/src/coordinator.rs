//! # Mutation Coordinator
//!
//! Pairs every change of a collection with its network call, in a fixed order:
//! first the gateway request, then the matching store mutation, and the latter only
//! once the server has confirmed. There are no optimistic updates: a failed call leaves
//! the store exactly as it was and hands the reason back to the caller, who decides
//! whether to retry or notify. Nothing is retried here.
//!
//! Fetches follow the token protocol of the [`CollectionStore`](crate::CollectionStore):
//! `begin_fetch` on the actor, the gateway call outside it, then `complete_fetch`
//! with the token, which silently drops the result if a newer fetch has started.
//!
//! Mutations on different records are independent and may finish in any order.
//! Two mutations racing on the *same* record are not serialised: whichever response
//! arrives last is what the store shows.

use crate::client::{CollectionClient, Selection};
use crate::error::SyncError;
use crate::filter::FilterState;
use crate::gateway::{GatewayRequest, SharedGateway};
use crate::record::{Payload, Record, RecordId};
use crate::resource::{PaginationMode, Resource};
use crate::store::{FetchOutcome, RequestToken};
use crate::wire::{decode_optional_record, decode_page, decode_record};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Network-aware front of one collection: fetch, get, create, update, remove, toggle.
pub struct MutationCoordinator<R: Resource> {
    gateway: SharedGateway,
    collection: CollectionClient<R>,
}

impl<R: Resource> Clone for MutationCoordinator<R> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            collection: self.collection.clone(),
        }
    }
}

impl<R: Resource> MutationCoordinator<R> {
    pub fn new(gateway: SharedGateway, collection: CollectionClient<R>) -> Self {
        Self {
            gateway,
            collection,
        }
    }

    pub fn collection(&self) -> &CollectionClient<R> {
        &self.collection
    }

    /// Fetches the list for `filters` and applies it if no newer fetch started meanwhile.
    ///
    /// Returns [`FetchOutcome::Stale`] when the result was superseded; that is not an
    /// error. A gateway failure is recorded in the store *and* returned.
    pub async fn fetch(&self, filters: &FilterState) -> Result<FetchOutcome, SyncError> {
        let token = self.collection.begin_fetch().await?;
        self.fetch_with_token(token, filters).await
    }

    /// Runs the list request for a token already taken with `begin_fetch`.
    ///
    /// Callers that start fetches from concurrent tasks take the tokens themselves,
    /// in input order, so the newest input always holds the newest token.
    #[instrument(skip(self, filters), fields(resource = R::NAME, page = filters.page()))]
    pub async fn fetch_with_token(
        &self,
        token: RequestToken,
        filters: &FilterState,
    ) -> Result<FetchOutcome, SyncError> {
        let request =
            GatewayRequest::get(R::collection_path()).with_query(list_query::<R>(filters));
        debug!(%token, query = ?request.query, "Sending list request");

        let (result, failure) = match self
            .gateway
            .request(request)
            .await
            .map_err(SyncError::from)
            .and_then(decode_page)
        {
            Ok(page) => (Ok(page), None),
            Err(e) => (Err(e.to_string()), Some(e)),
        };
        let outcome = self.collection.complete_fetch(token, result).await?;

        match (outcome, failure) {
            (FetchOutcome::Applied, Some(e)) => Err(e),
            (outcome, _) => Ok(outcome),
        }
    }

    /// Loads one record (`GET path/:id`) and upserts it into the store.
    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn get(&self, id: RecordId) -> Result<Record, SyncError> {
        let payload = self
            .gateway
            .request(GatewayRequest::get(R::item_path(&id)))
            .await
            .inspect_err(|e| warn!(%id, error = %e, "Get failed"))?;
        let record = decode_record(payload)?;
        self.collection.apply_create(record.clone()).await?;
        Ok(record)
    }

    /// Creates a record and inserts the server's echo into the store.
    #[instrument(skip(self, payload), fields(resource = R::NAME))]
    pub async fn create(&self, payload: Payload) -> Result<Record, SyncError> {
        debug!(?payload, "Sending create");
        let response = self
            .gateway
            .request(GatewayRequest::post(R::collection_path(), Value::Object(payload)))
            .await
            .inspect_err(|e| warn!(error = %e, "Create failed"))?;
        let record = decode_record(response)?;
        self.collection.apply_create(record.clone()).await?;
        info!(id = %record.id(), "Create confirmed");
        Ok(record)
    }

    /// Updates a record and replaces the local copy with the server's echo.
    ///
    /// If the record is no longer in the store the local step is a no-op; the
    /// gateway's answer alone decides success.
    #[instrument(skip(self, payload), fields(resource = R::NAME))]
    pub async fn update(&self, id: RecordId, payload: Payload) -> Result<Record, SyncError> {
        debug!(?payload, "Sending update");
        let response = self
            .gateway
            .request(GatewayRequest::put(R::item_path(&id), Value::Object(payload)))
            .await
            .inspect_err(|e| warn!(%id, error = %e, "Update failed"))?;
        let record = decode_record(response)?;
        self.collection.apply_update(record.clone()).await?;
        info!(%id, "Update confirmed");
        Ok(record)
    }

    /// Deletes a record remotely, then locally. Deleting an id the store no longer
    /// holds still succeeds if the server agreed.
    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn remove(&self, id: RecordId) -> Result<(), SyncError> {
        self.gateway
            .request(GatewayRequest::delete(R::item_path(&id)))
            .await
            .inspect_err(|e| warn!(%id, error = %e, "Delete failed"))?;
        self.collection.apply_delete(id.clone()).await?;
        info!(%id, "Delete confirmed");
        Ok(())
    }

    /// Flips the resource's toggle field via `PATCH path/:id/toggle`.
    ///
    /// Resources without a toggle field are rejected before any request is made.
    /// When the server echoes the record it replaces the local copy; otherwise the
    /// field is flipped locally.
    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn toggle(&self, id: RecordId) -> Result<Option<Record>, SyncError> {
        let Some(field) = R::TOGGLE_FIELD else {
            return Err(SyncError::Unsupported {
                resource: R::NAME,
                operation: "toggle",
            });
        };
        let response = self
            .gateway
            .request(GatewayRequest::patch(R::toggle_path(&id)))
            .await
            .inspect_err(|e| warn!(%id, error = %e, "Toggle failed"))?;
        match decode_optional_record(response) {
            Some(record) if record.id() == &id => {
                self.collection.apply_update(record.clone()).await?;
                info!(%id, "Toggle confirmed");
                Ok(Some(record))
            }
            _ => {
                self.collection.apply_toggle(id.clone(), field).await?;
                info!(%id, field, "Toggle confirmed without record body");
                Ok(None)
            }
        }
    }

    /// Renders the current store through `filters`.
    pub async fn select(
        &self,
        filters: &FilterState,
        page_size: usize,
    ) -> Result<Selection, SyncError> {
        self.collection.select(filters, page_size).await
    }
}

/// Client-paginated resources load the whole list, so the page is not sent.
fn list_query<R: Resource>(filters: &FilterState) -> Vec<(String, String)> {
    let params = filters.query_params();
    match R::PAGINATION {
        PaginationMode::Server => params,
        PaginationMode::Client => params.into_iter().filter(|(key, _)| key != "page").collect(),
    }
}
