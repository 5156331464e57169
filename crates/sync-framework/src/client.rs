//! # Collection Client
//!
//! The type-safe handle for talking to a [`CollectionActor`](crate::CollectionActor).
//! It only ever touches the local store; nothing here goes over the network.

use crate::error::SyncError;
use crate::filter::FilterState;
use crate::message::CollectionRequest;
use crate::projection::{project, Projection, ProjectionOptions};
use crate::record::{Record, RecordId};
use crate::resource::Resource;
use crate::store::{CollectionStore, FetchOutcome, FetchStatus, RequestToken};
use crate::wire::FetchPage;
use serde::Serialize;
use std::marker::PhantomData;
use tokio::sync::{mpsc, oneshot};

/// What a list screen renders: the visible page plus the fetch status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub visible_items: Vec<Record>,
    pub total_pages: u64,
    pub status: FetchStatus,
    pub error: Option<String>,
}

/// Cheap-to-clone handle to the store of resource `R`.
pub struct CollectionClient<R: Resource> {
    sender: mpsc::Sender<CollectionRequest>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for CollectionClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> CollectionClient<R> {
    pub fn new(sender: mpsc::Sender<CollectionRequest>) -> Self {
        Self {
            sender,
            _resource: PhantomData,
        }
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, SyncError>>) -> CollectionRequest,
    ) -> Result<T, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| SyncError::ActorClosed)?;
        response.await.map_err(|_| SyncError::ActorDropped)?
    }

    pub async fn begin_fetch(&self) -> Result<RequestToken, SyncError> {
        self.call(|respond_to| CollectionRequest::BeginFetch { respond_to })
            .await
    }

    pub async fn complete_fetch(
        &self,
        token: RequestToken,
        result: Result<FetchPage, String>,
    ) -> Result<FetchOutcome, SyncError> {
        self.call(|respond_to| CollectionRequest::CompleteFetch {
            token,
            result,
            respond_to,
        })
        .await
    }

    pub async fn apply_create(&self, record: Record) -> Result<(), SyncError> {
        self.call(|respond_to| CollectionRequest::ApplyCreate { record, respond_to })
            .await
    }

    pub async fn apply_update(&self, record: Record) -> Result<bool, SyncError> {
        self.call(|respond_to| CollectionRequest::ApplyUpdate { record, respond_to })
            .await
    }

    pub async fn apply_delete(&self, id: RecordId) -> Result<bool, SyncError> {
        self.call(|respond_to| CollectionRequest::ApplyDelete { id, respond_to })
            .await
    }

    pub async fn apply_toggle(
        &self,
        id: RecordId,
        field: &'static str,
    ) -> Result<Option<bool>, SyncError> {
        self.call(|respond_to| CollectionRequest::ApplyToggle {
            id,
            field,
            respond_to,
        })
        .await
    }

    /// Copy of the whole store: items, status, error and pagination.
    pub async fn snapshot(&self) -> Result<CollectionStore, SyncError> {
        self.call(|respond_to| CollectionRequest::Snapshot { respond_to })
            .await
    }

    /// Projects the current store through `filters`.
    pub async fn select(
        &self,
        filters: &FilterState,
        page_size: usize,
    ) -> Result<Selection, SyncError> {
        let store = self.snapshot().await?;
        let Projection {
            visible_items,
            total_pages,
        } = project(
            store.items(),
            store.pagination(),
            filters,
            ProjectionOptions::new(R::SEARCH_FIELDS, page_size),
        );
        Ok(Selection {
            visible_items,
            total_pages,
            status: store.status(),
            error: store.error().map(str::to_string),
        })
    }
}
