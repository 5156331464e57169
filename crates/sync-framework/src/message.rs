//! # Collection Messages
//!
//! Requests sent from a [`CollectionClient`](crate::CollectionClient) to the
//! [`CollectionActor`](crate::CollectionActor) owning a store. Each variant maps to one
//! store operation; replies travel back over a oneshot channel.

use crate::error::SyncError;
use crate::record::{Record, RecordId};
use crate::store::{CollectionStore, FetchOutcome, RequestToken};
use crate::wire::FetchPage;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, SyncError>>;

/// Message sent to the actor to read or change its store.
#[derive(Debug)]
pub enum CollectionRequest {
    BeginFetch {
        respond_to: Response<RequestToken>,
    },
    CompleteFetch {
        token: RequestToken,
        result: Result<FetchPage, String>,
        respond_to: Response<FetchOutcome>,
    },
    ApplyCreate {
        record: Record,
        respond_to: Response<()>,
    },
    ApplyUpdate {
        record: Record,
        respond_to: Response<bool>,
    },
    ApplyDelete {
        id: RecordId,
        respond_to: Response<bool>,
    },
    ApplyToggle {
        id: RecordId,
        field: &'static str,
        respond_to: Response<Option<bool>>,
    },
    Snapshot {
        respond_to: Response<CollectionStore>,
    },
}
