//! # ResourceClient Traits
//!
//! Common interface for resource-specific clients. A client only has to expose its
//! [`MutationCoordinator`] and say how [`SyncError`]s map into its own error type;
//! fetch, select, get, list screens and the mutations come for free.
use crate::debounce::{QueryDebouncer, QueryHandle};
use crate::store::FetchOutcome;
use crate::{
    FilterState, MutationCoordinator, Payload, Record, RecordId, Resource, Selection, SyncError,
    SyncSettings,
};
use async_trait::async_trait;
use tokio::task::JoinHandle;

/// Read side shared by every resource client.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use sync_framework::{MutationCoordinator, Resource, ResourceClient, SyncError};
///
/// struct Coupons;
/// impl Resource for Coupons {
///     const NAME: &'static str = "coupons";
///     const PATH: &'static str = "/coupons";
///     const SEARCH_FIELDS: &'static [&'static str] = &["code"];
/// }
///
/// #[derive(Debug)]
/// struct CouponError(String);
///
/// impl From<String> for CouponError {
///     fn from(s: String) -> Self { CouponError(s) }
/// }
///
/// struct CouponClient {
///     inner: MutationCoordinator<Coupons>,
/// }
///
/// #[async_trait]
/// impl ResourceClient<Coupons> for CouponClient {
///     type Error = CouponError;
///
///     fn inner(&self) -> &MutationCoordinator<Coupons> {
///         &self.inner
///     }
///
///     fn map_error(e: SyncError) -> Self::Error {
///         CouponError(e.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait ResourceClient<R: Resource>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the coordinator behind this client.
    fn inner(&self) -> &MutationCoordinator<R>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: SyncError) -> Self::Error;

    /// Fetch the list for `filters`.
    #[tracing::instrument(skip(self, filters), fields(resource = R::NAME))]
    async fn fetch(&self, filters: &FilterState) -> Result<FetchOutcome, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().fetch(filters).await.map_err(Self::map_error)
    }

    /// Project the local store through `filters`.
    async fn select(
        &self,
        filters: &FilterState,
        page_size: usize,
    ) -> Result<Selection, Self::Error> {
        self.inner()
            .select(filters, page_size)
            .await
            .map_err(Self::map_error)
    }

    /// Start a debounced list screen; it fetches once immediately.
    ///
    /// The debouncer keeps this collection's actor alive until the handle is
    /// dropped and the task has finished.
    fn open_list(&self, settings: &SyncSettings) -> (QueryHandle, JoinHandle<()>) {
        QueryDebouncer::spawn(self.inner().clone(), settings)
    }

    /// Load one record by id.
    #[tracing::instrument(skip(self), fields(resource = R::NAME))]
    async fn get(&self, id: RecordId) -> Result<Record, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }
}

/// Write side for resources the console may change.
#[async_trait]
pub trait MutableResourceClient<R: Resource>: ResourceClient<R> {
    #[tracing::instrument(skip(self, payload), fields(resource = R::NAME))]
    async fn create(&self, payload: Payload) -> Result<Record, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().create(payload).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self, payload), fields(resource = R::NAME))]
    async fn update(&self, id: RecordId, payload: Payload) -> Result<Record, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().update(id, payload).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(resource = R::NAME))]
    async fn remove(&self, id: RecordId) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().remove(id).await.map_err(Self::map_error)
    }
}
