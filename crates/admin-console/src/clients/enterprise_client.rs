use crate::error::ConsoleError;
use crate::resources::Enterprises;
use async_trait::async_trait;
use sync_framework::{
    FetchOutcome, FilterState, MutableResourceClient, MutationCoordinator, ResourceClient,
    SyncError,
};
use tracing::{debug, instrument};

/// Client for the server-paginated enterprise list.
#[derive(Clone)]
pub struct EnterpriseClient {
    inner: MutationCoordinator<Enterprises>,
}

impl EnterpriseClient {
    pub fn new(inner: MutationCoordinator<Enterprises>) -> Self {
        Self { inner }
    }

    /// Fetches one server page with no search or filters.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, page: u32) -> Result<FetchOutcome, ConsoleError> {
        debug!("Sending request");
        self.fetch(&FilterState::new().with_page(page)).await
    }
}

#[async_trait]
impl ResourceClient<Enterprises> for EnterpriseClient {
    type Error = ConsoleError;

    fn inner(&self) -> &MutationCoordinator<Enterprises> {
        &self.inner
    }

    fn map_error(e: SyncError) -> Self::Error {
        ConsoleError::from(e)
    }
}

impl MutableResourceClient<Enterprises> for EnterpriseClient {}
