use crate::error::ConsoleError;
use crate::resources::PromoCodes;
use async_trait::async_trait;
use sync_framework::{
    MutableResourceClient, MutationCoordinator, Record, RecordId, ResourceClient, SyncError,
};
use tracing::{debug, instrument};

/// Client for promo codes, the one resource with an activation toggle.
#[derive(Clone)]
pub struct PromoCodeClient {
    inner: MutationCoordinator<PromoCodes>,
}

impl PromoCodeClient {
    pub fn new(inner: MutationCoordinator<PromoCodes>) -> Self {
        Self { inner }
    }

    /// Flips `isActive` on the server, then locally.
    ///
    /// Returns the server's copy of the code when the endpoint echoes it.
    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: RecordId) -> Result<Option<Record>, ConsoleError> {
        debug!("Sending request");
        self.inner.toggle(id).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ResourceClient<PromoCodes> for PromoCodeClient {
    type Error = ConsoleError;

    fn inner(&self) -> &MutationCoordinator<PromoCodes> {
        &self.inner
    }

    fn map_error(e: SyncError) -> Self::Error {
        ConsoleError::from(e)
    }
}

impl MutableResourceClient<PromoCodes> for PromoCodeClient {}
