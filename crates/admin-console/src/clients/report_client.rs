use crate::error::ConsoleError;
use crate::resources::Reports;
use async_trait::async_trait;
use sync_framework::{MutationCoordinator, ResourceClient, SyncError};

/// Read-only client: reports are generated server-side and never edited here.
#[derive(Clone)]
pub struct ReportClient {
    inner: MutationCoordinator<Reports>,
}

impl ReportClient {
    pub fn new(inner: MutationCoordinator<Reports>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ResourceClient<Reports> for ReportClient {
    type Error = ConsoleError;

    fn inner(&self) -> &MutationCoordinator<Reports> {
        &self.inner
    }

    fn map_error(e: SyncError) -> Self::Error {
        ConsoleError::from(e)
    }
}
