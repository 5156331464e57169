use crate::error::ConsoleError;
use crate::resources::Packages;
use async_trait::async_trait;
use sync_framework::{MutableResourceClient, MutationCoordinator, ResourceClient, SyncError};

#[derive(Clone)]
pub struct PackageClient {
    inner: MutationCoordinator<Packages>,
}

impl PackageClient {
    pub fn new(inner: MutationCoordinator<Packages>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ResourceClient<Packages> for PackageClient {
    type Error = ConsoleError;

    fn inner(&self) -> &MutationCoordinator<Packages> {
        &self.inner
    }

    fn map_error(e: SyncError) -> Self::Error {
        ConsoleError::from(e)
    }
}

impl MutableResourceClient<Packages> for PackageClient {}
