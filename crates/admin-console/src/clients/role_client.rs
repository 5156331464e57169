use crate::error::ConsoleError;
use crate::resources::Roles;
use async_trait::async_trait;
use sync_framework::{MutableResourceClient, MutationCoordinator, ResourceClient, SyncError};

#[derive(Clone)]
pub struct RoleClient {
    inner: MutationCoordinator<Roles>,
}

impl RoleClient {
    pub fn new(inner: MutationCoordinator<Roles>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ResourceClient<Roles> for RoleClient {
    type Error = ConsoleError;

    fn inner(&self) -> &MutationCoordinator<Roles> {
        &self.inner
    }

    fn map_error(e: SyncError) -> Self::Error {
        ConsoleError::from(e)
    }
}

impl MutableResourceClient<Roles> for RoleClient {}
