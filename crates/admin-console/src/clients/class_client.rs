use crate::error::ConsoleError;
use crate::resources::Classes;
use async_trait::async_trait;
use serde_json::Value;
use sync_framework::{
    MutableResourceClient, MutationCoordinator, Payload, Record, RecordId, ResourceClient,
    SyncError,
};
use tracing::{debug, instrument};

/// Client for the class list.
#[derive(Clone)]
pub struct ClassClient {
    inner: MutationCoordinator<Classes>,
}

impl ClassClient {
    pub fn new(inner: MutationCoordinator<Classes>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn rename(&self, id: RecordId, name: &str) -> Result<Record, ConsoleError> {
        debug!("Sending request");
        let mut payload = Payload::new();
        payload.insert("name".to_string(), Value::String(name.to_string()));
        self.update(id, payload).await
    }
}

#[async_trait]
impl ResourceClient<Classes> for ClassClient {
    type Error = ConsoleError;

    fn inner(&self) -> &MutationCoordinator<Classes> {
        &self.inner
    }

    fn map_error(e: SyncError) -> Self::Error {
        ConsoleError::from(e)
    }
}

impl MutableResourceClient<Classes> for ClassClient {}
