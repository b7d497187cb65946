//! Test doubles for threatvault-core collaborators

use async_trait::async_trait;
use tokio::sync::Mutex;

use threatvault_core::domain::analysis::{ArtifactIngestor, IngestRequest};
use threatvault_core::domain::object::StoreError;

/// Ingestor that records every request for later assertions.
#[derive(Default)]
pub struct RecordingIngestor {
    requests: Mutex<Vec<IngestRequest>>,
}

impl RecordingIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn requests(&self) -> Vec<IngestRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ArtifactIngestor for RecordingIngestor {
    async fn ingest(&self, request: IngestRequest) -> Result<(), StoreError> {
        self.requests.lock().await.push(request);
        Ok(())
    }
}
