//! Artifact ingestion collaborator trait

use async_trait::async_trait;

use crate::domain::object::repositories::StoreError;
use crate::domain::object::value_objects::TloType;

/// Everything an ingestion collaborator needs to file a derived artifact
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub filename: String,
    pub data: Vec<u8>,
    /// Source-of-origin inherited from the object the artifact derives from
    pub source: String,
    /// Kind of the originating target
    pub related_type: TloType,
    /// Identifier of the originating target
    pub related_identifier: String,
    /// Name of the producing service, recorded as the ingestion method
    pub method: String,
    /// Declared relationship of the artifact to its source
    pub relationship: String,
    /// Analyst on whose behalf the task ran
    pub actor: String,
}

/// Ingestion collaborator for one artifact kind (sample, certificate, capture).
///
/// Implementations assume the originating target exists; the result sink
/// checks that precondition before fanning out.
#[async_trait]
pub trait ArtifactIngestor: Send + Sync {
    async fn ingest(&self, request: IngestRequest) -> Result<(), StoreError>;
}
