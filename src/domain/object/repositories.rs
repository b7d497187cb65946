//! Object store collaborator trait

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::analysis::entities::EmbeddedAnalysisResult;

use super::entities::StoredObject;
use super::value_objects::{ObjectKey, TloType};

/// Document store errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// No document matched the given key
    #[error("no stored {tlo_type} matches {key}")]
    NoMatch { tlo_type: TloType, key: ObjectKey },

    /// The store rejected the write
    #[error("persistence failed: {message}")]
    Persistence { message: String },
}

/// Document store interface for top-level objects.
///
/// The update primitives are document-level atomic: `push_analysis` appends
/// without reading first, and `replace_analysis` sets the one element matched
/// by `analysis_id` inside a single write, so interleaved writers targeting
/// the same object cannot lose each other's results.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Find an object by exact-match key.
    async fn find(
        &self,
        tlo_type: TloType,
        key: &ObjectKey,
    ) -> Result<Option<StoredObject>, StoreError>;

    /// Read the binary payload of an object. `None` when the payload is
    /// absent from the binary store.
    async fn read_payload(
        &self,
        tlo_type: TloType,
        key: &ObjectKey,
    ) -> Result<Option<Vec<u8>>, StoreError>;

    /// Atomically append a result to the object's analysis history.
    async fn push_analysis(
        &self,
        tlo_type: TloType,
        key: &ObjectKey,
        result: EmbeddedAnalysisResult,
    ) -> Result<(), StoreError>;

    /// Atomically replace the analysis element matching `analysis_id` in
    /// place, preserving sequence order. Returns `false` when the object
    /// exists but carries no matching element.
    async fn replace_analysis(
        &self,
        tlo_type: TloType,
        key: &ObjectKey,
        analysis_id: Uuid,
        result: EmbeddedAnalysisResult,
    ) -> Result<bool, StoreError>;

    /// Replace the object's entire analysis history.
    async fn set_analysis(
        &self,
        tlo_type: TloType,
        key: &ObjectKey,
        analysis: Vec<EmbeddedAnalysisResult>,
    ) -> Result<(), StoreError>;
}
