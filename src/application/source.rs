//! Analysis source — builds immutable execution contexts from the store.

use std::sync::Arc;

use tracing::error;

use crate::domain::analysis::value_objects::AnalysisContext;
use crate::domain::object::repositories::ObjectStore;
use crate::domain::object::value_objects::TloType;
use crate::domain::service::errors::ServiceError;

/// Context factory over the document store.
///
/// Dispatch is an exhaustive match over [`TloType`]; a new kind cannot be
/// added without updating it. Every context is built fresh — one per task.
pub struct AnalysisSource {
    store: Arc<dyn ObjectStore>,
}

impl AnalysisSource {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Build the execution context for one task.
    ///
    /// Binary kinds load the object and its payload and verify the payload
    /// length against the declared size. Record kinds embed a full snapshot.
    /// Reference kinds carry only the identifier.
    pub async fn create_context(
        &self,
        tlo_type: TloType,
        identifier: &str,
        username: &str,
    ) -> Result<AnalysisContext, ServiceError> {
        match tlo_type {
            TloType::Sample | TloType::Certificate | TloType::Pcap => {
                self.binary_context(tlo_type, identifier, username).await
            }
            TloType::Domain | TloType::Ip => {
                self.record_context(tlo_type, identifier, username).await
            }
            TloType::RawData | TloType::Event | TloType::Indicator => Ok(
                AnalysisContext::reference(tlo_type, identifier, username),
            ),
        }
    }

    async fn binary_context(
        &self,
        tlo_type: TloType,
        identifier: &str,
        username: &str,
    ) -> Result<AnalysisContext, ServiceError> {
        let key = tlo_type.lookup_key(identifier);

        let object = self
            .store
            .find(tlo_type, &key)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                tlo_type,
                identifier: identifier.to_string(),
            })?;

        let data = self
            .store
            .read_payload(tlo_type, &key)
            .await?
            .filter(|data| !data.is_empty())
            .ok_or_else(|| ServiceError::NotFound {
                tlo_type,
                identifier: identifier.to_string(),
            })?;

        check_length(&data, object.size.unwrap_or(0))?;

        let checksum = object
            .checksum
            .clone()
            .unwrap_or_else(|| identifier.to_string());

        Ok(AnalysisContext::binary(
            tlo_type,
            checksum,
            username,
            data,
            object.record,
        ))
    }

    async fn record_context(
        &self,
        tlo_type: TloType,
        identifier: &str,
        username: &str,
    ) -> Result<AnalysisContext, ServiceError> {
        let key = tlo_type.lookup_key(identifier);

        let object = self
            .store
            .find(tlo_type, &key)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                tlo_type,
                identifier: identifier.to_string(),
            })?;

        Ok(AnalysisContext::record_snapshot(
            tlo_type, identifier, username, object.record,
        ))
    }
}

fn check_length(data: &[u8], expected: u64) -> Result<(), ServiceError> {
    let actual = data.len() as u64;
    if actual != expected {
        let mismatch = ServiceError::DataIntegrity { actual, expected };
        error!(%mismatch, "payload length mismatch");
        return Err(mismatch);
    }
    Ok(())
}
