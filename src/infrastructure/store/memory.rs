//! In-memory document store
//!
//! Backs tests and single-process embedding. Every update primitive takes
//! one write lock for its whole critical section, which gives the same
//! document-level atomicity the production store provides natively.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::analysis::entities::EmbeddedAnalysisResult;
use crate::domain::object::entities::StoredObject;
use crate::domain::object::repositories::{ObjectStore, StoreError};
use crate::domain::object::value_objects::{ObjectKey, TloType};
use crate::domain::service::entities::ServiceDescriptor;
use crate::domain::service::repositories::DescriptorStore;

/// In-memory object store with a separate binary payload area keyed by
/// content checksum.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<(TloType, ObjectKey), StoredObject>>,
    payloads: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hex SHA-256 digest used as content checksum.
    pub fn checksum(data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    /// Insert an object, indexed by its routing key.
    pub async fn insert(&self, object: StoredObject) {
        let key = object.key();
        self.objects
            .write()
            .await
            .insert((object.tlo_type, key), object);
    }

    /// Store a binary payload under its checksum.
    pub async fn store_payload(&self, checksum: impl Into<String>, payload: Vec<u8>) {
        self.payloads.write().await.insert(checksum.into(), payload);
    }

    /// Insert a binary-kind object together with its payload. The checksum is
    /// computed from the payload and returned.
    pub async fn insert_binary(
        &self,
        tlo_type: TloType,
        filename: impl Into<String>,
        source: impl Into<String>,
        payload: Vec<u8>,
    ) -> String {
        let checksum = Self::checksum(&payload);
        let object = StoredObject::new_binary(
            tlo_type,
            Uuid::new_v4().to_string(),
            checksum.clone(),
            payload.len() as u64,
            filename,
            source,
            serde_json::Value::Null,
        );
        self.store_payload(checksum.clone(), payload).await;
        self.insert(object).await;
        checksum
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn find(
        &self,
        tlo_type: TloType,
        key: &ObjectKey,
    ) -> Result<Option<StoredObject>, StoreError> {
        Ok(self
            .objects
            .read()
            .await
            .get(&(tlo_type, key.clone()))
            .cloned())
    }

    async fn read_payload(
        &self,
        _tlo_type: TloType,
        key: &ObjectKey,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        match key {
            ObjectKey::Checksum(checksum) => {
                Ok(self.payloads.read().await.get(checksum).cloned())
            }
            ObjectKey::Id(_) => Ok(None),
        }
    }

    async fn push_analysis(
        &self,
        tlo_type: TloType,
        key: &ObjectKey,
        result: EmbeddedAnalysisResult,
    ) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        let object = objects
            .get_mut(&(tlo_type, key.clone()))
            .ok_or_else(|| StoreError::NoMatch {
                tlo_type,
                key: key.clone(),
            })?;
        object.analysis.push(result);
        object.updated_at = Utc::now();
        Ok(())
    }

    async fn replace_analysis(
        &self,
        tlo_type: TloType,
        key: &ObjectKey,
        analysis_id: Uuid,
        result: EmbeddedAnalysisResult,
    ) -> Result<bool, StoreError> {
        let mut objects = self.objects.write().await;
        let object = objects
            .get_mut(&(tlo_type, key.clone()))
            .ok_or_else(|| StoreError::NoMatch {
                tlo_type,
                key: key.clone(),
            })?;

        match object
            .analysis
            .iter_mut()
            .find(|analysis| analysis.analysis_id == analysis_id)
        {
            Some(slot) => {
                *slot = result;
                object.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_analysis(
        &self,
        tlo_type: TloType,
        key: &ObjectKey,
        analysis: Vec<EmbeddedAnalysisResult>,
    ) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        let object = objects
            .get_mut(&(tlo_type, key.clone()))
            .ok_or_else(|| StoreError::NoMatch {
                tlo_type,
                key: key.clone(),
            })?;
        object.analysis = analysis;
        object.updated_at = Utc::now();
        Ok(())
    }
}

/// In-memory descriptor catalog, keyed by service name.
#[derive(Default)]
pub struct InMemoryDescriptorStore {
    descriptors: RwLock<BTreeMap<String, ServiceDescriptor>>,
}

impl InMemoryDescriptorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DescriptorStore for InMemoryDescriptorStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<ServiceDescriptor>, StoreError> {
        Ok(self.descriptors.read().await.get(name).cloned())
    }

    async fn list(&self) -> Result<Vec<ServiceDescriptor>, StoreError> {
        Ok(self.descriptors.read().await.values().cloned().collect())
    }

    async fn upsert(&self, descriptor: ServiceDescriptor) -> Result<(), StoreError> {
        self.descriptors
            .write()
            .await
            .insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    async fn drop_all(&self) -> Result<(), StoreError> {
        self.descriptors.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::analysis::entities::TaskStatus;
    use crate::domain::service::value_objects::ServiceConfig;

    fn result_for(service_name: &str, analysis_id: Uuid) -> EmbeddedAnalysisResult {
        EmbeddedAnalysisResult {
            analysis_id,
            analysis_type: "analysis".to_string(),
            service_name: service_name.to_string(),
            version: "1.0.0".to_string(),
            status: TaskStatus::Started,
            started_at: Utc::now(),
            finished_at: None,
            config: ServiceConfig::new(),
            results: json!([]),
            log: Vec::new(),
        }
    }

    #[tokio::test]
    async fn push_requires_a_matching_document() {
        let store = InMemoryObjectStore::new();
        let key = TloType::Sample.lookup_key("missing");
        let error = store
            .push_analysis(TloType::Sample, &key, result_for("svc", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(error, StoreError::NoMatch { .. }));
    }

    #[tokio::test]
    async fn replace_reports_missing_element_without_failing() {
        let store = InMemoryObjectStore::new();
        let checksum = store
            .insert_binary(TloType::Sample, "a.bin", "unit-test", vec![1, 2, 3])
            .await;
        let key = TloType::Sample.lookup_key(&checksum);

        let replaced = store
            .replace_analysis(
                TloType::Sample,
                &key,
                Uuid::new_v4(),
                result_for("svc", Uuid::new_v4()),
            )
            .await
            .unwrap();
        assert!(!replaced);
    }

    #[tokio::test]
    async fn payload_round_trips_by_checksum() {
        let store = InMemoryObjectStore::new();
        let checksum = store
            .insert_binary(TloType::Pcap, "t.pcap", "unit-test", vec![9; 64])
            .await;
        let key = TloType::Pcap.lookup_key(&checksum);

        let payload = store.read_payload(TloType::Pcap, &key).await.unwrap();
        assert_eq!(payload, Some(vec![9; 64]));
    }
}
