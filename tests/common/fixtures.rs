//! Test data fixtures for threatvault-core

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;

use threatvault_core::domain::analysis::{AnalysisContext, AnalysisTask};
use threatvault_core::domain::object::{StoredObject, TloType};
use threatvault_core::domain::service::{
    AnalysisService, ServiceConfig, ServiceError, SupportedTypes,
};
use threatvault_core::infrastructure::{InMemoryObjectStore, ServiceRegistry};

/// Configurable analysis service plugin for tests.
///
/// Validation behavior can be flipped at runtime to drive descriptors
/// through the misconfigured state.
pub struct StubService {
    name: String,
    version: String,
    supported: SupportedTypes,
    required: BTreeSet<String>,
    defaults: ServiceConfig,
    reject_config: AtomicBool,
}

impl StubService {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            supported: SupportedTypes::All,
            required: BTreeSet::new(),
            defaults: ServiceConfig::new(),
            reject_config: AtomicBool::new(false),
        }
    }

    pub fn with_supported(mut self, supported: SupportedTypes) -> Self {
        self.supported = supported;
        self
    }

    pub fn with_required_field(mut self, field: impl Into<String>) -> Self {
        self.required.insert(field.into());
        self
    }

    pub fn with_default(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.defaults.insert(key, value);
        self
    }

    /// Make `validate_config` fail from now on.
    pub fn reject_config(&self) {
        self.reject_config.store(true, Ordering::SeqCst);
    }
}

impl AnalysisService for StubService {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn service_type(&self) -> &str {
        "analysis"
    }

    fn purpose(&self) -> &str {
        "stub service for tests"
    }

    fn description(&self) -> &str {
        "Configurable stub used by the integration tests."
    }

    fn supported_types(&self) -> SupportedTypes {
        self.supported.clone()
    }

    fn required_fields(&self) -> BTreeSet<String> {
        self.required.clone()
    }

    fn build_default_config(&self) -> ServiceConfig {
        self.defaults.clone()
    }

    fn validate_config(&self, _config: &ServiceConfig) -> Result<(), ServiceError> {
        if self.reject_config.load(Ordering::SeqCst) {
            return Err(ServiceError::ConfigInvalid {
                service: self.name.clone(),
                reason: "rejected by stub".to_string(),
            });
        }
        Ok(())
    }
}

/// Registry with the given plugins registered.
pub fn registry_with(services: Vec<Arc<dyn AnalysisService>>) -> Arc<ServiceRegistry> {
    let mut registry = ServiceRegistry::new();
    for service in services {
        registry.register(service);
    }
    Arc::new(registry)
}

/// Seed the store with one domain record.
pub async fn seed_domain(store: &InMemoryObjectStore, id: &str, fqdn: &str) {
    store
        .insert(StoredObject::new_record(
            TloType::Domain,
            id,
            "test-source",
            json!({ "fqdn": fqdn }),
        ))
        .await;
}

/// Task for `service` against a reference context on the given event id.
pub fn reference_task(service: &dyn AnalysisService, event_id: &str) -> AnalysisTask {
    AnalysisTask::new(
        service,
        service.build_default_config(),
        AnalysisContext::reference(TloType::Event, event_id, "analyst"),
    )
}

/// Task for `service` against a binary sample context.
pub fn sample_task(service: &dyn AnalysisService, checksum: &str, data: Vec<u8>) -> AnalysisTask {
    AnalysisTask::new(
        service,
        service.build_default_config(),
        AnalysisContext::binary(TloType::Sample, checksum, "analyst", data, json!({})),
    )
}
