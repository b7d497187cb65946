//! Registry of in-process analysis service plugins

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::service::errors::ServiceError;
use crate::domain::service::traits::AnalysisService;

/// Registry mapping service names to plugin instances.
///
/// Resolution is a typed lookup: an unresolvable name yields
/// [`ServiceError::Unavailable`], which reconciliation converts into
/// descriptor state rather than propagating.
pub struct ServiceRegistry {
    services: BTreeMap<String, Arc<dyn AnalysisService>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: BTreeMap::new(),
        }
    }

    /// Register a plugin under its declared name.
    pub fn register(&mut self, service: Arc<dyn AnalysisService>) {
        self.services.insert(service.name().to_string(), service);
    }

    /// Resolve a service name to its plugin.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn AnalysisService>, ServiceError> {
        self.services
            .get(name)
            .cloned()
            .ok_or_else(|| ServiceError::Unavailable(name.to_string()))
    }

    /// Whether a plugin is registered under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Every registered plugin, in name order.
    pub fn services(&self) -> Vec<Arc<dyn AnalysisService>> {
        self.services.values().cloned().collect()
    }

    /// Every registered name, in order.
    pub fn names(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::service::value_objects::{ServiceConfig, SupportedTypes};

    struct NoopService;

    impl AnalysisService for NoopService {
        fn name(&self) -> &str {
            "noop"
        }
        fn version(&self) -> &str {
            "1.0.0"
        }
        fn service_type(&self) -> &str {
            "analysis"
        }
        fn purpose(&self) -> &str {
            "does nothing"
        }
        fn description(&self) -> &str {
            "No-op service for registry tests."
        }
        fn supported_types(&self) -> SupportedTypes {
            SupportedTypes::All
        }
        fn required_fields(&self) -> BTreeSet<String> {
            BTreeSet::new()
        }
        fn build_default_config(&self) -> ServiceConfig {
            ServiceConfig::new()
        }
        fn validate_config(&self, _config: &ServiceConfig) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    #[test]
    fn resolves_registered_service() {
        let mut registry = ServiceRegistry::new();
        registry.register(Arc::new(NoopService));

        assert!(registry.contains("noop"));
        assert_eq!(registry.resolve("noop").unwrap().name(), "noop");
    }

    #[test]
    fn unknown_name_is_unavailable() {
        let registry = ServiceRegistry::new();
        let error = registry.resolve("ghost").unwrap_err();
        assert!(matches!(error, ServiceError::Unavailable(name) if name == "ghost"));
    }
}
