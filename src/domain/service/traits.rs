//! Analysis service plugin contract

use std::collections::BTreeSet;

use super::errors::ServiceError;
use super::value_objects::{ServiceConfig, SupportedTypes};

/// Contract every analysis service plugin implements
///
/// A plugin is pure metadata plus a configuration schema from the manager's
/// point of view: discovery, versioning, and status reconciliation all go
/// through this trait. Execution of the analysis itself happens outside this
/// crate, against an `AnalysisContext` built by the context factory.
pub trait AnalysisService: Send + Sync {
    /// Unique service name; doubles as the descriptor key.
    fn name(&self) -> &str;

    /// Declared version as a semantic-version string. Two-component versions
    /// ("1.1") are accepted and padded for comparison.
    fn version(&self) -> &str;

    /// Coarse category of the service (e.g. "analysis", "enrichment").
    fn service_type(&self) -> &str;

    /// One-line statement of what the service is for.
    fn purpose(&self) -> &str;

    /// Longer human-readable description, stored on the descriptor.
    fn description(&self) -> &str;

    /// Whether the service may be re-run against a target that already
    /// carries a result from it.
    fn rerunnable(&self) -> bool {
        false
    }

    /// Object kinds this service can analyze.
    fn supported_types(&self) -> SupportedTypes;

    /// Context fields the service needs. A service requiring "data" is only
    /// offered targets with a binary payload.
    fn required_fields(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// Default configuration for this plugin version; defines the option
    /// schema the manager merges on upgrade.
    fn build_default_config(&self) -> ServiceConfig;

    /// Validate a stored configuration against this plugin version.
    fn validate_config(&self, config: &ServiceConfig) -> Result<(), ServiceError>;
}

impl std::fmt::Debug for dyn AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService")
            .field("name", &self.name())
            .field("version", &self.version())
            .finish()
    }
}
