//! Service descriptor entity

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::traits::AnalysisService;
use super::value_objects::{ServiceConfig, ServiceStatus, SupportedTypes};

/// Persisted record describing a discovered service plugin
///
/// Created when a plugin is first discovered, mutated on every
/// reconciliation pass, and deleted only by a full collection reset.
/// `status` is recomputed by reconciliation, never hand-set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Unique service name
    pub name: String,
    /// Declared semantic version of the plugin that last reconciled this descriptor
    pub version: String,
    /// Coarse category of the service
    pub service_type: String,
    /// One-line statement of what the service is for
    pub purpose: String,
    /// Whether the service may be re-run against an already-analyzed target
    pub rerunnable: bool,
    /// Object kinds the plugin declared it can analyze
    pub supported_types: SupportedTypes,
    /// Context fields the plugin requires
    pub required_fields: BTreeSet<String>,
    /// Longer human-readable description
    pub description: String,
    /// Whether analysts may run this service on demand
    pub enabled: bool,
    /// Whether the service runs automatically on ingest
    pub run_on_triage: bool,
    /// Recomputed runtime status
    pub status: ServiceStatus,
    /// Stored configuration
    pub config: ServiceConfig,
    /// When the descriptor was created
    pub created_at: DateTime<Utc>,
    /// When the descriptor was last updated
    pub updated_at: DateTime<Utc>,
}

impl ServiceDescriptor {
    /// Build a fresh descriptor for a newly discovered plugin.
    ///
    /// New services start disabled and off the triage list until an analyst
    /// opts in; status stays `Unknown` until the first status pass.
    pub fn from_service(service: &dyn AnalysisService) -> Self {
        let now = Utc::now();
        Self {
            name: service.name().to_string(),
            version: service.version().to_string(),
            service_type: service.service_type().to_string(),
            purpose: service.purpose().to_string(),
            rerunnable: service.rerunnable(),
            supported_types: service.supported_types(),
            required_fields: service.required_fields(),
            description: service.description().to_string(),
            enabled: false,
            run_on_triage: false,
            status: ServiceStatus::Unknown,
            config: service.build_default_config(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a mutation timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
