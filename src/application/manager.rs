//! Service manager — plugin discovery, descriptor reconciliation, and
//! administrative controls.
//!
//! Every registered plugin is reflected by a persisted [`ServiceDescriptor`].
//! `reconcile` runs two passes: a discovery pass that creates missing
//! descriptors and merges configuration across version changes, then a status
//! pass that recomputes availability for every descriptor. The status pass
//! must complete for all descriptors even when individual plugins are broken,
//! so resolution and validation failures become descriptor state instead of
//! propagating.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ServicesConfig;
use crate::domain::object::value_objects::TloType;
use crate::domain::service::entities::ServiceDescriptor;
use crate::domain::service::errors::ServiceError;
use crate::domain::service::repositories::DescriptorStore;
use crate::domain::service::traits::AnalysisService;
use crate::domain::service::value_objects::{ServiceConfig, ServiceStatus, versions_differ};
use crate::infrastructure::registry::ServiceRegistry;

/// Reconciles discovered plugins against the descriptor store and exposes
/// enable/disable/triage controls.
///
/// `reconcile` and `reset_all` perform non-atomic read-then-write sequences
/// per descriptor and are expected to run single-threaded, at startup or from
/// an administrative action.
pub struct ServiceManager {
    registry: Arc<ServiceRegistry>,
    descriptors: Arc<dyn DescriptorStore>,
}

impl ServiceManager {
    pub fn new(registry: Arc<ServiceRegistry>, descriptors: Arc<dyn DescriptorStore>) -> Self {
        Self {
            registry,
            descriptors,
        }
    }

    /// Construct a manager and, unless configured otherwise, reconcile
    /// immediately so the descriptor catalog reflects the running binary.
    pub async fn bootstrap(
        registry: Arc<ServiceRegistry>,
        descriptors: Arc<dyn DescriptorStore>,
        config: &ServicesConfig,
    ) -> Result<Self, ServiceError> {
        let manager = Self::new(registry, descriptors);
        if config.reconcile_on_startup {
            manager.reconcile().await?;
        }
        Ok(manager)
    }

    /// Reconcile every discovered plugin with its descriptor, then recompute
    /// status for every descriptor in the store.
    pub async fn reconcile(&self) -> Result<(), ServiceError> {
        self.sync_descriptors().await?;
        self.update_status_all().await?;
        Ok(())
    }

    /// Drop the descriptor collection and rebuild it from the registry.
    pub async fn reset_all(&self) -> Result<(), ServiceError> {
        debug!("dropping service descriptor collection");
        self.descriptors.drop_all().await?;
        self.reconcile().await
    }

    // ── Discovery pass ───────────────────────────────────────────────

    async fn sync_descriptors(&self) -> Result<(), ServiceError> {
        debug!("storing service metadata");
        for service in self.registry.services() {
            match self.descriptors.find_by_name(service.name()).await? {
                None => self.add_descriptor(service.as_ref()).await,
                Some(current) => {
                    debug!(
                        service = service.name(),
                        old = %current.version,
                        new = service.version(),
                        "service already exists, checking version"
                    );
                    if versions_differ(&current.version, service.version()) {
                        self.upgrade_descriptor(current, service.as_ref()).await;
                    }
                }
            }
        }
        Ok(())
    }

    async fn add_descriptor(&self, service: &dyn AnalysisService) {
        info!(service = service.name(), "adding service descriptor");
        let descriptor = ServiceDescriptor::from_service(service);
        if let Err(error) = self.descriptors.upsert(descriptor).await {
            warn!(service = service.name(), %error, "failed to add service descriptor");
        }
    }

    /// Merge the plugin's new default schema into the stored config and
    /// record the new version. Existing option values are preserved; options
    /// dropped by the new version are reported but their values kept.
    async fn upgrade_descriptor(
        &self,
        mut descriptor: ServiceDescriptor,
        service: &dyn AnalysisService,
    ) {
        info!(
            service = service.name(),
            from = %descriptor.version,
            to = service.version(),
            "updating service descriptor"
        );

        let defaults = service.build_default_config();
        let merge = descriptor.config.merge_defaults(&defaults);
        if !merge.removed.is_empty() {
            warn!(
                service = service.name(),
                removed = ?merge.removed,
                "old service configuration options removed"
            );
        }
        if !merge.added.is_empty() {
            warn!(
                service = service.name(),
                added = ?merge.added,
                "new service configuration options added"
            );
        }

        descriptor.version = service.version().to_string();
        descriptor.touch();

        match self.descriptors.upsert(descriptor).await {
            Ok(()) => info!(service = service.name(), "service descriptor updated"),
            Err(error) => {
                warn!(service = service.name(), %error, "failed to update service descriptor");
            }
        }
    }

    // ── Status pass ──────────────────────────────────────────────────

    async fn update_status_all(&self) -> Result<(), ServiceError> {
        for descriptor in self.descriptors.list().await? {
            self.refresh_status(descriptor).await;
        }
        Ok(())
    }

    /// Recompute the status of a single descriptor.
    ///
    /// Status becomes `Available` iff the plugin resolves and the stored
    /// config passes its validator; otherwise the service is forced off the
    /// enabled and triage lists. A persistence failure here is logged, not
    /// raised, so the pass completes for the remaining descriptors.
    pub async fn update_status(&self, name: &str) -> Result<(), ServiceError> {
        let descriptor = self
            .descriptors
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::UnknownService(name.to_string()))?;
        self.refresh_status(descriptor).await;
        Ok(())
    }

    async fn refresh_status(&self, mut descriptor: ServiceDescriptor) {
        match self.registry.resolve(&descriptor.name) {
            Err(_) => {
                warn!(service = %descriptor.name, "service is unavailable");
                descriptor.status = ServiceStatus::Unavailable;
                descriptor.enabled = false;
                descriptor.run_on_triage = false;
            }
            Ok(service) => match service.validate_config(&descriptor.config) {
                Err(error) => {
                    warn!(service = %descriptor.name, %error, "service is misconfigured");
                    descriptor.status = ServiceStatus::Misconfigured;
                    descriptor.enabled = false;
                    descriptor.run_on_triage = false;
                }
                Ok(()) => {
                    descriptor.status = ServiceStatus::Available;
                    // enabled and run_on_triage stay as previously set
                }
            },
        }

        descriptor.touch();
        let name = descriptor.name.clone();
        if let Err(error) = self.descriptors.upsert(descriptor).await {
            warn!(service = %name, %error, "failed to update service status");
        }
    }

    // ── Administrative controls ──────────────────────────────────────

    /// Replace a descriptor's configuration wholesale, then re-run status
    /// reconciliation for that one descriptor.
    pub async fn update_config(
        &self,
        name: &str,
        config: ServiceConfig,
        actor: &str,
    ) -> Result<(), ServiceError> {
        let mut descriptor = self
            .descriptors
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::UnknownService(name.to_string()))?;

        descriptor.config = config;
        descriptor.touch();
        self.descriptors.upsert(descriptor).await?;
        info!(service = name, analyst = actor, "service configuration updated");

        self.update_status(name).await
    }

    /// Reset a descriptor's configuration to the plugin's declared defaults.
    pub async fn reset_config(&self, name: &str, actor: &str) -> Result<(), ServiceError> {
        let defaults = self.registry.resolve(name)?.build_default_config();
        self.update_config(name, defaults, actor).await
    }

    /// The stored configuration for a service, falling back to the plugin's
    /// declared defaults when no descriptor is readable.
    pub async fn get_config(&self, name: &str) -> Result<ServiceConfig, ServiceError> {
        match self.descriptors.find_by_name(name).await {
            Ok(Some(descriptor)) => Ok(descriptor.config),
            Ok(None) => Ok(self.registry.resolve(name)?.build_default_config()),
            Err(error) => {
                warn!(service = name, %error, "failed to read stored config, using defaults");
                Ok(self.registry.resolve(name)?.build_default_config())
            }
        }
    }

    /// Enable or disable a service for on-demand runs.
    pub async fn set_enabled(
        &self,
        name: &str,
        enabled: bool,
        actor: &str,
    ) -> Result<(), ServiceError> {
        if enabled {
            info!(service = name, analyst = actor, "enabling service");
        } else {
            info!(service = name, analyst = actor, "disabling service");
        }
        let mut descriptor = self
            .descriptors
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::UnknownService(name.to_string()))?;
        descriptor.enabled = enabled;
        descriptor.touch();
        self.descriptors.upsert(descriptor).await?;
        Ok(())
    }

    /// Enable or disable a service for automatic runs on ingest.
    pub async fn set_triage(
        &self,
        name: &str,
        enabled: bool,
        actor: &str,
    ) -> Result<(), ServiceError> {
        if enabled {
            info!(service = name, analyst = actor, "enabling triage");
        } else {
            info!(service = name, analyst = actor, "disabling triage");
        }
        let mut descriptor = self
            .descriptors
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::UnknownService(name.to_string()))?;
        descriptor.run_on_triage = enabled;
        descriptor.touch();
        self.descriptors.upsert(descriptor).await?;
        Ok(())
    }

    // ── Service selection ────────────────────────────────────────────

    /// Names of services that are enabled and whose plugin still resolves.
    ///
    /// The resolvability guard drops stale descriptors whose plugin was
    /// removed from the build.
    pub async fn enabled_services(&self) -> Result<Vec<String>, ServiceError> {
        let names = self
            .descriptors
            .list()
            .await?
            .into_iter()
            .filter(|d| d.enabled && self.registry.contains(&d.name))
            .map(|d| d.name)
            .collect();
        Ok(names)
    }

    /// Names of resolvable services set to run on triage.
    ///
    /// Deliberately does not also require `enabled`: the triage opt-in is
    /// tracked independently of the on-demand flag. Long-standing behavior,
    /// kept as-is.
    pub async fn triage_services(&self) -> Result<Vec<String>, ServiceError> {
        let names = self
            .descriptors
            .list()
            .await?
            .into_iter()
            .filter(|d| d.run_on_triage && self.registry.contains(&d.name))
            .map(|d| d.name)
            .collect();
        Ok(names)
    }

    /// Enabled service names applicable to a target of the given kind.
    ///
    /// A service requiring the "data" field is only offered targets that
    /// actually carry a binary payload.
    pub async fn get_supported_services(
        &self,
        tlo_type: TloType,
        has_payload: bool,
    ) -> Result<Vec<String>, ServiceError> {
        let mut supported = Vec::new();
        for name in self.enabled_services().await? {
            let Ok(service) = self.registry.resolve(&name) else {
                continue;
            };
            if !service.supported_types().supports(tlo_type) {
                continue;
            }
            if !has_payload && service.required_fields().contains("data") {
                continue;
            }
            supported.push(name);
        }
        Ok(supported)
    }
}
