//! Analysis destination — persists task results into per-object analysis
//! histories and fans out derived artifacts.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::analysis::entities::{AnalysisTask, EmbeddedAnalysisResult, ProducedArtifact};
use crate::domain::analysis::repositories::{ArtifactIngestor, IngestRequest};
use crate::domain::analysis::value_objects::AnalysisContext;
use crate::domain::object::entities::StoredObject;
use crate::domain::object::repositories::ObjectStore;
use crate::domain::object::value_objects::TloType;
use crate::domain::service::errors::ServiceError;
use crate::domain::service::traits::AnalysisService;
use crate::domain::service::value_objects::stored_version;

/// Result sink over the document store.
///
/// Writes go through the store's atomic append/replace-by-key primitives so
/// concurrent tasks targeting the same object never lose each other's
/// results. One ingestion collaborator per artifact kind handles fan-out on
/// task completion.
pub struct AnalysisDestination {
    store: Arc<dyn ObjectStore>,
    samples: Arc<dyn ArtifactIngestor>,
    certificates: Arc<dyn ArtifactIngestor>,
    captures: Arc<dyn ArtifactIngestor>,
}

impl AnalysisDestination {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        samples: Arc<dyn ArtifactIngestor>,
        certificates: Arc<dyn ArtifactIngestor>,
        captures: Arc<dyn ArtifactIngestor>,
    ) -> Self {
        Self {
            store,
            samples,
            certificates,
            captures,
        }
    }

    /// Whether the target already carries a result from this service at the
    /// service's version or later.
    ///
    /// Advisory only — this is not a lock. An unparseable stored version
    /// compares as 0.0.0 and is superseded by any requested version.
    pub async fn results_exist(
        &self,
        service: &dyn AnalysisService,
        context: &AnalysisContext,
    ) -> Result<bool, ServiceError> {
        self.analysis_exists(context, service.name(), Some(service.version()))
            .await
    }

    /// Whether the target carries any result from the named service,
    /// regardless of version. Gates services that are not rerunnable.
    pub async fn has_results(
        &self,
        service_name: &str,
        context: &AnalysisContext,
    ) -> Result<bool, ServiceError> {
        self.analysis_exists(context, service_name, None).await
    }

    async fn analysis_exists(
        &self,
        context: &AnalysisContext,
        service_name: &str,
        version: Option<&str>,
    ) -> Result<bool, ServiceError> {
        let object = self.find_target(context).await?;
        let required = version.map(stored_version);

        for analysis in &object.analysis {
            if analysis.service_name != service_name {
                continue;
            }
            match &required {
                None => return Ok(true),
                Some(required) => {
                    if stored_version(&analysis.version) >= *required {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }

    /// Unconditionally append the task's result snapshot to the target's
    /// analysis history via an atomic push.
    pub async fn add_task(&self, task: &AnalysisTask) -> Result<(), ServiceError> {
        debug!(task_id = %task.task_id, service = %task.service_name, "adding analysis task");
        let context = task.context();
        self.store
            .push_analysis(
                context.tlo_type(),
                &context.lookup_key(),
                EmbeddedAnalysisResult::from_task(task),
            )
            .await?;
        Ok(())
    }

    /// Replace the embedded result matching the task's id in place.
    ///
    /// A missing prior result is not an error: it means the caller updated
    /// before adding, so the result is inserted instead, with a warning for
    /// operators.
    pub async fn update_task(&self, task: &AnalysisTask) -> Result<(), ServiceError> {
        debug!(task_id = %task.task_id, service = %task.service_name, "updating analysis task");
        let context = task.context();
        let replaced = self
            .store
            .replace_analysis(
                context.tlo_type(),
                &context.lookup_key(),
                task.task_id,
                EmbeddedAnalysisResult::from_task(task),
            )
            .await?;

        if !replaced {
            warn!(
                task_id = %task.task_id,
                service = %task.service_name,
                "tried to update an analysis result that was never added; inserting"
            );
            self.add_task(task).await?;
        }
        Ok(())
    }

    /// Persist the task's final state, then ingest every produced artifact
    /// through the matching collaborator.
    ///
    /// The target object must still exist at this point — ingestion
    /// collaborators assume it does.
    pub async fn finish_task(&self, task: &AnalysisTask) -> Result<(), ServiceError> {
        debug!(task_id = %task.task_id, service = %task.service_name, "finishing analysis task");
        self.update_task(task).await?;

        if !task.has_artifacts() {
            debug!(task_id = %task.task_id, "no artifacts to ingest");
            return Ok(());
        }

        let object = self.find_target(task.context()).await?;

        self.ingest_artifacts(&self.samples, &task.files, task, &object)
            .await?;
        self.ingest_artifacts(&self.certificates, &task.certificates, task, &object)
            .await?;
        self.ingest_artifacts(&self.captures, &task.captures, task, &object)
            .await?;

        info!(
            task_id = %task.task_id,
            files = task.files.len(),
            certificates = task.certificates.len(),
            captures = task.captures.len(),
            "ingested task artifacts"
        );
        Ok(())
    }

    async fn ingest_artifacts(
        &self,
        ingestor: &Arc<dyn ArtifactIngestor>,
        artifacts: &[ProducedArtifact],
        task: &AnalysisTask,
        object: &StoredObject,
    ) -> Result<(), ServiceError> {
        let context = task.context();
        for artifact in artifacts {
            debug!(filename = %artifact.filename, "ingesting artifact");
            ingestor
                .ingest(IngestRequest {
                    filename: artifact.filename.clone(),
                    data: artifact.data.clone(),
                    source: object.source.clone(),
                    related_type: context.tlo_type(),
                    related_identifier: context.identifier().to_string(),
                    method: task.service_name.clone(),
                    relationship: artifact.relationship.clone(),
                    actor: context.username().to_string(),
                })
                .await?;
        }
        Ok(())
    }

    /// Remove the embedded result whose id matches `task_id`, leaving the
    /// rest of the history untouched. A missing target is a no-op.
    pub async fn delete_analysis(
        &self,
        tlo_type: TloType,
        identifier: &str,
        task_id: Uuid,
        actor: &str,
    ) -> Result<(), ServiceError> {
        let key = tlo_type.lookup_key(identifier);
        let Some(object) = self.store.find(tlo_type, &key).await? else {
            return Ok(());
        };

        let retained: Vec<EmbeddedAnalysisResult> = object
            .analysis
            .into_iter()
            .filter(|analysis| analysis.analysis_id != task_id)
            .collect();

        self.store.set_analysis(tlo_type, &key, retained).await?;
        info!(%tlo_type, identifier, %task_id, analyst = actor, "deleted analysis result");
        Ok(())
    }

    /// Strip every result produced by `service_name` from the object routed
    /// by `identifier`, across every supported kind's collection.
    ///
    /// Used for full service-result invalidation, e.g. on plugin rollback.
    pub async fn delete_all_results(
        &self,
        identifier: &str,
        service_name: &str,
    ) -> Result<(), ServiceError> {
        for tlo_type in TloType::ALL {
            let key = tlo_type.lookup_key(identifier);
            let Some(object) = self.store.find(tlo_type, &key).await? else {
                continue;
            };

            let retained: Vec<EmbeddedAnalysisResult> = object
                .analysis
                .into_iter()
                .filter(|analysis| analysis.service_name != service_name)
                .collect();

            self.store.set_analysis(tlo_type, &key, retained).await?;
        }
        info!(identifier, service = service_name, "deleted all results for service");
        Ok(())
    }

    async fn find_target(&self, context: &AnalysisContext) -> Result<StoredObject, ServiceError> {
        self.store
            .find(context.tlo_type(), &context.lookup_key())
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                tlo_type: context.tlo_type(),
                identifier: context.identifier().to_string(),
            })
    }
}
