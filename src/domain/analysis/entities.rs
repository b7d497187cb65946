//! Analysis task and embedded result entities

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::service::traits::AnalysisService;
use crate::domain::service::value_objects::ServiceConfig;

use super::value_objects::AnalysisContext;

/// Lifecycle state of one service invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Running; the service is still appending progress
    Started,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Error,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Started => write!(f, "started"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Error => write!(f, "error"),
        }
    }
}

/// One operator-visible log line accumulated by a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLogEntry {
    pub level: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// A file, certificate, or capture produced by a service run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducedArtifact {
    pub filename: String,
    pub data: Vec<u8>,
    /// Declared relationship of the artifact to its source object
    pub relationship: String,
}

/// One execution instance of a service against a context
///
/// Created when a run starts, mutated as the service appends progress and
/// artifacts, terminal once finished or failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisTask {
    /// Unique per invocation; becomes `analysis_id` when embedded
    pub task_id: Uuid,
    pub service_name: String,
    pub service_version: String,
    /// Becomes `analysis_type` when embedded
    pub service_type: String,
    /// Configuration snapshot the run was started with
    pub config: ServiceConfig,
    pub status: TaskStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Service-defined result payload
    pub results: serde_json::Value,
    pub log: Vec<TaskLogEntry>,
    /// Samples produced by the run
    pub files: Vec<ProducedArtifact>,
    /// Certificates produced by the run
    pub certificates: Vec<ProducedArtifact>,
    /// Packet captures produced by the run
    pub captures: Vec<ProducedArtifact>,
    context: AnalysisContext,
}

impl AnalysisTask {
    /// Start a new task for `service` against `context` with a config snapshot.
    pub fn new(
        service: &dyn AnalysisService,
        config: ServiceConfig,
        context: AnalysisContext,
    ) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            service_name: service.name().to_string(),
            service_version: service.version().to_string(),
            service_type: service.service_type().to_string(),
            config,
            status: TaskStatus::Started,
            started_at: Utc::now(),
            finished_at: None,
            results: serde_json::Value::Array(Vec::new()),
            log: Vec::new(),
            files: Vec::new(),
            certificates: Vec::new(),
            captures: Vec::new(),
            context,
        }
    }

    /// The context this task runs against. Immutable for the task's lifetime.
    pub fn context(&self) -> &AnalysisContext {
        &self.context
    }

    /// Append an operator-visible log line.
    pub fn append_log(&mut self, level: impl Into<String>, message: impl Into<String>) {
        self.log.push(TaskLogEntry {
            level: level.into(),
            message: message.into(),
            at: Utc::now(),
        });
    }

    /// Mark the task completed with its result payload.
    pub fn finish(&mut self, results: serde_json::Value) {
        self.results = results;
        self.status = TaskStatus::Completed;
        self.finished_at = Some(Utc::now());
    }

    /// Mark the task failed, recording the reason in the log.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.append_log("error", message);
        self.status = TaskStatus::Error;
        self.finished_at = Some(Utc::now());
    }

    pub fn add_file(&mut self, artifact: ProducedArtifact) {
        self.files.push(artifact);
    }

    pub fn add_certificate(&mut self, artifact: ProducedArtifact) {
        self.certificates.push(artifact);
    }

    pub fn add_capture(&mut self, artifact: ProducedArtifact) {
        self.captures.push(artifact);
    }

    /// Whether the run produced any artifacts to ingest.
    pub fn has_artifacts(&self) -> bool {
        !self.files.is_empty() || !self.certificates.is_empty() || !self.captures.is_empty()
    }
}

/// A result embedded into a target object's ordered `analysis` sequence
///
/// At most one element with a given `analysis_id` exists per owning object.
/// The task's `id`/`type` fields are renamed to `analysis_id`/`analysis_type`
/// at embedding time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedAnalysisResult {
    pub analysis_id: Uuid,
    pub analysis_type: String,
    pub service_name: String,
    pub version: String,
    pub status: TaskStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Configuration snapshot the run was started with
    pub config: ServiceConfig,
    pub results: serde_json::Value,
    pub log: Vec<TaskLogEntry>,
}

impl EmbeddedAnalysisResult {
    /// Snapshot a task into its embedded form.
    pub fn from_task(task: &AnalysisTask) -> Self {
        Self {
            analysis_id: task.task_id,
            analysis_type: task.service_type.clone(),
            service_name: task.service_name.clone(),
            version: task.service_version.clone(),
            status: task.status,
            started_at: task.started_at,
            finished_at: task.finished_at,
            config: task.config.clone(),
            results: task.results.clone(),
            log: task.log.clone(),
        }
    }
}
