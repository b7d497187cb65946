//! Stored-object document shape

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::analysis::entities::EmbeddedAnalysisResult;

use super::value_objects::{ObjectKey, TloType};

/// A top-level object as seen through the document store
///
/// The store owns the full schema of each kind; this is the projection the
/// services subsystem reads and writes. The embedded `analysis` sequence is
/// owned exclusively by the object's lifecycle — elements are removed only by
/// explicit analyst action or whole-object deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredObject {
    /// Internal record id
    pub id: String,
    /// Kind of this object
    pub tlo_type: TloType,
    /// Content checksum of the binary payload (binary kinds only)
    pub checksum: Option<String>,
    /// Declared payload length in bytes (binary kinds only)
    pub size: Option<u64>,
    /// Original filename (binary kinds only)
    pub filename: Option<String>,
    /// Source-of-origin, propagated onto artifacts derived from this object
    pub source: String,
    /// Full record snapshot
    pub record: serde_json::Value,
    /// Ordered analysis history
    pub analysis: Vec<EmbeddedAnalysisResult>,
    /// When the object was created
    pub created_at: DateTime<Utc>,
    /// When the object was last updated
    pub updated_at: DateTime<Utc>,
}

impl StoredObject {
    /// Create a record-kind object (Domain, IP, RawData, Event, Indicator).
    pub fn new_record(
        tlo_type: TloType,
        id: impl Into<String>,
        source: impl Into<String>,
        record: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            tlo_type,
            checksum: None,
            size: None,
            filename: None,
            source: source.into(),
            record,
            analysis: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a binary-kind object (Sample, Certificate, PCAP).
    pub fn new_binary(
        tlo_type: TloType,
        id: impl Into<String>,
        checksum: impl Into<String>,
        size: u64,
        filename: impl Into<String>,
        source: impl Into<String>,
        record: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            tlo_type,
            checksum: Some(checksum.into()),
            size: Some(size),
            filename: Some(filename.into()),
            source: source.into(),
            record,
            analysis: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The exact-match key this object is addressed by.
    pub fn key(&self) -> ObjectKey {
        match &self.checksum {
            Some(checksum) if self.tlo_type.is_binary() => ObjectKey::Checksum(checksum.clone()),
            _ => ObjectKey::Id(self.id.clone()),
        }
    }
}
