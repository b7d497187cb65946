//! Analysis execution context

use serde::{Deserialize, Serialize};

use crate::domain::object::value_objects::{ObjectKey, TloType};

/// Type-specific payload carried by a context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContextPayload {
    /// Raw bytes plus content checksum, for binary kinds
    Binary {
        data: Vec<u8>,
        checksum: String,
        record: serde_json::Value,
    },
    /// Full record snapshot, for record kinds
    Record { record: serde_json::Value },
    /// Identifier only; the consumer resolves the record lazily
    Reference,
}

/// Immutable snapshot of a target object prepared for one service run
///
/// Fields are private: a context is never mutated after construction, a new
/// one is built for each task. Identifier semantics vary by kind — content
/// checksum for binary kinds, record id otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisContext {
    tlo_type: TloType,
    identifier: String,
    username: String,
    payload: ContextPayload,
}

impl AnalysisContext {
    /// Context for a binary kind; the identifier is the content checksum.
    pub fn binary(
        tlo_type: TloType,
        checksum: impl Into<String>,
        username: impl Into<String>,
        data: Vec<u8>,
        record: serde_json::Value,
    ) -> Self {
        let checksum = checksum.into();
        Self {
            tlo_type,
            identifier: checksum.clone(),
            username: username.into(),
            payload: ContextPayload::Binary {
                data,
                checksum,
                record,
            },
        }
    }

    /// Context for a record kind, embedding a full snapshot.
    pub fn record_snapshot(
        tlo_type: TloType,
        identifier: impl Into<String>,
        username: impl Into<String>,
        record: serde_json::Value,
    ) -> Self {
        Self {
            tlo_type,
            identifier: identifier.into(),
            username: username.into(),
            payload: ContextPayload::Record { record },
        }
    }

    /// Context for a reference kind, carrying only the identifier.
    pub fn reference(
        tlo_type: TloType,
        identifier: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            tlo_type,
            identifier: identifier.into(),
            username: username.into(),
            payload: ContextPayload::Reference,
        }
    }

    pub fn tlo_type(&self) -> TloType {
        self.tlo_type
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Raw payload bytes, when this context targets a binary kind.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.payload {
            ContextPayload::Binary { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Content checksum, when this context targets a binary kind.
    pub fn checksum(&self) -> Option<&str> {
        match &self.payload {
            ContextPayload::Binary { checksum, .. } => Some(checksum),
            _ => None,
        }
    }

    /// Record snapshot, when one was embedded at construction.
    pub fn record(&self) -> Option<&serde_json::Value> {
        match &self.payload {
            ContextPayload::Binary { record, .. } | ContextPayload::Record { record } => {
                Some(record)
            }
            ContextPayload::Reference => None,
        }
    }

    pub fn has_payload(&self) -> bool {
        matches!(&self.payload, ContextPayload::Binary { .. })
    }

    /// The exact-match key of the target object, routed by kind.
    pub fn lookup_key(&self) -> ObjectKey {
        self.tlo_type.lookup_key(&self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn binary_context_identifier_is_the_checksum() {
        let context = AnalysisContext::binary(
            TloType::Sample,
            "abcd1234",
            "analyst",
            vec![1, 2, 3],
            json!({"filename": "dropper.exe"}),
        );
        assert_eq!(context.identifier(), "abcd1234");
        assert_eq!(context.checksum(), Some("abcd1234"));
        assert_eq!(context.data(), Some(&[1u8, 2, 3][..]));
        assert!(context.has_payload());
        assert_eq!(
            context.lookup_key(),
            ObjectKey::Checksum("abcd1234".to_string())
        );
    }

    #[test]
    fn record_context_embeds_a_snapshot() {
        let context = AnalysisContext::record_snapshot(
            TloType::Domain,
            "dom-1",
            "analyst",
            json!({"fqdn": "a.example"}),
        );
        assert!(!context.has_payload());
        assert_eq!(context.record(), Some(&json!({"fqdn": "a.example"})));
        assert_eq!(context.lookup_key(), ObjectKey::Id("dom-1".to_string()));
    }

    #[test]
    fn reference_context_carries_identifier_only() {
        let context = AnalysisContext::reference(TloType::Event, "evt-9", "analyst");
        assert!(context.record().is_none());
        assert!(context.data().is_none());
        assert!(!context.has_payload());
    }
}
