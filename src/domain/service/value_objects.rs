//! Service value objects: status, supported types, configuration, versioning

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::domain::object::value_objects::TloType;

/// Runtime status of a service, recomputed on every reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Freshly discovered, not yet reconciled
    Unknown,
    /// Plugin resolves and its stored configuration validates
    Available,
    /// Plugin resolves but its stored configuration fails validation
    Misconfigured,
    /// Plugin class could not be resolved
    Unavailable,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Unknown => write!(f, "unknown"),
            ServiceStatus::Available => write!(f, "available"),
            ServiceStatus::Misconfigured => write!(f, "misconfigured"),
            ServiceStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Object kinds a service declares it can analyze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedTypes {
    /// Every kind
    All,
    /// Only the listed kinds
    Only(BTreeSet<TloType>),
}

impl SupportedTypes {
    /// Build the `Only` variant from a list of kinds.
    pub fn only(types: impl IntoIterator<Item = TloType>) -> Self {
        SupportedTypes::Only(types.into_iter().collect())
    }

    /// Whether the given kind is covered by this declaration.
    pub fn supports(&self, tlo_type: TloType) -> bool {
        match self {
            SupportedTypes::All => true,
            SupportedTypes::Only(types) => types.contains(&tlo_type),
        }
    }
}

/// Ordered mapping of option name to value, the unit of service configuration
///
/// Keys follow the plugin's declared default schema for its current version;
/// values are free-form JSON validated by the plugin itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceConfig(BTreeMap<String, serde_json::Value>);

/// Outcome of merging a plugin's new default schema into a stored config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMerge {
    /// Options newly declared by the plugin, added with their default values
    pub added: Vec<String>,
    /// Options no longer declared by the plugin; values are kept, only reported
    pub removed: Vec<String>,
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.0.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Merge a new default schema into this config.
    ///
    /// Options present in `defaults` but absent here are added with their
    /// default values; existing values are never overwritten. Options absent
    /// from `defaults` are reported as removed but their values are kept, so
    /// a plugin rollback finds them untouched.
    pub fn merge_defaults(&mut self, defaults: &ServiceConfig) -> ConfigMerge {
        let mut merge = ConfigMerge::default();
        for (key, value) in &defaults.0 {
            if !self.0.contains_key(key) {
                self.0.insert(key.clone(), value.clone());
                merge.added.push(key.clone());
            }
        }
        for key in self.0.keys() {
            if !defaults.0.contains_key(key) {
                merge.removed.push(key.clone());
            }
        }
        merge
    }
}

impl FromIterator<(String, serde_json::Value)> for ServiceConfig {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse a version string leniently under strict semantic-version ordering.
///
/// Services historically declared one- or two-component versions ("1.1");
/// those are padded with zero components before parsing. Returns `None` for
/// anything that is not a version.
pub fn parse_version(value: &str) -> Option<Version> {
    if let Ok(version) = Version::parse(value) {
        return Some(version);
    }
    let parts: Vec<&str> = value.split('.').collect();
    if parts.is_empty() || parts.len() > 2 {
        return None;
    }
    if !parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }
    let padded = match parts.len() {
        1 => format!("{}.0.0", value),
        _ => format!("{}.0", value),
    };
    Version::parse(&padded).ok()
}

/// Parse a stored result version; unparseable strings compare as 0.0.0 and
/// are therefore superseded by any real version.
pub fn stored_version(value: &str) -> Version {
    parse_version(value).unwrap_or_else(|| Version::new(0, 0, 0))
}

/// Whether two declared versions differ under lenient parsing.
///
/// Falls back to raw string comparison when either side is unparseable.
pub fn versions_differ(left: &str, right: &str) -> bool {
    match (parse_version(left), parse_version(right)) {
        (Some(a), Some(b)) => a != b,
        _ => left != right,
    }
}
