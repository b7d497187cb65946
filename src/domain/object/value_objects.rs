//! Stored-object value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::service::errors::ServiceError;

/// Top-level object kind
///
/// The closed set of stored object types an analysis service can target.
/// Adding a kind is a deliberate act: every exhaustive match over this enum
/// (context construction, lookup-key routing, result invalidation) must be
/// updated with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TloType {
    /// Malware sample backed by a binary payload
    Sample,
    /// Domain name record
    Domain,
    /// IP address record
    #[serde(rename = "IP")]
    Ip,
    /// Certificate backed by a binary payload
    Certificate,
    /// Packet capture backed by a binary payload
    #[serde(rename = "PCAP")]
    Pcap,
    /// Raw data blob, referenced by id only
    RawData,
    /// Event record, referenced by id only
    Event,
    /// Indicator record, referenced by id only
    Indicator,
}

impl TloType {
    /// Every supported kind, in routing order.
    pub const ALL: [TloType; 8] = [
        TloType::Sample,
        TloType::Domain,
        TloType::Ip,
        TloType::Certificate,
        TloType::Pcap,
        TloType::RawData,
        TloType::Event,
        TloType::Indicator,
    ];

    /// Kinds carrying a binary payload in the payload store.
    ///
    /// Their identifier is the content checksum of that payload.
    pub fn is_binary(self) -> bool {
        matches!(self, TloType::Sample | TloType::Certificate | TloType::Pcap)
    }

    /// Kinds whose context embeds a full record snapshot.
    pub fn is_record(self) -> bool {
        matches!(self, TloType::Domain | TloType::Ip)
    }

    /// Kinds whose context carries the identifier only; the consumer resolves
    /// the record lazily.
    pub fn is_reference(self) -> bool {
        matches!(self, TloType::RawData | TloType::Event | TloType::Indicator)
    }

    /// The exact-match lookup key for an object of this kind.
    ///
    /// This is the one authoritative routing function shared by every read
    /// and write path: binary kinds key on content checksum, everything else
    /// keys on the internal record id.
    pub fn lookup_key(self, identifier: &str) -> ObjectKey {
        if self.is_binary() {
            ObjectKey::Checksum(identifier.to_string())
        } else {
            ObjectKey::Id(identifier.to_string())
        }
    }
}

impl fmt::Display for TloType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TloType::Sample => "Sample",
            TloType::Domain => "Domain",
            TloType::Ip => "IP",
            TloType::Certificate => "Certificate",
            TloType::Pcap => "PCAP",
            TloType::RawData => "RawData",
            TloType::Event => "Event",
            TloType::Indicator => "Indicator",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TloType {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Sample" => Ok(TloType::Sample),
            "Domain" => Ok(TloType::Domain),
            "IP" => Ok(TloType::Ip),
            "Certificate" => Ok(TloType::Certificate),
            "PCAP" => Ok(TloType::Pcap),
            "RawData" => Ok(TloType::RawData),
            "Event" => Ok(TloType::Event),
            "Indicator" => Ok(TloType::Indicator),
            other => Err(ServiceError::InvalidType(other.to_string())),
        }
    }
}

/// Exact-match lookup key for a stored object
///
/// Produced only by [`TloType::lookup_key`] so that read and write paths can
/// never diverge on how a kind is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKey {
    /// Content checksum of the binary payload (hex digest)
    Checksum(String),
    /// Internal record id
    Id(String),
}

impl ObjectKey {
    /// The raw identifier this key was built from.
    pub fn identifier(&self) -> &str {
        match self {
            ObjectKey::Checksum(value) | ObjectKey::Id(value) => value,
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKey::Checksum(value) => write!(f, "checksum:{}", value),
            ObjectKey::Id(value) => write!(f, "id:{}", value),
        }
    }
}
