//! Service subsystem errors

use thiserror::Error;

use crate::domain::object::repositories::StoreError;
use crate::domain::object::value_objects::TloType;

/// Errors raised by the service orchestration subsystem
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    /// Target object or its binary payload is missing
    #[error("{tlo_type} not found: {identifier}")]
    NotFound {
        tlo_type: TloType,
        identifier: String,
    },

    /// Binary payload length does not match the object's declared size
    #[error("payload is {actual} bytes, expected {expected}")]
    DataIntegrity { actual: u64, expected: u64 },

    /// Object type tag outside the supported set
    #[error("unsupported object type: {0}")]
    InvalidType(String),

    /// A plugin's validator rejected the configuration
    #[error("invalid configuration for service {service}: {reason}")]
    ConfigInvalid { service: String, reason: String },

    /// Plugin class could not be resolved from the registry
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// No descriptor exists for the named service
    #[error("unknown service: {0}")]
    UnknownService(String),

    /// The store rejected a read or write
    #[error("persistence error: {message}")]
    Persistence { message: String },
}

impl ServiceError {
    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    /// Check if this error is a configuration validation error
    pub fn is_config_invalid(&self) -> bool {
        matches!(self, ServiceError::ConfigInvalid { .. })
    }

    /// Check if this error is a persistence failure
    pub fn is_persistence(&self) -> bool {
        matches!(self, ServiceError::Persistence { .. })
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NoMatch { tlo_type, key } => ServiceError::NotFound {
                tlo_type,
                identifier: key.identifier().to_string(),
            },
            StoreError::Persistence { message } => ServiceError::Persistence { message },
        }
    }
}
