//! Analysis execution domain module
//!
//! Contains the immutable execution context, the per-invocation task record,
//! the embedded result shape persisted onto target objects, and the artifact
//! ingestion collaborator trait.

pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use value_objects::*;
