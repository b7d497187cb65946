//! Stored-object domain module
//!
//! Contains the closed set of top-level object kinds, the authoritative
//! lookup-key routing, the stored document shape, and the object store
//! collaborator trait.

pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use value_objects::*;
