//! Domain Layer - Core business logic and entities
//!
//! This module contains the domain entities, value objects, and collaborator
//! traits of the service orchestration subsystem.

pub mod analysis;
pub mod object;
pub mod service;

#[allow(ambiguous_glob_reexports)]
pub use analysis::*;
#[allow(ambiguous_glob_reexports)]
pub use object::*;
#[allow(ambiguous_glob_reexports)]
pub use service::*;
