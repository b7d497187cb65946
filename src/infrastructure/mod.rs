//! Infrastructure Layer - External concerns and implementations
//!
//! The plugin registry and store implementations behind the domain's
//! collaborator traits.

pub mod registry;
pub mod store;

pub use registry::ServiceRegistry;
pub use store::{InMemoryDescriptorStore, InMemoryObjectStore};
