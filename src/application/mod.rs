//! Application Layer - Orchestration services
//!
//! The service manager, context factory, and result sink that tie the domain
//! model to the store and registry collaborators.

pub mod destination;
pub mod manager;
pub mod source;

pub use destination::AnalysisDestination;
pub use manager::ServiceManager;
pub use source::AnalysisSource;
