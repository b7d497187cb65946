//! Analysis service domain module
//!
//! Contains the plugin contract every analysis service implements, the
//! persisted service descriptor, configuration and version value objects,
//! errors, and the descriptor store collaborator trait.

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod traits;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use traits::*;
pub use value_objects::*;
