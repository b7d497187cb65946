//! Descriptor store collaborator trait

use async_trait::async_trait;

use crate::domain::object::repositories::StoreError;

use super::entities::ServiceDescriptor;

/// Persisted catalog of known service plugins.
#[async_trait]
pub trait DescriptorStore: Send + Sync {
    /// Find a descriptor by service name.
    async fn find_by_name(&self, name: &str) -> Result<Option<ServiceDescriptor>, StoreError>;

    /// List every descriptor.
    async fn list(&self) -> Result<Vec<ServiceDescriptor>, StoreError>;

    /// Insert or replace a descriptor, keyed by name.
    async fn upsert(&self, descriptor: ServiceDescriptor) -> Result<(), StoreError>;

    /// Drop the entire collection. Destructive; used for full re-initialization.
    async fn drop_all(&self) -> Result<(), StoreError>;
}
