//! Tenant-isolated record storage.

pub mod handler;
pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use transerp_core::{RecordId, TenantId};

pub use handler::StoreHandler;
pub use in_memory::InMemoryRecordStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("record {0} already exists")]
    Duplicate(RecordId),

    #[error("lock poisoned")]
    Poisoned,

    #[error("database error in {operation}: {message}")]
    Database { operation: String, message: String },
}

/// CRUD storage for one record type.
///
/// Lookups that miss are `None`/`false`, never errors.
#[async_trait::async_trait]
pub trait RecordStore<R>: Send + Sync
where
    R: Send + Sync + 'static,
{
    async fn get_all(&self, tenant_id: TenantId) -> Result<Vec<R>, StoreError>;

    async fn get_by_id(&self, tenant_id: TenantId, id: RecordId) -> Result<Option<R>, StoreError>;

    /// Store a new record and return it with its assigned id.
    async fn create(&self, tenant_id: TenantId, record: R) -> Result<R, StoreError>;

    async fn update(&self, tenant_id: TenantId, record: R) -> Result<bool, StoreError>;

    async fn delete(&self, tenant_id: TenantId, id: RecordId) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
impl<R, S> RecordStore<R> for Arc<S>
where
    R: Send + Sync + 'static,
    S: RecordStore<R> + ?Sized,
{
    async fn get_all(&self, tenant_id: TenantId) -> Result<Vec<R>, StoreError> {
        (**self).get_all(tenant_id).await
    }

    async fn get_by_id(&self, tenant_id: TenantId, id: RecordId) -> Result<Option<R>, StoreError> {
        (**self).get_by_id(tenant_id, id).await
    }

    async fn create(&self, tenant_id: TenantId, record: R) -> Result<R, StoreError> {
        (**self).create(tenant_id, record).await
    }

    async fn update(&self, tenant_id: TenantId, record: R) -> Result<bool, StoreError> {
        (**self).update(tenant_id, record).await
    }

    async fn delete(&self, tenant_id: TenantId, id: RecordId) -> Result<bool, StoreError> {
        (**self).delete(tenant_id, id).await
    }
}
