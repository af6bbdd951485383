//! Record store exposed as a page save/delete handler.

use std::marker::PhantomData;

use transerp_core::{Entity, TenantId};
use transerp_forms::{HandlerError, RecordHandler};

use super::{RecordStore, StoreError};

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        HandlerError::storage(err.to_string())
    }
}

/// Saves new records through `create` and existing ones through `update`.
pub struct StoreHandler<R, S> {
    tenant_id: TenantId,
    store: S,
    _record: PhantomData<fn() -> R>,
}

impl<R, S> StoreHandler<R, S> {
    pub fn new(tenant_id: TenantId, store: S) -> Self {
        Self {
            tenant_id,
            store,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait::async_trait]
impl<R, S> RecordHandler<R> for StoreHandler<R, S>
where
    R: Entity + Clone + Send + Sync + 'static,
    S: RecordStore<R>,
{
    async fn save(&self, record: R) -> Result<R, HandlerError> {
        if record.is_new() {
            let stored = self.store.create(self.tenant_id, record).await?;
            tracing::debug!(tenant_id = %self.tenant_id.as_uuid(), id = %stored.id(), "record created");
            return Ok(stored);
        }

        let id = record.id();
        if self.store.update(self.tenant_id, record.clone()).await? {
            tracing::debug!(tenant_id = %self.tenant_id.as_uuid(), id = %id, "record updated");
            Ok(record)
        } else {
            Err(HandlerError::NotFound)
        }
    }

    async fn delete(&self, record: &R) -> Result<(), HandlerError> {
        if self.store.delete(self.tenant_id, record.id()).await? {
            Ok(())
        } else {
            Err(HandlerError::NotFound)
        }
    }
}
