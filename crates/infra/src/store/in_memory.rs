use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use transerp_core::{Entity, RecordId, TenantId};

use super::{RecordStore, StoreError};

/// In-memory record store for tests/dev.
///
/// Ids are handed out as `max + 1` per tenant. Rows keep insertion order.
#[derive(Debug)]
pub struct InMemoryRecordStore<R> {
    inner: RwLock<HashMap<TenantId, Vec<R>>>,
    failing: AtomicBool,
}

impl<R> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail with [`StoreError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("writes disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Entity + Clone> InMemoryRecordStore<R> {
    /// Seed rows as-is, ids included.
    pub fn with_rows(tenant_id: TenantId, rows: Vec<R>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.inner.write() {
            map.insert(tenant_id, rows);
        }
        store
    }
}

#[async_trait::async_trait]
impl<R> RecordStore<R> for InMemoryRecordStore<R>
where
    R: Entity + Clone + Send + Sync + 'static,
{
    async fn get_all(&self, tenant_id: TenantId) -> Result<Vec<R>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&tenant_id).cloned().unwrap_or_default())
    }

    async fn get_by_id(&self, tenant_id: TenantId, id: RecordId) -> Result<Option<R>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .get(&tenant_id)
            .and_then(|rows| rows.iter().find(|r| r.id() == id))
            .cloned())
    }

    async fn create(&self, tenant_id: TenantId, mut record: R) -> Result<R, StoreError> {
        self.check_writable()?;
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let rows = map.entry(tenant_id).or_default();

        if record.is_new() {
            let next = rows.iter().map(|r| r.id().get()).max().unwrap_or(0).saturating_add(1);
            record.set_id(RecordId::new(next));
        } else if rows.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::Duplicate(record.id()));
        }

        rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, tenant_id: TenantId, record: R) -> Result<bool, StoreError> {
        self.check_writable()?;
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let Some(slot) = map
            .get_mut(&tenant_id)
            .and_then(|rows| rows.iter_mut().find(|r| r.id() == record.id()))
        else {
            return Ok(false);
        };
        *slot = record;
        Ok(true)
    }

    async fn delete(&self, tenant_id: TenantId, id: RecordId) -> Result<bool, StoreError> {
        self.check_writable()?;
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let Some(rows) = map.get_mut(&tenant_id) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        Ok(rows.len() != before)
    }
}
