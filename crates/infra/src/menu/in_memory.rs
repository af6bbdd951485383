use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use transerp_auth::{MenuNode, MenuRepository, MenuRight, RepositoryError};
use transerp_core::{RightsId, TenantId, UserId};

#[derive(Debug, Default)]
struct TenantMenus {
    menus: Vec<MenuNode>,
    rights: Vec<MenuRight>,
}

/// In-memory menu repository for tests/dev.
///
/// Bulk rights updates are staged on a copy and swapped in only when every
/// row applied, so a failure leaves the stored rights untouched.
#[derive(Debug, Default)]
pub struct InMemoryMenuStore {
    inner: RwLock<HashMap<TenantId, TenantMenus>>,
    fail_saves: AtomicBool,
}

impl InMemoryMenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tenant's menu rows.
    pub fn set_menus(&self, tenant_id: TenantId, menus: Vec<MenuNode>) {
        if let Ok(mut map) = self.inner.write() {
            map.entry(tenant_id).or_default().menus = menus;
        }
    }

    /// Insert rights rows as-is, ids included.
    pub fn seed_rights(&self, tenant_id: TenantId, rights: Vec<MenuRight>) {
        if let Ok(mut map) = self.inner.write() {
            map.entry(tenant_id).or_default().rights.extend(rights);
        }
    }

    /// Make the next bulk updates fail after staging.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn rights_of(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        active_only: bool,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map
            .get(&tenant_id)
            .map(|t| {
                t.rights
                    .iter()
                    .filter(|r| r.user_id == user_id && (r.active || !active_only))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn sorted(mut menus: Vec<MenuNode>) -> Vec<MenuNode> {
        menus.sort_by_key(|m| (m.sequence, m.id));
        menus
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("lock poisoned".to_string())
}

#[async_trait::async_trait]
impl MenuRepository for InMemoryMenuStore {
    async fn all_menus(&self, tenant_id: TenantId) -> Result<Vec<MenuNode>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let menus = map.get(&tenant_id).map(|t| t.menus.clone()).unwrap_or_default();
        Ok(Self::sorted(menus))
    }

    async fn active_menus(&self, tenant_id: TenantId) -> Result<Vec<MenuNode>, RepositoryError> {
        let all = self.all_menus(tenant_id).await?;
        Ok(all.into_iter().filter(|m| m.active).collect())
    }

    async fn user_rights(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        self.rights_of(tenant_id, user_id, true)
    }

    async fn all_user_rights(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        self.rights_of(tenant_id, user_id, false)
    }

    async fn save_user_rights(
        &self,
        tenant_id: TenantId,
        rights: Vec<MenuRight>,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let tenant = map.entry(tenant_id).or_default();

        let mut staged = tenant.rights.clone();
        let mut next_id = staged.iter().map(|r| r.id.get()).max().unwrap_or(0);
        let mut saved = Vec::with_capacity(rights.len());

        for mut right in rights {
            if right.id.is_unsaved() {
                if staged
                    .iter()
                    .any(|r| r.user_id == right.user_id && r.menu_id == right.menu_id)
                {
                    return Err(RepositoryError::Conflict(format!(
                        "user {} already has a row for menu {}",
                        right.user_id, right.menu_id
                    )));
                }
                next_id += 1;
                right.id = RightsId::new(next_id);
                staged.push(right.clone());
            } else {
                let Some(slot) = staged.iter_mut().find(|r| r.id == right.id) else {
                    return Err(RepositoryError::Conflict(format!(
                        "rights row {} does not exist",
                        right.id
                    )));
                };
                *slot = right.clone();
            }
            saved.push(right);
        }

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("injected failure".to_string()));
        }

        tenant.rights = staged;
        tracing::debug!(tenant_id = %tenant_id.as_uuid(), rows = saved.len(), "user rights saved");
        Ok(saved)
    }
}
