use std::sync::Arc;

use thiserror::Error;

use transerp_core::{TenantId, UserId};

use crate::menu::MenuNode;
use crate::rights::MenuRight;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("menu store unavailable: {0}")]
    Unavailable(String),

    #[error("rights row conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Source of menus and per-user rights.
#[async_trait::async_trait]
pub trait MenuRepository: Send + Sync {
    /// Every menu row, active or not, ordered by `(sequence, id)`.
    async fn all_menus(&self, tenant_id: TenantId) -> Result<Vec<MenuNode>, RepositoryError>;

    async fn active_menus(&self, tenant_id: TenantId) -> Result<Vec<MenuNode>, RepositoryError>;

    /// Active rights rows of one user.
    async fn user_rights(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<MenuRight>, RepositoryError>;

    /// Every rights row of one user, deactivated ones included.
    ///
    /// Editors load these so a saved grid updates existing rows instead of
    /// inserting a second row for the same menu.
    async fn all_user_rights(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<MenuRight>, RepositoryError>;

    /// Insert rows with an unsaved id and update the rest, all or nothing.
    ///
    /// Returns the rows as stored, with assigned ids.
    async fn save_user_rights(
        &self,
        tenant_id: TenantId,
        rights: Vec<MenuRight>,
    ) -> Result<Vec<MenuRight>, RepositoryError>;
}

#[async_trait::async_trait]
impl<R> MenuRepository for Arc<R>
where
    R: MenuRepository + ?Sized,
{
    async fn all_menus(&self, tenant_id: TenantId) -> Result<Vec<MenuNode>, RepositoryError> {
        (**self).all_menus(tenant_id).await
    }

    async fn active_menus(&self, tenant_id: TenantId) -> Result<Vec<MenuNode>, RepositoryError> {
        (**self).active_menus(tenant_id).await
    }

    async fn user_rights(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        (**self).user_rights(tenant_id, user_id).await
    }

    async fn all_user_rights(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        (**self).all_user_rights(tenant_id, user_id).await
    }

    async fn save_user_rights(
        &self,
        tenant_id: TenantId,
        rights: Vec<MenuRight>,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        (**self).save_user_rights(tenant_id, rights).await
    }
}
