//! Rights-for-path resolution.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

use transerp_core::{TenantId, UserId};

use crate::path::{is_root_path, normalize_path};
use crate::repository::{MenuRepository, RepositoryError};
use crate::rights::{allowed_menu_ids, MenuRight, Permissions};
use crate::tree::{MenuError, MenuTree};

/// Why a page was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No active menu opens this path.
    UnknownPath,
    /// The menu exists but the user has no active rights row for it.
    NoRights,
    /// The row is outside its validity dates or daily window.
    OutsideWindow,
    /// The row exists but does not grant `show`.
    NotShown,
}

impl DenialReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownPath => "page is not part of the menu",
            Self::NoRights => "no rights assigned for this page",
            Self::OutsideWindow => "rights are not valid at this time",
            Self::NotShown => "page is not visible to this user",
        }
    }
}

impl core::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of checking a request path against a user's rights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum AccessDecision {
    Granted(MenuRight),
    /// The application root, open to any signed-in user without a row.
    OpenRoot,
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Denied(_))
    }

    pub fn right(&self) -> Option<&MenuRight> {
        match self {
            Self::Granted(right) => Some(right),
            _ => None,
        }
    }

    /// Flags a page should apply; the open root is view-only.
    pub fn permissions(&self) -> Permissions {
        match self {
            Self::Granted(right) => right.permissions,
            Self::OpenRoot => Permissions::view_only(),
            Self::Denied(_) => Permissions::none(),
        }
    }
}

/// Decide access to `path` from an already loaded menu tree and rights list.
///
/// The row for the menu whose url matches `path` wins when it is active,
/// effective at `at` and shows the page. Without such a row the application
/// root stays open and every other path is denied.
pub fn resolve_access(
    tree: &MenuTree,
    rights: &[MenuRight],
    path: &str,
    at: NaiveDateTime,
) -> AccessDecision {
    let outcome = match tree.find_by_path(path) {
        None => Err(DenialReason::UnknownPath),
        Some(node) => match rights.iter().find(|r| r.menu_id == node.id && r.active) {
            None => Err(DenialReason::NoRights),
            Some(row) if !row.is_effective_at(at) => Err(DenialReason::OutsideWindow),
            Some(row) if !row.permissions.show => Err(DenialReason::NotShown),
            Some(row) => Ok(row.clone()),
        },
    };

    match outcome {
        Ok(row) => AccessDecision::Granted(row),
        Err(_) if is_root_path(path) => AccessDecision::OpenRoot,
        Err(reason) => AccessDecision::Denied(reason),
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Menu(#[from] MenuError),
}

/// Loads menus and rights through a [`MenuRepository`] and answers
/// navigation and access questions for one user.
#[derive(Debug, Clone)]
pub struct RightsResolver<M> {
    repo: M,
}

impl<M: MenuRepository> RightsResolver<M> {
    pub fn new(repo: M) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &M {
        &self.repo
    }

    /// Active menus the user may see now, ancestors of allowed pages included.
    pub async fn user_menu(&self, tenant_id: TenantId, user_id: UserId) -> Result<MenuTree, ResolveError> {
        self.user_menu_at(tenant_id, user_id, Local::now().naive_local()).await
    }

    pub async fn user_menu_at(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        at: NaiveDateTime,
    ) -> Result<MenuTree, ResolveError> {
        let tree = MenuTree::build(self.repo.active_menus(tenant_id).await?)?;
        let rights = self.repo.user_rights(tenant_id, user_id).await?;
        let allowed = allowed_menu_ids(&rights, at);
        let visible = tree.filtered(&allowed);

        tracing::debug!(
            tenant_id = %tenant_id,
            user_id = %user_id,
            menus = tree.len(),
            allowed = allowed.len(),
            visible = visible.len(),
            "filtered user menu"
        );
        Ok(visible)
    }

    pub async fn resolve(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        path: &str,
    ) -> Result<AccessDecision, ResolveError> {
        self.resolve_at(tenant_id, user_id, path, Local::now().naive_local()).await
    }

    pub async fn resolve_at(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        path: &str,
        at: NaiveDateTime,
    ) -> Result<AccessDecision, ResolveError> {
        let tree = MenuTree::build(self.repo.active_menus(tenant_id).await?)?;
        let rights = self.repo.user_rights(tenant_id, user_id).await?;
        let decision = resolve_access(&tree, &rights, path, at);

        if let AccessDecision::Denied(reason) = &decision {
            tracing::warn!(
                tenant_id = %tenant_id,
                user_id = %user_id,
                path = normalize_path(path),
                reason = %reason,
                "page access denied"
            );
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuNode;
    use std::sync::Arc;
    use transerp_core::MenuId;

    fn noon() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-06-01 12:00", "%Y-%m-%d %H:%M").unwrap()
    }

    fn tree() -> MenuTree {
        MenuTree::build(vec![
            MenuNode::new(1, 0, "Masters"),
            MenuNode::new(2, 1, "Drivers").with_url("/drivers"),
            MenuNode::new(3, 1, "Vehicles").with_url("vehicles"),
        ])
        .unwrap()
    }

    fn row(menu: i32, show: bool) -> MenuRight {
        let perms = Permissions {
            show,
            add: true,
            ..Permissions::none()
        };
        MenuRight::new(UserId::new(5), MenuId::new(menu), perms).with_id(menu * 10)
    }

    #[test]
    fn hidden_row_is_denied_and_shown_row_is_returned_unchanged() {
        let hidden = [row(2, false)];
        assert_eq!(
            resolve_access(&tree(), &hidden, "/drivers", noon()),
            AccessDecision::Denied(DenialReason::NotShown)
        );

        let shown = [row(2, true)];
        let decision = resolve_access(&tree(), &shown, "/drivers?page=3", noon());
        assert_eq!(decision, AccessDecision::Granted(shown[0].clone()));
        assert!(decision.permissions().add);
    }

    #[test]
    fn url_stored_without_slash_still_matches() {
        let rights = [row(3, true)];
        assert!(resolve_access(&tree(), &rights, "/vehicles", noon()).is_allowed());
    }

    #[test]
    fn root_is_open_without_rights() {
        let decision = resolve_access(&tree(), &[], "/", noon());
        assert_eq!(decision, AccessDecision::OpenRoot);
        assert_eq!(decision.permissions(), Permissions::view_only());
    }

    #[test]
    fn missing_and_inactive_rows_are_denied() {
        assert_eq!(
            resolve_access(&tree(), &[], "/drivers", noon()),
            AccessDecision::Denied(DenialReason::NoRights)
        );

        let mut inactive = row(2, true);
        inactive.active = false;
        assert_eq!(
            resolve_access(&tree(), &[inactive], "/drivers", noon()),
            AccessDecision::Denied(DenialReason::NoRights)
        );

        assert_eq!(
            resolve_access(&tree(), &[], "/payroll", noon()),
            AccessDecision::Denied(DenialReason::UnknownPath)
        );
    }

    #[test]
    fn expired_row_is_denied() {
        let expired = row(2, true).valid_between(None, chrono::NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(
            resolve_access(&tree(), &[expired], "/drivers", noon()),
            AccessDecision::Denied(DenialReason::OutsideWindow)
        );
    }

    struct FixedRepo {
        menus: Vec<MenuNode>,
        rights: Vec<MenuRight>,
    }

    #[async_trait::async_trait]
    impl MenuRepository for FixedRepo {
        async fn all_menus(&self, _: TenantId) -> Result<Vec<MenuNode>, RepositoryError> {
            Ok(self.menus.clone())
        }

        async fn active_menus(&self, _: TenantId) -> Result<Vec<MenuNode>, RepositoryError> {
            Ok(self.menus.iter().filter(|m| m.active).cloned().collect())
        }

        async fn user_rights(&self, _: TenantId, user: UserId) -> Result<Vec<MenuRight>, RepositoryError> {
            Ok(self.rights.iter().filter(|r| r.user_id == user && r.active).cloned().collect())
        }

        async fn all_user_rights(&self, _: TenantId, user: UserId) -> Result<Vec<MenuRight>, RepositoryError> {
            Ok(self.rights.iter().filter(|r| r.user_id == user).cloned().collect())
        }

        async fn save_user_rights(
            &self,
            _: TenantId,
            _: Vec<MenuRight>,
        ) -> Result<Vec<MenuRight>, RepositoryError> {
            Err(RepositoryError::Unavailable("read only".into()))
        }
    }

    fn resolver() -> RightsResolver<Arc<FixedRepo>> {
        RightsResolver::new(Arc::new(FixedRepo {
            menus: vec![
                MenuNode::new(1, 0, "Masters").with_sequence(1),
                MenuNode::new(2, 1, "Drivers").with_url("/drivers").with_sequence(2),
                MenuNode::new(3, 0, "Reports").with_sequence(3),
                MenuNode::new(4, 3, "Trips").with_url("/trips").with_sequence(4).inactive(),
            ],
            rights: vec![row(2, true), row(4, true)],
        }))
    }

    #[tokio::test]
    async fn user_menu_keeps_parent_of_allowed_child() {
        let tree = resolver()
            .user_menu_at(TenantId::new(), UserId::new(5), noon())
            .await
            .unwrap();
        let ids: Vec<i32> = tree.nodes().iter().map(|n| n.id.get()).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[tokio::test]
    async fn inactive_menu_is_unknown_to_the_resolver() {
        let decision = resolver()
            .resolve_at(TenantId::new(), UserId::new(5), "/trips", noon())
            .await
            .unwrap();
        assert_eq!(decision, AccessDecision::Denied(DenialReason::UnknownPath));
    }

    #[tokio::test]
    async fn other_users_get_nothing() {
        let tree = resolver()
            .user_menu_at(TenantId::new(), UserId::new(99), noon())
            .await
            .unwrap();
        assert!(tree.is_empty());
    }
}
