//! Rights of the signed-in user on the page being shown.

use transerp_auth::{
    AccessDecision, DenialReason, MenuRepository, MenuRight, Operation, Permissions,
    ResolveError, RightsResolver, SessionManager,
};
use transerp_core::{MenuId, TenantId, UserId};

use crate::page::PageError;

/// Access decision for one page; denied until rights are loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAccess {
    decision: AccessDecision,
}

impl Default for PageAccess {
    fn default() -> Self {
        Self {
            decision: AccessDecision::Denied(DenialReason::NoRights),
        }
    }
}

impl PageAccess {
    pub fn new(decision: AccessDecision) -> Self {
        Self { decision }
    }

    /// Full rights, for tools and tests that bypass the menu.
    pub fn unrestricted() -> Self {
        Self::with_permissions(Permissions::all())
    }

    pub fn with_permissions(permissions: Permissions) -> Self {
        Self::new(AccessDecision::Granted(MenuRight::new(
            UserId::default(),
            MenuId::ROOT,
            permissions,
        )))
    }

    /// Resolve the session user's rights for `path`. Signed-out users are denied.
    pub async fn load<M: MenuRepository>(
        resolver: &RightsResolver<M>,
        session: &SessionManager,
        tenant_id: TenantId,
        path: &str,
    ) -> Result<Self, ResolveError> {
        let decision = match session.current() {
            Some(current) if current.authenticated => {
                resolver.resolve(tenant_id, current.user_id, path).await?
            }
            _ => AccessDecision::Denied(DenialReason::NoRights),
        };
        Ok(Self::new(decision))
    }

    pub fn decision(&self) -> &AccessDecision {
        &self.decision
    }

    pub fn permissions(&self) -> Permissions {
        self.decision.permissions()
    }

    pub fn is_denied(&self) -> bool {
        !self.decision.is_allowed()
    }

    pub fn allows(&self, operation: Operation) -> bool {
        self.permissions().allows(operation)
    }

    pub(crate) fn require(&self, operation: Operation) -> Result<(), PageError> {
        if self.allows(operation) {
            Ok(())
        } else {
            tracing::warn!(operation = %operation, "page action refused");
            Err(PageError::AccessDenied { operation })
        }
    }
}
