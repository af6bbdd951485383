//! Sidebar navigation state for the signed-in user.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use transerp_core::{MenuId, TenantId};

use crate::menu::MenuNode;
use crate::path::normalize_path;
use crate::repository::MenuRepository;
use crate::resolver::{ResolveError, RightsResolver};
use crate::session::SessionManager;
use crate::tree::MenuTree;

/// Open/closed state of expandable menu entries.
#[derive(Debug, Clone, Default)]
pub struct SubmenuStates {
    open: HashMap<MenuId, bool>,
    collapsed: bool,
}

impl SubmenuStates {
    /// Record a state for every root and every inner node that lacks one.
    ///
    /// New entries start open only when they lead to the current page;
    /// entries recorded earlier keep their state.
    pub fn seed(&mut self, tree: &MenuTree, current_path: &str) {
        for node in tree.nodes() {
            let expandable = node.is_root() || tree.has_children(node.id);
            if expandable && !self.open.contains_key(&node.id) {
                let expand = tree.is_parent_of_active(node.id, current_path);
                self.open.insert(node.id, expand);
            }
        }
    }

    pub fn is_open(&self, id: MenuId) -> bool {
        self.open.get(&id).copied().unwrap_or(false)
    }

    /// Flip an entry; ignored while the sidebar is collapsed. Returns the new state.
    pub fn toggle(&mut self, id: MenuId) -> bool {
        if self.collapsed {
            return self.is_open(id);
        }
        let state = self.open.entry(id).or_insert(false);
        *state = !*state;
        *state
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[derive(Debug, Default)]
struct NavState {
    tree: MenuTree,
    states: SubmenuStates,
    current_path: String,
}

/// The filtered menu of the session's user.
///
/// Loads are serialized through an async gate; once disposed, the menu
/// refuses further loads, including ones already waiting on the gate.
pub struct NavigationMenu<M> {
    tenant_id: TenantId,
    resolver: RightsResolver<M>,
    session: Arc<SessionManager>,
    gate: Mutex<NavState>,
    disposed: AtomicBool,
}

impl<M: MenuRepository> NavigationMenu<M> {
    pub fn new(tenant_id: TenantId, resolver: RightsResolver<M>, session: Arc<SessionManager>) -> Self {
        Self {
            tenant_id,
            resolver,
            session,
            gate: Mutex::new(NavState::default()),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }

    /// Reload the menu for the current session. Returns `false` when disposed.
    pub async fn load(&self, current_path: &str) -> Result<bool, ResolveError> {
        if self.is_disposed() {
            return Ok(false);
        }

        let mut state = self.gate.lock().await;
        if self.is_disposed() {
            return Ok(false);
        }

        state.current_path = normalize_path(current_path).to_string();
        state.tree = match self.session.current() {
            Some(session) if session.authenticated => {
                self.resolver.user_menu(self.tenant_id, session.user_id).await?
            }
            _ => MenuTree::default(),
        };

        let NavState {
            tree,
            states,
            current_path,
        } = &mut *state;
        states.seed(tree, current_path);

        tracing::debug!(menus = tree.len(), path = %current_path, "navigation menu loaded");
        Ok(true)
    }

    pub async fn current_path(&self) -> String {
        self.gate.lock().await.current_path.clone()
    }

    pub async fn tree(&self) -> MenuTree {
        self.gate.lock().await.tree.clone()
    }

    pub async fn roots(&self) -> Vec<MenuNode> {
        self.gate.lock().await.tree.roots().cloned().collect()
    }

    pub async fn children(&self, id: MenuId) -> Vec<MenuNode> {
        self.gate.lock().await.tree.children_of(id).cloned().collect()
    }

    pub async fn is_open(&self, id: MenuId) -> bool {
        self.gate.lock().await.states.is_open(id)
    }

    pub async fn toggle(&self, id: MenuId) -> bool {
        self.gate.lock().await.states.toggle(id)
    }

    pub async fn set_collapsed(&self, collapsed: bool) {
        self.gate.lock().await.states.set_collapsed(collapsed);
    }

    /// Whether `url` is the page currently shown.
    pub async fn is_active(&self, url: &str) -> bool {
        let state = self.gate.lock().await;
        normalize_path(url) == state.current_path
    }
}

impl<M: MenuRepository + 'static> NavigationMenu<M> {
    /// Reload whenever the session changes, until disposed or dropped.
    pub fn spawn_session_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let mut changes = self.session.subscribe();

        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let Some(menu) = weak.upgrade() else { break };
                if menu.is_disposed() {
                    break;
                }
                let path = menu.current_path().await;
                if let Err(err) = menu.load(&path).await {
                    tracing::warn!(error = %err, "navigation reload failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;
    use crate::rights::{MenuRight, Permissions};
    use crate::session::{SessionError, SessionStore};
    use serde_json::Value;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use transerp_core::UserId;

    fn menus() -> Vec<MenuNode> {
        vec![
            MenuNode::new(1, 0, "Masters").with_sequence(1),
            MenuNode::new(2, 1, "Fleet").with_sequence(2),
            MenuNode::new(3, 2, "Vehicles").with_url("/vehicles").with_sequence(3),
            MenuNode::new(4, 0, "Reports").with_sequence(4),
            MenuNode::new(5, 4, "Trips").with_url("/trips").with_sequence(5),
        ]
    }

    #[test]
    fn seed_opens_ancestors_of_the_current_page() {
        let tree = MenuTree::build(menus()).unwrap();
        let mut states = SubmenuStates::default();
        states.seed(&tree, "/vehicles");

        assert!(states.is_open(MenuId::new(1)));
        assert!(states.is_open(MenuId::new(2)));
        assert!(!states.is_open(MenuId::new(4)));
        // Leaves get no state of their own.
        assert_eq!(states.len(), 3);
    }

    #[test]
    fn seed_preserves_recorded_states() {
        let tree = MenuTree::build(menus()).unwrap();
        let mut states = SubmenuStates::default();
        states.seed(&tree, "/");
        assert!(states.toggle(MenuId::new(4)));

        states.seed(&tree, "/vehicles");
        assert!(states.is_open(MenuId::new(4)));
        assert!(!states.is_open(MenuId::new(1)));
    }

    #[test]
    fn toggle_ignored_while_collapsed() {
        let mut states = SubmenuStates::default();
        states.set_collapsed(true);
        assert!(!states.toggle(MenuId::new(1)));
        states.set_collapsed(false);
        assert!(states.toggle(MenuId::new(1)));
        assert!(!states.toggle(MenuId::new(1)));
    }

    struct CountingRepo {
        loads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl MenuRepository for CountingRepo {
        async fn all_menus(&self, _: TenantId) -> Result<Vec<MenuNode>, RepositoryError> {
            Ok(menus())
        }

        async fn active_menus(&self, _: TenantId) -> Result<Vec<MenuNode>, RepositoryError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(menus())
        }

        async fn user_rights(&self, _: TenantId, user: UserId) -> Result<Vec<MenuRight>, RepositoryError> {
            Ok(vec![MenuRight::new(user, MenuId::new(3), Permissions::all())])
        }

        async fn all_user_rights(&self, tenant: TenantId, user: UserId) -> Result<Vec<MenuRight>, RepositoryError> {
            self.user_rights(tenant, user).await
        }

        async fn save_user_rights(
            &self,
            _: TenantId,
            rights: Vec<MenuRight>,
        ) -> Result<Vec<MenuRight>, RepositoryError> {
            Ok(rights)
        }
    }

    #[derive(Default)]
    struct NullStore;

    #[async_trait::async_trait]
    impl SessionStore for NullStore {
        async fn get(&self, _: &str) -> Result<Option<Value>, SessionError> {
            Ok(None)
        }
        async fn set(&self, _: &str, _: Value) -> Result<(), SessionError> {
            Ok(())
        }
        async fn delete(&self, _: &str) -> Result<(), SessionError> {
            Ok(())
        }
    }

    fn navigation() -> (Arc<NavigationMenu<Arc<CountingRepo>>>, Arc<CountingRepo>, Arc<SessionManager>) {
        let repo = Arc::new(CountingRepo {
            loads: AtomicUsize::new(0),
        });
        let session = Arc::new(SessionManager::new(Arc::new(NullStore)));
        let menu = NavigationMenu::new(TenantId::new(), RightsResolver::new(repo.clone()), session.clone());
        (Arc::new(menu), repo, session)
    }

    #[tokio::test]
    async fn signed_out_user_sees_nothing() {
        let (menu, repo, _) = navigation();
        assert!(menu.load("/").await.unwrap());
        assert!(menu.roots().await.is_empty());
        assert_eq!(repo.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_loads_serialize() {
        let (menu, repo, session) = navigation();
        session.sign_in(UserId::new(3), "ops").await.unwrap();

        let (a, b) = tokio::join!(menu.load("/vehicles"), menu.load("/vehicles"));
        assert!(a.unwrap() && b.unwrap());
        assert_eq!(repo.loads.load(Ordering::SeqCst), 2);

        let roots: Vec<i32> = menu.roots().await.iter().map(|n| n.id.get()).collect();
        assert_eq!(roots, [1]);
        assert!(menu.is_open(MenuId::new(2)).await);
        assert!(menu.is_active("vehicles").await);
    }

    #[tokio::test]
    async fn disposed_menu_refuses_to_load() {
        let (menu, repo, session) = navigation();
        session.sign_in(UserId::new(3), "ops").await.unwrap();
        menu.dispose();
        assert!(!menu.load("/vehicles").await.unwrap());
        assert_eq!(repo.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn session_change_triggers_reload() {
        let (menu, repo, session) = navigation();
        let listener = menu.spawn_session_listener();

        session.sign_in(UserId::new(3), "ops").await.unwrap();
        for _ in 0..100 {
            if !menu.roots().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(menu.roots().await.len(), 1);
        assert!(repo.loads.load(Ordering::SeqCst) >= 1);

        menu.dispose();
        session.sign_out().await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), listener).await.unwrap().unwrap();
    }
}
