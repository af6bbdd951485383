//! `transerp-auth` — menu-driven access control.
//!
//! Menus form a parent/child tree; per-user rights rows decide which menus a
//! user sees and what they may do on each page. This crate is storage
//! agnostic: menus and rights come through [`MenuRepository`], session values
//! through [`SessionStore`].

pub mod matrix;
pub mod menu;
pub mod navigation;
pub mod path;
pub mod repository;
pub mod resolver;
pub mod rights;
pub mod session;
pub mod tree;

pub use matrix::{RightsMatrix, RightsRow};
pub use menu::MenuNode;
pub use navigation::{NavigationMenu, SubmenuStates};
pub use path::{is_root_path, normalize_path};
pub use repository::{MenuRepository, RepositoryError};
pub use resolver::{resolve_access, AccessDecision, DenialReason, ResolveError, RightsResolver};
pub use rights::{allowed_menu_ids, MenuRight, Operation, Permissions};
pub use session::{AuthenticatedSession, SessionError, SessionManager, SessionStore, USER_ID_KEY, USER_NAME_KEY};
pub use tree::{MenuError, MenuTree};
