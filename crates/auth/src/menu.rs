use serde::{Deserialize, Serialize};

use transerp_core::MenuId;

use crate::path::normalize_path;

/// One entry of the navigation hierarchy.
///
/// Top-level entries carry `parent_id == MenuId::ROOT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub id: MenuId,
    pub name: String,
    pub display_name: String,
    /// Route of the page this entry opens; `None` for pure grouping entries.
    pub url: Option<String>,
    pub parent_id: MenuId,
    pub sequence: i32,
    pub active: bool,
}

impl MenuNode {
    pub fn new(id: i32, parent_id: i32, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            id: MenuId::new(id),
            name: display_name.replace(' ', ""),
            display_name,
            url: None,
            parent_id: MenuId::new(parent_id),
            sequence: 0,
            active: true,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_sequence(mut self, sequence: i32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_root()
    }

    /// True when this entry's url addresses the given (already normalized) path.
    pub fn matches_path(&self, normalized: &str) -> bool {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => normalize_path(url) == normalized,
            _ => false,
        }
    }
}
