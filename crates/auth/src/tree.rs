//! Parent/child menu hierarchy.
//!
//! The tree is built once per load from a flat list of menu rows. The
//! parent → children adjacency is computed at build time so filtering and
//! descendant searches never rescan the whole list per node.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use transerp_core::MenuId;

use crate::menu::MenuNode;
use crate::path::normalize_path;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("menu {0} appears more than once")]
    DuplicateId(MenuId),

    #[error("menu {0} is its own ancestor")]
    Cycle(MenuId),
}

/// Immutable menu hierarchy in load order `(sequence, id)`.
#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
    index: HashMap<MenuId, usize>,
    children: HashMap<MenuId, Vec<MenuId>>,
}

impl MenuTree {
    pub fn build(mut nodes: Vec<MenuNode>) -> Result<Self, MenuError> {
        nodes.sort_by_key(|n| (n.sequence, n.id));

        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id, i).is_some() {
                return Err(MenuError::DuplicateId(node.id));
            }
        }

        let mut children: HashMap<MenuId, Vec<MenuId>> = HashMap::new();
        for node in &nodes {
            children.entry(node.parent_id).or_default().push(node.id);
        }

        let tree = Self {
            nodes,
            index,
            children,
        };
        tree.check_acyclic()?;
        Ok(tree)
    }

    /// Follow every parent chain; revisiting a node on the same chain is a cycle.
    fn check_acyclic(&self) -> Result<(), MenuError> {
        let mut settled: HashSet<MenuId> = HashSet::new();

        for node in &self.nodes {
            let mut chain: HashSet<MenuId> = HashSet::new();
            let mut current = Some(node);

            while let Some(n) = current {
                if settled.contains(&n.id) {
                    break;
                }
                if !chain.insert(n.id) {
                    return Err(MenuError::Cycle(n.id));
                }
                current = if n.is_root() { None } else { self.get(n.parent_id) };
            }

            settled.extend(chain);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in load order.
    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    pub fn get(&self, id: MenuId) -> Option<&MenuNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn roots(&self) -> impl Iterator<Item = &MenuNode> {
        self.children_of(MenuId::ROOT)
    }

    pub fn children_of(&self, id: MenuId) -> impl Iterator<Item = &MenuNode> {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.get(*child))
    }

    pub fn has_children(&self, id: MenuId) -> bool {
        self.children.get(&id).is_some_and(|c| !c.is_empty())
    }

    /// Node whose url addresses `path` (query and leading slash ignored).
    pub fn find_by_path(&self, path: &str) -> Option<&MenuNode> {
        let normalized = normalize_path(path);
        self.nodes.iter().find(|n| n.matches_path(normalized))
    }

    /// Nodes kept for a user who may see `allowed`.
    ///
    /// A node stays if it is allowed itself or anything below it is, so every
    /// ancestor of an allowed node remains reachable. Output keeps load order.
    pub fn visible(&self, allowed: &HashSet<MenuId>) -> Vec<MenuNode> {
        let mut memo: HashMap<MenuId, bool> = HashMap::with_capacity(self.nodes.len());
        self.nodes
            .iter()
            .filter(|n| self.subtree_allowed(n.id, allowed, &mut memo))
            .cloned()
            .collect()
    }

    /// Same as [`visible`](Self::visible) but returned as a tree.
    pub fn filtered(&self, allowed: &HashSet<MenuId>) -> Self {
        let nodes = self.visible(allowed);
        let index = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        let mut children: HashMap<MenuId, Vec<MenuId>> = HashMap::new();
        for node in &nodes {
            children.entry(node.parent_id).or_default().push(node.id);
        }
        Self {
            nodes,
            index,
            children,
        }
    }

    fn subtree_allowed(
        &self,
        id: MenuId,
        allowed: &HashSet<MenuId>,
        memo: &mut HashMap<MenuId, bool>,
    ) -> bool {
        if let Some(&known) = memo.get(&id) {
            return known;
        }

        let mut keep = allowed.contains(&id);
        if !keep {
            if let Some(kids) = self.children.get(&id) {
                for child in kids {
                    if self.subtree_allowed(*child, allowed, memo) {
                        keep = true;
                        break;
                    }
                }
            }
        }

        memo.insert(id, keep);
        keep
    }

    /// True when some descendant of `id` opens `current_path`.
    pub fn is_parent_of_active(&self, id: MenuId, current_path: &str) -> bool {
        let normalized = normalize_path(current_path);
        if normalized.is_empty() {
            return false;
        }

        let mut stack: Vec<MenuId> = self.children.get(&id).cloned().unwrap_or_default();
        while let Some(next) = stack.pop() {
            if self.get(next).is_some_and(|n| n.matches_path(normalized)) {
                return true;
            }
            if let Some(kids) = self.children.get(&next) {
                stack.extend(kids.iter().copied());
            }
        }
        false
    }

    /// Depth-first walk from the roots yielding `(node, level)`; roots are level 0.
    pub fn walk(&self) -> Vec<(&MenuNode, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(MenuId, usize)> = self
            .children
            .get(&MenuId::ROOT)
            .map(|roots| roots.iter().rev().map(|id| (*id, 0)).collect())
            .unwrap_or_default();

        while let Some((id, level)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            out.push((node, level));
            if let Some(kids) = self.children.get(&id) {
                stack.extend(kids.iter().rev().map(|k| (*k, level + 1)));
            }
        }
        out
    }
}
