//! Editable per-user rights grid: one row per menu.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use transerp_core::{MenuId, RightsId, UserId};
use transerp_metadata::{crud_record, FieldConfig, FieldKind};

use crate::rights::{MenuRight, Operation, Permissions};
use crate::tree::MenuTree;

crud_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RightsRow {
        pub rights_id: RightsId => FieldConfig::new("Rights ID").order(1).show_in_grid(false).hide_in_form(),
        pub menu_id: MenuId => FieldConfig::new("Menu ID").order(2).show_in_grid(false).hide_in_form(),
        pub parent_id: MenuId => FieldConfig::new("Parent").order(3).show_in_grid(false).hide_in_form(),
        pub level: u32 => FieldConfig::new("Level").order(4).show_in_grid(false).hide_in_form(),
        pub menu_name: String => FieldConfig::new("Menu").order(5).width(250).read_only(),
        pub show: bool => FieldConfig::new("Show").order(6).kind(FieldKind::Checkbox).width(80),
        pub add: bool => FieldConfig::new("Add").order(7).kind(FieldKind::Checkbox).width(80),
        pub edit: bool => FieldConfig::new("Edit").order(8).kind(FieldKind::Checkbox).width(80),
        pub delete: bool => FieldConfig::new("Delete").order(9).kind(FieldKind::Checkbox).width(80),
        pub print: bool => FieldConfig::new("Print").order(10).kind(FieldKind::Checkbox).width(80),
        pub export: bool => FieldConfig::new("Export").order(11).kind(FieldKind::Checkbox).width(80),
        pub verify: bool => FieldConfig::new("Verify").order(12).kind(FieldKind::Checkbox).width(80),
    }
}

impl RightsRow {
    pub fn permissions(&self) -> Permissions {
        Permissions {
            show: self.show,
            add: self.add,
            edit: self.edit,
            delete: self.delete,
            print: self.print,
            export: self.export,
            verify: self.verify,
        }
    }

    pub fn set_permissions(&mut self, perms: Permissions) {
        self.show = perms.show;
        self.add = perms.add;
        self.edit = perms.edit;
        self.delete = perms.delete;
        self.print = perms.print;
        self.export = perms.export;
        self.verify = perms.verify;
    }

    pub fn is_all_selected(&self) -> bool {
        self.permissions().is_all()
    }

    pub fn set_all(&mut self, value: bool) {
        let mut perms = Permissions::none();
        perms.set_all(value);
        self.set_permissions(perms);
    }
}

/// The rights grid of one user.
#[derive(Debug, Clone)]
pub struct RightsMatrix {
    user_id: UserId,
    rows: Vec<RightsRow>,
    existing: HashMap<MenuId, MenuRight>,
}

impl RightsMatrix {
    /// One row per menu in tree order, carrying the user's current flags.
    ///
    /// Menus unreachable from a root are appended at level 0.
    pub fn build(user_id: UserId, menus: &MenuTree, rights: &[MenuRight]) -> Self {
        let existing: HashMap<MenuId, MenuRight> = rights
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| (r.menu_id, r.clone()))
            .collect();

        let mut placed: Vec<(&_, usize)> = menus.walk();
        let reached: HashSet<MenuId> = placed.iter().map(|(n, _)| n.id).collect();
        placed.extend(
            menus
                .nodes()
                .iter()
                .filter(|n| !reached.contains(&n.id))
                .map(|n| (n, 0)),
        );

        let rows = placed
            .into_iter()
            .map(|(node, level)| {
                let mut row = RightsRow {
                    rights_id: RightsId::UNSAVED,
                    menu_id: node.id,
                    parent_id: node.parent_id,
                    level: level as u32,
                    menu_name: node.display_name.clone(),
                    ..RightsRow::default()
                };
                if let Some(right) = existing.get(&node.id) {
                    row.rights_id = right.id;
                    row.set_permissions(right.permissions);
                }
                row
            })
            .collect();

        Self {
            user_id,
            rows,
            existing,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn rows(&self) -> &[RightsRow] {
        &self.rows
    }

    pub fn row_mut(&mut self, menu_id: MenuId) -> Option<&mut RightsRow> {
        self.rows.iter_mut().find(|r| r.menu_id == menu_id)
    }

    /// Set one flag on one menu. Returns `false` when the menu is not in the grid.
    pub fn set(&mut self, menu_id: MenuId, op: Operation, value: bool) -> bool {
        match self.row_mut(menu_id) {
            Some(row) => {
                let mut perms = row.permissions();
                perms.set(op, value);
                row.set_permissions(perms);
                true
            }
            None => false,
        }
    }

    /// Set every flag of every row.
    pub fn set_all(&mut self, value: bool) {
        for row in &mut self.rows {
            row.set_all(value);
        }
    }

    /// Rows for the bulk update; validity and remarks of stored rows are kept.
    pub fn to_rights(&self) -> Vec<MenuRight> {
        self.rows
            .iter()
            .map(|row| {
                let mut right = self
                    .existing
                    .get(&row.menu_id)
                    .cloned()
                    .unwrap_or_else(|| MenuRight::new(self.user_id, row.menu_id, Permissions::none()));
                right.id = row.rights_id;
                right.user_id = self.user_id;
                right.permissions = row.permissions();
                right.active = true;
                right
            })
            .collect()
    }

    /// Take the ids assigned by a successful save.
    pub fn apply_saved(&mut self, saved: &[MenuRight]) {
        for right in saved.iter().filter(|r| r.user_id == self.user_id) {
            if let Some(row) = self.rows.iter_mut().find(|row| row.menu_id == right.menu_id) {
                row.rights_id = right.id;
                row.set_permissions(right.permissions);
            }
            self.existing.insert(right.menu_id, right.clone());
        }
    }
}
