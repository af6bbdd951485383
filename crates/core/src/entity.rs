//! Entity trait: identity + continuity across edits.

use crate::id::RecordId;

/// Entity marker + minimal interface.
///
/// Master-data and transaction records are identified by a store-assigned
/// integer identity; `RecordId::UNSAVED` marks a record that was never stored.
pub trait Entity {
    /// Returns the record identity.
    fn id(&self) -> RecordId;

    /// Assign the identity handed out by the store on insert.
    fn set_id(&mut self, id: RecordId);

    fn is_new(&self) -> bool {
        self.id().is_unsaved()
    }
}

/// Audit columns shared by most tables (`created_*` / `modified_*`).
pub mod audit {
    /// Field names hidden from generated forms and grids unless configured.
    pub const SYSTEM_FIELDS: [&str; 5] = [
        "id",
        "created_date",
        "created_by",
        "modified_date",
        "modified_by",
    ];

    pub fn is_system_field(name: &str) -> bool {
        SYSTEM_FIELDS.contains(&name)
    }
}
