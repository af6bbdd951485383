//! Per-user, per-menu rights rows.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use transerp_core::{MenuId, RightsId, UserId};

/// Operations a rights row can grant on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Show,
    Add,
    Edit,
    Delete,
    Print,
    Export,
    Verify,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Show,
        Operation::Add,
        Operation::Edit,
        Operation::Delete,
        Operation::Print,
        Operation::Export,
        Operation::Verify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Print => "print",
            Self::Export => "export",
            Self::Verify => "verify",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The seven permission flags of a rights row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Permissions {
    pub show: bool,
    pub add: bool,
    pub edit: bool,
    pub delete: bool,
    pub print: bool,
    pub export: bool,
    pub verify: bool,
}

impl Permissions {
    pub const fn none() -> Self {
        Self::uniform(false)
    }

    pub const fn all() -> Self {
        Self::uniform(true)
    }

    pub const fn view_only() -> Self {
        Self {
            show: true,
            ..Self::none()
        }
    }

    const fn uniform(value: bool) -> Self {
        Self {
            show: value,
            add: value,
            edit: value,
            delete: value,
            print: value,
            export: value,
            verify: value,
        }
    }

    pub fn allows(&self, op: Operation) -> bool {
        match op {
            Operation::Show => self.show,
            Operation::Add => self.add,
            Operation::Edit => self.edit,
            Operation::Delete => self.delete,
            Operation::Print => self.print,
            Operation::Export => self.export,
            Operation::Verify => self.verify,
        }
    }

    pub fn set(&mut self, op: Operation, value: bool) {
        let flag = match op {
            Operation::Show => &mut self.show,
            Operation::Add => &mut self.add,
            Operation::Edit => &mut self.edit,
            Operation::Delete => &mut self.delete,
            Operation::Print => &mut self.print,
            Operation::Export => &mut self.export,
            Operation::Verify => &mut self.verify,
        };
        *flag = value;
    }

    pub fn set_all(&mut self, value: bool) {
        *self = Self::uniform(value);
    }

    pub fn is_all(&self) -> bool {
        *self == Self::all()
    }

    pub fn granted(&self) -> Vec<Operation> {
        Operation::ALL.into_iter().filter(|op| self.allows(*op)).collect()
    }
}

/// A user's rights on one menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRight {
    /// `RightsId::UNSAVED` until the row is first persisted.
    pub id: RightsId,
    pub user_id: UserId,
    pub menu_id: MenuId,
    pub permissions: Permissions,
    pub active: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    /// Daily access window, inclusive on both ends.
    pub day_start: Option<NaiveTime>,
    pub day_end: Option<NaiveTime>,
    /// How many days back the user may open historical records.
    pub past_record_days: Option<u32>,
    pub remarks: Option<String>,
}

impl MenuRight {
    pub fn new(user_id: UserId, menu_id: MenuId, permissions: Permissions) -> Self {
        Self {
            id: RightsId::UNSAVED,
            user_id,
            menu_id,
            permissions,
            active: true,
            valid_from: None,
            valid_to: None,
            day_start: None,
            day_end: None,
            past_record_days: None,
            remarks: None,
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = RightsId::new(id);
        self
    }

    pub fn valid_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.valid_from = from;
        self.valid_to = to;
        self
    }

    pub fn during(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.day_start = Some(start);
        self.day_end = Some(end);
        self
    }

    /// Whether the validity dates and daily window cover `at`.
    pub fn is_effective_at(&self, at: NaiveDateTime) -> bool {
        let date = at.date();
        if self.valid_from.is_some_and(|from| date < from) {
            return false;
        }
        if self.valid_to.is_some_and(|to| date > to) {
            return false;
        }

        let time = at.time();
        match (self.day_start, self.day_end) {
            (Some(start), Some(end)) if start <= end => start <= time && time <= end,
            // Window wrapping midnight, e.g. 22:00 to 06:00.
            (Some(start), Some(end)) => time >= start || time <= end,
            (Some(start), None) => time >= start,
            (None, Some(end)) => time <= end,
            (None, None) => true,
        }
    }

    /// Active, effective at `at`, and showing the menu.
    pub fn grants_view_at(&self, at: NaiveDateTime) -> bool {
        self.active && self.permissions.show && self.is_effective_at(at)
    }

    /// Earliest record date the user may open, if the row restricts history.
    pub fn oldest_allowed_record(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.past_record_days
            .and_then(|days| today.checked_sub_days(chrono::Days::new(u64::from(days))))
    }
}

/// Menus a user may see at `at`.
pub fn allowed_menu_ids<'a, I>(rights: I, at: NaiveDateTime) -> HashSet<MenuId>
where
    I: IntoIterator<Item = &'a MenuRight>,
{
    rights
        .into_iter()
        .filter(|r| r.grants_view_at(at))
        .map(|r| r.menu_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    fn right(menu: i32, show: bool) -> MenuRight {
        let permissions = Permissions {
            show,
            ..Permissions::none()
        };
        MenuRight::new(UserId::new(1), MenuId::new(menu), permissions)
    }

    #[test]
    fn set_all_toggles_every_flag() {
        let mut perms = Permissions::none();
        perms.set_all(true);
        assert!(perms.is_all());
        assert_eq!(perms.granted().len(), 7);
        perms.set(Operation::Delete, false);
        assert!(!perms.is_all());
        assert!(!perms.allows(Operation::Delete));
    }

    #[test]
    fn validity_dates_bound_the_row() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 1);
        let to = NaiveDate::from_ymd_opt(2025, 12, 31);
        let row = right(1, true).valid_between(from, to);
        assert!(row.is_effective_at(at("2025-06-01", "10:00")));
        assert!(!row.is_effective_at(at("2024-12-31", "10:00")));
        assert!(!row.is_effective_at(at("2026-01-01", "00:00")));
    }

    #[test]
    fn daily_window_including_overnight() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let six_pm = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let office = right(1, true).during(nine, six_pm);
        assert!(office.is_effective_at(at("2025-06-01", "09:00")));
        assert!(!office.is_effective_at(at("2025-06-01", "20:00")));

        let night = right(1, true).during(six_pm, nine);
        assert!(night.is_effective_at(at("2025-06-01", "23:30")));
        assert!(night.is_effective_at(at("2025-06-01", "03:00")));
        assert!(!night.is_effective_at(at("2025-06-01", "12:00")));
    }

    #[test]
    fn allowed_ids_need_show_and_active() {
        let mut inactive = right(3, true);
        inactive.active = false;
        let rows = vec![right(1, true), right(2, false), inactive];
        let allowed = allowed_menu_ids(&rows, at("2025-06-01", "10:00"));
        assert_eq!(allowed, HashSet::from([MenuId::new(1)]));
    }

    #[test]
    fn past_record_limit() {
        let mut row = right(1, true);
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(row.oldest_allowed_record(today), None);
        row.past_record_days = Some(9);
        assert_eq!(row.oldest_allowed_record(today), NaiveDate::from_ymd_opt(2025, 3, 1));
    }
}
