//! Generic master-data page: grid, add/edit form, rights gating.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use transerp_auth::{Operation, Permissions, ResolveError};
use transerp_core::{Entity, RecordId};
use transerp_metadata::{metadata_for, FieldValue, Record};

use crate::access::PageAccess;
use crate::clone::clone_by_metadata;
use crate::control::{DropdownSources, FormControl};
use crate::form::{EditForm, FormError};
use crate::grid::{grid_columns, render_rows, CellTemplates, GridCell, GridColumn};
use crate::handler::{HandlerError, RecordHandler};
use crate::notify::{Notification, Notifier};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("{operation} is not permitted on this page")]
    AccessDenied { operation: Operation },

    #[error("no record is open for editing")]
    NoOpenForm,

    #[error("{0} field(s) failed validation")]
    Invalid(usize),

    #[error("at least one line item is required")]
    NoLineItems,

    #[error("line item {0} does not exist")]
    NoSuchLine(usize),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    Listing,
    Adding,
    Editing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub url: Option<String>,
}

impl Breadcrumb {
    fn new(label: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            label: label.into(),
            url: url.map(str::to_string),
        }
    }
}

pub(crate) fn breadcrumbs(title: &str, mode: PageMode) -> Vec<Breadcrumb> {
    let mut trail = vec![Breadcrumb::new("Home", Some("/")), Breadcrumb::new(title, None)];
    match mode {
        PageMode::Adding => trail.push(Breadcrumb::new("New", None)),
        PageMode::Editing => trail.push(Breadcrumb::new("Edit", None)),
        PageMode::Listing => {}
    }
    trail
}

/// Replace the row with the same id, or append a new one.
pub(crate) fn upsert<R: Entity>(rows: &mut Vec<R>, record: R) {
    match rows.iter_mut().find(|r| r.id() == record.id()) {
        Some(slot) => *slot = record,
        None => rows.push(record),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportColumn {
    pub field: &'static str,
    pub label: String,
    pub selected: bool,
    pub visible_in_grid: bool,
}

/// Which rows an export covers. Ranges are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    All,
    Page { page: usize, size: usize },
    Range { from: usize, to: usize },
}

pub(crate) fn export_slice<T: Clone>(rows: &[T], scope: ExportScope) -> Vec<T> {
    let (start, count) = match scope {
        ExportScope::All => (0, rows.len()),
        ExportScope::Page { page, size } => (page.saturating_sub(1).saturating_mul(size), size),
        ExportScope::Range { from, to } => {
            let start = from.saturating_sub(1);
            (start, to.saturating_sub(start))
        }
    };
    rows.iter().skip(start).take(count).cloned().collect()
}

/// List + form page for one record type.
///
/// The page owns its data source and edit buffer; persistence goes through
/// the injected handler. A failed save or delete leaves the page exactly as
/// it was before the call.
pub struct MasterPage<R: Record, H> {
    title: String,
    handler: H,
    notifier: Arc<dyn Notifier>,
    access: PageAccess,
    data: Vec<R>,
    mode: PageMode,
    form: Option<EditForm<R>>,
    sources: DropdownSources,
    templates: CellTemplates,
}

impl<R, H> MasterPage<R, H>
where
    R: Record + Entity,
    H: RecordHandler<R>,
{
    pub fn new(title: impl Into<String>, handler: H, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            title: title.into(),
            handler,
            notifier,
            access: PageAccess::default(),
            data: Vec::new(),
            mode: PageMode::Listing,
            form: None,
            sources: DropdownSources::new(),
            templates: CellTemplates::default(),
        }
    }

    pub fn with_sources(mut self, sources: DropdownSources) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_templates(mut self, templates: CellTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_access(&mut self, access: PageAccess) {
        self.access = access;
    }

    pub fn access(&self) -> &PageAccess {
        &self.access
    }

    pub fn permissions(&self) -> Permissions {
        self.access.permissions()
    }

    /// Whether the page should render its denial state instead of content.
    pub fn access_denied(&self) -> bool {
        self.access.is_denied()
    }

    pub fn set_data_source(&mut self, rows: Vec<R>) {
        self.data = rows;
    }

    pub fn data_source(&self) -> &[R] {
        &self.data
    }

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(&self.title, self.mode)
    }

    pub fn columns(&self) -> Vec<GridColumn> {
        grid_columns(metadata_for::<R>().fields())
    }

    pub fn rows(&self) -> Vec<Vec<GridCell>> {
        render_rows(&self.data, &self.templates)
    }

    pub fn form(&self) -> Option<&EditForm<R>> {
        self.form.as_ref()
    }

    pub fn controls(&self) -> Vec<FormControl> {
        self.form.as_ref().map(EditForm::controls).unwrap_or_default()
    }

    pub fn show_add_form(&mut self) -> Result<(), PageError> {
        self.access.require(Operation::Add)?;
        self.open(R::default(), PageMode::Adding);
        Ok(())
    }

    /// Open a copy of `record`; the listed row is untouched until saved.
    pub fn edit_item(&mut self, record: &R) -> Result<(), PageError> {
        self.access.require(Operation::Edit)?;
        self.open(clone_by_metadata(record), PageMode::Editing);
        Ok(())
    }

    fn open(&mut self, record: R, mode: PageMode) {
        self.form = Some(EditForm::new(record).with_sources(self.sources.clone()));
        self.mode = mode;
    }

    /// Edit a field of the open form. Returns whether the field is valid.
    pub fn change(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<bool, PageError> {
        let form = self.form.as_mut().ok_or(PageError::NoOpenForm)?;
        Ok(form.change(field, value)?)
    }

    /// Validate and persist the open form. Returns the stored record's id.
    pub async fn save(&mut self) -> Result<RecordId, PageError> {
        let operation = match self.mode {
            PageMode::Adding => Operation::Add,
            PageMode::Editing => Operation::Edit,
            PageMode::Listing => return Err(PageError::NoOpenForm),
        };
        self.access.require(operation)?;

        let form = self.form.as_mut().ok_or(PageError::NoOpenForm)?;
        if !form.validate() {
            return Err(PageError::Invalid(form.validation().error_count()));
        }

        let saved = match self.handler.save(form.record().clone()).await {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(page = %self.title, error = %err, "save failed");
                let notification = match err.user_message() {
                    Some(msg) => Notification::warning(msg),
                    None => Notification::error(format!("Error saving {}.", self.title)),
                };
                self.notifier.notify(notification);
                return Err(err.into());
            }
        };

        let id = saved.id();
        tracing::info!(page = %self.title, record_id = %id, "record saved");
        upsert(&mut self.data, saved);
        self.form = None;
        self.mode = PageMode::Listing;
        self.notifier
            .notify(Notification::success(format!("{} saved successfully!", self.title)));
        Ok(id)
    }

    pub fn cancel(&mut self) {
        self.form = None;
        self.mode = PageMode::Listing;
    }

    /// Question shown before [`delete`](Self::delete) is called.
    pub fn delete_prompt(&self) -> String {
        format!("Are you sure you want to delete this {}?", self.title)
    }

    /// Delete a confirmed row.
    pub async fn delete(&mut self, record: &R) -> Result<(), PageError> {
        self.access.require(Operation::Delete)?;

        if let Err(err) = self.handler.delete(record).await {
            tracing::warn!(page = %self.title, record_id = %record.id(), error = %err, "delete failed");
            self.notifier
                .notify(Notification::error(format!("Error deleting {}.", self.title)));
            return Err(err.into());
        }

        self.data.retain(|r| r.id() != record.id());
        self.notifier
            .notify(Notification::success(format!("{} deleted successfully.", self.title)));
        Ok(())
    }

    /// Columns offered for export; grid columns start selected.
    ///
    /// With `selected`, exactly the named fields are selected.
    pub fn export_columns(&self, selected: Option<&[&str]>) -> Result<Vec<ExportColumn>, PageError> {
        self.access.require(Operation::Export)?;
        Ok(metadata_for::<R>()
            .fields()
            .iter()
            .map(|f| ExportColumn {
                field: f.name,
                label: f.label.clone(),
                selected: selected.map_or(f.show_in_grid, |names| names.contains(&f.name)),
                visible_in_grid: f.show_in_grid,
            })
            .collect())
    }

    pub fn export_records(&self, scope: ExportScope) -> Result<Vec<R>, PageError> {
        self.access.require(Operation::Export)?;
        Ok(export_slice(&self.data, scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Severity;
    use std::sync::Mutex;
    use transerp_metadata::{crud_record, FieldConfig, FieldKind};

    crud_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Driver {
            id: RecordId => FieldConfig::new("ID").order(1).show_in_grid(false).hide_in_form(),
            name: String => FieldConfig::new("Name").order(2).required(),
            active: bool => FieldConfig::new("Active").order(3).kind(FieldKind::Checkbox).template("StatusBadge"),
        }
    }

    impl Entity for Driver {
        fn id(&self) -> RecordId {
            self.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.id = id;
        }
    }

    #[derive(Default)]
    struct Toasts(Mutex<Vec<Notification>>);

    impl Notifier for Toasts {
        fn notify(&self, notification: Notification) {
            self.0.lock().unwrap().push(notification);
        }
    }

    impl Toasts {
        fn last(&self) -> Option<Notification> {
            self.0.lock().unwrap().last().cloned()
        }
    }

    #[derive(Default)]
    struct Handler {
        fail: bool,
        reject: Option<&'static str>,
        calls: Mutex<usize>,
    }

    #[async_trait::async_trait]
    impl RecordHandler<Driver> for Handler {
        async fn save(&self, mut record: Driver) -> Result<Driver, HandlerError> {
            *self.calls.lock().unwrap() += 1;
            if let Some(reason) = self.reject {
                return Err(HandlerError::rejected(reason));
            }
            if self.fail {
                return Err(HandlerError::storage("connection reset"));
            }
            if record.is_new() {
                record.set_id(RecordId::new(41));
            }
            Ok(record)
        }

        async fn delete(&self, _: &Driver) -> Result<(), HandlerError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(HandlerError::storage("connection reset"));
            }
            Ok(())
        }
    }

    fn page(fail: bool, perms: Permissions) -> (MasterPage<Driver, Arc<Handler>>, Arc<Handler>, Arc<Toasts>) {
        let handler = Arc::new(Handler {
            fail,
            ..Handler::default()
        });
        let toasts = Arc::new(Toasts::default());
        let mut page = MasterPage::new("Driver", handler.clone(), toasts.clone());
        page.set_access(PageAccess::with_permissions(perms));
        page.set_data_source(vec![Driver {
            id: RecordId::new(1),
            name: "Ramesh".into(),
            active: true,
        }]);
        (page, handler, toasts)
    }

    #[tokio::test]
    async fn add_then_save_appends_and_closes_the_form() {
        let (mut page, _, toasts) = page(false, Permissions::all());
        page.show_add_form().unwrap();
        assert_eq!(page.breadcrumbs().last().unwrap().label, "New");

        page.change("name", "Mahesh").unwrap();
        assert_eq!(page.save().await.unwrap(), RecordId::new(41));

        assert_eq!(page.data_source().len(), 2);
        assert_eq!(page.mode(), PageMode::Listing);
        assert!(page.form().is_none());
        assert_eq!(toasts.last().unwrap(), Notification::success("Driver saved successfully!"));
    }

    #[tokio::test]
    async fn edit_replaces_the_listed_row() {
        let (mut page, _, _) = page(false, Permissions::all());
        let first = page.data_source()[0].clone();
        page.edit_item(&first).unwrap();
        page.change("name", "Ramesh K").unwrap();
        page.save().await.unwrap();

        assert_eq!(page.data_source().len(), 1);
        assert_eq!(page.data_source()[0].name, "Ramesh K");
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_handler() {
        let (mut page, handler, _) = page(false, Permissions::all());
        page.show_add_form().unwrap();
        assert!(matches!(page.save().await, Err(PageError::Invalid(1))));
        assert_eq!(*handler.calls.lock().unwrap(), 0);
        assert_eq!(page.controls()[0].message.as_deref(), Some("Name is required"));
    }

    #[tokio::test]
    async fn handler_failure_leaves_state_untouched() {
        let (mut page, _, toasts) = page(true, Permissions::all());
        page.show_add_form().unwrap();
        page.change("name", "Mahesh").unwrap();

        assert!(matches!(page.save().await, Err(PageError::Handler(_))));
        assert_eq!(page.mode(), PageMode::Adding);
        assert_eq!(page.form().unwrap().record().name, "Mahesh");
        assert_eq!(page.data_source().len(), 1);
        assert_eq!(toasts.last().unwrap().severity, Severity::Error);

        let row = page.data_source()[0].clone();
        assert!(page.delete(&row).await.is_err());
        assert_eq!(page.data_source().len(), 1);
    }

    #[tokio::test]
    async fn rejected_save_warns_with_the_handler_text() {
        let handler = Arc::new(Handler {
            reject: Some("Driver name already exists"),
            ..Handler::default()
        });
        let toasts = Arc::new(Toasts::default());
        let mut page = MasterPage::new("Driver", handler, toasts.clone());
        page.set_access(PageAccess::unrestricted());
        page.show_add_form().unwrap();
        page.change("name", "Ramesh").unwrap();

        assert!(matches!(page.save().await, Err(PageError::Handler(HandlerError::Rejected(_)))));
        assert_eq!(
            toasts.last().unwrap(),
            Notification::warning("Driver name already exists")
        );
        assert_eq!(page.mode(), PageMode::Adding);
    }

    #[tokio::test]
    async fn missing_rights_block_before_the_handler() {
        let (mut page, handler, _) = page(false, Permissions::view_only());
        assert!(matches!(
            page.show_add_form(),
            Err(PageError::AccessDenied {
                operation: Operation::Add
            })
        ));
        let row = page.data_source()[0].clone();
        assert!(matches!(page.edit_item(&row), Err(PageError::AccessDenied { .. })));
        assert!(matches!(page.delete(&row).await, Err(PageError::AccessDenied { .. })));
        assert!(page.export_columns(None).is_err());
        assert_eq!(*handler.calls.lock().unwrap(), 0);
        assert!(!page.access_denied());
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let (mut page, _, toasts) = page(false, Permissions::all());
        let row = page.data_source()[0].clone();
        page.delete(&row).await.unwrap();
        assert!(page.data_source().is_empty());
        assert_eq!(toasts.last().unwrap().message, "Driver deleted successfully.");
    }

    #[test]
    fn export_selection_defaults_to_grid_columns() {
        let (page, _, _) = page(false, Permissions::all());
        let cols = page.export_columns(None).unwrap();
        let picked: Vec<_> = cols.iter().filter(|c| c.selected).map(|c| c.field).collect();
        assert_eq!(picked, ["name", "active"]);

        let only_id = page.export_columns(Some(&["id"])).unwrap();
        let picked: Vec<_> = only_id.iter().filter(|c| c.selected).map(|c| c.field).collect();
        assert_eq!(picked, ["id"]);
    }

    #[test]
    fn export_ranges_clamp_to_the_data() {
        let rows: Vec<i32> = (1..=10).collect();
        assert_eq!(export_slice(&rows, ExportScope::Page { page: 2, size: 4 }), [5, 6, 7, 8]);
        assert_eq!(export_slice(&rows, ExportScope::Range { from: 9, to: 20 }), [9, 10]);
        assert_eq!(export_slice(&rows, ExportScope::Range { from: 0, to: 2 }), [1, 2]);
        assert_eq!(export_slice(&rows, ExportScope::All).len(), 10);
        assert!(export_slice(&rows, ExportScope::Page { page: usize::MAX, size: usize::MAX }).is_empty());
    }

    #[test]
    fn grid_and_form_come_from_the_same_metadata() {
        let (mut page, _, _) = page(false, Permissions::all());
        let cols: Vec<_> = page.columns().iter().map(|c| c.field).collect();
        assert_eq!(cols, ["name", "active"]);
        assert_eq!(page.rows()[0][1].label(), "Active");

        page.show_add_form().unwrap();
        let inputs: Vec<_> = page.controls().iter().map(|c| c.field).collect();
        assert_eq!(inputs, ["name", "active"]);
    }
}
