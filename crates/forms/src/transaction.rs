//! Header + line-item document page.

use std::sync::Arc;

use transerp_auth::{Operation, Permissions};
use transerp_core::{Entity, RecordId};
use transerp_metadata::{metadata_for, FieldValue, Record};

use crate::access::PageAccess;
use crate::clone::clone_by_metadata;
use crate::control::{DropdownSources, FormControl};
use crate::form::EditForm;
use crate::grid::{grid_columns, render_rows, CellTemplates, GridCell, GridColumn};
use crate::handler::{HandlerError, TransactionHandler};
use crate::notify::{Notification, Notifier};
use crate::page::{breadcrumbs, export_slice, upsert, Breadcrumb, ExportScope, PageError, PageMode};
use crate::validation::ValidationContext;

/// Document page: a header form plus an editable list of lines.
///
/// Same rights gating and failure semantics as
/// [`MasterPage`](crate::MasterPage); the handler receives header and lines
/// together.
pub struct TransactionPage<H: Record, L, X> {
    title: String,
    handler: X,
    notifier: Arc<dyn Notifier>,
    access: PageAccess,
    data: Vec<H>,
    mode: PageMode,
    header: Option<EditForm<H>>,
    lines: Vec<L>,
    sources: DropdownSources,
    templates: CellTemplates,
}

impl<H, L, X> TransactionPage<H, L, X>
where
    H: Record + Entity,
    L: Record,
    X: TransactionHandler<H, L>,
{
    pub fn new(title: impl Into<String>, handler: X, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            title: title.into(),
            handler,
            notifier,
            access: PageAccess::default(),
            data: Vec::new(),
            mode: PageMode::Listing,
            header: None,
            lines: Vec::new(),
            sources: DropdownSources::new(),
            templates: CellTemplates::default(),
        }
    }

    /// Dropdown options for the header form.
    pub fn with_sources(mut self, sources: DropdownSources) -> Self {
        self.sources = sources;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_access(&mut self, access: PageAccess) {
        self.access = access;
    }

    pub fn permissions(&self) -> Permissions {
        self.access.permissions()
    }

    pub fn access_denied(&self) -> bool {
        self.access.is_denied()
    }

    pub fn set_data_source(&mut self, rows: Vec<H>) {
        self.data = rows;
    }

    pub fn data_source(&self) -> &[H] {
        &self.data
    }

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(&self.title, self.mode)
    }

    pub fn columns(&self) -> Vec<GridColumn> {
        grid_columns(metadata_for::<H>().fields())
    }

    pub fn rows(&self) -> Vec<Vec<GridCell>> {
        render_rows(&self.data, &self.templates)
    }

    pub fn line_columns(&self) -> Vec<GridColumn> {
        grid_columns(metadata_for::<L>().fields())
    }

    pub fn line_rows(&self) -> Vec<Vec<GridCell>> {
        render_rows(&self.lines, &self.templates)
    }

    pub fn header(&self) -> Option<&H> {
        self.header.as_ref().map(EditForm::record)
    }

    pub fn header_controls(&self) -> Vec<FormControl> {
        self.header.as_ref().map(EditForm::controls).unwrap_or_default()
    }

    pub fn lines(&self) -> &[L] {
        &self.lines
    }

    pub async fn show_add_form(&mut self) -> Result<(), PageError> {
        self.access.require(Operation::Add)?;
        let header = self.call(self.handler.new_header().await, "opening")?;
        self.open(header, Vec::new(), PageMode::Adding);
        Ok(())
    }

    pub async fn edit_item(&mut self, header: &H) -> Result<(), PageError> {
        self.access.require(Operation::Edit)?;
        let lines = self.call(self.handler.lines(header).await, "loading")?;
        self.open(clone_by_metadata(header), lines, PageMode::Editing);
        Ok(())
    }

    fn open(&mut self, header: H, lines: Vec<L>, mode: PageMode) {
        self.header = Some(EditForm::new(header).with_sources(self.sources.clone()));
        self.lines = lines;
        self.mode = mode;
    }

    /// Report a handler failure; rejections carry their own message.
    fn call<T>(&self, result: Result<T, HandlerError>, action: &str) -> Result<T, PageError> {
        result.map_err(|err| {
            tracing::warn!(page = %self.title, action, error = %err, "document handler failed");
            let notification = match err.user_message() {
                Some(msg) => Notification::warning(msg),
                None => Notification::error(format!("Error {action} {}.", self.title)),
            };
            self.notifier.notify(notification);
            PageError::Handler(err)
        })
    }

    pub fn change(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<bool, PageError> {
        let form = self.header.as_mut().ok_or(PageError::NoOpenForm)?;
        Ok(form.change(field, value)?)
    }

    /// Mutable header for values computed from the lines.
    pub fn header_mut(&mut self) -> Option<&mut H> {
        self.header.as_mut().map(EditForm::record_mut)
    }

    /// Validate `line` against its own metadata and append it.
    pub fn add_line_item(&mut self, line: L) -> Result<(), PageError> {
        if self.header.is_none() {
            return Err(PageError::NoOpenForm);
        }

        let mut check = ValidationContext::new();
        if !check.validate_record(&metadata_for::<L>(), &line) {
            if let Some((_, messages)) = check.errors().next() {
                if let Some(first) = messages.first() {
                    self.notifier.notify(Notification::warning(first.clone()));
                }
            }
            return Err(PageError::Invalid(check.error_count()));
        }

        self.lines.push(line);
        Ok(())
    }

    pub fn remove_line_prompt(&self) -> &'static str {
        "Remove this item from the list?"
    }

    /// Drop a confirmed line.
    pub fn remove_line_item(&mut self, index: usize) -> Result<L, PageError> {
        if index >= self.lines.len() {
            return Err(PageError::NoSuchLine(index));
        }
        let removed = self.lines.remove(index);
        self.notifier.notify(Notification::info("Item removed from list."));
        Ok(removed)
    }

    /// Take a line out of the list so it can be corrected and added again.
    pub fn take_line_item(&mut self, index: usize) -> Result<L, PageError> {
        if index >= self.lines.len() {
            return Err(PageError::NoSuchLine(index));
        }
        let taken = self.lines.remove(index);
        self.notifier.notify(Notification::info(
            "Item loaded for editing. Modify and click 'Add' again.",
        ));
        Ok(taken)
    }

    pub async fn save(&mut self) -> Result<RecordId, PageError> {
        let operation = match self.mode {
            PageMode::Adding => Operation::Add,
            PageMode::Editing => Operation::Edit,
            PageMode::Listing => return Err(PageError::NoOpenForm),
        };
        self.access.require(operation)?;

        let form = self.header.as_mut().ok_or(PageError::NoOpenForm)?;
        if !form.validate() {
            let failing = form.validation().error_count();
            self.notifier.notify(Notification::warning(
                "Please fix validation errors in the header.",
            ));
            return Err(PageError::Invalid(failing));
        }
        if self.lines.is_empty() {
            self.notifier.notify(Notification::warning(
                "Please add at least one item.",
            ));
            return Err(PageError::NoLineItems);
        }

        let header = form.record().clone();
        let result = self.handler.save(header, self.lines.clone()).await;
        let saved = self.call(result, "saving")?;

        let id = saved.id();
        tracing::info!(page = %self.title, record_id = %id, lines = self.lines.len(), "document saved");
        upsert(&mut self.data, saved);
        self.cancel();
        self.notifier
            .notify(Notification::success(format!("{} saved successfully!", self.title)));
        Ok(id)
    }

    pub fn cancel(&mut self) {
        self.header = None;
        self.lines.clear();
        self.mode = PageMode::Listing;
    }

    pub fn delete_prompt(&self) -> String {
        format!("Are you sure you want to delete this {}?", self.title)
    }

    pub async fn delete(&mut self, header: &H) -> Result<(), PageError> {
        self.access.require(Operation::Delete)?;
        let result = self.handler.delete(header).await;
        self.call(result, "deleting")?;

        self.data.retain(|h| h.id() != header.id());
        self.notifier
            .notify(Notification::success(format!("{} deleted successfully.", self.title)));
        Ok(())
    }

    pub fn export_records(&self, scope: ExportScope) -> Result<Vec<H>, PageError> {
        self.access.require(Operation::Export)?;
        Ok(export_slice(&self.data, scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use transerp_metadata::{crud_record, FieldConfig};

    crud_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Trip {
            id: RecordId => FieldConfig::new("ID").order(1).hide_in_form(),
            trip_no: String => FieldConfig::new("Trip No").order(2).required(),
        }
    }

    impl Entity for Trip {
        fn id(&self) -> RecordId {
            self.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.id = id;
        }
    }

    crud_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Stop {
            place: String => FieldConfig::new("Place").order(1).required(),
            km: i64 => FieldConfig::new("Km").order(2),
        }
    }

    #[derive(Default)]
    struct Toasts(Mutex<Vec<Notification>>);

    impl Notifier for Toasts {
        fn notify(&self, notification: Notification) {
            self.0.lock().unwrap().push(notification);
        }
    }

    #[derive(Default)]
    struct Trips {
        saved: Mutex<Vec<(Trip, Vec<Stop>)>>,
        reject: Option<String>,
    }

    #[async_trait::async_trait]
    impl TransactionHandler<Trip, Stop> for Trips {
        async fn new_header(&self) -> Result<Trip, HandlerError> {
            Ok(Trip {
                trip_no: "TR-0001".into(),
                ..Trip::default()
            })
        }

        async fn lines(&self, _: &Trip) -> Result<Vec<Stop>, HandlerError> {
            Ok(vec![Stop {
                place: "Pune".into(),
                km: 0,
            }])
        }

        async fn save(&self, mut header: Trip, lines: Vec<Stop>) -> Result<Trip, HandlerError> {
            if let Some(reason) = &self.reject {
                return Err(HandlerError::rejected(reason.clone()));
            }
            header.set_id(RecordId::new(3));
            self.saved.lock().unwrap().push((header.clone(), lines));
            Ok(header)
        }

        async fn delete(&self, _: &Trip) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    fn page(reject: Option<&str>) -> (TransactionPage<Trip, Stop, Arc<Trips>>, Arc<Trips>, Arc<Toasts>) {
        let handler = Arc::new(Trips {
            reject: reject.map(str::to_string),
            ..Trips::default()
        });
        let toasts = Arc::new(Toasts::default());
        let mut page = TransactionPage::new("Trip", handler.clone(), toasts.clone());
        page.set_access(PageAccess::unrestricted());
        (page, handler, toasts)
    }

    fn last(toasts: &Toasts) -> Notification {
        toasts.0.lock().unwrap().last().cloned().unwrap()
    }

    #[tokio::test]
    async fn new_document_uses_the_handler_header() {
        let (mut page, _, _) = page(None);
        page.show_add_form().await.unwrap();
        assert_eq!(page.header().unwrap().trip_no, "TR-0001");
        assert!(page.lines().is_empty());
    }

    #[tokio::test]
    async fn save_needs_a_line() {
        let (mut page, handler, toasts) = page(None);
        page.show_add_form().await.unwrap();
        assert!(matches!(page.save().await, Err(PageError::NoLineItems)));
        assert_eq!(last(&toasts).message, "Please add at least one item.");

        page.add_line_item(Stop {
            place: "Nashik".into(),
            km: 210,
        })
        .unwrap();
        assert_eq!(page.save().await.unwrap(), RecordId::new(3));
        assert_eq!(handler.saved.lock().unwrap()[0].1.len(), 1);
        assert_eq!(page.data_source().len(), 1);
        assert_eq!(page.mode(), PageMode::Listing);
    }

    #[tokio::test]
    async fn invalid_line_is_refused_with_a_warning() {
        let (mut page, _, toasts) = page(None);
        page.show_add_form().await.unwrap();
        let err = page.add_line_item(Stop::default()).unwrap_err();
        assert!(matches!(err, PageError::Invalid(1)));
        assert_eq!(last(&toasts), Notification::warning("Place is required"));
        assert!(page.lines().is_empty());
    }

    #[tokio::test]
    async fn header_validation_blocks_save() {
        let (mut page, _, toasts) = page(None);
        page.show_add_form().await.unwrap();
        page.change("trip_no", "").unwrap();
        page.add_line_item(Stop {
            place: "Nashik".into(),
            km: 1,
        })
        .unwrap();
        assert!(matches!(page.save().await, Err(PageError::Invalid(1))));
        assert_eq!(last(&toasts).message, "Please fix validation errors in the header.");
    }

    #[tokio::test]
    async fn rejection_is_shown_and_state_kept() {
        let (mut page, _, toasts) = page(Some("Please select a customer"));
        page.show_add_form().await.unwrap();
        page.add_line_item(Stop {
            place: "Nashik".into(),
            km: 1,
        })
        .unwrap();

        assert!(matches!(page.save().await, Err(PageError::Handler(HandlerError::Rejected(_)))));
        assert_eq!(last(&toasts), Notification::warning("Please select a customer"));
        assert_eq!(page.lines().len(), 1);
        assert_eq!(page.mode(), PageMode::Adding);
        assert!(page.data_source().is_empty());
    }

    #[tokio::test]
    async fn edit_loads_lines_and_lines_can_be_taken_back() {
        let (mut page, _, _) = page(None);
        let trip = Trip {
            id: RecordId::new(3),
            trip_no: "TR-0003".into(),
        };
        page.edit_item(&trip).await.unwrap();
        assert_eq!(page.lines().len(), 1);

        let stop = page.take_line_item(0).unwrap();
        assert_eq!(stop.place, "Pune");
        assert!(matches!(page.remove_line_item(0), Err(PageError::NoSuchLine(0))));
    }

    #[tokio::test]
    async fn view_only_cannot_open_forms() {
        let (mut page, _, _) = page(None);
        page.set_access(PageAccess::with_permissions(Permissions::view_only()));
        assert!(matches!(page.show_add_form().await, Err(PageError::AccessDenied { .. })));
    }
}
