//! `transerp-forms` — metadata-driven forms, grids and CRUD pages.
//!
//! Nothing here knows a concrete record type: controls, columns and
//! validation all come from the descriptors in `transerp-metadata`, and
//! persistence is delegated to injected handlers.

pub mod access;
pub mod clone;
pub mod control;
pub mod form;
pub mod format;
pub mod grid;
pub mod handler;
pub mod notify;
pub mod page;
pub mod transaction;
pub mod validation;

pub use access::PageAccess;
pub use clone::clone_by_metadata;
pub use control::{
    build_control, builder_for, dropdown_options, BuildContext, Control, ControlBuilder,
    DropdownSources, FormControl, NumericKind, TextInput,
};
pub use form::{EditForm, FormError};
pub use format::format_value;
pub use grid::{grid_columns, render_rows, BadgeTone, CellTemplate, CellTemplates, GridCell, GridColumn};
pub use handler::{HandlerError, RecordHandler, TransactionHandler};
pub use notify::{Notification, Notifier, Severity};
pub use page::{Breadcrumb, ExportColumn, ExportScope, MasterPage, PageError, PageMode};
pub use transaction::TransactionPage;
pub use validation::ValidationContext;
