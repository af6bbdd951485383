//! Explicit per-field display configuration.

use serde::{Deserialize, Serialize};

use crate::kind::{DataSource, FieldKind};
use crate::validation::ValidationRules;

pub const DEFAULT_ORDER: i32 = 100;
pub const DEFAULT_GRID_WIDTH: u32 = 150;

/// Display and validation settings declared next to a record field.
///
/// Built with chained setters:
///
/// ```
/// use transerp_metadata::{FieldConfig, FieldKind};
///
/// let cfg = FieldConfig::new("Vehicle Type")
///     .order(3)
///     .kind(FieldKind::Dropdown)
///     .options("Truck,Trailer,Container,Tanker")
///     .width(120);
/// assert_eq!(cfg.data_source.static_options().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Blank means "use the field name".
    pub label: String,
    pub kind: FieldKind,
    pub order: i32,
    pub required: bool,
    pub show_in_grid: bool,
    pub grid_width: u32,
    pub data_source: DataSource,
    pub format: Option<String>,
    pub placeholder: Option<String>,
    pub read_only: bool,
    pub hide_in_form: bool,
    pub grid_template: Option<String>,
    pub validation: ValidationRules,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            kind: FieldKind::Text,
            order: DEFAULT_ORDER,
            required: false,
            show_in_grid: true,
            grid_width: DEFAULT_GRID_WIDTH,
            data_source: DataSource::None,
            format: None,
            placeholder: None,
            read_only: false,
            hide_in_form: false,
            grid_template: None,
            validation: ValidationRules::default(),
        }
    }
}

impl FieldConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: impl Into<FieldKind>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Marks the label and enforces presence on save.
    pub fn required(mut self) -> Self {
        self.required = true;
        self.validation.required = true;
        self
    }

    pub fn show_in_grid(mut self, show: bool) -> Self {
        self.show_in_grid = show;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.grid_width = width;
        self
    }

    /// Static dropdown options as a comma list.
    pub fn options(mut self, list: &str) -> Self {
        self.data_source = DataSource::from_list(list);
        self
    }

    /// Dropdown options supplied by the page under `key`.
    pub fn source(mut self, key: impl Into<String>) -> Self {
        self.data_source = DataSource::named(key);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn hide_in_form(mut self) -> Self {
        self.hide_in_form = true;
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.grid_template = Some(template.into());
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.validation.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.validation.max_length = Some(len);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.validation.min = Some(min);
        self.validation.max = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.validation.pattern = Some(pattern.into());
        self
    }

    pub fn email(mut self) -> Self {
        self.validation.email = true;
        self
    }

    pub fn phone(mut self) -> Self {
        self.validation.phone = true;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.validation.message = Some(message.into());
        self
    }
}
