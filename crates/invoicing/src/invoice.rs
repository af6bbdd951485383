//! Invoice header and the rules applied when it is saved.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use transerp_core::{DomainError, DomainResult, Entity, RecordId, UserId};
use transerp_metadata::{crud_record, Amount, FieldConfig, FieldKind};

use crate::line::InvoiceItem;

/// Refusal shown when an invoice has no lines.
pub const NO_ITEMS: &str = "Please add at least one item to the invoice";
/// Refusal shown when no customer was picked.
pub const NO_CUSTOMER: &str = "Please select a customer";

crud_record! {
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Invoice {
        pub invoice_id: RecordId => FieldConfig::new("ID").order(1).show_in_grid(false).hide_in_form(),
        pub invoice_no: String => FieldConfig::new("Invoice No")
            .order(2)
            .required()
            .max_length(50)
            .read_only()
            .width(170),
        pub invoice_date: NaiveDate => FieldConfig::new("Invoice Date")
            .order(3)
            .required()
            .kind(FieldKind::Date)
            .format("dd MMM yyyy")
            .width(130),
        pub customer_id: RecordId => FieldConfig::new("Customer")
            .order(4)
            .required()
            .kind(FieldKind::Dropdown)
            .source("customers")
            .placeholder("Select customer")
            .width(200),
        pub total_amount: Amount => FieldConfig::new("Total")
            .order(5)
            .kind(FieldKind::Number)
            .format("C2")
            .read_only()
            .width(130),
        pub is_active: bool => FieldConfig::new("Status")
            .order(6)
            .template("ActiveBadge")
            .hide_in_form()
            .width(100),
        pub created_by: UserId,
        pub created_date: Option<NaiveDateTime>,
        pub modified_by: UserId,
        pub modified_date: Option<NaiveDateTime>,
    }
}

impl Invoice {
    /// Fresh, unsaved invoice dated `today` and numbered after `last_id`.
    pub fn draft(today: NaiveDate, last_id: Option<RecordId>) -> Self {
        Self {
            invoice_no: crate::numbering::next_invoice_number(today, last_id),
            invoice_date: today,
            is_active: true,
            ..Self::default()
        }
    }

    /// Reject an invoice that cannot be saved with these lines.
    pub fn check_saveable(&self, lines: &[InvoiceItem]) -> DomainResult<()> {
        if lines.is_empty() {
            return Err(DomainError::validation(NO_ITEMS));
        }
        if self.customer_id.is_unsaved() {
            return Err(DomainError::validation(NO_CUSTOMER));
        }
        lines.iter().try_for_each(InvoiceItem::check)
    }

    /// Price every line, link it to this invoice and stamp the audit
    /// columns. New invoices are created active; existing ones record the editor.
    pub fn prepare_for_save(
        &mut self,
        lines: &mut [InvoiceItem],
        user: UserId,
        now: NaiveDateTime,
    ) -> DomainResult<()> {
        self.check_saveable(lines)?;

        for line in lines.iter_mut() {
            line.reprice()?;
            line.invoice_id = self.invoice_id;
        }
        self.total_amount = invoice_total(lines)?;

        if self.is_new() {
            self.created_by = user;
            self.created_date = Some(now);
            self.is_active = true;
        } else {
            self.modified_by = user;
            self.modified_date = Some(now);
        }
        Ok(())
    }
}

impl Entity for Invoice {
    fn id(&self) -> RecordId {
        self.invoice_id
    }

    fn set_id(&mut self, id: RecordId) {
        self.invoice_id = id;
    }
}

/// Sum of line amounts; overflow is refused rather than saturated.
pub fn invoice_total(lines: &[InvoiceItem]) -> DomainResult<Amount> {
    lines.iter().try_fold(Amount::ZERO, |acc, line| {
        acc.checked_add(line.amount)
            .ok_or_else(|| DomainError::invariant("invoice total overflow"))
    })
}
