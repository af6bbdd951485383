//! Invoice line items.

use serde::{Deserialize, Serialize};
use transerp_core::{DomainError, DomainResult, Entity, RecordId};
use transerp_metadata::{crud_record, Amount, FieldConfig, FieldKind};

crud_record! {
    /// One priced line of an invoice. `amount` is derived, never typed in.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct InvoiceItem {
        pub line_item_id: RecordId => FieldConfig::new("Line").order(1).width(60).hide_in_form(),
        pub invoice_id: RecordId => FieldConfig::new("Invoice").show_in_grid(false).hide_in_form(),
        pub item_name: String => FieldConfig::new("Item Name")
            .order(2)
            .required()
            .max_length(200)
            .width(220),
        pub remarks: String => FieldConfig::new("Remarks")
            .order(3)
            .max_length(500)
            .kind(FieldKind::TextArea)
            .width(220),
        pub qty: i64 => FieldConfig::new("Qty").order(4).kind(FieldKind::Number).format("N0").width(80),
        pub rate: Amount => FieldConfig::new("Rate").order(5).kind(FieldKind::Number).format("N2").width(110),
        pub discount: Amount => FieldConfig::new("Discount").order(6).kind(FieldKind::Number).format("N2").width(110),
        pub amount: Amount => FieldConfig::new("Amount")
            .order(7)
            .kind(FieldKind::Number)
            .format("N2")
            .read_only()
            .width(120),
    }
}

/// `qty * rate - discount`, refusing to wrap.
pub fn line_amount(qty: i64, rate: Amount, discount: Amount) -> DomainResult<Amount> {
    rate.checked_mul_int(qty)
        .and_then(|gross| gross.checked_sub(discount))
        .ok_or_else(|| DomainError::invariant("invoice line amount overflow"))
}

impl InvoiceItem {
    /// Blank entry row: quantity starts at one.
    pub fn entry() -> Self {
        Self {
            qty: 1,
            ..Self::default()
        }
    }

    pub fn new(item_name: impl Into<String>, qty: i64, rate: Amount, discount: Amount) -> Self {
        Self {
            item_name: item_name.into(),
            qty,
            rate,
            discount,
            ..Self::default()
        }
    }

    /// Recompute `amount` from quantity, rate and discount.
    pub fn reprice(&mut self) -> DomainResult<Amount> {
        self.amount = line_amount(self.qty, self.rate, self.discount)?;
        Ok(self.amount)
    }

    /// Builder form of [`reprice`](Self::reprice).
    pub fn priced(mut self) -> DomainResult<Self> {
        self.reprice()?;
        Ok(self)
    }

    /// Checks applied before a line joins an invoice.
    pub fn check(&self) -> DomainResult<()> {
        if self.item_name.trim().is_empty() {
            return Err(DomainError::validation("Item name is required"));
        }
        if self.qty <= 0 {
            return Err(DomainError::validation("Quantity must be at least 1"));
        }
        if self.rate < Amount::ZERO || self.discount < Amount::ZERO {
            return Err(DomainError::validation("Rate and discount cannot be negative"));
        }
        Ok(())
    }

    /// Append to `lines` with the next free line number, priced.
    pub fn append_to(mut self, lines: &mut Vec<InvoiceItem>) -> DomainResult<RecordId> {
        self.check()?;
        self.reprice()?;
        let next = lines
            .iter()
            .map(|line| line.line_item_id.get())
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| DomainError::invariant("line number overflow"))?;
        self.line_item_id = RecordId::new(next);
        lines.push(self);
        Ok(RecordId::new(next))
    }
}

impl Entity for InvoiceItem {
    fn id(&self) -> RecordId {
        self.line_item_id
    }

    fn set_id(&mut self, id: RecordId) {
        self.line_item_id = id;
    }
}
