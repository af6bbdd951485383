//! Invoice numbers: `INV-<yyyyMMdd>-<sequence>`.

use chrono::NaiveDate;
use transerp_core::RecordId;

pub fn invoice_number(date: NaiveDate, sequence: i32) -> String {
    format!("INV-{}-{sequence:04}", date.format("%Y%m%d"))
}

/// Number for the invoice following `last_id` (the highest stored id).
pub fn next_invoice_number(date: NaiveDate, last_id: Option<RecordId>) -> String {
    let last = last_id.map(RecordId::get).unwrap_or(0).max(0);
    invoice_number(date, last.saturating_add(1))
}
