//! Invoicing: invoice headers with priced line items.
//!
//! Pure domain rules (line pricing, totals, numbering, save preconditions);
//! storage and pages live in other crates.

pub mod invoice;
pub mod line;
pub mod numbering;

pub use invoice::{invoice_total, Invoice, NO_CUSTOMER, NO_ITEMS};
pub use line::{line_amount, InvoiceItem};
pub use numbering::{invoice_number, next_invoice_number};
