//! Infrastructure layer: record stores, menu/rights repositories, session
//! storage and notification sinks.

pub mod invoices;
pub mod menu;
pub mod notify;
pub mod session;
pub mod store;

mod integration_tests;

pub use invoices::InvoiceBook;
pub use menu::{InMemoryMenuStore, PostgresMenuRepository};
pub use notify::{RecordingNotifier, TracingNotifier};
pub use session::InMemorySessionStore;
pub use store::{InMemoryRecordStore, RecordStore, StoreError, StoreHandler};
