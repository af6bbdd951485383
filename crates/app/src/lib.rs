//! `transerp-app` — wiring for the TransERP back office.
//!
//! Reads configuration from the environment, builds the stores and
//! repositories, and hands out rights-checked pages.

pub mod config;
pub mod seed;
pub mod services;

pub use config::{AppConfig, ConfigError};
pub use services::{build_services, AppServices, InvoicePage, Page, ServiceError, Store};
