//! Menu and rights repositories.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryMenuStore;
pub use postgres::PostgresMenuRepository;
