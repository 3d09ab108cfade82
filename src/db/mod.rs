pub mod adapter;
pub mod migrations;
pub mod repository;
pub mod schema;
pub mod store;

pub use adapter::{RowId, Table};
pub use repository::{ProgressRepo, TaskRepo};
pub use store::{AccessGrant, Role, SheetBackend, SqliteBackend, StoreConnection};
