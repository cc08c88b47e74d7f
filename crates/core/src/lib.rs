pub mod config;
pub mod error;
pub mod schema;
pub mod types;

pub use config::AppConfig;
pub use error::{DashboardError, DashboardResult};
pub use schema::{columns, FieldKind, FieldSpec, Schema};
pub use types::{Cell, ColumnType, DatasetKind, RowRef, Table};
