// Module declarations
pub mod error;
pub mod value;
pub mod data_type;
pub mod column;
pub mod schema;
pub mod field;
pub mod row;
pub mod catalog;

// Re-exports for convenience
pub use error::{DatabaseError, StatementError};
pub use value::Value;
pub use data_type::DataType;
pub use column::ColumnInfo;
pub use schema::{Schema, SchemaColumn};
pub use field::ResultField;
pub use row::{ResultRow, Row};
pub use catalog::{InfoSchema, TableInfo};
