use serde::{Deserialize, Serialize};
use super::data_type::DataType;

/// Column definition as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub field_type: DataType,
    pub nullable: bool,
}

impl ColumnInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: DataType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: true,
        }
    }

    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}
