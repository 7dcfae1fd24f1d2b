use super::column::ColumnInfo;
use super::schema::SchemaColumn;

/// Client-facing description of one result column.
///
/// `column_as_name` is the header shown to the client; `column` is the
/// underlying column it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultField {
    pub column_as_name: String,
    pub table_as_name: String,
    pub db_name: String,
    pub column: ColumnInfo,
}

impl ResultField {
    #[must_use]
    pub fn new(
        column_as_name: impl Into<String>,
        table_as_name: impl Into<String>,
        db_name: impl Into<String>,
        column: ColumnInfo,
    ) -> Self {
        Self {
            column_as_name: column_as_name.into(),
            table_as_name: table_as_name.into(),
            db_name: db_name.into(),
            column,
        }
    }
}

impl From<&SchemaColumn> for ResultField {
    fn from(col: &SchemaColumn) -> Self {
        Self {
            column_as_name: col.col_name.clone(),
            table_as_name: col.tbl_name.clone(),
            db_name: col.db_name.clone(),
            column: ColumnInfo::new(col.col_name.clone(), col.ret_type.clone()),
        }
    }
}
