use super::data_type::DataType;

/// One output column of an executor: the name it produces, the table alias
/// and database it comes from, and its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    pub col_name: String,
    pub tbl_name: String,
    pub db_name: String,
    pub ret_type: DataType,
}

impl SchemaColumn {
    #[must_use]
    pub fn new(
        col_name: impl Into<String>,
        tbl_name: impl Into<String>,
        db_name: impl Into<String>,
        ret_type: DataType,
    ) -> Self {
        Self {
            col_name: col_name.into(),
            tbl_name: tbl_name.into(),
            db_name: db_name.into(),
            ret_type,
        }
    }
}

/// Ordered output columns of an executor. Write executors have none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<SchemaColumn>,
}

impl Schema {
    #[must_use]
    pub const fn new(columns: Vec<SchemaColumn>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self { columns: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaColumn> {
        self.columns.iter()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a SchemaColumn;
    type IntoIter = std::slice::Iter<'a, SchemaColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_keep_order() {
        let schema = Schema::new(vec![
            SchemaColumn::new("id", "a", "test", DataType::Integer),
            SchemaColumn::new("id", "b", "test", DataType::Integer),
        ]);
        assert_eq!(schema.len(), 2);
        assert!(Schema::empty().is_empty());
        let tables: Vec<_> = schema.iter().map(|c| c.tbl_name.as_str()).collect();
        assert_eq!(tables, vec!["a", "b"]);
    }
}
