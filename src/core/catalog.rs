use std::collections::BTreeMap;

use super::column::ColumnInfo;
use super::error::DatabaseError;

/// Definition of one table inside the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub db_name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    #[must_use]
    pub fn new(db_name: impl Into<String>, name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            name: name.into(),
            db_name: db_name.into(),
            columns,
        }
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Resolves column names to positions. An empty list means all columns
    /// in declaration order.
    pub fn column_offsets(&self, names: &[String]) -> Result<Vec<usize>, DatabaseError> {
        if names.is_empty() {
            return Ok((0..self.columns.len()).collect());
        }
        names
            .iter()
            .map(|n| {
                self.column_index(n)
                    .ok_or_else(|| DatabaseError::ColumnNotFound(format!("{}.{n}", self.name)))
            })
            .collect()
    }
}

/// Immutable snapshot of the catalog that statements are compiled against.
///
/// Names are stored lowercased; lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct InfoSchema {
    schema_version: u64,
    databases: BTreeMap<String, BTreeMap<String, TableInfo>>,
}

impl InfoSchema {
    #[must_use]
    pub const fn new(schema_version: u64) -> Self {
        Self {
            schema_version,
            databases: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn schema_version(&self) -> u64 {
        self.schema_version
    }

    pub fn add_database(&mut self, name: &str) {
        self.databases.entry(name.to_lowercase()).or_default();
    }

    pub fn add_table(&mut self, table: TableInfo) {
        self.databases
            .entry(table.db_name.to_lowercase())
            .or_default()
            .insert(table.name.to_lowercase(), table);
    }

    #[must_use]
    pub fn has_database(&self, name: &str) -> bool {
        self.databases.contains_key(&name.to_lowercase())
    }

    pub fn table(&self, db: &str, table: &str) -> Result<&TableInfo, DatabaseError> {
        self.databases
            .get(&db.to_lowercase())
            .ok_or_else(|| DatabaseError::DatabaseNotFound(db.to_string()))?
            .get(&table.to_lowercase())
            .ok_or_else(|| DatabaseError::TableNotFound(format!("{db}.{table}")))
    }

    #[must_use]
    pub fn table_names(&self, db: &str) -> Vec<&str> {
        self.databases
            .get(&db.to_lowercase())
            .map(|tables| tables.values().map(|t| t.name.as_str()).collect())
            .unwrap_or_default()
    }
}
