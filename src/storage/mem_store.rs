use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::{DatabaseError, InfoSchema, Row, TableInfo, Value};

/// Rows and definition of one table.
#[derive(Debug)]
struct StoredTable {
    info: TableInfo,
    /// handle -> values
    rows: BTreeMap<u64, Vec<Value>>,
    next_handle: u64,
}

impl StoredTable {
    const fn new(info: TableInfo) -> Self {
        Self {
            info,
            rows: BTreeMap::new(),
            next_handle: 1,
        }
    }

    fn insert(&mut self, values: Vec<Value>) -> Result<u64, DatabaseError> {
        self.check_row(&values)?;
        let handle = self.next_handle;
        self.next_handle += 1;
        self.rows.insert(handle, values);
        Ok(handle)
    }

    /// Column count and NOT NULL checks.
    fn check_row(&self, values: &[Value]) -> Result<(), DatabaseError> {
        if values.len() != self.info.columns.len() {
            return Err(DatabaseError::ColumnCountMismatch {
                expected: self.info.columns.len(),
                actual: values.len(),
            });
        }
        for (value, col) in values.iter().zip(&self.info.columns) {
            if value.is_null() && !col.nullable {
                return Err(DatabaseError::InvalidValue {
                    column: col.name.clone(),
                    reason: "column cannot be NULL".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    schema_version: u64,
    /// db -> table -> rows, keys lowercased
    databases: BTreeMap<String, BTreeMap<String, StoredTable>>,
}

impl StoreInner {
    fn table(&self, db: &str, table: &str) -> Result<&StoredTable, DatabaseError> {
        self.databases
            .get(&db.to_lowercase())
            .ok_or_else(|| DatabaseError::DatabaseNotFound(db.to_string()))?
            .get(&table.to_lowercase())
            .ok_or_else(|| DatabaseError::TableNotFound(format!("{db}.{table}")))
    }

    fn table_mut(&mut self, db: &str, table: &str) -> Result<&mut StoredTable, DatabaseError> {
        self.databases
            .get_mut(&db.to_lowercase())
            .ok_or_else(|| DatabaseError::DatabaseNotFound(db.to_string()))?
            .get_mut(&table.to_lowercase())
            .ok_or_else(|| DatabaseError::TableNotFound(format!("{db}.{table}")))
    }
}

/// In-memory row store shared by all sessions.
///
/// Every DDL bumps the schema version; `info_schema` hands out an immutable
/// catalog snapshot that statements are compiled against.
#[derive(Debug, Default)]
pub struct MemStore {
    inner: RwLock<StoreInner>,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>, DatabaseError> {
        self.inner.read().map_err(|_| DatabaseError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>, DatabaseError> {
        self.inner.write().map_err(|_| DatabaseError::LockPoisoned)
    }

    pub fn create_database(&self, name: &str, if_not_exists: bool) -> Result<(), DatabaseError> {
        let mut inner = self.write()?;
        let key = name.to_lowercase();
        if inner.databases.contains_key(&key) {
            if if_not_exists {
                return Ok(());
            }
            return Err(DatabaseError::DatabaseAlreadyExists(name.to_string()));
        }
        inner.databases.insert(key, BTreeMap::new());
        inner.schema_version += 1;
        Ok(())
    }

    pub fn create_table(&self, info: TableInfo, if_not_exists: bool) -> Result<(), DatabaseError> {
        let mut inner = self.write()?;
        let tables = inner
            .databases
            .get_mut(&info.db_name.to_lowercase())
            .ok_or_else(|| DatabaseError::DatabaseNotFound(info.db_name.clone()))?;
        let key = info.name.to_lowercase();
        if tables.contains_key(&key) {
            if if_not_exists {
                return Ok(());
            }
            return Err(DatabaseError::TableAlreadyExists(info.name));
        }
        tables.insert(key, StoredTable::new(info));
        inner.schema_version += 1;
        Ok(())
    }

    pub fn drop_table(&self, db: &str, table: &str, if_exists: bool) -> Result<(), DatabaseError> {
        let mut inner = self.write()?;
        let removed = inner
            .databases
            .get_mut(&db.to_lowercase())
            .ok_or_else(|| DatabaseError::DatabaseNotFound(db.to_string()))?
            .remove(&table.to_lowercase());
        match removed {
            Some(_) => {
                inner.schema_version += 1;
                Ok(())
            }
            None if if_exists => Ok(()),
            None => Err(DatabaseError::TableNotFound(format!("{db}.{table}"))),
        }
    }

    /// Snapshot of the current catalog.
    pub fn info_schema(&self) -> Result<InfoSchema, DatabaseError> {
        let inner = self.read()?;
        let mut is = InfoSchema::new(inner.schema_version);
        for (db, tables) in &inner.databases {
            is.add_database(db);
            for table in tables.values() {
                is.add_table(table.info.clone());
            }
        }
        Ok(is)
    }

    /// All rows of a table in handle order.
    pub fn scan(&self, db: &str, table: &str) -> Result<Vec<Row>, DatabaseError> {
        let inner = self.read()?;
        Ok(inner
            .table(db, table)?
            .rows
            .iter()
            .map(|(handle, values)| Row::with_handle(values.clone(), *handle))
            .collect())
    }

    pub fn insert(&self, db: &str, table: &str, values: Vec<Value>) -> Result<u64, DatabaseError> {
        self.write()?.table_mut(db, table)?.insert(values)
    }

    /// Inserts a row, first removing any row with the same key. The key is
    /// the first NOT NULL column; tables without one behave like INSERT.
    ///
    /// Returns the number of affected rows (removed + inserted).
    pub fn replace(&self, db: &str, table: &str, values: Vec<Value>) -> Result<usize, DatabaseError> {
        let mut inner = self.write()?;
        let stored = inner.table_mut(db, table)?;
        stored.check_row(&values)?;
        let mut affected = 0;
        if let Some(key) = stored.info.columns.iter().position(|c| !c.nullable) {
            if let Some(new_key) = values.get(key) {
                let before = stored.rows.len();
                stored.rows.retain(|_, row| row.get(key) != Some(new_key));
                affected += before - stored.rows.len();
            }
        }
        stored.insert(values)?;
        Ok(affected + 1)
    }

    /// Overwrites a row by handle, returning whether it existed.
    pub fn update(&self, db: &str, table: &str, handle: u64, values: Vec<Value>) -> Result<bool, DatabaseError> {
        let mut inner = self.write()?;
        let stored = inner.table_mut(db, table)?;
        stored.check_row(&values)?;
        match stored.rows.get_mut(&handle) {
            Some(row) => {
                *row = values;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes a row by handle, returning whether it existed.
    pub fn delete(&self, db: &str, table: &str, handle: u64) -> Result<bool, DatabaseError> {
        Ok(self
            .write()?
            .table_mut(db, table)?
            .rows
            .remove(&handle)
            .is_some())
    }
}
