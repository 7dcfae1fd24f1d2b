use std::sync::Arc;

use crate::core::{DatabaseError, Row, Schema, SchemaColumn, TableInfo};
use crate::session::CancelToken;
use crate::storage::MemStore;

/// Full scan of one table. Rows are read from the store on the first
/// `next`, so the scan sees the data as of execution, not as of build.
#[derive(Debug)]
pub struct TableScanExec {
    store: Arc<MemStore>,
    cancel: CancelToken,
    db: String,
    table: String,
    schema: Schema,
    rows: Option<std::vec::IntoIter<Row>>,
}

impl TableScanExec {
    #[must_use]
    pub fn new(
        store: Arc<MemStore>,
        cancel: CancelToken,
        info: &TableInfo,
        alias: Option<&str>,
    ) -> Self {
        let tbl_name = alias.unwrap_or(&info.name);
        let schema = Schema::new(
            info.columns
                .iter()
                .map(|c| SchemaColumn::new(&c.name, tbl_name, &info.db_name, c.field_type.clone()))
                .collect(),
        );
        Self {
            store,
            cancel,
            db: info.db_name.clone(),
            table: info.name.clone(),
            schema,
            rows: None,
        }
    }
}

impl super::Executor for TableScanExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        self.cancel.check()?;
        if self.rows.is_none() {
            self.rows = Some(self.store.scan(&self.db, &self.table)?.into_iter());
        }
        Ok(self.rows.as_mut().and_then(Iterator::next))
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        self.rows = None;
        Ok(())
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}
