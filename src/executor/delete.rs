use std::sync::Arc;

use crate::core::{DatabaseError, Row, TableInfo};
use crate::storage::MemStore;
use super::Executor;

/// DELETE: removes every row its source yields.
#[derive(Debug)]
pub struct DeleteExec {
    store: Arc<MemStore>,
    info: TableInfo,
    source: Box<dyn Executor>,
    done: bool,
    affected: usize,
}

impl DeleteExec {
    #[must_use]
    pub fn new(store: Arc<MemStore>, info: TableInfo, source: Box<dyn Executor>) -> Self {
        Self {
            store,
            info,
            source,
            done: false,
            affected: 0,
        }
    }
}

impl Executor for DeleteExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        while let Some(row) = self.source.next()? {
            let handle = row.handle.ok_or_else(|| {
                DatabaseError::Unsupported(format!("rows of '{}' carry no handle", self.info.name))
            })?;
            if self.store.delete(&self.info.db_name, &self.info.name, handle)? {
                self.affected += 1;
            }
        }
        tracing::debug!(table = %self.info.name, rows = self.affected, "delete finished");
        Ok(None)
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        self.source.close()
    }
}
