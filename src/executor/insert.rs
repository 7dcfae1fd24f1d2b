use std::sync::Arc;

use crate::core::{DatabaseError, Row, TableInfo, Value};
use crate::plan::Expr;
use crate::storage::MemStore;
use super::Executor;

/// Builds a full table row from values given for `offsets`, leaving other
/// columns NULL and coercing every value to its declared column type.
pub(crate) fn assemble_row(
    info: &TableInfo,
    offsets: &[usize],
    values: Vec<Value>,
) -> Result<Vec<Value>, DatabaseError> {
    if values.len() != offsets.len() {
        return Err(DatabaseError::ColumnCountMismatch {
            expected: offsets.len(),
            actual: values.len(),
        });
    }
    let mut row = vec![Value::Null; info.columns.len()];
    for (&idx, value) in offsets.iter().zip(values) {
        let col = &info.columns[idx];
        row[idx] = value.coerce_to(&col.field_type, &col.name)?;
    }
    Ok(row)
}

/// INSERT and REPLACE of literal rows. All rows are written on the first
/// `next`; the executor never yields a row.
#[derive(Debug)]
pub struct InsertExec {
    store: Arc<MemStore>,
    info: TableInfo,
    offsets: Vec<usize>,
    rows: Vec<Vec<Expr>>,
    replace: bool,
    done: bool,
    affected: usize,
}

impl InsertExec {
    pub fn new(
        store: Arc<MemStore>,
        info: TableInfo,
        columns: &[String],
        rows: Vec<Vec<Expr>>,
        replace: bool,
    ) -> Result<Self, DatabaseError> {
        let offsets = info.column_offsets(columns)?;
        if let Some(bad) = rows.iter().find(|r| r.len() != offsets.len()) {
            return Err(DatabaseError::ColumnCountMismatch {
                expected: offsets.len(),
                actual: bad.len(),
            });
        }
        Ok(Self {
            store,
            info,
            offsets,
            rows,
            replace,
            done: false,
            affected: 0,
        })
    }
}

impl Executor for InsertExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        for exprs in std::mem::take(&mut self.rows) {
            let values = exprs
                .iter()
                .map(|e| e.evaluate(&[]))
                .collect::<Result<Vec<_>, _>>()?;
            let row = assemble_row(&self.info, &self.offsets, values)?;
            if self.replace {
                self.affected += self.store.replace(&self.info.db_name, &self.info.name, row)?;
            } else {
                self.store.insert(&self.info.db_name, &self.info.name, row)?;
                self.affected += 1;
            }
        }
        tracing::debug!(table = %self.info.name, rows = self.affected, replace = self.replace, "insert finished");
        Ok(None)
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        self.rows.clear();
        Ok(())
    }
}
