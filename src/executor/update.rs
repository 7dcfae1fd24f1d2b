use std::sync::Arc;

use crate::core::{DatabaseError, Row, TableInfo, Value};
use crate::plan::Expr;
use crate::storage::MemStore;
use super::Executor;

/// UPDATE: rewrites every row its source yields. The source reads the
/// target table, so each row carries its storage handle.
#[derive(Debug)]
pub struct UpdateExec {
    store: Arc<MemStore>,
    info: TableInfo,
    source: Box<dyn Executor>,
    assignments: Vec<(usize, Expr)>,
    done: bool,
    affected: usize,
}

impl UpdateExec {
    #[must_use]
    pub fn new(
        store: Arc<MemStore>,
        info: TableInfo,
        source: Box<dyn Executor>,
        assignments: Vec<(usize, Expr)>,
    ) -> Self {
        Self {
            store,
            info,
            source,
            assignments,
            done: false,
            affected: 0,
        }
    }

    fn apply(&self, row: &Row) -> Result<Vec<Value>, DatabaseError> {
        let mut values = row.values.clone();
        for (idx, expr) in &self.assignments {
            let col = &self.info.columns[*idx];
            let actual = values.len();
            // The row comes from the live table, which may have been redefined
            // since the statement was compiled.
            let slot = values.get_mut(*idx).ok_or(DatabaseError::ColumnCountMismatch {
                expected: self.info.columns.len(),
                actual,
            })?;
            *slot = expr.evaluate(&row.values)?.coerce_to(&col.field_type, &col.name)?;
        }
        Ok(values)
    }
}

impl Executor for UpdateExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        while let Some(row) = self.source.next()? {
            let handle = row.handle.ok_or_else(|| {
                DatabaseError::Unsupported(format!("rows of '{}' carry no handle", self.info.name))
            })?;
            let values = self.apply(&row)?;
            if self.store.update(&self.info.db_name, &self.info.name, handle, values)? {
                self.affected += 1;
            }
        }
        tracing::debug!(table = %self.info.name, rows = self.affected, "update finished");
        Ok(None)
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        self.source.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnInfo, DataType};
    use crate::executor::fixture::{Fixture, drain, row};
    use crate::plan::{Assignment, Plan};

    fn rename_all(value: &str) -> Plan {
        Plan::Update {
            db: None,
            table: "t".to_string(),
            source: Box::new(Plan::scan("t")),
            assignments: vec![Assignment {
                column: "name".to_string(),
                expr: Expr::text(value),
            }],
        }
    }

    #[test]
    fn test_update_rewrites_every_source_row() {
        let fx = Fixture::new();
        let mut exec = fx.build(&rename_all("z")).unwrap();
        assert!(exec.mutates_data());
        drain(exec.as_mut()).unwrap();
        assert_eq!(fx.rows("t"), vec![row(1, "z"), row(2, "z"), row(3, "z")]);
    }

    #[test]
    fn test_update_against_redefined_table_errors() {
        let fx = Fixture::new();
        // Catalog snapshot still describes t(id, name).
        let store = fx.ctx.store();
        store.drop_table("test", "t", false).unwrap();
        store
            .create_table(
                TableInfo::new("test", "t", vec![ColumnInfo::new("id", DataType::Integer)]),
                false,
            )
            .unwrap();
        store.insert("test", "t", vec![Value::Integer(1)]).unwrap();

        let mut exec = fx.build(&rename_all("z")).unwrap();
        assert!(matches!(
            exec.next(),
            Err(DatabaseError::ColumnCountMismatch { expected: 2, actual: 1 })
        ));
        exec.close().unwrap();
        assert_eq!(fx.rows("t"), vec![vec![Value::Integer(1)]]);
    }
}
