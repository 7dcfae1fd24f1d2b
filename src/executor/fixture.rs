use std::sync::Arc;

use crate::core::{ColumnInfo, DataType, DatabaseError, InfoSchema, Row, TableInfo, Value};
use crate::plan::Plan;
use crate::session::{ExecContext, SessionVars};
use crate::storage::MemStore;
use super::{Build, Executor, ExecutorBuilder};

/// Store with database `test` and table `t(id INTEGER NOT NULL, name TEXT)`
/// holding rows 1..=3 named a, b, c.
pub(crate) struct Fixture {
    pub ctx: ExecContext,
    pub info_schema: Arc<InfoSchema>,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(MemStore::new());
        store.create_database("test", false).unwrap();
        store
            .create_table(
                TableInfo::new(
                    "test",
                    "t",
                    vec![
                        ColumnInfo::new("id", DataType::Integer).not_null(),
                        ColumnInfo::new("name", DataType::Text),
                    ],
                ),
                false,
            )
            .unwrap();
        for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
            store
                .insert("test", "t", vec![Value::Integer(id), Value::Text(name.to_string())])
                .unwrap();
        }
        let info_schema = Arc::new(store.info_schema().unwrap());
        let ctx = ExecContext::new(store, SessionVars::new(Some("test".to_string())));
        Self { ctx, info_schema }
    }

    /// Re-reads the catalog after DDL.
    pub fn refresh(&mut self) {
        self.info_schema = Arc::new(self.ctx.store().info_schema().unwrap());
    }

    pub fn build(&self, plan: &Plan) -> Result<Box<dyn Executor>, DatabaseError> {
        ExecutorBuilder::new(&self.ctx, &self.info_schema).build(plan)
    }

    /// Stored rows of `table` in database `test`, in handle order.
    pub fn rows(&self, table: &str) -> Vec<Vec<Value>> {
        self.ctx
            .store()
            .scan("test", table)
            .unwrap()
            .into_iter()
            .map(|r| r.values)
            .collect()
    }
}

pub(crate) fn drain(exec: &mut dyn Executor) -> Result<Vec<Row>, DatabaseError> {
    let mut rows = Vec::new();
    while let Some(row) = exec.next()? {
        rows.push(row);
    }
    exec.close()?;
    Ok(rows)
}

pub(crate) fn row(id: i64, name: &str) -> Vec<Value> {
    vec![Value::Integer(id), Value::Text(name.to_string())]
}
