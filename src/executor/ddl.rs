/// DDL (Data Definition Language) operations
///
/// CREATE DATABASE, CREATE TABLE, DROP TABLE

use std::sync::Arc;

use crate::core::{DatabaseError, Row, TableInfo};
use crate::storage::MemStore;
use super::Executor;

#[derive(Debug, Clone)]
pub enum DdlOp {
    CreateDatabase { name: String, if_not_exists: bool },
    CreateTable { info: TableInfo, if_not_exists: bool },
    DropTable { db: String, table: String, if_exists: bool },
}

/// Runs one schema change on the first `next`.
#[derive(Debug)]
pub struct DdlExec {
    store: Arc<MemStore>,
    op: DdlOp,
    done: bool,
}

impl DdlExec {
    #[must_use]
    pub const fn new(store: Arc<MemStore>, op: DdlOp) -> Self {
        Self {
            store,
            op,
            done: false,
        }
    }
}

impl Executor for DdlExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        match &self.op {
            DdlOp::CreateDatabase { name, if_not_exists } => {
                self.store.create_database(name, *if_not_exists)?;
                tracing::info!(database = %name, "database created");
            }
            DdlOp::CreateTable { info, if_not_exists } => {
                self.store.create_table(info.clone(), *if_not_exists)?;
                tracing::info!(database = %info.db_name, table = %info.name, "table created");
            }
            DdlOp::DropTable { db, table, if_exists } => {
                self.store.drop_table(db, table, *if_exists)?;
                tracing::info!(database = %db, table = %table, "table dropped");
            }
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
