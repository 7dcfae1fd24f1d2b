use std::sync::Arc;

use crate::core::{DatabaseError, InfoSchema, TableInfo};
use crate::plan::Plan;
use crate::session::ExecContext;
use super::{
    DdlExec, DdlOp, DeallocateExec, DeleteExec, ExecuteExec, Executor, InsertExec, LimitExec,
    LoadDataExec, PrepareExec, ProjectionExec, SelectionExec, SetExec, TableScanExec, UpdateExec,
};

/// Compiles a plan into an executor tree.
pub trait Build {
    fn build(&self, plan: &Plan) -> Result<Box<dyn Executor>, DatabaseError>;
}

/// Builds executors against one catalog snapshot, within one session.
///
/// Every table a plan names is resolved here, so a plan referring to a
/// dropped table fails before any executor exists.
pub struct ExecutorBuilder<'a> {
    ctx: &'a ExecContext,
    info_schema: &'a Arc<InfoSchema>,
}

impl<'a> ExecutorBuilder<'a> {
    #[must_use]
    pub const fn new(ctx: &'a ExecContext, info_schema: &'a Arc<InfoSchema>) -> Self {
        Self { ctx, info_schema }
    }

    fn table(&self, db: Option<&String>, table: &str) -> Result<TableInfo, DatabaseError> {
        let db = self.ctx.resolve_db(db.map(String::as_str))?;
        self.info_schema.table(&db, table).cloned()
    }

    /// Source plans of UPDATE/DELETE must read the target table so rows keep
    /// their handles.
    fn check_reads_table(source: &Plan, info: &TableInfo) -> Result<(), DatabaseError> {
        match source {
            Plan::TableScan { table, .. } if table.eq_ignore_ascii_case(&info.name) => Ok(()),
            Plan::Selection { source, .. } | Plan::Limit { source, .. } => {
                Self::check_reads_table(source, info)
            }
            _ => Err(DatabaseError::Unsupported(format!(
                "source of a mutation on '{}' must read that table",
                info.name
            ))),
        }
    }
}

impl Build for ExecutorBuilder<'_> {
    fn build(&self, plan: &Plan) -> Result<Box<dyn Executor>, DatabaseError> {
        self.ctx.cancel_token().check()?;
        let store = Arc::clone(self.ctx.store());

        Ok(match plan {
            Plan::TableScan { db, table, alias } => {
                let info = self.table(db.as_ref(), table)?;
                Box::new(TableScanExec::new(
                    store,
                    self.ctx.cancel_token().clone(),
                    &info,
                    alias.as_deref(),
                ))
            }
            Plan::Selection { source, predicate } => {
                Box::new(SelectionExec::new(self.build(source)?, predicate.clone()))
            }
            Plan::Projection { source, exprs } => {
                Box::new(ProjectionExec::new(self.build(source)?, exprs.clone()))
            }
            Plan::Limit { source, offset, count } => {
                Box::new(LimitExec::new(self.build(source)?, *offset, *count))
            }
            Plan::Insert { db, table, columns, rows } => {
                let info = self.table(db.as_ref(), table)?;
                Box::new(InsertExec::new(store, info, columns, rows.clone(), false)?)
            }
            Plan::Replace { db, table, columns, rows } => {
                let info = self.table(db.as_ref(), table)?;
                Box::new(InsertExec::new(store, info, columns, rows.clone(), true)?)
            }
            Plan::Update { db, table, source, assignments } => {
                let info = self.table(db.as_ref(), table)?;
                Self::check_reads_table(source, &info)?;
                let assignments = assignments
                    .iter()
                    .map(|a| {
                        info.column_index(&a.column)
                            .map(|idx| (idx, a.expr.clone()))
                            .ok_or_else(|| DatabaseError::ColumnNotFound(format!("{table}.{}", a.column)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(UpdateExec::new(store, info, self.build(source)?, assignments))
            }
            Plan::Delete { db, table, source } => {
                let info = self.table(db.as_ref(), table)?;
                Self::check_reads_table(source, &info)?;
                Box::new(DeleteExec::new(store, info, self.build(source)?))
            }
            Plan::LoadData { db, table, path, columns, field_terminator, ignore_lines } => {
                let info = self.table(db.as_ref(), table)?;
                Box::new(LoadDataExec::new(
                    store,
                    self.ctx.cancel_token().clone(),
                    info,
                    path.clone(),
                    columns,
                    field_terminator.clone(),
                    *ignore_lines,
                )?)
            }
            Plan::CreateDatabase { name, if_not_exists } => Box::new(DdlExec::new(
                store,
                DdlOp::CreateDatabase {
                    name: name.clone(),
                    if_not_exists: *if_not_exists,
                },
            )),
            Plan::CreateTable { db, table, columns, if_not_exists } => {
                let db = self.ctx.resolve_db(db.as_deref())?;
                if !self.info_schema.has_database(&db) {
                    return Err(DatabaseError::DatabaseNotFound(db));
                }
                Box::new(DdlExec::new(
                    store,
                    DdlOp::CreateTable {
                        info: TableInfo::new(db, table.clone(), columns.clone()),
                        if_not_exists: *if_not_exists,
                    },
                ))
            }
            Plan::DropTable { db, table, if_exists } => {
                let db = self.ctx.resolve_db(db.as_deref())?;
                if !*if_exists {
                    self.info_schema.table(&db, table)?;
                }
                Box::new(DdlExec::new(
                    store,
                    DdlOp::DropTable {
                        db,
                        table: table.clone(),
                        if_exists: *if_exists,
                    },
                ))
            }
            Plan::Set { variable, value } => {
                Box::new(SetExec::new(self.ctx.clone(), variable.clone(), value.clone()))
            }
            Plan::Prepare { name, plan } => Box::new(PrepareExec::new(
                self.ctx.clone(),
                name.clone(),
                plan.as_ref().clone(),
            )?),
            Plan::Execute { name, params } => Box::new(ExecuteExec::new(
                self.ctx.clone(),
                Arc::clone(self.info_schema),
                name.clone(),
                params.clone(),
            )),
            Plan::Deallocate { name } => {
                Box::new(DeallocateExec::new(self.ctx.clone(), name.clone()))
            }
        })
    }
}
