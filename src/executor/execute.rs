use std::sync::Arc;

use crate::core::{DatabaseError, InfoSchema, Row};
use crate::plan::Expr;
use crate::session::ExecContext;
use super::Executor;
use super::builder::{Build, ExecutorBuilder};

/// EXECUTE name USING params
///
/// Building is deferred: the prepared plan is only looked up, bound and
/// compiled by `build`, after which `stmt_exec` holds the executor of the
/// prepared statement.
#[derive(Debug)]
pub struct ExecuteExec {
    ctx: ExecContext,
    info_schema: Arc<InfoSchema>,
    name: String,
    params: Vec<Expr>,
    stmt_exec: Option<Box<dyn Executor>>,
}

impl ExecuteExec {
    #[must_use]
    pub const fn new(ctx: ExecContext, info_schema: Arc<InfoSchema>, name: String, params: Vec<Expr>) -> Self {
        Self {
            ctx,
            info_schema,
            name,
            params,
            stmt_exec: None,
        }
    }

    pub fn build(&mut self) -> Result<(), DatabaseError> {
        let plan = {
            let prepared = self.ctx.prepared()?;
            let stmt = prepared
                .get_statement(&self.name)
                .ok_or_else(|| DatabaseError::PreparedStatementNotFound(self.name.clone()))?;
            if stmt.param_count != self.params.len() {
                return Err(DatabaseError::ParamCountMismatch {
                    name: self.name.clone(),
                    expected: stmt.param_count,
                    actual: self.params.len(),
                });
            }
            stmt.plan.clone()
        };

        let values = self
            .params
            .iter()
            .map(|e| e.evaluate(&[]))
            .collect::<Result<Vec<_>, _>>()?;
        let bound = plan.bind_params(&values)?;

        let builder = ExecutorBuilder::new(&self.ctx, &self.info_schema);
        self.stmt_exec = Some(builder.build(&bound)?);
        Ok(())
    }

    /// The executor of the prepared statement, once built.
    pub fn take_stmt_exec(&mut self) -> Option<Box<dyn Executor>> {
        self.stmt_exec.take()
    }
}

impl Executor for ExecuteExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        match self.stmt_exec.as_mut() {
            Some(exec) => exec.next(),
            None => Ok(None),
        }
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        match self.stmt_exec.as_mut() {
            Some(exec) => exec.close(),
            None => Ok(()),
        }
    }

    fn build_deferred(&mut self) -> Option<Result<Box<dyn Executor>, DatabaseError>> {
        if let Err(e) = self.build() {
            return Some(Err(e));
        }
        Some(
            self.take_stmt_exec()
                .ok_or_else(|| DatabaseError::PreparedStatementNotFound(self.name.clone())),
        )
    }
}
