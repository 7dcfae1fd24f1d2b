use crate::core::{DatabaseError, Row, Value};
use crate::plan::Plan;
use crate::session::ExecContext;
use super::Executor;

/// SET variable = value
#[derive(Debug)]
pub struct SetExec {
    ctx: ExecContext,
    variable: String,
    value: Option<Value>,
}

impl SetExec {
    #[must_use]
    pub fn new(ctx: ExecContext, variable: String, value: Value) -> Self {
        Self {
            ctx,
            variable,
            value: Some(value),
        }
    }
}

impl Executor for SetExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        if let Some(value) = self.value.take() {
            self.ctx.vars_mut()?.set_var(&self.variable, value)?;
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn mutates_data(&self) -> bool {
        false
    }
}

/// PREPARE name FROM plan
#[derive(Debug)]
pub struct PrepareExec {
    ctx: ExecContext,
    name: String,
    plan: Option<Plan>,
}

impl PrepareExec {
    pub fn new(ctx: ExecContext, name: String, plan: Plan) -> Result<Self, DatabaseError> {
        if matches!(
            plan,
            Plan::Prepare { .. } | Plan::Execute { .. } | Plan::Deallocate { .. }
        ) {
            return Err(DatabaseError::Unsupported(
                "PREPARE of a prepared-statement command".to_string(),
            ));
        }
        Ok(Self {
            ctx,
            name,
            plan: Some(plan),
        })
    }
}

impl Executor for PrepareExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        if let Some(plan) = self.plan.take() {
            self.ctx.prepared_mut()?.add_statement(&self.name, plan);
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn mutates_data(&self) -> bool {
        false
    }
}

/// DEALLOCATE PREPARE name
#[derive(Debug)]
pub struct DeallocateExec {
    ctx: ExecContext,
    name: String,
    done: bool,
}

impl DeallocateExec {
    #[must_use]
    pub const fn new(ctx: ExecContext, name: String) -> Self {
        Self {
            ctx,
            name,
            done: false,
        }
    }
}

impl Executor for DeallocateExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        if self.done {
            return Ok(None);
        }
        self.done = true;
        if !self.ctx.prepared_mut()?.remove_statement(&self.name) {
            return Err(DatabaseError::PreparedStatementNotFound(self.name.clone()));
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn mutates_data(&self) -> bool {
        false
    }
}
