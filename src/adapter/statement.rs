use std::sync::Arc;

use crate::core::{DatabaseError, InfoSchema, Row, StatementError};
use crate::executor::{Build, Executor, ExecutorBuilder};
use crate::plan::Plan;
use crate::session::ExecContext;
use super::record_set::RecordSet;

/// A compiled statement, ready to run once.
#[derive(Debug, Clone)]
pub struct Statement {
    info_schema: Arc<InfoSchema>,
    plan: Plan,
    text: String,
    is_ddl: bool,
}

impl Statement {
    #[must_use]
    pub fn new(info_schema: Arc<InfoSchema>, plan: Plan, text: impl Into<String>, is_ddl: bool) -> Self {
        Self {
            info_schema,
            plan,
            text: text.into(),
            is_ddl,
        }
    }

    #[must_use]
    pub fn origin_text(&self) -> &str {
        &self.text
    }

    /// Replaces the text shown in logs and errors.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    #[must_use]
    pub const fn is_ddl(&self) -> bool {
        self.is_ddl
    }

    #[must_use]
    pub const fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Runs the statement.
    ///
    /// Statements with output columns return a record set that the caller
    /// must close. All other statements run to completion here and return
    /// `None`; they are refused with `SnapshotConflict` if they would change
    /// data while the session pins a historical snapshot.
    pub fn exec(self, ctx: &ExecContext) -> Result<Option<RecordSet>, StatementError> {
        let info_schema = Arc::clone(&self.info_schema);
        let builder = ExecutorBuilder::new(ctx, &info_schema);
        self.exec_with(ctx, &builder)
    }

    /// Like `exec`, with an explicit executor builder.
    pub fn exec_with(self, ctx: &ExecContext, builder: &dyn Build) -> Result<Option<RecordSet>, StatementError> {
        let Self { plan, text, is_ddl, .. } = self;
        tracing::debug!(sql = %text, ddl = is_ddl, "executing statement");

        let mut exec = builder
            .build(&plan)
            .map_err(|source| StatementError::Build {
                text: text.clone(),
                source,
            })?;

        if let Some(inner) = exec.build_deferred() {
            exec = inner.map_err(|source| StatementError::WrapperBuild {
                text: text.clone(),
                source,
            })?;
        }

        if !exec.has_output_columns() {
            return Self::run_to_completion(exec, ctx, &text).map(|()| None);
        }

        let mut fields = exec.fields().to_vec();
        for field in &mut fields {
            if field.column_as_name.is_empty() {
                field.column_as_name.clone_from(&field.column.name);
            }
        }
        let schema = exec.schema().clone();
        Ok(Some(RecordSet::new(exec, fields, schema, text)))
    }

    fn run_to_completion(
        exec: Box<dyn Executor>,
        ctx: &ExecContext,
        text: &str,
    ) -> Result<(), StatementError> {
        let execution = |source| StatementError::Execution {
            text: text.to_string(),
            source,
        };

        if exec.mutates_data() {
            let snapshot_ts = ctx.snapshot_ts().map_err(execution)?;
            if snapshot_ts != 0 {
                tracing::debug!(sql = %text, snapshot_ts, "refusing write under pinned snapshot");
                return Err(StatementError::SnapshotConflict { snapshot_ts });
            }
        }

        let mut guard = CloseGuard::new(exec);
        let mut drained = 0_usize;
        while guard.next().map_err(execution)?.is_some() {
            drained += 1;
        }
        tracing::debug!(sql = %text, drained, "statement finished");
        guard.close().map_err(execution)
    }
}

/// Closes the executor exactly once: explicitly via `close`, or on drop when
/// draining bailed out early.
struct CloseGuard {
    exec: Option<Box<dyn Executor>>,
}

impl CloseGuard {
    const fn new(exec: Box<dyn Executor>) -> Self {
        Self { exec: Some(exec) }
    }

    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        match self.exec.as_mut() {
            Some(exec) => exec.next(),
            None => Ok(None),
        }
    }

    fn close(mut self) -> Result<(), DatabaseError> {
        match self.exec.take() {
            Some(mut exec) => exec.close(),
            None => Ok(()),
        }
    }
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        if let Some(mut exec) = self.exec.take() {
            if let Err(err) = exec.close() {
                tracing::warn!(error = %err, "failed to close executor");
            }
        }
    }
}
