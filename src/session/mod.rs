// Session module - per-connection state consulted while executing statements
//
// Structure:
// - variables: session variables (current database, pinned snapshot)
// - prepared: prepared plan cache
// - context: shared execution context and cancellation flag

mod context;
mod prepared;
mod variables;

pub use context::{CancelToken, ExecContext};
pub use prepared::{PreparedCache, PreparedPlan};
pub use variables::{DATABASE, SNAPSHOT_TS, SessionVars};

use std::sync::Arc;

use crate::adapter::{RecordSet, Statement};
use crate::config::SessionConfig;
use crate::core::StatementError;
use crate::plan::Plan;
use crate::storage::MemStore;

/// A client session bound to a store.
///
/// Compiles plans against the catalog as it is at compile time and runs
/// them through the statement adapter.
#[derive(Debug, Clone)]
pub struct Session {
    ctx: ExecContext,
}

impl Session {
    #[must_use]
    pub fn new(store: Arc<MemStore>, vars: SessionVars) -> Self {
        Self {
            ctx: ExecContext::new(store, vars),
        }
    }

    #[must_use]
    pub fn with_config(store: Arc<MemStore>, config: &SessionConfig) -> Self {
        let mut vars = SessionVars::new(config.default_db.clone());
        vars.set_snapshot_ts(config.snapshot_ts);
        Self::new(store, vars)
    }

    #[must_use]
    pub const fn context(&self) -> &ExecContext {
        &self.ctx
    }

    /// Snapshots the catalog and wraps `plan` into a runnable statement.
    pub fn compile(&self, plan: Plan, text: &str) -> Result<Statement, StatementError> {
        let info_schema = self
            .ctx
            .store()
            .info_schema()
            .map_err(|source| StatementError::Build {
                text: text.to_string(),
                source,
            })?;
        let is_ddl = plan.is_ddl();
        Ok(Statement::new(Arc::new(info_schema), plan, text, is_ddl))
    }

    /// Compiles and runs a plan. Returns a record set for queries and `None`
    /// for everything else.
    pub fn execute(&self, plan: Plan, text: &str) -> Result<Option<RecordSet>, StatementError> {
        self.ctx.cancel_token().reset();
        self.compile(plan, text)?.exec(&self.ctx)
    }

    /// Requests cancellation of the statement currently running.
    pub fn cancel(&self) {
        self.ctx.cancel_token().cancel();
    }
}
