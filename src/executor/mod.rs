/// Executor module - runnable counterparts of plan nodes
///
/// Executors follow the iterator model: `next` yields one row at a time
/// and returns `None` once exhausted. Read executors describe their output
/// through `schema` (and optionally `fields`); write executors have neither
/// and do all their work while being drained.
///
/// Structure:
/// - builder: compiles a `Plan` into an executor tree
/// - scan, selection, projection, limit: reads
/// - insert, update, delete, load_data: data mutations
/// - ddl: CREATE/DROP
/// - session: SET, PREPARE, DEALLOCATE
/// - execute: EXECUTE of a prepared plan (deferred build)

pub mod builder;
pub mod scan;
pub mod selection;
pub mod projection;
pub mod limit;
pub mod insert;
pub mod update;
pub mod delete;
pub mod load_data;
pub mod ddl;
pub mod session;
pub mod execute;

#[cfg(test)]
mod fixture;

pub use builder::{Build, ExecutorBuilder};
pub use scan::TableScanExec;
pub use selection::SelectionExec;
pub use projection::ProjectionExec;
pub use limit::LimitExec;
pub use insert::InsertExec;
pub use update::UpdateExec;
pub use delete::DeleteExec;
pub use load_data::LoadDataExec;
pub use ddl::{DdlExec, DdlOp};
pub use session::{DeallocateExec, PrepareExec, SetExec};
pub use execute::ExecuteExec;

use crate::core::{DatabaseError, ResultField, Row, Schema};

static EMPTY_SCHEMA: Schema = Schema::empty();

pub trait Executor: std::fmt::Debug {
    /// Yields the next row, or `None` when exhausted.
    fn next(&mut self) -> Result<Option<Row>, DatabaseError>;

    /// Releases resources held by the executor and its children.
    fn close(&mut self) -> Result<(), DatabaseError>;

    /// Result fields prepared by the planner, if any. Executors that only
    /// know their schema return nothing and let the record set derive fields.
    fn fields(&self) -> &[ResultField] {
        &[]
    }

    /// Output columns; empty for executors that produce no rows.
    fn schema(&self) -> &Schema {
        &EMPTY_SCHEMA
    }

    /// Whether the executor produces a result set.
    fn has_output_columns(&self) -> bool {
        !self.fields().is_empty() || !self.schema().is_empty()
    }

    /// Whether running the executor changes stored data. Only meaningful for
    /// executors without output columns; session-level statements such as
    /// SET are write-only but do not mutate data.
    fn mutates_data(&self) -> bool {
        true
    }

    /// Executors that defer building their real work (EXECUTE) build it here
    /// and hand back the inner statement executor. Others return `None`.
    fn build_deferred(&mut self) -> Option<Result<Box<dyn Executor>, DatabaseError>> {
        None
    }
}
