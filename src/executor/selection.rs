use crate::core::{DatabaseError, ResultField, Row, Schema};
use crate::plan::Expr;
use super::Executor;

/// Passes through the rows of its source that satisfy a predicate.
#[derive(Debug)]
pub struct SelectionExec {
    source: Box<dyn Executor>,
    predicate: Expr,
}

impl SelectionExec {
    #[must_use]
    pub fn new(source: Box<dyn Executor>, predicate: Expr) -> Self {
        Self { source, predicate }
    }
}

impl Executor for SelectionExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        while let Some(row) = self.source.next()? {
            if self.predicate.matches(&row.values)? {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        self.source.close()
    }

    fn fields(&self) -> &[ResultField] {
        self.source.fields()
    }

    fn schema(&self) -> &Schema {
        self.source.schema()
    }
}
