use std::cell::OnceCell;

use crate::core::{ResultField, ResultRow, Schema, StatementError};
use crate::executor::Executor;

/// Client-facing cursor over a read executor.
///
/// The record set owns its executor. Callers must `close` it once they are
/// done, including when they stop early; dropping an unclosed record set
/// closes the executor as a last resort.
#[derive(Debug)]
pub struct RecordSet {
    fields: OnceCell<Vec<ResultField>>,
    executor: Box<dyn Executor>,
    schema: Schema,
    text: String,
    exhausted: bool,
    closed: bool,
}

impl RecordSet {
    pub(crate) fn new(
        executor: Box<dyn Executor>,
        fields: Vec<ResultField>,
        schema: Schema,
        text: String,
    ) -> Self {
        let fields = if fields.is_empty() {
            OnceCell::new()
        } else {
            OnceCell::from(fields)
        };
        Self {
            fields,
            executor,
            schema,
            text,
            exhausted: false,
            closed: false,
        }
    }

    /// Result field descriptors, one per schema column.
    ///
    /// Derived from the schema on first use when the executor supplied none;
    /// later calls return the same list.
    pub fn fields(&self) -> Result<&[ResultField], StatementError> {
        Ok(self
            .fields
            .get_or_init(|| self.schema.iter().map(ResultField::from).collect()))
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Next row, or `None` at the end of the stream. Once the stream has
    /// ended, failed, or been closed, keeps returning `None`.
    pub fn next(&mut self) -> Result<Option<ResultRow>, StatementError> {
        if self.exhausted || self.closed {
            return Ok(None);
        }
        match self.executor.next() {
            Ok(Some(row)) => Ok(Some(row.into())),
            Ok(None) => {
                self.exhausted = true;
                Ok(None)
            }
            Err(source) => {
                self.exhausted = true;
                Err(StatementError::Execution {
                    text: self.text.clone(),
                    source,
                })
            }
        }
    }

    /// Reads all remaining rows.
    pub fn rows(&mut self) -> Result<Vec<ResultRow>, StatementError> {
        let mut rows = Vec::new();
        while let Some(row) = self.next()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Releases the executor. Calling it again is a no-op.
    pub fn close(&mut self) -> Result<(), StatementError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.executor.close().map_err(|source| StatementError::Execution {
            text: self.text.clone(),
            source,
        })
    }
}

impl Drop for RecordSet {
    fn drop(&mut self) {
        if !self.closed {
            tracing::debug!(sql = %self.text, "record set dropped without close");
            if let Err(err) = self.executor.close() {
                tracing::warn!(sql = %self.text, error = %err, "failed to close executor");
            }
        }
    }
}
