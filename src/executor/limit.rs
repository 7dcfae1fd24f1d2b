use crate::core::{DatabaseError, ResultField, Row, Schema};
use super::Executor;

/// Skips `offset` rows of its source, then yields at most `count`.
#[derive(Debug)]
pub struct LimitExec {
    source: Box<dyn Executor>,
    offset: usize,
    count: Option<usize>,
    skipped: usize,
    emitted: usize,
}

impl LimitExec {
    #[must_use]
    pub fn new(source: Box<dyn Executor>, offset: usize, count: Option<usize>) -> Self {
        Self {
            source,
            offset,
            count,
            skipped: 0,
            emitted: 0,
        }
    }
}

impl Executor for LimitExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        if self.count.is_some_and(|c| self.emitted >= c) {
            return Ok(None);
        }
        while self.skipped < self.offset {
            if self.source.next()?.is_none() {
                return Ok(None);
            }
            self.skipped += 1;
        }
        let row = self.source.next()?;
        if row.is_some() {
            self.emitted += 1;
        }
        Ok(row)
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
