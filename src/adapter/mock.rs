//! Instrumented executors for adapter tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{DataType, DatabaseError, ResultField, Row, Schema, SchemaColumn, Value};
use crate::executor::{Build, Executor};
use crate::plan::Plan;

/// Counts calls made on a `MockExec`, shared with the test.
#[derive(Debug, Default)]
pub struct Probe {
    nexts: AtomicUsize,
    closes: AtomicUsize,
}

impl Probe {
    pub fn nexts(&self) -> usize {
        self.nexts.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MockExec {
    pub probe: Arc<Probe>,
    pub rows: VecDeque<Row>,
    /// Fail on the n-th call to `next` (1-based).
    pub fail_at: Option<usize>,
    pub fail_close: bool,
    pub panic_on_next: bool,
    pub fields: Vec<ResultField>,
    pub schema: Schema,
    pub mutates: bool,
}

impl MockExec {
    /// A write executor that "affects" `rows` rows while being drained.
    pub fn writer(probe: &Arc<Probe>, rows: usize) -> Self {
        Self {
            probe: Arc::clone(probe),
            rows: (0..rows).map(|i| Row::with_handle(vec![], i as u64)).collect(),
            fail_at: None,
            fail_close: false,
            panic_on_next: false,
            fields: Vec::new(),
            schema: Schema::empty(),
            mutates: true,
        }
    }

    /// A reader over `t(id INTEGER, name TEXT)` yielding the given rows.
    pub fn reader(probe: &Arc<Probe>, rows: Vec<(i64, &str)>) -> Self {
        Self {
            probe: Arc::clone(probe),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(h, (id, name))| {
                    Row::with_handle(vec![Value::Integer(id), Value::Text(name.into())], h as u64)
                })
                .collect(),
            fail_at: None,
            fail_close: false,
            panic_on_next: false,
            fields: Vec::new(),
            schema: Schema::new(vec![
                SchemaColumn::new("id", "t", "test", DataType::Integer),
                SchemaColumn::new("name", "t", "test", DataType::Text),
            ]),
            mutates: false,
        }
    }
}

impl Executor for MockExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        let n = self.probe.nexts.fetch_add(1, Ordering::SeqCst) + 1;
        assert!(!self.panic_on_next, "executor blew up");
        if self.fail_at == Some(n) {
            return Err(DatabaseError::TypeMismatch("injected".to_string()));
        }
        Ok(self.rows.pop_front())
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(DatabaseError::LockPoisoned);
        }
        Ok(())
    }

    fn fields(&self) -> &[ResultField] {
        &self.fields
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn mutates_data(&self) -> bool {
        self.mutates
    }
}

/// Builder returning whatever the closure produces.
pub struct FnBuilder<F>(F);

impl<F> FnBuilder<F>
where
    F: Fn(&Plan) -> Result<Box<dyn Executor>, DatabaseError>,
{
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Build for FnBuilder<F>
where
    F: Fn(&Plan) -> Result<Box<dyn Executor>, DatabaseError>,
{
    fn build(&self, plan: &Plan) -> Result<Box<dyn Executor>, DatabaseError> {
        (self.0)(plan)
    }
}
