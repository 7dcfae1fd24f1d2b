use super::value::Value;

/// A row as produced by an executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
    /// Storage handle of the row this was read from; executor bookkeeping
    /// used by UPDATE/DELETE, never shown to clients.
    pub handle: Option<u64>,
}

impl Row {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            handle: None,
        }
    }

    #[must_use]
    pub const fn with_handle(values: Vec<Value>, handle: u64) -> Self {
        Self {
            values,
            handle: Some(handle),
        }
    }
}

/// A row handed to the client: only the values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub data: Vec<Value>,
}

impl From<Row> for ResultRow {
    fn from(row: Row) -> Self {
        Self { data: row.values }
    }
}
