use thiserror::Error;

/// Errors raised by the collaborators of the adapter: catalog lookups,
/// executor construction, storage access and expression evaluation.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Table '{0}' not found")]
    TableNotFound(String),
    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    #[error("Column count mismatch: expected {expected}, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    #[error("Database '{0}' not found")]
    DatabaseNotFound(String),
    #[error("Database '{0}' already exists")]
    DatabaseAlreadyExists(String),
    #[error("No database selected")]
    NoDatabaseSelected,
    #[error("Prepared statement '{0}' not found")]
    PreparedStatementNotFound(String),
    #[error("Prepared statement '{name}' expects {expected} parameters, got {actual}")]
    ParamCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("Parameter ${0} is not bound")]
    UnboundParam(usize),
    #[error("Invalid value for column '{column}': {reason}")]
    InvalidValue { column: String, reason: String },
    #[error("Unknown system variable '{0}'")]
    UnknownVariable(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Query execution was cancelled")]
    Cancelled,
    #[error("Shared state lock poisoned")]
    LockPoisoned,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Errors surfaced by `Statement::exec` and `RecordSet`.
///
/// Each kind wraps the underlying `DatabaseError` unchanged and adds the
/// statement text as call-site context. `SnapshotConflict` has no source:
/// it is raised by the adapter itself, before anything runs.
#[derive(Error, Debug)]
pub enum StatementError {
    #[error("failed to build executor for '{text}': {source}")]
    Build {
        text: String,
        #[source]
        source: DatabaseError,
    },
    #[error("failed to build prepared statement for '{text}': {source}")]
    WrapperBuild {
        text: String,
        #[source]
        source: DatabaseError,
    },
    #[error(
        "cannot execute a mutating statement while a fixed historical snapshot is active (snapshot_ts = {snapshot_ts})"
    )]
    SnapshotConflict { snapshot_ts: u64 },
    #[error("execution of '{text}' failed: {source}")]
    Execution {
        text: String,
        #[source]
        source: DatabaseError,
    },
}

impl StatementError {
    /// The collaborator error underneath, if this kind carries one.
    #[must_use]
    pub const fn database_error(&self) -> Option<&DatabaseError> {
        match self {
            Self::Build { source, .. }
            | Self::WrapperBuild { source, .. }
            | Self::Execution { source, .. } => Some(source),
            Self::SnapshotConflict { .. } => None,
        }
    }
}
