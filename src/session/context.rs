use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::DatabaseError;
use crate::storage::MemStore;
use super::prepared::PreparedCache;
use super::variables::SessionVars;

/// Shared cancellation flag for a session.
///
/// Cloning shares the flag. Builders and executors check it and fail with
/// `DatabaseError::Cancelled`; the statement adapter never polls it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Clears the flag so the session can run the next statement.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), DatabaseError> {
        if self.is_cancelled() {
            return Err(DatabaseError::Cancelled);
        }
        Ok(())
    }
}

/// Everything a statement needs from its session while executing: the row
/// store, session variables, prepared plans and the cancellation flag.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct ExecContext {
    store: Arc<MemStore>,
    vars: Arc<RwLock<SessionVars>>,
    prepared: Arc<RwLock<PreparedCache>>,
    cancel: CancelToken,
}

impl ExecContext {
    #[must_use]
    pub fn new(store: Arc<MemStore>, vars: SessionVars) -> Self {
        Self {
            store,
            vars: Arc::new(RwLock::new(vars)),
            prepared: Arc::new(RwLock::new(PreparedCache::new())),
            cancel: CancelToken::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<MemStore> {
        &self.store
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn vars(&self) -> Result<RwLockReadGuard<'_, SessionVars>, DatabaseError> {
        self.vars.read().map_err(|_| DatabaseError::LockPoisoned)
    }

    pub fn vars_mut(&self) -> Result<RwLockWriteGuard<'_, SessionVars>, DatabaseError> {
        self.vars.write().map_err(|_| DatabaseError::LockPoisoned)
    }

    pub fn prepared(&self) -> Result<RwLockReadGuard<'_, PreparedCache>, DatabaseError> {
        self.prepared.read().map_err(|_| DatabaseError::LockPoisoned)
    }

    pub fn prepared_mut(&self) -> Result<RwLockWriteGuard<'_, PreparedCache>, DatabaseError> {
        self.prepared.write().map_err(|_| DatabaseError::LockPoisoned)
    }

    /// Pinned snapshot timestamp of the session, 0 if none.
    pub fn snapshot_ts(&self) -> Result<u64, DatabaseError> {
        Ok(self.vars()?.snapshot_ts())
    }

    /// Resolves an optional database qualifier against the current database.
    pub fn resolve_db(&self, db: Option<&str>) -> Result<String, DatabaseError> {
        match db {
            Some(db) => Ok(db.to_string()),
            None => self
                .vars()?
                .current_db()
                .map(str::to_string)
                .ok_or(DatabaseError::NoDatabaseSelected),
        }
    }
}
