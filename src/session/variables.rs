use std::collections::BTreeMap;

use crate::core::{DatabaseError, Value};

/// Name of the variable pinning reads to a historical snapshot.
pub const SNAPSHOT_TS: &str = "snapshot_ts";
/// Name of the variable holding the current database.
pub const DATABASE: &str = "database";

/// Session variables consulted while executing a statement.
///
/// A non-zero `snapshot_ts` pins reads to a historical point in time; while
/// it is set, statements that mutate data are refused.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionVars {
    current_db: Option<String>,
    snapshot_ts: u64,
    /// User variables (`@name`)
    user_vars: BTreeMap<String, Value>,
}

impl SessionVars {
    #[must_use]
    pub fn new(current_db: Option<String>) -> Self {
        Self {
            current_db,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn current_db(&self) -> Option<&str> {
        self.current_db.as_deref()
    }

    pub fn set_current_db(&mut self, db: impl Into<String>) {
        self.current_db = Some(db.into());
    }

    /// Pinned snapshot timestamp, 0 when reads follow the latest data.
    #[must_use]
    pub const fn snapshot_ts(&self) -> u64 {
        self.snapshot_ts
    }

    pub const fn set_snapshot_ts(&mut self, ts: u64) {
        self.snapshot_ts = ts;
    }

    /// Assigns a variable from a `SET` statement.
    ///
    /// `snapshot_ts` accepts a non-negative integer; NULL or an empty string
    /// clears it. Names starting with `@` are free-form user variables.
    pub fn set_var(&mut self, name: &str, value: Value) -> Result<(), DatabaseError> {
        let lname = name.to_lowercase();
        if lname.starts_with('@') {
            self.user_vars.insert(lname, value);
            return Ok(());
        }
        match lname.as_str() {
            SNAPSHOT_TS => {
                self.snapshot_ts = Self::parse_ts(&value).ok_or_else(|| DatabaseError::InvalidValue {
                    column: SNAPSHOT_TS.to_string(),
                    reason: format!("'{value}' is not a valid timestamp"),
                })?;
                Ok(())
            }
            DATABASE => match value {
                Value::Text(db) if !db.is_empty() => {
                    self.current_db = Some(db);
                    Ok(())
                }
                other => Err(DatabaseError::InvalidValue {
                    column: DATABASE.to_string(),
                    reason: format!("'{other}' is not a database name"),
                }),
            },
            _ => Err(DatabaseError::UnknownVariable(name.to_string())),
        }
    }

    pub fn get_var(&self, name: &str) -> Result<Value, DatabaseError> {
        let lname = name.to_lowercase();
        if lname.starts_with('@') {
            return Ok(self.user_vars.get(&lname).cloned().unwrap_or(Value::Null));
        }
        match lname.as_str() {
            SNAPSHOT_TS => Ok(Value::Integer(i64::try_from(self.snapshot_ts).unwrap_or(i64::MAX))),
            DATABASE => Ok(self
                .current_db
                .clone()
                .map_or(Value::Null, Value::Text)),
            _ => Err(DatabaseError::UnknownVariable(name.to_string())),
        }
    }

    fn parse_ts(value: &Value) -> Option<u64> {
        match value {
            Value::Null => Some(0),
            Value::Text(s) if s.trim().is_empty() => Some(0),
            Value::Text(s) => s.trim().parse().ok(),
            other => other.as_int().and_then(|i| u64::try_from(i).ok()),
        }
    }
}
