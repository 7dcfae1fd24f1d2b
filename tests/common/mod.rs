// Shared setup for integration tests
#![allow(dead_code)]

use postgrust_adapter::core::TableInfo;
use postgrust_adapter::{ColumnInfo, DataType, MemStore, Session, SessionVars, Value};
use std::sync::Arc;

/// Session on database `test` with table `t(id INTEGER NOT NULL, name TEXT,
/// x INTEGER)` holding ids 1..=n.
pub fn session_with_rows(n: i64) -> Session {
    let store = Arc::new(MemStore::new());
    store.create_database("test", false).unwrap();
    store
        .create_table(
            TableInfo::new(
                "test",
                "t",
                vec![
                    ColumnInfo::new("id", DataType::Integer).not_null(),
                    ColumnInfo::new("name", DataType::Text),
                    ColumnInfo::new("x", DataType::Integer),
                ],
            ),
            false,
        )
        .unwrap();
    for id in 1..=n {
        store
            .insert(
                "test",
                "t",
                vec![Value::Integer(id), Value::Text(format!("user{id}")), Value::Integer(0)],
            )
            .unwrap();
    }
    Session::new(store, SessionVars::new(Some("test".to_string())))
}

/// Stored rows of `test.t`.
pub fn stored_rows(session: &Session) -> Vec<Vec<Value>> {
    session
        .context()
        .store()
        .scan("test", "t")
        .unwrap()
        .into_iter()
        .map(|r| r.values)
        .collect()
}
