//! Statement execution adapter: runs a compiled plan and hands the caller
//! either a record set (reads) or nothing (writes, DDL, session commands).

mod record_set;
mod statement;

pub use record_set::RecordSet;
pub use statement::Statement;

#[cfg(test)]
mod mock;
