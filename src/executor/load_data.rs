use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{DatabaseError, Row, TableInfo, Value};
use crate::session::CancelToken;
use crate::storage::MemStore;
use super::Executor;
use super::insert::assemble_row;

/// LOAD DATA: reads a delimited text file into a table, one row per line.
///
/// Fields are parsed with the declared type of their column; `\N` is NULL.
/// Each line must carry one field per target column. Blank lines are skipped.
#[derive(Debug)]
pub struct LoadDataExec {
    store: Arc<MemStore>,
    cancel: CancelToken,
    info: TableInfo,
    path: PathBuf,
    offsets: Vec<usize>,
    field_terminator: String,
    ignore_lines: usize,
    done: bool,
    affected: usize,
}

impl LoadDataExec {
    pub fn new(
        store: Arc<MemStore>,
        cancel: CancelToken,
        info: TableInfo,
        path: PathBuf,
        columns: &[String],
        field_terminator: String,
        ignore_lines: usize,
    ) -> Result<Self, DatabaseError> {
        let offsets = info.column_offsets(columns)?;
        let field_terminator = if field_terminator.is_empty() {
            "\t".to_string()
        } else {
            field_terminator
        };
        Ok(Self {
            store,
            cancel,
            info,
            path,
            offsets,
            field_terminator,
            ignore_lines,
            done: false,
            affected: 0,
        })
    }

    fn parse_line(&self, line: &str) -> Result<Vec<Value>, DatabaseError> {
        let fields: Vec<&str> = line.split(self.field_terminator.as_str()).collect();
        if fields.len() != self.offsets.len() {
            return Err(DatabaseError::ColumnCountMismatch {
                expected: self.offsets.len(),
                actual: fields.len(),
            });
        }
        let values = fields
            .into_iter()
            .zip(&self.offsets)
            .map(|(field, &idx)| {
                let col = &self.info.columns[idx];
                Value::parse_as(field, &col.field_type, &col.name)
            })
            .collect::<Result<Vec<_>, _>>()?;
        assemble_row(&self.info, &self.offsets, values)
    }
}

impl Executor for LoadDataExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        let content = std::fs::read_to_string(&self.path)?;
        for line in content.lines().skip(self.ignore_lines) {
            self.cancel.check()?;
            if line.trim().is_empty() {
                continue;
            }
            let row = self.parse_line(line)?;
            self.store.insert(&self.info.db_name, &self.info.name, row)?;
            self.affected += 1;
        }
        tracing::info!(table = %self.info.name, path = %self.path.display(), rows = self.affected, "load data finished");
        Ok(None)
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::fixture::{Fixture, drain, row};
    use crate::plan::Plan;
    use std::io::Write;

    fn load_plan(path: PathBuf, terminator: &str, ignore_lines: usize) -> Plan {
        Plan::LoadData {
            db: None,
            table: "t".to_string(),
            path,
            columns: Vec::new(),
            field_terminator: terminator.to_string(),
            ignore_lines,
        }
    }

    #[test]
    fn test_load_tab_separated() {
        let fx = Fixture::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id\tname").unwrap();
        writeln!(file, "10\tx").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "11\t\\N").unwrap();
        file.flush().unwrap();

        let mut exec = fx.build(&load_plan(file.path().to_path_buf(), "", 1)).unwrap();
        assert!(!exec.has_output_columns());
        drain(exec.as_mut()).unwrap();

        let rows = fx.rows("t");
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[3], row(10, "x"));
        assert_eq!(rows[4], vec![Value::Integer(11), Value::Null]);
    }

    #[test]
    fn test_load_custom_terminator_and_columns() {
        let fx = Fixture::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "q,20").unwrap();
        file.flush().unwrap();

        let plan = Plan::LoadData {
            db: None,
            table: "t".to_string(),
            path: file.path().to_path_buf(),
            columns: vec!["name".to_string(), "id".to_string()],
            field_terminator: ",".to_string(),
            ignore_lines: 0,
        };
        let mut exec = fx.build(&plan).unwrap();
        drain(exec.as_mut()).unwrap();
        assert_eq!(fx.rows("t").last(), Some(&row(20, "q")));
    }

    #[test]
    fn test_load_bad_field_reports_column() {
        let fx = Fixture::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "abc\tx").unwrap();
        file.flush().unwrap();

        let mut exec = fx.build(&load_plan(file.path().to_path_buf(), "\t", 0)).unwrap();
        match exec.next() {
            Err(DatabaseError::InvalidValue { column, .. }) => assert_eq!(column, "id"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        exec.close().unwrap();
    }

    #[test]
    fn test_load_rejects_wrong_field_count() {
        let fx = Fixture::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "12\ty\textra").unwrap();
        file.flush().unwrap();

        let mut exec = fx.build(&load_plan(file.path().to_path_buf(), "\t", 0)).unwrap();
        assert!(matches!(
            exec.next(),
            Err(DatabaseError::ColumnCountMismatch { expected: 2, actual: 3 })
        ));
        exec.close().unwrap();
        assert_eq!(fx.rows("t").len(), 3);

        let mut short = tempfile::NamedTempFile::new().unwrap();
        writeln!(short, "13").unwrap();
        short.flush().unwrap();
        let mut exec = fx.build(&load_plan(short.path().to_path_buf(), "\t", 0)).unwrap();
        assert!(matches!(
            exec.next(),
            Err(DatabaseError::ColumnCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let fx = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let mut exec = fx.build(&load_plan(dir.path().join("absent.tsv"), "", 0)).unwrap();
        assert!(matches!(exec.next(), Err(DatabaseError::Io(_))));
    }
}
