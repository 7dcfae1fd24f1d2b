//! Compiled query plans, as handed over by the planner.
//!
//! Names are already resolved: expressions refer to input columns by
//! position, and a missing `db` means the session's current database.

mod expression;

pub use expression::Expr;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::{ColumnInfo, DatabaseError, Value};

/// One output column of a projection. An empty alias means the client sees
/// the underlying column name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionExpr {
    pub expr: Expr,
    #[serde(default)]
    pub alias: String,
}

impl ProjectionExpr {
    #[must_use]
    pub const fn column(index: usize) -> Self {
        Self {
            expr: Expr::Column(index),
            alias: String::new(),
        }
    }

    #[must_use]
    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }
}

/// `SET column = expr` in an UPDATE. The expression sees the full table row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub expr: Expr,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Plan {
    // Reads
    TableScan {
        db: Option<String>,
        table: String,
        alias: Option<String>,
    },
    Selection {
        source: Box<Plan>,
        predicate: Expr,
    },
    Projection {
        source: Box<Plan>,
        exprs: Vec<ProjectionExpr>,
    },
    Limit {
        source: Box<Plan>,
        offset: usize,
        count: Option<usize>,
    },
    // Writes
    Insert {
        db: Option<String>,
        table: String,
        columns: Vec<String>,
        rows: Vec<Vec<Expr>>,
    },
    Replace {
        db: Option<String>,
        table: String,
        columns: Vec<String>,
        rows: Vec<Vec<Expr>>,
    },
    Update {
        db: Option<String>,
        table: String,
        /// Rows to update, read from the target table itself.
        source: Box<Plan>,
        assignments: Vec<Assignment>,
    },
    Delete {
        db: Option<String>,
        table: String,
        source: Box<Plan>,
    },
    LoadData {
        db: Option<String>,
        table: String,
        path: PathBuf,
        columns: Vec<String>,
        field_terminator: String,
        ignore_lines: usize,
    },
    // DDL
    CreateDatabase {
        name: String,
        if_not_exists: bool,
    },
    CreateTable {
        db: Option<String>,
        table: String,
        columns: Vec<ColumnInfo>,
        if_not_exists: bool,
    },
    DropTable {
        db: Option<String>,
        table: String,
        if_exists: bool,
    },
    // Session
    Set {
        variable: String,
        value: Value,
    },
    Prepare {
        name: String,
        plan: Box<Plan>,
    },
    Execute {
        name: String,
        params: Vec<Expr>,
    },
    Deallocate {
        name: String,
    },
}

fn max_param_of<'a>(exprs: impl Iterator<Item = &'a Expr>) -> usize {
    exprs.map(Expr::max_param).max().unwrap_or(0)
}

impl Plan {
    #[must_use]
    pub const fn is_ddl(&self) -> bool {
        matches!(
            self,
            Self::CreateDatabase { .. } | Self::CreateTable { .. } | Self::DropTable { .. }
        )
    }

    /// Number of `$n` parameters the plan expects.
    #[must_use]
    pub fn param_count(&self) -> usize {
        match self {
            Self::Selection { source, predicate } => source.param_count().max(predicate.max_param()),
            Self::Projection { source, exprs } => {
                source.param_count().max(max_param_of(exprs.iter().map(|p| &p.expr)))
            }
            Self::Limit { source, .. } | Self::Delete { source, .. } => source.param_count(),
            Self::Insert { rows, .. } | Self::Replace { rows, .. } => {
                max_param_of(rows.iter().flatten())
            }
            Self::Update { source, assignments, .. } => source
                .param_count()
                .max(max_param_of(assignments.iter().map(|a| &a.expr))),
            Self::Execute { params, .. } => max_param_of(params.iter()),
            _ => 0,
        }
    }

    /// Substitutes parameter values throughout the plan.
    pub fn bind_params(&self, params: &[Value]) -> Result<Self, DatabaseError> {
        let bind_box = |p: &Self| p.bind_params(params).map(Box::new);
        let bind_rows = |rows: &[Vec<Expr>]| {
            rows.iter()
                .map(|row| row.iter().map(|e| e.bind_params(params)).collect())
                .collect::<Result<Vec<Vec<Expr>>, DatabaseError>>()
        };
        Ok(match self {
            Self::Selection { source, predicate } => Self::Selection {
                source: bind_box(source)?,
                predicate: predicate.bind_params(params)?,
            },
            Self::Projection { source, exprs } => Self::Projection {
                source: bind_box(source)?,
                exprs: exprs
                    .iter()
                    .map(|p| {
                        Ok(ProjectionExpr {
                            expr: p.expr.bind_params(params)?,
                            alias: p.alias.clone(),
                        })
                    })
                    .collect::<Result<_, DatabaseError>>()?,
            },
            Self::Limit { source, offset, count } => Self::Limit {
                source: bind_box(source)?,
                offset: *offset,
                count: *count,
            },
            Self::Insert { db, table, columns, rows } => Self::Insert {
                db: db.clone(),
                table: table.clone(),
                columns: columns.clone(),
                rows: bind_rows(rows)?,
            },
            Self::Replace { db, table, columns, rows } => Self::Replace {
                db: db.clone(),
                table: table.clone(),
                columns: columns.clone(),
                rows: bind_rows(rows)?,
            },
            Self::Update { db, table, source, assignments } => Self::Update {
                db: db.clone(),
                table: table.clone(),
                source: bind_box(source)?,
                assignments: assignments
                    .iter()
                    .map(|a| {
                        Ok(Assignment {
                            column: a.column.clone(),
                            expr: a.expr.bind_params(params)?,
                        })
                    })
                    .collect::<Result<_, DatabaseError>>()?,
            },
            Self::Delete { db, table, source } => Self::Delete {
                db: db.clone(),
                table: table.clone(),
                source: bind_box(source)?,
            },
            other => other.clone(),
        })
    }

    /// Scan of a table in the current database.
    #[must_use]
    pub fn scan(table: &str) -> Self {
        Self::TableScan {
            db: None,
            table: table.to_string(),
            alias: None,
        }
    }

    #[must_use]
    pub fn filter(self, predicate: Expr) -> Self {
        Self::Selection {
            source: Box::new(self),
            predicate,
        }
    }

    #[must_use]
    pub fn project(self, exprs: Vec<ProjectionExpr>) -> Self {
        Self::Projection {
            source: Box::new(self),
            exprs,
        }
    }
}
