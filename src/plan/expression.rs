use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::core::{DataType, DatabaseError, Schema, Value};

/// Scalar expression evaluated against one row.
///
/// Column references are positional: the planner has already resolved names
/// against the input schema. Parameters are numbered from 1 (`$1`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Expr {
    Column(usize),
    Constant(Value),
    Param(usize),
    Equal(Box<Expr>, Box<Expr>),
    NotEqual(Box<Expr>, Box<Expr>),
    GreaterThan(Box<Expr>, Box<Expr>),
    LessThan(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    IsNull(Box<Expr>),
}

impl Expr {
    pub fn evaluate(&self, row: &[Value]) -> Result<Value, DatabaseError> {
        Ok(match self {
            Self::Column(i) => row
                .get(*i)
                .cloned()
                .ok_or_else(|| DatabaseError::ColumnNotFound(format!("#{i}")))?,
            Self::Constant(v) => v.clone(),
            Self::Param(n) => return Err(DatabaseError::UnboundParam(*n)),
            Self::Equal(l, r) => Self::compare(l, r, row, Ordering::is_eq)?,
            Self::NotEqual(l, r) => Self::compare(l, r, row, Ordering::is_ne)?,
            Self::GreaterThan(l, r) => Self::compare(l, r, row, Ordering::is_gt)?,
            Self::LessThan(l, r) => Self::compare(l, r, row, Ordering::is_lt)?,
            Self::And(l, r) => match (Self::truth(l, row)?, Self::truth(r, row)?) {
                (Some(false), _) | (_, Some(false)) => Value::Boolean(false),
                (Some(true), Some(true)) => Value::Boolean(true),
                _ => Value::Null,
            },
            Self::Or(l, r) => match (Self::truth(l, row)?, Self::truth(r, row)?) {
                (Some(true), _) | (_, Some(true)) => Value::Boolean(true),
                (Some(false), Some(false)) => Value::Boolean(false),
                _ => Value::Null,
            },
            Self::Not(e) => Self::truth(e, row)?.map_or(Value::Null, |b| Value::Boolean(!b)),
            Self::IsNull(e) => Value::Boolean(e.evaluate(row)?.is_null()),
        })
    }

    /// Evaluates a predicate; NULL counts as false.
    pub fn matches(&self, row: &[Value]) -> Result<bool, DatabaseError> {
        Ok(Self::truth(self, row)?.unwrap_or(false))
    }

    fn truth(expr: &Self, row: &[Value]) -> Result<Option<bool>, DatabaseError> {
        match expr.evaluate(row)? {
            Value::Null => Ok(None),
            Value::Boolean(b) => Ok(Some(b)),
            other => Err(DatabaseError::TypeMismatch(format!(
                "expected a boolean, got {other}"
            ))),
        }
    }

    fn compare(
        l: &Self,
        r: &Self,
        row: &[Value],
        pred: fn(Ordering) -> bool,
    ) -> Result<Value, DatabaseError> {
        let (lv, rv) = (l.evaluate(row)?, r.evaluate(row)?);
        if lv.is_null() || rv.is_null() {
            return Ok(Value::Null);
        }
        lv.compare(&rv)
            .map(|o| Value::Boolean(pred(o)))
            .ok_or_else(|| DatabaseError::TypeMismatch(format!("cannot compare {lv} with {rv}")))
    }

    /// Replaces `$n` parameters with the given values.
    pub fn bind_params(&self, params: &[Value]) -> Result<Self, DatabaseError> {
        let bind = |e: &Self| e.bind_params(params).map(Box::new);
        Ok(match self {
            Self::Param(n) => Self::Constant(
                n.checked_sub(1)
                    .and_then(|i| params.get(i))
                    .cloned()
                    .ok_or(DatabaseError::UnboundParam(*n))?,
            ),
            Self::Column(_) | Self::Constant(_) => self.clone(),
            Self::Equal(l, r) => Self::Equal(bind(l)?, bind(r)?),
            Self::NotEqual(l, r) => Self::NotEqual(bind(l)?, bind(r)?),
            Self::GreaterThan(l, r) => Self::GreaterThan(bind(l)?, bind(r)?),
            Self::LessThan(l, r) => Self::LessThan(bind(l)?, bind(r)?),
            Self::And(l, r) => Self::And(bind(l)?, bind(r)?),
            Self::Or(l, r) => Self::Or(bind(l)?, bind(r)?),
            Self::Not(e) => Self::Not(bind(e)?),
            Self::IsNull(e) => Self::IsNull(bind(e)?),
        })
    }

    /// Highest parameter number referenced, 0 if none.
    #[must_use]
    pub fn max_param(&self) -> usize {
        match self {
            Self::Param(n) => *n,
            Self::Column(_) | Self::Constant(_) => 0,
            Self::Not(e) | Self::IsNull(e) => e.max_param(),
            Self::Equal(l, r)
            | Self::NotEqual(l, r)
            | Self::GreaterThan(l, r)
            | Self::LessThan(l, r)
            | Self::And(l, r)
            | Self::Or(l, r) => l.max_param().max(r.max_param()),
        }
    }

    /// Declared type of the expression's result against an input schema.
    #[must_use]
    pub fn data_type(&self, input: &Schema) -> DataType {
        match self {
            Self::Column(i) => input
                .columns()
                .get(*i)
                .map_or(DataType::Text, |c| c.ret_type.clone()),
            Self::Constant(v) => match v {
                Value::SmallInt(_) => DataType::SmallInt,
                Value::Integer(_) => DataType::Integer,
                Value::Real(_) => DataType::Real,
                Value::Numeric(d) => DataType::Numeric {
                    precision: 38,
                    scale: u8::try_from(d.scale()).unwrap_or(u8::MAX),
                },
                Value::Boolean(_) => DataType::Boolean,
                Value::Date(_) => DataType::Date,
                Value::Timestamp(_) => DataType::Timestamp,
                Value::Uuid(_) => DataType::Uuid,
                Value::Bytea(_) => DataType::Bytea,
                Value::Null | Value::Text(_) => DataType::Text,
            },
            Self::Param(_) => DataType::Text,
            _ => DataType::Boolean,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(i) => write!(f, "#{i}"),
            Self::Constant(Value::Text(s)) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Constant(v) => write!(f, "{v}"),
            Self::Param(n) => write!(f, "${n}"),
            Self::Equal(l, r) => write!(f, "{l} = {r}"),
            Self::NotEqual(l, r) => write!(f, "{l} != {r}"),
            Self::GreaterThan(l, r) => write!(f, "{l} > {r}"),
            Self::LessThan(l, r) => write!(f, "{l} < {r}"),
            Self::And(l, r) => write!(f, "({l} AND {r})"),
            Self::Or(l, r) => write!(f, "({l} OR {r})"),
            Self::Not(e) => write!(f, "NOT {e}"),
            Self::IsNull(e) => write!(f, "{e} IS NULL"),
        }
    }
}

/// Shorthand constructors used by planners and tests.
impl Expr {
    #[must_use]
    pub fn equal(l: Self, r: Self) -> Self {
        Self::Equal(Box::new(l), Box::new(r))
    }

    #[must_use]
    pub fn greater(l: Self, r: Self) -> Self {
        Self::GreaterThan(Box::new(l), Box::new(r))
    }

    #[must_use]
    pub fn less(l: Self, r: Self) -> Self {
        Self::LessThan(Box::new(l), Box::new(r))
    }

    #[must_use]
    pub fn and(l: Self, r: Self) -> Self {
        Self::And(Box::new(l), Box::new(r))
    }

    #[must_use]
    pub fn int(i: i64) -> Self {
        Self::Constant(Value::Integer(i))
    }

    #[must_use]
    pub fn text(s: &str) -> Self {
        Self::Constant(Value::Text(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_with_null_is_unknown() {
        let row = vec![Value::Null, Value::Integer(3)];
        let e = Expr::equal(Expr::Column(0), Expr::int(3));
        assert_eq!(e.evaluate(&row).unwrap(), Value::Null);
        assert!(!e.matches(&row).unwrap());
        assert!(Expr::IsNull(Box::new(Expr::Column(0))).matches(&row).unwrap());
    }

    #[test]
    fn test_three_valued_logic() {
        let row = vec![Value::Null, Value::Integer(3)];
        let unknown = Expr::equal(Expr::Column(0), Expr::int(1));
        let yes = Expr::greater(Expr::Column(1), Expr::int(1));
        let no = Expr::less(Expr::Column(1), Expr::int(1));

        assert_eq!(Expr::and(unknown.clone(), no.clone()).evaluate(&row).unwrap(), Value::Boolean(false));
        assert_eq!(Expr::and(unknown.clone(), yes.clone()).evaluate(&row).unwrap(), Value::Null);
        assert_eq!(
            Expr::Or(Box::new(unknown), Box::new(yes)).evaluate(&row).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(Expr::Not(Box::new(no)).evaluate(&row).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_bind_params() {
        let e = Expr::and(
            Expr::equal(Expr::Column(0), Expr::Param(1)),
            Expr::greater(Expr::Column(1), Expr::Param(2)),
        );
        assert_eq!(e.max_param(), 2);
        assert!(matches!(e.evaluate(&[]), Err(DatabaseError::UnboundParam(_))));

        let bound = e.bind_params(&[Value::Integer(5), Value::Integer(0)]).unwrap();
        assert_eq!(bound.max_param(), 0);
        assert!(bound.matches(&[Value::Integer(5), Value::Integer(1)]).unwrap());

        assert!(matches!(
            e.bind_params(&[Value::Integer(5)]),
            Err(DatabaseError::UnboundParam(2))
        ));
    }

    #[test]
    fn test_type_mismatch_in_predicate() {
        let e = Expr::equal(Expr::int(1), Expr::text("a"));
        assert!(matches!(e.evaluate(&[]), Err(DatabaseError::TypeMismatch(_))));
        assert!(matches!(Expr::int(1).matches(&[]), Err(DatabaseError::TypeMismatch(_))));
    }

    #[test]
    fn test_display() {
        let e = Expr::and(Expr::equal(Expr::Column(0), Expr::Param(1)), Expr::text("it's"));
        assert_eq!(e.to_string(), "(#0 = $1 AND 'it''s')");
    }
}
