use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::cmp::Ordering;
use std::str::FromStr;

use super::data_type::DataType;
use super::error::DatabaseError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Null,
    // Numeric types
    SmallInt(i16),
    Integer(i64),
    Real(f64),
    Numeric(Decimal),
    // String types
    Text(String),
    // Boolean
    Boolean(bool),
    // Date/Time types
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    // Special types
    Uuid(Uuid),
    Bytea(Vec<u8>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::SmallInt(i) => Some(*i as i64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Compares two values, promoting across the numeric types.
    ///
    /// Returns `None` when either side is NULL or the types are not comparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => None,
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            (Self::Bytea(a), Self::Bytea(b)) => Some(a.cmp(b)),
            (Self::Real(_), _) | (_, Self::Real(_)) => {
                self.to_f64()?.partial_cmp(&other.to_f64()?)
            }
            (Self::Numeric(_), _) | (_, Self::Numeric(_)) => {
                Some(self.to_decimal()?.cmp(&other.to_decimal()?))
            }
            _ => Some(self.as_int()?.cmp(&other.as_int()?)),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            Self::Numeric(d) => d.to_f64(),
            _ => self.as_int().map(|i| i as f64),
        }
    }

    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Numeric(d) => Some(*d),
            Self::Real(r) => Decimal::from_f64(*r),
            _ => self.as_int().map(Decimal::from),
        }
    }

    /// Checks that the value can be stored in a column of `data_type`,
    /// converting between compatible representations.
    pub fn coerce_to(self, data_type: &DataType, column: &str) -> Result<Self, DatabaseError> {
        let invalid = |reason: String| DatabaseError::InvalidValue {
            column: column.to_string(),
            reason,
        };

        match (data_type, self) {
            (_, Self::Null) => Ok(Self::Null),
            (DataType::SmallInt, Self::SmallInt(i)) => Ok(Self::SmallInt(i)),
            (DataType::SmallInt, Self::Integer(i)) => i16::try_from(i)
                .map(Self::SmallInt)
                .map_err(|_| invalid(format!("{i} is out of range for SMALLINT"))),
            (DataType::Integer, v @ (Self::Integer(_) | Self::SmallInt(_))) => {
                Ok(Self::Integer(v.as_int().unwrap_or_default()))
            }
            (DataType::Real, Self::Real(r)) => Ok(Self::Real(r)),
            (DataType::Real, v @ (Self::Integer(_) | Self::SmallInt(_))) => {
                Ok(Self::Real(v.to_f64().unwrap_or_default()))
            }
            (DataType::Numeric { scale, .. }, v @ (Self::Numeric(_) | Self::Integer(_) | Self::SmallInt(_) | Self::Real(_))) => {
                let d = v
                    .to_decimal()
                    .ok_or_else(|| invalid("value is not representable as NUMERIC".to_string()))?;
                Ok(Self::Numeric(d.round_dp(u32::from(*scale))))
            }
            (DataType::Text, Self::Text(s)) => Ok(Self::Text(s)),
            (DataType::Varchar { max_length }, Self::Text(s)) => {
                if s.chars().count() > *max_length {
                    return Err(invalid(format!(
                        "{} exceeds VARCHAR({max_length})",
                        s.chars().count()
                    )));
                }
                Ok(Self::Text(s))
            }
            (DataType::Boolean, Self::Boolean(b)) => Ok(Self::Boolean(b)),
            (DataType::Date, Self::Date(d)) => Ok(Self::Date(d)),
            (DataType::Timestamp, Self::Timestamp(t)) => Ok(Self::Timestamp(t)),
            (DataType::Uuid, Self::Uuid(u)) => Ok(Self::Uuid(u)),
            (DataType::Bytea, Self::Bytea(b)) => Ok(Self::Bytea(b)),
            (data_type, Self::Text(s)) => Self::parse_as(&s, data_type, column),
            (data_type, other) => Err(invalid(format!("{other:?} is not a {data_type}"))),
        }
    }

    /// Parses a textual field (LOAD DATA input, string literals) into a
    /// value of the declared column type. `\N` is read as NULL.
    pub fn parse_as(text: &str, data_type: &DataType, column: &str) -> Result<Self, DatabaseError> {
        let invalid = |reason: String| DatabaseError::InvalidValue {
            column: column.to_string(),
            reason,
        };
        let text = text.trim();
        if text == "\\N" {
            return Ok(Self::Null);
        }

        match data_type {
            DataType::SmallInt => text
                .parse()
                .map(Self::SmallInt)
                .map_err(|e| invalid(format!("'{text}': {e}"))),
            DataType::Integer => text
                .parse()
                .map(Self::Integer)
                .map_err(|e| invalid(format!("'{text}': {e}"))),
            DataType::Real => text
                .parse()
                .map(Self::Real)
                .map_err(|e| invalid(format!("'{text}': {e}"))),
            DataType::Numeric { scale, .. } => Decimal::from_str(text)
                .map(|d| Self::Numeric(d.round_dp(u32::from(*scale))))
                .map_err(|e| invalid(format!("'{text}': {e}"))),
            DataType::Text | DataType::Varchar { .. } => {
                Self::Text(text.to_string()).coerce_to(data_type, column)
            }
            DataType::Boolean => match text.to_ascii_lowercase().as_str() {
                "1" | "t" | "true" | "yes" => Ok(Self::Boolean(true)),
                "0" | "f" | "false" | "no" => Ok(Self::Boolean(false)),
                _ => Err(invalid(format!("'{text}' is not a boolean"))),
            },
            DataType::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(Self::Date)
                .map_err(|e| invalid(format!("'{text}': {e}"))),
            DataType::Timestamp => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .map(Self::Timestamp)
                .map_err(|e| invalid(format!("'{text}': {e}"))),
            DataType::Uuid => Uuid::parse_str(text)
                .map(Self::Uuid)
                .map_err(|e| invalid(format!("'{text}': {e}"))),
            DataType::Bytea => hex::decode(text.trim_start_matches("\\x"))
                .map(Self::Bytea)
                .map_err(|e| invalid(format!("'{text}': {e}"))),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::SmallInt(i) => write!(f, "{i}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Numeric(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Bytea(b) => write!(f, "\\x{}", hex::encode(b)),
        }
    }
}
