//! Scalar kinds and the values read out of records.
//!
//! [`ValueRef`] is the borrowed view produced while walking a record and is
//! what predicates compare against. [`Value`] is the owned form handed back
//! by getters and held by predicates as their coerced comparison value.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;
use smol_str::SmolStr;
use uuid::Uuid;

/// The static kind of a scalar property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `bool`.
    Bool,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `u8`.
    U8,
    /// `u16`.
    U16,
    /// `u32`.
    U32,
    /// `u64`.
    U64,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
    /// `rust_decimal::Decimal`.
    Decimal,
    /// UTF-8 text (`String`, `SmolStr`).
    Text,
    /// `chrono::NaiveDate`.
    Date,
    /// `chrono::NaiveDateTime`.
    DateTime,
    /// `chrono::DateTime<Utc>`.
    Timestamp,
    /// `uuid::Uuid`.
    Uuid,
}

impl ScalarKind {
    /// Get the Rust-facing name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "Decimal",
            Self::Text => "String",
            Self::Date => "NaiveDate",
            Self::DateTime => "NaiveDateTime",
            Self::Timestamp => "DateTime<Utc>",
            Self::Uuid => "Uuid",
        }
    }

    /// Check if this is a fixed-width integer kind.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::U8 | Self::U16 | Self::U32 | Self::U64
        )
    }

    /// Check if this is a floating point kind.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Check if this is any number kind.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float() || matches!(self, Self::Decimal)
    }

    /// Check if this is a date or time kind.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::Timestamp)
    }

    /// Check if this kind is textual.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Check if values of this kind support `<` and `>`.
    ///
    /// Text, booleans and UUIDs only support equality.
    pub fn is_ordered(&self) -> bool {
        self.is_numeric() || self.is_temporal()
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Borrowed view over a scalar read from a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
    /// Boolean.
    Bool(bool),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// Decimal number.
    Decimal(Decimal),
    /// Text slice.
    Text(&'a str),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without zone.
    DateTime(NaiveDateTime),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// UUID.
    Uuid(Uuid),
}

impl<'a> ValueRef<'a> {
    /// Get the text slice if this is a text value.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Compare with another value of the same kind.
    ///
    /// Returns `None` for mismatched kinds and for unordered floats (NaN).
    pub fn compare(self, other: ValueRef<'_>) -> Option<Ordering> {
        use ValueRef::*;
        match (self, other) {
            (Bool(lhs), Bool(rhs)) => Some(lhs.cmp(&rhs)),
            (I8(lhs), I8(rhs)) => Some(lhs.cmp(&rhs)),
            (I16(lhs), I16(rhs)) => Some(lhs.cmp(&rhs)),
            (I32(lhs), I32(rhs)) => Some(lhs.cmp(&rhs)),
            (I64(lhs), I64(rhs)) => Some(lhs.cmp(&rhs)),
            (U8(lhs), U8(rhs)) => Some(lhs.cmp(&rhs)),
            (U16(lhs), U16(rhs)) => Some(lhs.cmp(&rhs)),
            (U32(lhs), U32(rhs)) => Some(lhs.cmp(&rhs)),
            (U64(lhs), U64(rhs)) => Some(lhs.cmp(&rhs)),
            (F32(lhs), F32(rhs)) => lhs.partial_cmp(&rhs),
            (F64(lhs), F64(rhs)) => lhs.partial_cmp(&rhs),
            (Decimal(lhs), Decimal(rhs)) => Some(lhs.cmp(&rhs)),
            (Text(lhs), Text(rhs)) => Some(lhs.cmp(rhs)),
            (Date(lhs), Date(rhs)) => Some(lhs.cmp(&rhs)),
            (DateTime(lhs), DateTime(rhs)) => Some(lhs.cmp(&rhs)),
            (Timestamp(lhs), Timestamp(rhs)) => Some(lhs.cmp(&rhs)),
            (Uuid(lhs), Uuid(rhs)) => Some(lhs.cmp(&rhs)),
            _ => None,
        }
    }

    /// Copy this view into an owned value.
    pub fn to_value(self) -> Value {
        match self {
            Self::Bool(v) => Value::Bool(v),
            Self::I8(v) => Value::I8(v),
            Self::I16(v) => Value::I16(v),
            Self::I32(v) => Value::I32(v),
            Self::I64(v) => Value::I64(v),
            Self::U8(v) => Value::U8(v),
            Self::U16(v) => Value::U16(v),
            Self::U32(v) => Value::U32(v),
            Self::U64(v) => Value::U64(v),
            Self::F32(v) => Value::F32(v),
            Self::F64(v) => Value::F64(v),
            Self::Decimal(v) => Value::Decimal(v),
            Self::Text(v) => Value::Text(v.to_string()),
            Self::Date(v) => Value::Date(v),
            Self::DateTime(v) => Value::DateTime(v),
            Self::Timestamp(v) => Value::Timestamp(v),
            Self::Uuid(v) => Value::Uuid(v),
        }
    }
}

/// An owned, untyped value.
///
/// Serializes to its natural JSON shape: numbers, strings, booleans, `null`,
/// and objects for nested records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// Decimal number.
    Decimal(Decimal),
    /// Text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without zone.
    DateTime(NaiveDateTime),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// UUID.
    Uuid(Uuid),
    /// Snapshot of a nested record, keyed by property name in schema order.
    Record(IndexMap<SmolStr, Value>),
}

impl Value {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow this value as a scalar view, or `None` for null and records.
    pub fn as_value_ref(&self) -> Option<ValueRef<'_>> {
        Some(match self {
            Self::Null | Self::Record(_) => return None,
            Self::Bool(v) => ValueRef::Bool(*v),
            Self::I8(v) => ValueRef::I8(*v),
            Self::I16(v) => ValueRef::I16(*v),
            Self::I32(v) => ValueRef::I32(*v),
            Self::I64(v) => ValueRef::I64(*v),
            Self::U8(v) => ValueRef::U8(*v),
            Self::U16(v) => ValueRef::U16(*v),
            Self::U32(v) => ValueRef::U32(*v),
            Self::U64(v) => ValueRef::U64(*v),
            Self::F32(v) => ValueRef::F32(*v),
            Self::F64(v) => ValueRef::F64(*v),
            Self::Decimal(v) => ValueRef::Decimal(*v),
            Self::Text(v) => ValueRef::Text(v.as_str()),
            Self::Date(v) => ValueRef::Date(*v),
            Self::DateTime(v) => ValueRef::DateTime(*v),
            Self::Timestamp(v) => ValueRef::Timestamp(*v),
            Self::Uuid(v) => ValueRef::Uuid(*v),
        })
    }

    /// Get the text if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        value.to_value()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{:?}", v),
            Self::Date(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Uuid(v) => write!(f, "{}", v),
            Self::Record(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                f.write_str("}")
            }
        }
    }
}
