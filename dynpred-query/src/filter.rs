//! Filter operators and raw comparison values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use uuid::Uuid;

use crate::error::{FilterError, FilterResult};

/// The comparison applied between a property and a value.
///
/// This is a closed set; supporting another operator means extending the
/// dispatch in the predicate builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Property equals the value.
    Equals,
    /// Property does not equal the value.
    DoesntEqual,
    /// Property is strictly greater than the value.
    GreaterThan,
    /// Property is strictly less than the value.
    LessThan,
    /// Text property contains the value.
    Contains,
    /// Text property starts with the value.
    StartsWith,
    /// Text property ends with the value.
    EndsWith,
}

impl FilterOperator {
    /// Every operator, in declaration order.
    pub const ALL: [FilterOperator; 7] = [
        Self::Equals,
        Self::DoesntEqual,
        Self::GreaterThan,
        Self::LessThan,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
    ];

    /// Get the operator name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equals => "Equals",
            Self::DoesntEqual => "DoesntEqual",
            Self::GreaterThan => "GreaterThan",
            Self::LessThan => "LessThan",
            Self::Contains => "Contains",
            Self::StartsWith => "StartsWith",
            Self::EndsWith => "EndsWith",
        }
    }

    /// Get the symbol used when displaying a predicate.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::DoesntEqual => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
        }
    }

    /// Check if this operator only applies to text.
    pub fn is_text_operator(&self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith | Self::EndsWith)
    }

    /// Check if this operator needs an ordered type.
    pub fn is_ordering(&self) -> bool {
        matches!(self, Self::GreaterThan | Self::LessThan)
    }

    /// Check if this operator is an equality test.
    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Equals | Self::DoesntEqual)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterOperator {
    type Err = FilterError;

    /// Parse an operator from its name or its symbol.
    fn from_str(s: &str) -> FilterResult<Self> {
        let op = match s {
            "Equals" | "==" => Self::Equals,
            "DoesntEqual" | "!=" => Self::DoesntEqual,
            "GreaterThan" | ">" => Self::GreaterThan,
            "LessThan" | "<" => Self::LessThan,
            "Contains" => Self::Contains,
            "StartsWith" => Self::StartsWith,
            "EndsWith" => Self::EndsWith,
            other => return Err(FilterError::unsupported_operator(other, "<unknown>")),
        };
        Ok(op)
    }
}

/// An untyped comparison value supplied by the caller.
///
/// It is coerced to the exact type of the property when the predicate is
/// built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value beyond the signed range.
    UInt(u64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
}

impl FilterValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get a short name of the value's variant for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::UInt(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(v: $ty) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for FilterValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Self::Int(v),
            Err(_) => Self::UInt(v),
        }
    }
}

impl From<f32> for FilterValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<SmolStr> for FilterValue {
    fn from(v: SmolStr) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Decimal> for FilterValue {
    fn from(v: Decimal) -> Self {
        Self::String(v.to_string())
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(v: NaiveDate) -> Self {
        Self::String(v.to_string())
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::String(v.to_rfc3339())
    }
}

impl From<Uuid> for FilterValue {
    fn from(v: Uuid) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl TryFrom<serde_json::Value> for FilterValue {
    type Error = FilterError;

    fn try_from(value: serde_json::Value) -> FilterResult<Self> {
        use serde_json::Value as Json;
        match value {
            Json::Null => Ok(Self::Null),
            Json::Bool(v) => Ok(Self::Bool(v)),
            Json::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Ok(Self::Int(v))
                } else if let Some(v) = n.as_u64() {
                    Ok(Self::UInt(v))
                } else {
                    Ok(Self::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Json::String(v) => Ok(Self::String(v)),
            other => Err(FilterError::ValueCoercion {
                value: other.to_string(),
                target: "FilterValue".to_string(),
                reason: "arrays and objects cannot be compared with a property".to_string(),
            }),
        }
    }
}
