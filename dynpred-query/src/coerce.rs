//! Operator applicability and comparison value coercion.
//!
//! A raw [`FilterValue`] is converted to the exact scalar kind of the leaf
//! property before any predicate is produced, so evaluation only ever
//! compares values of the same kind.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dynpred_schema::{PropertyType, ScalarKind, Value};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{FilterError, FilterResult};
use crate::filter::{FilterOperator, FilterValue};
use crate::path::ResolvedAccess;

// 2^63 and 2^64 as floats; both are exactly representable.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

/// Check that `op` is defined for the leaf type and return its scalar kind.
pub fn check_operator(op: FilterOperator, leaf: PropertyType) -> FilterResult<ScalarKind> {
    let kind = leaf
        .as_scalar()
        .ok_or_else(|| FilterError::unsupported_operator(op, leaf.name()))?;

    let supported = if op.is_ordering() {
        kind.is_ordered()
    } else if op.is_text_operator() {
        kind.is_textual()
    } else {
        op.is_equality()
    };

    if supported {
        Ok(kind)
    } else {
        Err(FilterError::unsupported_operator(op, kind.name()))
    }
}

/// Produce the value a predicate over `access` compares against.
///
/// Null is only accepted for equality tests on a path that can be absent.
/// That is also the one test a record-typed leaf supports.
pub fn comparison_value(
    access: &ResolvedAccess,
    op: FilterOperator,
    value: &FilterValue,
) -> FilterResult<Value> {
    if access.leaf_type().is_record()
        && op.is_equality()
        && value.is_null()
        && access.is_nullable()
    {
        return Ok(Value::Null);
    }

    let kind = check_operator(op, access.leaf_type())?;

    if value.is_null() {
        if op.is_equality() && access.is_nullable() {
            return Ok(Value::Null);
        }
        return Err(FilterError::value_coercion(
            value,
            kind.name(),
            "null is only comparable with Equals or DoesntEqual on an optional property",
        ));
    }

    coerce(value, kind)
}

/// Convert a raw value to exactly `kind`.
pub fn coerce(value: &FilterValue, kind: ScalarKind) -> FilterResult<Value> {
    let coerced = match kind {
        ScalarKind::I8 => Value::I8(integer(value, kind)?),
        ScalarKind::I16 => Value::I16(integer(value, kind)?),
        ScalarKind::I32 => Value::I32(integer(value, kind)?),
        ScalarKind::I64 => Value::I64(integer(value, kind)?),
        ScalarKind::U8 => Value::U8(integer(value, kind)?),
        ScalarKind::U16 => Value::U16(integer(value, kind)?),
        ScalarKind::U32 => Value::U32(integer(value, kind)?),
        ScalarKind::U64 => Value::U64(integer(value, kind)?),
        ScalarKind::F32 => {
            let v = float(value, kind)?;
            if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                return Err(FilterError::value_coercion(value, kind.name(), "out of range"));
            }
            Value::F32(v as f32)
        }
        ScalarKind::F64 => Value::F64(float(value, kind)?),
        ScalarKind::Decimal => Value::Decimal(decimal(value, kind)?),
        ScalarKind::Text => match value {
            FilterValue::String(s) => Value::Text(s.clone()),
            _ => return Err(FilterError::value_coercion(value, kind.name(), "expected a string")),
        },
        ScalarKind::Bool => match value {
            FilterValue::Bool(v) => Value::Bool(*v),
            FilterValue::String(s) => Value::Bool(parse(value, s, kind)?),
            _ => return Err(FilterError::value_coercion(value, kind.name(), "expected a boolean")),
        },
        ScalarKind::Uuid => Value::Uuid(parse::<Uuid>(value, text(value, kind)?, kind)?),
        ScalarKind::Date => Value::Date(parse::<NaiveDate>(value, text(value, kind)?, kind)?),
        ScalarKind::DateTime => {
            Value::DateTime(parse::<NaiveDateTime>(value, text(value, kind)?, kind)?)
        }
        ScalarKind::Timestamp => {
            let s = text(value, kind)?;
            let parsed = DateTime::parse_from_rfc3339(s)
                .map_err(|e| FilterError::value_coercion(value, kind.name(), e.to_string()))?;
            Value::Timestamp(parsed.with_timezone(&Utc))
        }
    };
    Ok(coerced)
}

fn integer<T>(value: &FilterValue, kind: ScalarKind) -> FilterResult<T>
where
    T: TryFrom<i64> + TryFrom<u64> + FromStr,
    <T as FromStr>::Err: Display,
{
    let out_of_range = || FilterError::value_coercion(value, kind.name(), "out of range");
    match value {
        FilterValue::Int(v) => <T as TryFrom<i64>>::try_from(*v).map_err(|_| out_of_range()),
        FilterValue::UInt(v) => <T as TryFrom<u64>>::try_from(*v).map_err(|_| out_of_range()),
        FilterValue::Float(v) => integral_float(*v, value, kind),
        FilterValue::String(s) => match s.parse::<T>() {
            Ok(v) => Ok(v),
            // "25.0" coerces like 25.0
            Err(e) => match s.parse::<f64>() {
                Ok(v) if v.is_finite() => integral_float(v, value, kind),
                _ => Err(FilterError::value_coercion(value, kind.name(), e.to_string())),
            },
        },
        FilterValue::Bool(_) | FilterValue::Null => {
            Err(FilterError::value_coercion(value, kind.name(), "expected a number"))
        }
    }
}

fn integral_float<T>(v: f64, value: &FilterValue, kind: ScalarKind) -> FilterResult<T>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let out_of_range = || FilterError::value_coercion(value, kind.name(), "out of range");
    if !v.is_finite() || v.fract() != 0.0 {
        return Err(FilterError::value_coercion(value, kind.name(), "not an integer"));
    }
    if (-I64_BOUND..I64_BOUND).contains(&v) {
        <T as TryFrom<i64>>::try_from(v as i64).map_err(|_| out_of_range())
    } else if (0.0..U64_BOUND).contains(&v) {
        <T as TryFrom<u64>>::try_from(v as u64).map_err(|_| out_of_range())
    } else {
        Err(out_of_range())
    }
}

fn float(value: &FilterValue, kind: ScalarKind) -> FilterResult<f64> {
    match value {
        FilterValue::Int(v) => Ok(*v as f64),
        FilterValue::UInt(v) => Ok(*v as f64),
        FilterValue::Float(v) => Ok(*v),
        FilterValue::String(s) => parse(value, s, kind),
        FilterValue::Bool(_) | FilterValue::Null => {
            Err(FilterError::value_coercion(value, kind.name(), "expected a number"))
        }
    }
}

fn decimal(value: &FilterValue, kind: ScalarKind) -> FilterResult<Decimal> {
    match value {
        FilterValue::Int(v) => Ok(Decimal::from(*v)),
        FilterValue::UInt(v) => Ok(Decimal::from(*v)),
        FilterValue::Float(v) => Decimal::try_from(*v)
            .map_err(|e| FilterError::value_coercion(value, kind.name(), e.to_string())),
        FilterValue::String(s) => parse(value, s, kind),
        FilterValue::Bool(_) | FilterValue::Null => {
            Err(FilterError::value_coercion(value, kind.name(), "expected a number"))
        }
    }
}

fn text(value: &FilterValue, kind: ScalarKind) -> FilterResult<&str> {
    value
        .as_str()
        .ok_or_else(|| FilterError::value_coercion(value, kind.name(), "expected a string"))
}

fn parse<T>(value: &FilterValue, s: &str, kind: ScalarKind) -> FilterResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    s.parse::<T>()
        .map_err(|e| FilterError::value_coercion(value, kind.name(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::resolve;
    use crate::test_records::Person;
    use pretty_assertions::assert_eq;

    fn coerced(value: impl Into<FilterValue>, kind: ScalarKind) -> FilterResult<Value> {
        coerce(&value.into(), kind)
    }

    #[test]
    fn test_string_to_integer() {
        assert_eq!(coerced("25", ScalarKind::I32).unwrap(), Value::I32(25));
        assert_eq!(coerced("-7", ScalarKind::I8).unwrap(), Value::I8(-7));
    }

    #[test]
    fn test_non_numeric_string_fails() {
        assert!(matches!(
            coerced("abc", ScalarKind::I32),
            Err(FilterError::ValueCoercion { .. })
        ));
    }

    #[test]
    fn test_integer_overflow_fails() {
        assert!(matches!(
            coerced(300, ScalarKind::U8),
            Err(FilterError::ValueCoercion { .. })
        ));
        assert!(matches!(
            coerced(-1, ScalarKind::U64),
            Err(FilterError::ValueCoercion { .. })
        ));
        assert!(matches!(
            coerced("99999999999", ScalarKind::I32),
            Err(FilterError::ValueCoercion { .. })
        ));
    }

    #[test]
    fn test_unsigned_beyond_signed_range() {
        assert_eq!(coerced(u64::MAX, ScalarKind::U64).unwrap(), Value::U64(u64::MAX));
        assert!(coerced(u64::MAX, ScalarKind::I64).is_err());
    }

    #[test]
    fn test_integral_float_to_integer() {
        assert_eq!(coerced(25.0, ScalarKind::I32).unwrap(), Value::I32(25));
        assert!(coerced(25.5, ScalarKind::I32).is_err());
        assert!(coerced(f64::NAN, ScalarKind::I64).is_err());
        assert!(coerced(1e30, ScalarKind::U64).is_err());
    }

    #[test]
    fn test_integral_float_string_to_integer() {
        assert_eq!(coerced("25.0", ScalarKind::I32).unwrap(), Value::I32(25));
        assert_eq!(coerced("1e3", ScalarKind::U16).unwrap(), Value::U16(1000));
        assert!(matches!(
            coerced("25.5", ScalarKind::I32),
            Err(FilterError::ValueCoercion { .. })
        ));
        assert!(matches!(
            coerced("300.0", ScalarKind::U8),
            Err(FilterError::ValueCoercion { .. })
        ));
        assert!(coerced("inf", ScalarKind::I64).is_err());
    }

    #[test]
    fn test_floats() {
        assert_eq!(coerced(3, ScalarKind::F64).unwrap(), Value::F64(3.0));
        assert_eq!(coerced("2.5", ScalarKind::F32).unwrap(), Value::F32(2.5));
        assert!(coerced(1e300, ScalarKind::F32).is_err());
    }

    #[test]
    fn test_decimal() {
        assert_eq!(
            coerced("19.99", ScalarKind::Decimal).unwrap(),
            Value::Decimal(Decimal::new(1999, 2))
        );
        assert_eq!(coerced(5, ScalarKind::Decimal).unwrap(), Value::Decimal(Decimal::from(5)));
    }

    #[test]
    fn test_text_requires_string() {
        assert_eq!(
            coerced("Paris", ScalarKind::Text).unwrap(),
            Value::Text("Paris".into())
        );
        assert!(coerced(5, ScalarKind::Text).is_err());
    }

    #[test]
    fn test_bool() {
        assert_eq!(coerced(true, ScalarKind::Bool).unwrap(), Value::Bool(true));
        assert_eq!(coerced("false", ScalarKind::Bool).unwrap(), Value::Bool(false));
        assert!(coerced(1, ScalarKind::Bool).is_err());
    }

    #[test]
    fn test_temporal() {
        assert_eq!(
            coerced("2024-02-29", ScalarKind::Date).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert!(coerced("2023-02-29", ScalarKind::Date).is_err());

        let ts = coerced("2024-01-01T12:00:00+02:00", ScalarKind::Timestamp).unwrap();
        assert_eq!(ts.to_string(), "2024-01-01T10:00:00+00:00");

        assert!(coerced("2024-01-01T12:00:00", ScalarKind::DateTime).is_ok());
    }

    #[test]
    fn test_uuid() {
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(
            coerced(id, ScalarKind::Uuid).unwrap(),
            Value::Uuid(Uuid::parse_str(id).unwrap())
        );
        assert!(coerced("not-a-uuid", ScalarKind::Uuid).is_err());
    }

    #[test]
    fn test_operator_applicability() {
        let text = PropertyType::Scalar(ScalarKind::Text);
        let int = PropertyType::Scalar(ScalarKind::I32);
        let flag = PropertyType::Scalar(ScalarKind::Bool);

        assert!(check_operator(FilterOperator::Contains, text).is_ok());
        assert!(check_operator(FilterOperator::Contains, int).is_err());
        assert!(check_operator(FilterOperator::GreaterThan, int).is_ok());
        assert!(check_operator(FilterOperator::GreaterThan, text).is_err());
        assert!(check_operator(FilterOperator::LessThan, flag).is_err());
        for op in [FilterOperator::Equals, FilterOperator::DoesntEqual] {
            assert!(check_operator(op, text).is_ok());
            assert!(check_operator(op, int).is_ok());
            assert!(check_operator(op, flag).is_ok());
        }
    }

    #[test]
    fn test_record_leaf_rejects_every_operator() {
        let access = resolve::<Person>("Address").unwrap();
        for op in FilterOperator::ALL {
            let err = check_operator(op, access.leaf_type()).unwrap_err();
            assert_eq!(err, FilterError::unsupported_operator(op, "Address"));
        }
    }

    #[test]
    fn test_null_comparison_value() {
        let optional = resolve::<Person>("Nickname").unwrap();
        let required = resolve::<Person>("Name").unwrap();

        assert_eq!(
            comparison_value(&optional, FilterOperator::Equals, &FilterValue::Null).unwrap(),
            Value::Null
        );
        assert!(comparison_value(&optional, FilterOperator::StartsWith, &FilterValue::Null).is_err());
        assert!(comparison_value(&required, FilterOperator::Equals, &FilterValue::Null).is_err());
    }

    #[test]
    fn test_null_check_on_optional_record_leaf() {
        let manager = resolve::<Person>("Manager").unwrap();
        for op in [FilterOperator::Equals, FilterOperator::DoesntEqual] {
            assert_eq!(comparison_value(&manager, op, &FilterValue::Null).unwrap(), Value::Null);
        }

        assert_eq!(
            comparison_value(&manager, FilterOperator::Equals, &"Bob".into()).unwrap_err(),
            FilterError::unsupported_operator(FilterOperator::Equals, "Person")
        );
        assert!(comparison_value(&manager, FilterOperator::GreaterThan, &FilterValue::Null).is_err());

        let address = resolve::<Person>("Address").unwrap();
        assert!(comparison_value(&address, FilterOperator::Equals, &FilterValue::Null).is_err());
    }
}
