//! The `Record` and `Field` traits.
//!
//! [`Record`] marks a type that property paths can start from. [`Field`] is
//! implemented by every type that can appear as a property: the supported
//! scalars, records themselves, and the `Option`, `Box` and `Arc` wrappers.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use smol_str::SmolStr;
use uuid::Uuid;

use crate::schema::{FieldRef, PropertyType, RecordSchema};
use crate::value::{ScalarKind, Value, ValueRef};

/// A record type with a static property schema.
///
/// Usually derived:
///
/// ```rust,ignore
/// #[derive(dynpred::Record)]
/// #[record(rename_all = "PascalCase")]
/// struct Address {
///     city: String,
/// }
/// ```
pub trait Record: 'static {
    /// Get the schema shared by every instance of this type.
    fn schema() -> &'static RecordSchema
    where
        Self: Sized;

    /// Copy every property of this record into a [`Value::Record`].
    fn snapshot(&self) -> Value
    where
        Self: Sized,
    {
        Self::schema().snapshot(self).unwrap_or(Value::Null)
    }
}

/// A type that can be the declared type of a record property.
pub trait Field: 'static {
    /// Whether the property may be absent at runtime.
    const NULLABLE: bool = false;

    /// Get the static type of the property.
    fn property_type() -> PropertyType;

    /// Borrow the current value of the property.
    fn field_ref(&self) -> FieldRef<'_>;
}

macro_rules! scalar_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Field for $ty {
                fn property_type() -> PropertyType {
                    PropertyType::Scalar(ScalarKind::$kind)
                }

                fn field_ref(&self) -> FieldRef<'_> {
                    FieldRef::Scalar(ValueRef::$kind(*self))
                }
            }
        )*
    };
}

scalar_field! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Timestamp,
    Uuid => Uuid,
}

impl Field for String {
    fn property_type() -> PropertyType {
        PropertyType::Scalar(ScalarKind::Text)
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Scalar(ValueRef::Text(self.as_str()))
    }
}

impl Field for SmolStr {
    fn property_type() -> PropertyType {
        PropertyType::Scalar(ScalarKind::Text)
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Scalar(ValueRef::Text(self.as_str()))
    }
}

impl<T: Field> Field for Option<T> {
    const NULLABLE: bool = true;

    fn property_type() -> PropertyType {
        T::property_type()
    }

    fn field_ref(&self) -> FieldRef<'_> {
        match self {
            Some(value) => value.field_ref(),
            None => FieldRef::Null,
        }
    }
}

impl<T: Field> Field for Box<T> {
    const NULLABLE: bool = T::NULLABLE;

    fn property_type() -> PropertyType {
        T::property_type()
    }

    fn field_ref(&self) -> FieldRef<'_> {
        (**self).field_ref()
    }
}

impl<T: Field> Field for Arc<T> {
    const NULLABLE: bool = T::NULLABLE;

    fn property_type() -> PropertyType {
        T::property_type()
    }

    fn field_ref(&self) -> FieldRef<'_> {
        (**self).field_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_property_types() {
        assert_eq!(i32::property_type(), PropertyType::Scalar(ScalarKind::I32));
        assert_eq!(String::property_type(), PropertyType::Scalar(ScalarKind::Text));
        assert_eq!(
            <DateTime<Utc>>::property_type(),
            PropertyType::Scalar(ScalarKind::Timestamp)
        );
    }

    #[test]
    fn test_option_is_nullable() {
        assert!(!<i32 as Field>::NULLABLE);
        assert!(<Option<i32> as Field>::NULLABLE);
        assert!(<Box<Option<i32>> as Field>::NULLABLE);
    }

    #[test]
    fn test_field_refs() {
        assert!(matches!(
            30i32.field_ref(),
            FieldRef::Scalar(ValueRef::I32(30))
        ));
        assert!(matches!(None::<String>.field_ref(), FieldRef::Null));
        let name = Some(String::from("John"));
        assert!(matches!(
            name.field_ref(),
            FieldRef::Scalar(ValueRef::Text("John"))
        ));
        let boxed = Arc::new(SmolStr::new("Ann"));
        assert!(matches!(
            boxed.field_ref(),
            FieldRef::Scalar(ValueRef::Text("Ann"))
        ));
    }
}
