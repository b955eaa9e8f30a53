//! Record schema description.
//!
//! A [`RecordSchema`] is the ordered list of properties a record type exposes
//! to property paths: each [`Property`] carries its name, its static
//! [`PropertyType`] and a type-erased accessor that reads the field from a
//! record instance. Schemas are built once per record type, either by
//! `#[derive(Record)]` or by hand through [`RecordSchema::builder`].

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::{SchemaError, SchemaResult};
use crate::record::Field;
use crate::value::{ScalarKind, Value, ValueRef};

/// Lazily yields the schema of a nested record type.
///
/// Kept as a function pointer so self-referential records can describe
/// themselves without initializing their own schema recursively.
pub type SchemaFn = fn() -> &'static RecordSchema;

/// Reads one property from a record.
///
/// Returns `None` when the record is not of the type the property belongs to.
pub type Accessor = for<'a> fn(&'a (dyn Any + 'static)) -> Option<FieldRef<'a>>;

/// A property read from a record instance.
#[derive(Clone, Copy)]
pub enum FieldRef<'a> {
    /// The property holds no value (`Option::None`).
    Null,
    /// A scalar value.
    Scalar(ValueRef<'a>),
    /// A nested record.
    Record(&'a (dyn Any + 'static)),
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Self::Record(_) => f.write_str("Record(..)"),
        }
    }
}

/// Static type of a property.
#[derive(Clone, Copy)]
pub enum PropertyType {
    /// A scalar leaf.
    Scalar(ScalarKind),
    /// A nested record.
    Record(SchemaFn),
}

impl PropertyType {
    /// Get the scalar kind, if this is a scalar.
    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(*kind),
            Self::Record(_) => None,
        }
    }

    /// Check if this is a nested record.
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Get the nested record schema, if this is a record.
    pub fn record_schema(&self) -> Option<&'static RecordSchema> {
        match self {
            Self::Scalar(_) => None,
            Self::Record(schema) => Some(schema()),
        }
    }

    /// Get the type name used in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Record(schema) => schema().name(),
        }
    }
}

impl PartialEq for PropertyType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(lhs), Self::Scalar(rhs)) => lhs == rhs,
            (Self::Record(lhs), Self::Record(rhs)) => std::ptr::eq(lhs(), rhs()),
            _ => false,
        }
    }
}

impl fmt::Debug for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.debug_tuple("Scalar").field(kind).finish(),
            Self::Record(schema) => f.debug_tuple("Record").field(&schema().name()).finish(),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named, typed property of a record.
#[derive(Clone)]
pub struct Property {
    name: SmolStr,
    ty: PropertyType,
    nullable: bool,
    accessor: Accessor,
}

impl Property {
    /// Create a property whose field type is `F`.
    pub fn new<F: Field>(name: impl Into<SmolStr>, accessor: Accessor) -> Self {
        Self {
            name: name.into(),
            ty: F::property_type(),
            nullable: F::NULLABLE,
            accessor,
        }
    }

    /// Get the property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the static type of the property.
    pub fn ty(&self) -> PropertyType {
        self.ty
    }

    /// Check if the property may be absent at runtime.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Read this property from a record.
    pub fn read<'a>(&self, record: &'a (dyn Any + 'static)) -> Option<FieldRef<'a>> {
        (self.accessor)(record)
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// The properties exposed by one record type.
#[derive(Debug)]
pub struct RecordSchema {
    name: SmolStr,
    properties: IndexMap<SmolStr, Property>,
}

impl RecordSchema {
    /// Start building a schema for the named record type.
    pub fn builder(name: impl Into<SmolStr>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Get the record type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a property by exact, case-sensitive name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Iterate over properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    /// Get the number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the record has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Copy every property of `record` into a [`Value::Record`].
    ///
    /// Returns `None` when `record` is not of this schema's type.
    pub fn snapshot(&self, record: &(dyn Any + 'static)) -> Option<Value> {
        let mut fields = IndexMap::with_capacity(self.properties.len());
        for property in self.properties.values() {
            let value = match property.read(record)? {
                FieldRef::Null => Value::Null,
                FieldRef::Scalar(value) => value.to_value(),
                FieldRef::Record(nested) => property.ty().record_schema()?.snapshot(nested)?,
            };
            fields.insert(property.name.clone(), value);
        }
        Some(Value::Record(fields))
    }
}

/// Builder for [`RecordSchema`].
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    name: SmolStr,
    properties: Vec<Property>,
}

impl RecordSchemaBuilder {
    /// Add a property whose field type is `F`.
    pub fn property<F: Field>(mut self, name: impl Into<SmolStr>, accessor: Accessor) -> Self {
        self.properties.push(Property::new::<F>(name, accessor));
        self
    }

    /// Validate the property names and build the schema.
    pub fn build(self) -> SchemaResult<RecordSchema> {
        let mut properties = IndexMap::with_capacity(self.properties.len());
        for property in self.properties {
            if !is_identifier(&property.name) {
                return Err(SchemaError::invalid_property(
                    self.name.as_str(),
                    property.name.as_str(),
                    "not an identifier",
                ));
            }
            if properties.contains_key(&property.name) {
                return Err(SchemaError::duplicate_property(
                    self.name.as_str(),
                    property.name.as_str(),
                ));
            }
            properties.insert(property.name.clone(), property);
        }

        tracing::trace!(record = %self.name, properties = properties.len(), "record schema built");

        Ok(RecordSchema {
            name: self.name,
            properties,
        })
    }
}

/// Check that `name` is usable as one segment of a property path.
///
/// Segments are ASCII identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
