//! Getters that read a nested property as an untyped [`Value`].

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use dynpred_schema::{FieldRef, NullPolicy, PropertyType, Record, RecordSchema, Value};

use crate::error::{FilterError, FilterResult};
use crate::path::{PropertyPath, ResolvedAccess};

/// Reads the leaf of a resolved path from records of type `T`.
pub struct Getter<T> {
    access: ResolvedAccess,
    null_policy: NullPolicy,
    _record: PhantomData<fn(&T)>,
}

impl<T: Record> Getter<T> {
    pub(crate) fn new(access: ResolvedAccess, null_policy: NullPolicy) -> Self {
        Self {
            access,
            null_policy,
            _record: PhantomData,
        }
    }

    /// Get the property path being read.
    pub fn path(&self) -> &PropertyPath {
        self.access.path()
    }

    /// Get the resolved access chain.
    pub fn access(&self) -> &ResolvedAccess {
        &self.access
    }

    /// Get the static type of the value returned.
    pub fn leaf_type(&self) -> PropertyType {
        self.access.leaf_type()
    }

    /// Read the leaf from one record.
    ///
    /// A leaf that is itself a record comes back as a [`Value::Record`]
    /// snapshot of its properties.
    pub fn get(&self, record: &T) -> FilterResult<Value> {
        let field = self.access.read(record, self.null_policy)?;
        to_value(field, self.access.leaf_type().record_schema())
    }

    /// Build the long-lived form of this getter.
    pub fn compile(self) -> CompiledGetter<T> {
        let description: Arc<str> = Arc::from(self.access.path().to_string());
        let leaf_schema = self.access.leaf_type().record_schema();
        let Getter {
            access,
            null_policy,
            ..
        } = self;

        CompiledGetter {
            description,
            read: Arc::new(move |record: &T| -> FilterResult<Value> {
                let field = access.read(record, null_policy)?;
                to_value(field, leaf_schema)
            }),
        }
    }
}

fn to_value(field: FieldRef<'_>, leaf_schema: Option<&'static RecordSchema>) -> FilterResult<Value> {
    match field {
        FieldRef::Null => Ok(Value::Null),
        FieldRef::Scalar(value) => Ok(value.to_value()),
        FieldRef::Record(nested) => snapshot(nested, leaf_schema),
    }
}

fn snapshot(
    nested: &(dyn Any + 'static),
    leaf_schema: Option<&'static RecordSchema>,
) -> FilterResult<Value> {
    let schema = leaf_schema.ok_or_else(|| FilterError::record_mismatch("record"))?;
    schema
        .snapshot(nested)
        .ok_or_else(|| FilterError::record_mismatch(schema.name()))
}

impl<T> Clone for Getter<T> {
    fn clone(&self) -> Self {
        Self {
            access: self.access.clone(),
            null_policy: self.null_policy,
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Getter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("record", &self.access.root_schema().name())
            .field("path", &self.access.path().to_string())
            .field("null_policy", &self.null_policy)
            .finish()
    }
}

type ReadFn<T> = dyn Fn(&T) -> FilterResult<Value> + Send + Sync;

/// A getter materialized as a reusable, thread-safe closure.
pub struct CompiledGetter<T> {
    description: Arc<str>,
    read: Arc<ReadFn<T>>,
}

impl<T: Record> CompiledGetter<T> {
    /// Read the leaf from one record.
    pub fn get(&self, record: &T) -> FilterResult<Value> {
        (self.read)(record)
    }
}

impl<T> Clone for CompiledGetter<T> {
    fn clone(&self) -> Self {
        Self {
            description: Arc::clone(&self.description),
            read: Arc::clone(&self.read),
        }
    }
}

impl<T> fmt::Debug for CompiledGetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledGetter")
            .field(&self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{PredicateBuilder, compiled_getter, getter};
    use crate::test_records::{Person, person};
    use dynpred_schema::FilterConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_nested_scalar() {
        let city = getter::<Person>("Address.City").unwrap();
        assert_eq!(
            city.get(&person("Ann", 30, "Paris")).unwrap(),
            Value::Text("Paris".into())
        );
    }

    #[test]
    fn test_get_typed_scalar() {
        let age = getter::<Person>("Age").unwrap();
        assert_eq!(age.get(&person("Ann", 30, "Paris")).unwrap(), Value::I32(30));
    }

    #[test]
    fn test_get_null_leaf() {
        let nickname = getter::<Person>("Nickname").unwrap();
        assert_eq!(nickname.get(&person("Ann", 30, "Paris")).unwrap(), Value::Null);
    }

    #[test]
    fn test_get_record_leaf_snapshot() {
        let address = getter::<Person>("Address").unwrap();
        let value = address.get(&person("Ann", 30, "Paris")).unwrap();
        assert_eq!(value.to_string(), "{City: \"Paris\"}");
    }

    #[test]
    fn test_absent_intermediate() {
        let manager = getter::<Person>("Manager.Name").unwrap();
        let bob = person("Bob", 30, "Paris");
        assert_eq!(
            manager.get(&bob).unwrap_err(),
            FilterError::null_reference("Manager.Name", "Manager")
        );

        let builder = PredicateBuilder::with_config(
            FilterConfig::default().with_null_policy(NullPolicy::ShortCircuit),
        );
        let manager = builder.getter::<Person>("Manager.Name").unwrap();
        assert_eq!(manager.get(&bob).unwrap(), Value::Null);
    }

    #[test]
    fn test_compiled_matches_interpreted() {
        let mut bob = person("Bob", 30, "Paris");
        bob.manager = Some(Box::new(person("Ann", 50, "Lyon")));

        for path in ["Name", "Age", "Address", "Address.City", "Manager.Address.City"] {
            let one_shot = getter::<Person>(path).unwrap();
            let compiled = compiled_getter::<Person>(path).unwrap();
            assert_eq!(one_shot.get(&bob).unwrap(), compiled.get(&bob).unwrap());
        }
    }
}
