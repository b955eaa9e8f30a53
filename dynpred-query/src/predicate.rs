//! Predicates over a resolved property path.
//!
//! A [`Predicate`] is the inspectable form: it keeps the resolved path, the
//! operator and the coerced comparison value, and interprets them on every
//! call to [`Predicate::evaluate`]. [`Predicate::compile`] turns it into a
//! [`CompiledPredicate`], a shareable closure with the operator dispatch
//! already chosen.
//!
//! ```rust,ignore
//! use dynpred_query::{FilterOperator, predicate};
//!
//! let in_paris = predicate::<Person>("Address.City", FilterOperator::Equals, "Paris")?;
//! assert_eq!(in_paris.to_string(), "Address.City == \"Paris\"");
//!
//! let in_paris = in_paris.compile();
//! let parisians: Vec<_> = people.iter().filter(|p| in_paris.matches(p)).collect();
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use dynpred_schema::{FieldRef, NullPolicy, Record, Value, ValueRef};

use crate::error::FilterResult;
use crate::filter::FilterOperator;
use crate::path::{PropertyPath, ResolvedAccess};

/// Comparison between a leaf read from a record and the coerced value.
pub(crate) type Test = fn(FieldRef<'_>, &Value) -> bool;

/// Select the comparison for an operator.
pub(crate) fn dispatch(op: FilterOperator) -> Test {
    match op {
        FilterOperator::Equals => equals,
        FilterOperator::DoesntEqual => |field, value| !equals(field, value),
        FilterOperator::GreaterThan => {
            |field, value| ordering(field, value) == Some(Ordering::Greater)
        }
        FilterOperator::LessThan => |field, value| ordering(field, value) == Some(Ordering::Less),
        FilterOperator::Contains => {
            |field, value| text(field, value).is_some_and(|(lhs, rhs)| lhs.contains(rhs))
        }
        FilterOperator::StartsWith => {
            |field, value| text(field, value).is_some_and(|(lhs, rhs)| lhs.starts_with(rhs))
        }
        FilterOperator::EndsWith => {
            |field, value| text(field, value).is_some_and(|(lhs, rhs)| lhs.ends_with(rhs))
        }
    }
}

fn equals(field: FieldRef<'_>, value: &Value) -> bool {
    match (field, value.as_value_ref()) {
        (FieldRef::Null, _) => value.is_null(),
        (FieldRef::Scalar(lhs), Some(rhs)) => lhs.compare(rhs) == Some(Ordering::Equal),
        _ => false,
    }
}

fn ordering(field: FieldRef<'_>, value: &Value) -> Option<Ordering> {
    match (field, value.as_value_ref()) {
        (FieldRef::Scalar(lhs), Some(rhs)) => lhs.compare(rhs),
        _ => None,
    }
}

fn text<'a>(field: FieldRef<'a>, value: &'a Value) -> Option<(&'a str, &'a str)> {
    match field {
        FieldRef::Scalar(ValueRef::Text(lhs)) => value.as_str().map(|rhs| (lhs, rhs)),
        _ => None,
    }
}

/// A boolean test over records of type `T`.
pub struct Predicate<T> {
    access: ResolvedAccess,
    op: FilterOperator,
    value: Value,
    null_policy: NullPolicy,
    _record: PhantomData<fn(&T)>,
}

impl<T: Record> Predicate<T> {
    pub(crate) fn new(
        access: ResolvedAccess,
        op: FilterOperator,
        value: Value,
        null_policy: NullPolicy,
    ) -> Self {
        Self {
            access,
            op,
            value,
            null_policy,
            _record: PhantomData,
        }
    }

    /// Get the property path being tested.
    pub fn path(&self) -> &PropertyPath {
        self.access.path()
    }

    /// Get the resolved access chain.
    pub fn access(&self) -> &ResolvedAccess {
        &self.access
    }

    /// Get the operator.
    pub fn operator(&self) -> FilterOperator {
        self.op
    }

    /// Get the comparison value, already coerced to the leaf type.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Get the policy applied when an intermediate property is absent.
    pub fn null_policy(&self) -> NullPolicy {
        self.null_policy
    }

    /// Evaluate against one record.
    ///
    /// Walks the path again on every call; nothing is cached between records.
    pub fn evaluate(&self, record: &T) -> FilterResult<bool> {
        let field = self.access.read(record, self.null_policy)?;
        Ok(dispatch(self.op)(field, &self.value))
    }

    /// Build the long-lived form of this predicate.
    pub fn compile(self) -> CompiledPredicate<T> {
        let description: Arc<str> = Arc::from(self.to_string());
        crate::dynpred_debug!(predicate = %description, "predicate compiled");
        let test = dispatch(self.op);
        let Predicate {
            access,
            value,
            null_policy,
            ..
        } = self;

        CompiledPredicate {
            description,
            eval: Arc::new(move |record: &T| -> FilterResult<bool> {
                let field = access.read(record, null_policy)?;
                Ok(test(field, &value))
            }),
        }
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            access: self.access.clone(),
            op: self.op,
            value: self.value.clone(),
            null_policy: self.null_policy,
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.access.path(), self.op.symbol(), self.value)
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("record", &self.access.root_schema().name())
            .field("path", &self.access.path().to_string())
            .field("op", &self.op)
            .field("value", &self.value)
            .field("null_policy", &self.null_policy)
            .finish()
    }
}

type EvalFn<T> = dyn Fn(&T) -> FilterResult<bool> + Send + Sync;

/// A predicate materialized as a reusable, thread-safe closure.
///
/// Cloning is cheap; clones share the same closure.
pub struct CompiledPredicate<T> {
    description: Arc<str>,
    eval: Arc<EvalFn<T>>,
}

impl<T: Record> CompiledPredicate<T> {
    /// Evaluate against one record.
    pub fn call(&self, record: &T) -> FilterResult<bool> {
        (self.eval)(record)
    }

    /// Evaluate against one record, treating an evaluation error as no match.
    pub fn matches(&self, record: &T) -> bool {
        match self.call(record) {
            Ok(matched) => matched,
            Err(err) => {
                tracing::trace!(predicate = %self.description, error = %err, "predicate evaluation failed");
                false
            }
        }
    }

    /// Get a plain closure for iterator adaptors such as `filter`.
    pub fn as_fn(&self) -> impl Fn(&T) -> bool + Clone + Send + Sync + use<T> {
        let predicate = self.clone();
        move |record: &T| predicate.matches(record)
    }
}

impl<T> Clone for CompiledPredicate<T> {
    fn clone(&self) -> Self {
        Self {
            description: Arc::clone(&self.description),
            eval: Arc::clone(&self.eval),
        }
    }
}

impl<T> fmt::Display for CompiledPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl<T> fmt::Debug for CompiledPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledPredicate")
            .field(&self.description)
            .finish()
    }
}
