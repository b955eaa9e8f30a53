//! # dynpred-query
//!
//! Runtime predicates and getters over dotted property paths.
//!
//! This crate provides:
//! - Property path parsing and resolution against a record schema ([`path`])
//! - The closed set of [`FilterOperator`]s and raw [`FilterValue`]s
//! - Coercion of raw values to the exact type of the leaf property ([`coerce`])
//! - [`Predicate`] and [`Getter`], plus their compiled, shareable forms
//! - [`PredicateBuilder`] tying it together under a [`FilterConfig`]
//!
//! ## Predicates
//!
//! ```rust,ignore
//! use dynpred_query::{FilterOperator, predicate};
//!
//! let in_paris = predicate::<Person>("Address.City", FilterOperator::Equals, "Paris")?;
//! assert!(in_paris.evaluate(&person)?);
//!
//! // Coerced to the `i32` type of `Age` up front
//! let older = predicate::<Person>("Age", FilterOperator::GreaterThan, "25")?.compile();
//! let count = people.iter().filter(older.as_fn()).count();
//! ```
//!
//! ## Getters
//!
//! ```rust,ignore
//! use dynpred_query::getter;
//!
//! let city = getter::<Person>("Address.City")?;
//! assert_eq!(city.get(&person)?, Value::Text("Paris".into()));
//! ```
//!
//! ## Errors
//!
//! Construction fails with [`FilterError::InvalidPath`],
//! [`FilterError::UnknownProperty`], [`FilterError::UnsupportedOperator`] or
//! [`FilterError::ValueCoercion`]. Evaluation fails only with
//! [`FilterError::NullReference`] under [`NullPolicy::Propagate`].

pub mod builder;
pub mod coerce;
pub mod error;
pub mod filter;
pub mod getter;
pub mod logging;
pub mod path;
pub mod predicate;

pub use builder::{PredicateBuilder, compiled_getter, compiled_predicate, getter, predicate};
pub use error::{FilterError, FilterResult};
pub use filter::{FilterOperator, FilterValue};
pub use getter::{CompiledGetter, Getter};
pub use path::{PropertyPath, ResolvedAccess, resolve, resolve_in};
pub use predicate::{CompiledPredicate, Predicate};

pub use dynpred_schema::{FilterConfig, NullPolicy, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::{PredicateBuilder, compiled_getter, compiled_predicate, getter, predicate};
    pub use crate::error::{FilterError, FilterResult};
    pub use crate::filter::{FilterOperator, FilterValue};
    pub use crate::getter::{CompiledGetter, Getter};
    pub use crate::predicate::{CompiledPredicate, Predicate};
    pub use dynpred_schema::{FilterConfig, NullPolicy, Record, Value};
}
