//! # dynpred
//!
//! Runtime-built predicates and getters over the dotted property paths of
//! typed records.
//!
//! dynpred provides:
//! - `#[derive(Record)]` to describe which properties a struct exposes
//! - Path resolution checked against the record schema (`Address.City`)
//! - Predicates for `Equals`, `DoesntEqual`, `GreaterThan`, `LessThan`,
//!   `Contains`, `StartsWith` and `EndsWith`, with the comparison value
//!   coerced to the exact property type
//! - Getters returning a property as an untyped [`Value`]
//! - Compiled, thread-safe forms of both for batch evaluation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dynpred::prelude::*;
//!
//! #[derive(Record)]
//! #[record(rename_all = "PascalCase")]
//! pub struct Address {
//!     pub city: String,
//! }
//!
//! #[derive(Record)]
//! #[record(rename_all = "PascalCase")]
//! pub struct Person {
//!     pub name: String,
//!     pub age: i32,
//!     pub address: Address,
//! }
//!
//! fn main() -> Result<(), FilterError> {
//!     let in_paris = compiled_predicate::<Person>("Address.City", FilterOperator::Equals, "Paris")?;
//!     let older = compiled_predicate::<Person>("Age", FilterOperator::GreaterThan, "25")?;
//!
//!     let people = load_people();
//!     let matches = people
//!         .iter()
//!         .filter(|p| in_paris.matches(p) && older.matches(p))
//!         .count();
//!
//!     let city = getter::<Person>("Address.City")?;
//!     println!("{}", city.get(&people[0])?);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Record schema description and configuration.
pub mod schema {
    pub use dynpred_schema::*;
}

/// Path resolution, predicates and getters.
pub mod query {
    pub use dynpred_query::*;
}

// Re-export the derive next to the trait of the same name
pub use dynpred_codegen::Record;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::query::prelude::*;
    pub use crate::Record;
}

// Re-export key types at the crate root
pub use dynpred_query::{
    CompiledGetter, CompiledPredicate, FilterError, FilterOperator, FilterResult, FilterValue,
    Getter, Predicate, PredicateBuilder, PropertyPath, ResolvedAccess, compiled_getter,
    compiled_predicate, getter, logging, predicate, resolve, resolve_in,
};
pub use dynpred_schema::{
    Field, FieldRef, FilterConfig, NullPolicy, PropertyType, Record, RecordSchema, ScalarKind,
    SchemaError, Value,
};
