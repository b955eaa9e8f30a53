//! # dynpred-schema
//!
//! Record schema description for dynpred.
//!
//! This crate provides:
//! - The [`Record`] and [`Field`] traits that describe which properties a
//!   record type exposes to dotted property paths
//! - [`RecordSchema`], the per-type table of `(name, type, accessor)` entries
//! - Owned and borrowed scalar values ([`Value`], [`ValueRef`])
//! - Configuration parser for `dynpred.toml` files
//!
//! ## Example
//!
//! ```rust,ignore
//! use dynpred_schema::{FilterConfig, Record};
//!
//! #[derive(dynpred::Record)]
//! #[record(rename_all = "PascalCase")]
//! struct Address {
//!     city: String,
//! }
//!
//! let schema = Address::schema();
//! assert!(schema.property("City").is_some());
//!
//! let config = FilterConfig::from_file("dynpred.toml")?;
//! ```

pub mod config;
pub mod error;
pub mod record;
pub mod schema;
pub mod value;

pub use config::{FilterConfig, NullPolicy};
pub use error::{SchemaError, SchemaResult};
pub use record::{Field, Record};
pub use schema::{
    Accessor, FieldRef, Property, PropertyType, RecordSchema, RecordSchemaBuilder, SchemaFn,
    is_identifier,
};
pub use value::{ScalarKind, Value, ValueRef};
