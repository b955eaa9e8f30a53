//! Procedural macros for dynpred.
//!
//! # Macros
//!
//! - [`Record`] - Derive the property schema of a struct
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(dynpred::Record)]
//! #[record(rename_all = "PascalCase")]
//! struct Person {
//!     name: String,
//!     age: i32,
//!     address: Address,
//!     manager: Option<Box<Person>>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod generators;

/// Derive macro exposing a struct's fields to property paths.
///
/// Every field type must implement `Field`: the supported scalars, other
/// `Record` types, and `Option`, `Box` or `Arc` around them.
///
/// # Attributes
///
/// ## Struct-level
/// - `#[record(name = "Name")]` - Record name used in error messages (default: struct name)
/// - `#[record(rename_all = "PascalCase")]` - Rename every property; also `camelCase`,
///   `snake_case`, `SCREAMING_SNAKE_CASE`, `lowercase`, `UPPERCASE`
/// - `#[record(crate = "dynpred_schema")]` - Path to the crate exporting the schema types
///
/// ## Field-level
/// - `#[record(rename = "Name")]` - Property name for this field
/// - `#[record(skip)]` - Do not expose this field
///
/// # Example
///
/// ```rust,ignore
/// #[derive(dynpred::Record)]
/// #[record(rename_all = "PascalCase")]
/// struct Address {
///     city: String,
///     #[record(rename = "Zip")]
///     postal_code: Option<String>,
///     #[record(skip)]
///     geocode_cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generators::derive_record_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
