//! Error types for path resolution, predicate construction and evaluation.
//!
//! Every error is terminal for the call that raised it: they describe bad
//! input or a programming mistake, never a transient condition, so nothing in
//! this crate retries. The calling layer decides whether to skip the record,
//! log, or abort the batch.
//!
//! ```rust
//! use dynpred_query::FilterError;
//!
//! let err = FilterError::unknown_property("Town", "Address");
//! assert_eq!(err.to_string(), "record `Address` has no property `Town`");
//! ```

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::filter::FilterValue;

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while resolving paths or building and evaluating filters.
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum FilterError {
    /// The path string is empty or has an empty or malformed segment.
    #[error("invalid property path `{path}`: {reason}")]
    #[diagnostic(
        code(dynpred::query::invalid_path),
        help("a property path is a chain of identifiers separated by single dots, e.g. `Address.City`")
    )]
    InvalidPath { path: String, reason: String },

    /// A segment does not name a property on the type reached so far.
    #[error("record `{type_name}` has no property `{segment}`")]
    #[diagnostic(
        code(dynpred::query::unknown_property),
        help("property lookups are exact and case-sensitive")
    )]
    UnknownProperty { segment: String, type_name: String },

    /// The operator is not defined for the leaf type.
    #[error("operator `{op}` is not supported for `{type_name}`")]
    #[diagnostic(
        code(dynpred::query::unsupported_operator),
        help(
            "Contains, StartsWith and EndsWith need a text property; GreaterThan and LessThan need a number or date/time property"
        )
    )]
    UnsupportedOperator { op: String, type_name: String },

    /// The comparison value cannot be converted to the leaf type.
    #[error("cannot convert {value} to `{target}`: {reason}")]
    #[diagnostic(code(dynpred::query::value_coercion))]
    ValueCoercion {
        value: String,
        target: String,
        reason: String,
    },

    /// An intermediate property was absent while evaluating a record.
    #[error("`{segment}` is null while evaluating `{path}`")]
    #[diagnostic(
        code(dynpred::query::null_reference),
        help("use `NullPolicy::ShortCircuit` to treat absent intermediate properties as null")
    )]
    NullReference { path: String, segment: String },

    /// A record of the wrong type reached a type-erased accessor.
    #[error("record is not a `{expected}`")]
    #[diagnostic(code(dynpred::query::record_mismatch))]
    RecordMismatch { expected: String },
}

impl FilterError {
    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown property error.
    pub fn unknown_property(segment: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnknownProperty {
            segment: segment.into(),
            type_name: type_name.into(),
        }
    }

    /// Create an unsupported operator error.
    pub fn unsupported_operator(op: impl fmt::Display, type_name: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            op: op.to_string(),
            type_name: type_name.into(),
        }
    }

    /// Create a value coercion error.
    pub fn value_coercion(
        value: &FilterValue,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ValueCoercion {
            value: format!("{} {}", value.type_name(), value),
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a null reference error.
    pub fn null_reference(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::NullReference {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Create a record mismatch error.
    pub fn record_mismatch(expected: impl Into<String>) -> Self {
        Self::RecordMismatch {
            expected: expected.into(),
        }
    }

    /// Check if this error was raised while evaluating a record rather than
    /// while building the filter.
    pub fn is_evaluation_error(&self) -> bool {
        matches!(self, Self::NullReference { .. } | Self::RecordMismatch { .. })
    }
}
