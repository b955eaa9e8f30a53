//! Error types for schema registration and configuration loading.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while describing a record or loading configuration.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(dynpred::schema::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML")]
    #[diagnostic(code(dynpred::schema::toml_error))]
    TomlError {
        #[source]
        source: toml::de::Error,
    },

    /// A property name that cannot appear in a dotted path.
    #[error("invalid property `{record}.{property}`: {message}")]
    #[diagnostic(
        code(dynpred::schema::invalid_property),
        help("property names must be identifiers: a letter or `_` followed by letters, digits or `_`")
    )]
    InvalidProperty {
        record: String,
        property: String,
        message: String,
    },

    /// The same property name was registered twice on one record.
    #[error("duplicate property `{property}` on record `{record}`")]
    #[diagnostic(code(dynpred::schema::duplicate_property))]
    DuplicateProperty { record: String, property: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    #[diagnostic(code(dynpred::schema::config_error))]
    ConfigError { message: String },
}

impl SchemaError {
    /// Create an invalid property error.
    pub fn invalid_property(
        record: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            record: record.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate property error.
    pub fn duplicate_property(record: impl Into<String>, property: impl Into<String>) -> Self {
        Self::DuplicateProperty {
            record: record.into(),
            property: property.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_property_message() {
        let err = SchemaError::invalid_property("Person", "first.name", "contains `.`");
        assert_eq!(
            err.to_string(),
            "invalid property `Person.first.name`: contains `.`"
        );
    }

    #[test]
    fn test_duplicate_property_code() {
        let err = SchemaError::duplicate_property("Person", "Name");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("dynpred::schema::duplicate_property"));
    }
}
