//! Error type for the configuration boundary.
//!
//! Only programming and configuration mistakes are errors in forma. A field
//! that fails validation records messages on itself and a lookup of an
//! unknown field yields `None`; neither ever produces a [`FormError`].
//!
//! Construct configuration errors with [`config_err!`](crate::config_err)
//! instead of spelling out the variant:
//!
//! ```rust
//! use forma::{config_err, FormError};
//! let err: FormError = config_err!("colour", "expected an option map, found {}", "String");
//! assert_eq!(
//!     err.to_string(),
//!     "invalid configuration for field 'colour': expected an option map, found String"
//! );
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormError>;

/// Every failure forma reports through `Result`.
#[derive(Debug, Error, Diagnostic)]
pub enum FormError {
    #[error("unknown field type '{field_type}' for field '{name}'")]
    #[diagnostic(
        code(forma::config::unknown_type),
        help("run `forma types` to list the supported field types")
    )]
    UnknownFieldType { name: String, field_type: String },

    #[error("invalid configuration for field '{name}': {message}")]
    #[diagnostic(code(forma::config::invalid))]
    InvalidConfig { name: String, message: String },

    #[error("field '{name}' of type '{field_type}' needs a token store")]
    #[diagnostic(
        code(forma::config::missing_token_store),
        help("build the form with FieldFactory::with_token_store")
    )]
    MissingTokenStore { name: String, field_type: String },

    #[error("invalid pattern '{pattern}'")]
    #[diagnostic(code(forma::validation::pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unsupported configuration file '{}'", .path.display())]
    #[diagnostic(
        code(forma::config::format),
        help("use a .json, .yaml or .yml file")
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read '{}'", .path.display())]
    #[diagnostic(code(forma::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON configuration")]
    #[diagnostic(code(forma::config::json))]
    Json(#[from] serde_json::Error),

    #[error("malformed YAML configuration")]
    #[diagnostic(code(forma::config::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl FormError {
    /// Name of the field the error is about, when there is one.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            FormError::UnknownFieldType { name, .. }
            | FormError::InvalidConfig { name, .. }
            | FormError::MissingTokenStore { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Builds a [`FormError::InvalidConfig`] for a named field with a formatted
/// message.
#[macro_export]
macro_rules! config_err {
    ($name:expr, $msg:expr) => {
        $crate::FormError::InvalidConfig {
            name: $name.to_string(),
            message: format!("{}", $msg),
        }
    };
    ($name:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $crate::FormError::InvalidConfig {
            name: $name.to_string(),
            message: format!($fmt, $($arg),+),
        }
    };
}

#[cfg(test)]
mod diagnostics_tests {
    use super::*;
    use miette::Report;

    #[test]
    fn unknown_type_points_at_catalog() {
        let err = FormError::UnknownFieldType {
            name: "age".into(),
            field_type: "slider".into(),
        };
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("forma types"));
        assert_eq!(err.field_name(), Some("age"));
    }

    #[test]
    fn report_carries_code() {
        let err = FormError::MissingTokenStore {
            name: "token".into(),
            field_type: "csrf".into(),
        };
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("forma::config::missing_token_store"));
        assert!(output.contains("with_token_store"));
    }

    #[test]
    fn config_err_formats_arguments() {
        let err = config_err!("size", "expected {} got {}", "number", "list");
        assert_eq!(
            err.to_string(),
            "invalid configuration for field 'size': expected number got list"
        );
    }
}
