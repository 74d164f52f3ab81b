//! Error types for the propcopy core library
//!
//! Fatal copy failures are modelled as [`CopyError`] variants built with
//! thiserror. Failures raised inside user-supplied accessors are carried as
//! `anyhow::Error` sources so any error type can flow through them.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Main error type for copy operations
#[derive(Error, Debug)]
pub enum CopyError {
    /// The target type could not be constructed with no arguments
    #[error("Cannot instantiate {type_name}: {message}")]
    Instantiation {
        type_name: &'static str,
        message: String,
    },

    /// A textual source value could not be parsed into the target scalar
    #[error("Cannot convert {value:?} to {target} for property '{property}'")]
    Conversion {
        property: String,
        value: String,
        target: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An accessor failed when invoked
    #[error("Accessor {kind} '{property}' on {type_name} failed: {source}")]
    Access {
        property: String,
        type_name: &'static str,
        kind: AccessorKind,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing and serialization errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, CopyError>;

/// The two accessor kinds a type can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessorKind {
    /// Zero-argument readers named `get*`
    Getter,
    /// Single-argument writers named `set*`
    Setter,
}

impl AccessorKind {
    /// Method-name prefix that marks an accessor of this kind
    pub fn prefix(self) -> &'static str {
        match self {
            AccessorKind::Getter => "get",
            AccessorKind::Setter => "set",
        }
    }
}

impl fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorKind::Getter => write!(f, "getter"),
            AccessorKind::Setter => write!(f, "setter"),
        }
    }
}

impl CopyError {
    /// Whether this error came from parsing a textual source value
    pub fn is_conversion(&self) -> bool {
        matches!(self, CopyError::Conversion { .. })
    }

    /// Whether this error came from constructing the target
    pub fn is_instantiation(&self) -> bool {
        matches!(self, CopyError::Instantiation { .. })
    }
}

// Conversion implementations
impl From<serde_json::Error> for CopyError {
    fn from(err: serde_json::Error) -> Self {
        CopyError::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for CopyError {
    fn from(err: serde_yaml::Error) -> Self {
        CopyError::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for CopyError {
    fn from(err: std::io::Error) -> Self {
        CopyError::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for CopyError {
    fn from(err: anyhow::Error) -> Self {
        CopyError::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
