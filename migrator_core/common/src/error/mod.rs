pub mod diagnostics;

pub use diagnostics::DiagnosticMessage;

use thiserror::Error;

/// Errors raised while validating request parameters or on-disk/environment
/// configuration (spec.md §7, "Configuration" and "Environment" kinds).
/// Both map to HTTP 400 at the web surface.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required attribute: {context}")]
    MissingAttribute { context: DiagnosticMessage },

    #[error("attribute not recognized in this context: {context}")]
    UnknownAttribute { context: DiagnosticMessage },

    #[error("invalid enum value: {context}")]
    InvalidEnum { context: DiagnosticMessage },

    #[error("value out of range: {context}")]
    OutOfRange { context: DiagnosticMessage },

    #[error("mutually exclusive options set together: {context}")]
    MutuallyExclusive { context: DiagnosticMessage },

    #[error("engine unknown or unconfigured: {context}")]
    NotFound { context: DiagnosticMessage },

    #[error("duplicate configuration: {context}")]
    Duplicate { context: DiagnosticMessage },

    #[error("I/O error: {context}")]
    Io {
        context: DiagnosticMessage,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {context}")]
    Toml {
        context: DiagnosticMessage,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[track_caller]
    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingAttribute {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn unknown_attribute(message: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn invalid_enum(message: impl Into<String>) -> Self {
        Self::InvalidEnum {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn mutually_exclusive(message: impl Into<String>) -> Self {
        Self::MutuallyExclusive {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            context: DiagnosticMessage::new(message.into()),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: DiagnosticMessage::new(err.to_string()),
            source: err,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    #[track_caller]
    fn from(err: toml::de::Error) -> Self {
        Self::Toml {
            context: DiagnosticMessage::new(err.to_string()),
            source: err,
        }
    }
}
