use common::error::diagnostics::DiagnosticMessage;
use thiserror::Error;

/// Errors raised by an RDBMS or S3 adapter. Every dialect's adapter and the
/// S3 wrapper funnel their native driver errors through this one type.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid connection details: {context}")]
    InvalidConnection { context: DiagnosticMessage },

    #[error("SQL syntax error: {context}")]
    Syntax { context: DiagnosticMessage },

    #[error("unexpected database error: {context}")]
    Unexpected { context: DiagnosticMessage },

    #[error("object storage error: {context}")]
    Storage { context: DiagnosticMessage },

    #[error("I/O error: {context}")]
    Io {
        context: DiagnosticMessage,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    #[track_caller]
    pub fn invalid_connection(message: impl Into<String>) -> Self {
        Self::InvalidConnection {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            context: DiagnosticMessage::new(message.into()),
        }
    }
}

impl From<std::io::Error> for ClientError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: DiagnosticMessage::new(err.to_string()),
            source: err,
        }
    }
}

impl From<ClientError> for catalog::CatalogError {
    #[track_caller]
    fn from(err: ClientError) -> Self {
        catalog::CatalogError::construction_failed(err.to_string())
    }
}
