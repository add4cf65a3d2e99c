use common::error::diagnostics::DiagnosticMessage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("source error: {context}")]
    Source { context: DiagnosticMessage },

    #[error("target error: {context}")]
    Target { context: DiagnosticMessage },

    #[error("object storage error: {context}")]
    Storage { context: DiagnosticMessage },
}

impl SyncError {
    #[track_caller]
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source { context: DiagnosticMessage::new(message.into()) }
    }

    #[track_caller]
    pub fn target(message: impl Into<String>) -> Self {
        Self::Target { context: DiagnosticMessage::new(message.into()) }
    }

    #[track_caller]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage { context: DiagnosticMessage::new(message.into()) }
    }
}

impl From<clients::ClientError> for SyncError {
    #[track_caller]
    fn from(err: clients::ClientError) -> Self {
        SyncError::target(err.to_string())
    }
}

impl From<transfer::TransferError> for SyncError {
    #[track_caller]
    fn from(err: transfer::TransferError) -> Self {
        SyncError::target(err.to_string())
    }
}
