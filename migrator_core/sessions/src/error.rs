use common::error::diagnostics::DiagnosticMessage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {context}")]
    NotFound { context: DiagnosticMessage },

    #[error("session already exists: {context}")]
    AlreadyExists { context: DiagnosticMessage },

    #[error("invalid session state transition: {context}")]
    InvalidTransition { context: DiagnosticMessage },
}

impl SessionError {
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { context: DiagnosticMessage::new(message.into()) }
    }

    #[track_caller]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists { context: DiagnosticMessage::new(message.into()) }
    }

    #[track_caller]
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition { context: DiagnosticMessage::new(message.into()) }
    }
}
