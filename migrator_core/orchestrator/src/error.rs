use common::error::diagnostics::DiagnosticMessage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("session error: {context}")]
    Session { context: DiagnosticMessage },

    #[error("catalog error: {context}")]
    Catalog { context: DiagnosticMessage },

    #[error("client error: {context}")]
    Client { context: DiagnosticMessage },

    #[error("transfer error: {context}")]
    Transfer { context: DiagnosticMessage },

    #[error("sync error: {context}")]
    Sync { context: DiagnosticMessage },

    #[error("migration in session '{session_id}' aborted on request")]
    Aborted { session_id: String },
}

impl MigrationError {
    #[track_caller]
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog { context: DiagnosticMessage::new(message.into()) }
    }
}

impl From<sessions::SessionError> for MigrationError {
    #[track_caller]
    fn from(err: sessions::SessionError) -> Self {
        MigrationError::Session { context: DiagnosticMessage::new(err.to_string()) }
    }
}

impl From<catalog::CatalogError> for MigrationError {
    #[track_caller]
    fn from(err: catalog::CatalogError) -> Self {
        MigrationError::Catalog { context: DiagnosticMessage::new(err.to_string()) }
    }
}

impl From<clients::ClientError> for MigrationError {
    #[track_caller]
    fn from(err: clients::ClientError) -> Self {
        MigrationError::Client { context: DiagnosticMessage::new(err.to_string()) }
    }
}

impl From<transfer::TransferError> for MigrationError {
    #[track_caller]
    fn from(err: transfer::TransferError) -> Self {
        MigrationError::Transfer { context: DiagnosticMessage::new(err.to_string()) }
    }
}

impl From<sync::SyncError> for MigrationError {
    #[track_caller]
    fn from(err: sync::SyncError) -> Self {
        MigrationError::Sync { context: DiagnosticMessage::new(err.to_string()) }
    }
}
