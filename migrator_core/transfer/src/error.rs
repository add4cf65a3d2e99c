use common::error::diagnostics::DiagnosticMessage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("source error: {context}")]
    Source { context: DiagnosticMessage },

    #[error("target error: {context}")]
    Target { context: DiagnosticMessage },

    #[error("object storage error: {context}")]
    Storage { context: DiagnosticMessage },

    #[error("write rejected, embedded NUL byte in column data: {context}. {remediation}")]
    EmbeddedNul { context: DiagnosticMessage, remediation: &'static str },
}

const NUL_REMEDIATION: &str =
    "strip or replace NUL (0x00) bytes in the source column before retrying, \
     or add it to remove-nulls to have the engine strip them automatically";

impl TransferError {
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

    /// Wraps `message` as an embedded-NUL failure if it carries that
    /// driver's telltale signature, otherwise falls back to a plain target
    /// error. Every dialect's driver reports this differently, so this
    /// matches loosely rather than parsing a specific exception type.
    #[track_caller]
    pub fn write_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.to_ascii_lowercase().contains("nul")
            && (message.contains("0x00") || message.to_ascii_lowercase().contains("null byte"))
        {
            Self::EmbeddedNul {
                context: DiagnosticMessage::new(message),
                remediation: NUL_REMEDIATION,
            }
        } else {
            Self::target(message)
        }
    }
}

impl From<clients::ClientError> for TransferError {
    #[track_caller]
    fn from(err: clients::ClientError) -> Self {
        TransferError::write_failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_nul_signature_is_detected() {
        let err = TransferError::write_failed("ERROR: invalid byte sequence, NUL (0x00) not allowed");
        assert!(matches!(err, TransferError::EmbeddedNul { .. }));
    }

    #[test]
    fn ordinary_failures_are_not_misclassified() {
        let err = TransferError::write_failed("ERROR: duplicate key value violates unique constraint");
        assert!(matches!(err, TransferError::Target { .. }));
    }
}
