use common::error::DiagnosticMessage;
use thiserror::Error;

/// Failures raised while resolving a column's target type (component A).
///
/// Most gaps in the equivalence matrices are not errors: an unresolved
/// column falls back to the source type and is merely logged (see
/// [`crate::resolver::resolve_column_type`]). This enum only covers cases
/// where the column itself is malformed enough that no fallback applies.
#[derive(Debug, Error)]
pub enum TypeResolutionError {
    #[error("{context}")]
    UnknownTypeName { context: DiagnosticMessage },

    #[error("{context}")]
    ForeignKeyCycle { context: DiagnosticMessage },
}

impl TypeResolutionError {
    #[track_caller]
    pub fn unknown_type_name(message: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        Self::UnknownTypeName {
            context: DiagnosticMessage::new(message),
        }
    }

    #[track_caller]
    pub fn fk_cycle(message: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        Self::ForeignKeyCycle {
            context: DiagnosticMessage::new(message),
        }
    }
}
