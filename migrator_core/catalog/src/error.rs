use common::error::diagnostics::DiagnosticMessage;
use thiserror::Error;

/// Errors raised while reflecting a source schema and constructing its
/// migrated counterpart on the target (component B).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("schema not found: {context}")]
    SchemaNotFound { context: DiagnosticMessage },

    #[error("schema reflection returned a warning, aborting: {context}")]
    ReflectionIncomplete { context: DiagnosticMessage },

    #[error("relations not found in source schema: {0:?}")]
    RelationsNotFound(Vec<String>),

    #[error("table dependency cycle: {0:?}")]
    DependencyCycle(Vec<String>),

    #[error("schema construction failed: {context}")]
    ConstructionFailed { context: DiagnosticMessage },
}

impl CatalogError {
    #[track_caller]
    pub fn schema_not_found(name: impl Into<String>) -> Self {
        Self::SchemaNotFound {
            context: DiagnosticMessage::new(name.into()),
        }
    }

    #[track_caller]
    pub fn reflection_incomplete(message: impl Into<String>) -> Self {
        Self::ReflectionIncomplete {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn construction_failed(message: impl Into<String>) -> Self {
        Self::ConstructionFailed {
            context: DiagnosticMessage::new(message.into()),
        }
    }
}

impl From<dag::DagError> for CatalogError {
    #[track_caller]
    fn from(err: dag::DagError) -> Self {
        match err {
            dag::DagError::CycleDetected(members) => CatalogError::DependencyCycle(members),
            other => CatalogError::ConstructionFailed {
                context: DiagnosticMessage::new(other.to_string()),
            },
        }
    }
}
