use common::error::DiagnosticMessage;
use thiserror::Error;

/// Errors raised while building or ordering the table-dependency graph
/// (component B: schema reflection feeds this before DDL is emitted).
#[derive(Debug, Error)]
pub enum DagError {
    #[error("duplicate table node: {context}")]
    DuplicateNode { context: DiagnosticMessage },

    #[error("cycle detected among tables: {0:?}")]
    CycleDetected(Vec<String>),

    #[error("referenced table not found: {context}")]
    NotFound { context: DiagnosticMessage },
}

impl DagError {
    #[track_caller]
    pub fn duplicate_node(table_name: impl Into<String>) -> Self {
        Self::DuplicateNode {
            context: DiagnosticMessage::new(format!(
                "table '{}' appears more than once in the catalog",
                table_name.into()
            )),
        }
    }

    #[track_caller]
    pub fn cycle_detected(tables: Vec<String>) -> Self {
        Self::CycleDetected(tables)
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            context: DiagnosticMessage::new(message.into()),
        }
    }
}
