use crate::domain::types::{ResourceKind, SessionId};

/// Failures of engine operations
///
/// Every error is returned before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} {id} is not available")]
    ResourceUnavailable { kind: ResourceKind, id: String },

    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session {0} is already paid")]
    AlreadyPaid(SessionId),
}

impl EngineError {
    /// Short machine-readable name, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation",
            EngineError::ResourceUnavailable { .. } => "resource_unavailable",
            EngineError::NotFound(_) => "not_found",
            EngineError::AlreadyPaid(_) => "already_paid",
        }
    }
}
