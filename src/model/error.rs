/// Error type for stage and navigation operations.
///
/// Every variant is raised by a single synchronous call that leaves the
/// model unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    #[error("invalid transition {from} -> {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },
}

impl StageError {
    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        StageError::NotFound(id.into())
    }

    pub(crate) fn duplicate(id: impl Into<String>) -> Self {
        StageError::DuplicateId(id.into())
    }
}
