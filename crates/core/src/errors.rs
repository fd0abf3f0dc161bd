use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid delivery slot {hour:02}:{minute:02}")]
    InvalidSlot { hour: u32, minute: u32 },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

/// Failures the dialogue controller can hit while handling one inbound
/// message. Extraction misses are not errors; they resolve to re-prompts
/// inside the state handlers.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
