// Copyright 2025 Cowboy AI, LLC.

//! Error types for domain operations

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    EntityNotFound {
        /// Type of entity that wasn't found
        entity_type: String,
        /// ID that was searched for
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Authorization error
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// Business rule violation
    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation {
        /// Description of the violated rule
        rule: String,
    },

    /// State-based conflict (overlapping dates, duplicate review)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Invalid state transition
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state
        from: String,
        /// Attempted target state
        to: String,
    },

    /// Concurrency conflict
    #[error("Concurrency conflict: expected version {expected}, but found {actual}")]
    ConcurrencyConflict {
        /// Expected version
        expected: u64,
        /// Actual version
        actual: u64,
    },

    /// Invariant violation
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic internal error
    ///
    /// Storage failures surface through this variant. The message is
    /// operator-facing; callers must not see storage-layer detail in the
    /// business rejection variants above.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl DomainError {
    /// Entity-not-found constructor with a typed id
    pub fn not_found(entity_type: impl Into<String>, id: impl ToString) -> Self {
        DomainError::EntityNotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::EntityNotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DomainError::ValidationError(_) | DomainError::InvariantViolation(_)
        )
    }

    /// Check if this is a state-based conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::ConflictError(_) | DomainError::ConcurrencyConflict { .. }
        )
    }

    /// Check if the caller was authenticated but not permitted
    pub fn is_authorization_error(&self) -> bool {
        matches!(self, DomainError::AuthorizationError(_))
    }

    /// Check if a business rule blocked an otherwise-permitted action
    pub fn is_forbidden(&self) -> bool {
        matches!(self, DomainError::BusinessRuleViolation { .. })
    }
}
