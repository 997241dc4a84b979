//! Crate-level error types for identifier construction and registry misuse.
//!
//! Ordinary ambiguity and conflict never surface as errors: the reduction
//! pipeline degrades the model by omission and reports through the
//! diagnostics sink instead. The types here cover the only two cases that
//! are genuine programmer mistakes and therefore fail fast.

use uuid::Uuid;

/// Error returned when constructing an [`Identifier`](crate::Identifier) fails.
#[derive(Debug, thiserror::Error)]
pub enum IdentifierError {
    /// The identifier key was the nil (all-zero) UUID.
    ///
    /// Identifier keys must be globally unique; the nil UUID is reserved
    /// as "no key" and is never a valid identity.
    #[error("identifier key must not be the nil UUID")]
    NilKey,
}

/// Error returned when a registry operation violates the API contract.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// Attempted to remove a binding that was never added.
    ///
    /// Unlike duplicate or conflicting registrations, which degrade
    /// gracefully at build time, removing an unknown binding is a logic
    /// error in the caller and aborts setup.
    #[error("cannot remove binding for key {key}: it was never added")]
    NotRegistered {
        /// The identifier key the caller tried to remove a binding from.
        key: Uuid,
    },
}
