//! Conflict-resolving model binding for event-sourcing client SDKs.
//!
//! Application code declares associations between domain identifiers
//! (aggregate roots, event handlers, event types, projections, embeddings)
//! and implementation artifacts (a type, or a processor-builder handle).
//! Discovery may register the same association twice, or register
//! associations that contradict each other; this crate reduces the raw set
//! to a conflict-free, deduplicated [`Model`] in three stages —
//! deduplication, single-ownership reduction, conflict resolution — and
//! reports every collapse, rejection, and acceptance through a structured
//! diagnostics sink.

mod binding;
pub use binding::{Binding, ModelBinding};
mod builder;
pub use builder::{Model, ModelBuilder};
mod conflicts;
mod dedup;
mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticsCollector, DiagnosticsSink, Severity};
mod error;
pub use error::{BindingError, IdentifierError};
mod identifier;
pub use identifier::Identifier;
mod registry;
pub use registry::BindingRegistry;
mod singly_bound;
mod value;
pub use value::{BindingKind, BindingValue, BoundValue, ProcessorHandle, TypeDescriptor};
