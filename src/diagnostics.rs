//! Structured diagnostics emitted by the reduction pipeline.
//!
//! The engine never formats user-facing text and never fails the build for
//! ordinary ambiguity: every duplicate, rejection, and acceptance is
//! reported to a [`DiagnosticsSink`] as structured data, and the caller
//! decides how to render it and whether accumulated failures should abort
//! application start.

use std::fmt;

use uuid::Uuid;

use crate::binding::ModelBinding;
use crate::identifier::Identifier;
use crate::value::BoundValue;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational; the model is unaffected.
    Information,
    /// A binding (or a whole key) was excluded from the model.
    Failure,
}

/// One structured finding from the reduction pipeline.
///
/// Each variant carries the data needed to render a message; `Display`
/// provides a default rendering as a convenience, but consumers are free
/// to format the fields themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The same `(identifier, value)` association was registered more than
    /// once. Duplicates are harmless and collapse to a single binding.
    DuplicateBinding {
        /// The surviving binding.
        binding: ModelBinding,
        /// How many times the association was registered.
        count: usize,
    },

    /// One value was claimed by two or more distinct identifiers. All of
    /// its bindings are excluded: an implementation artifact serves at
    /// most one domain identity.
    AmbiguousValue {
        /// The contested value.
        value: BoundValue,
        /// Every identifier that claimed the value.
        contenders: Vec<Identifier>,
    },

    /// A resolution key contained bindings that cannot coexist. The whole
    /// key is withheld from the model, including any bindings that were
    /// individually unobjectionable.
    ConflictingKey {
        /// The affected identifier key.
        key: Uuid,
        /// The bindings that participated in at least one conflict.
        conflicts: Vec<ModelBinding>,
    },

    /// A binding survived every reduction stage and will be activated.
    BindingAccepted {
        /// The accepted binding.
        binding: ModelBinding,
    },
}

impl Diagnostic {
    /// The severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateBinding { .. } | Self::BindingAccepted { .. } => Severity::Information,
            Self::AmbiguousValue { .. } | Self::ConflictingKey { .. } => Severity::Failure,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateBinding { binding, count } => write!(
                f,
                "binding {binding} was registered {count} times; duplicates are harmless"
            ),
            Self::AmbiguousValue { value, contenders } => {
                write!(f, "{value} is claimed by {} identifiers:", contenders.len())?;
                for identifier in contenders {
                    write!(f, " [{identifier}]")?;
                }
                Ok(())
            }
            Self::ConflictingKey { key, conflicts } => {
                write!(f, "key {key} has conflicting bindings:")?;
                for binding in conflicts {
                    write!(f, " [{binding}]")?;
                }
                Ok(())
            }
            Self::BindingAccepted { binding } => write!(f, "{binding} will be bound"),
        }
    }
}

/// Consumer of pipeline diagnostics.
///
/// Implementations must not assume any particular ordering beyond "in the
/// order the pipeline found them" and must not fail: reporting is
/// infallible by contract.
pub trait DiagnosticsSink {
    /// Record one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// The standard sink: collects diagnostics in order for post-build
/// inspection.
///
/// # Examples
///
/// ```
/// use eventmodel::{DiagnosticsCollector, ModelBuilder};
///
/// let builder = ModelBuilder::new();
/// let mut diagnostics = DiagnosticsCollector::new();
/// let model = builder.build(&mut diagnostics);
///
/// assert!(model.is_empty());
/// assert!(!diagnostics.has_failures());
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics, in the order they were reported.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Only the failure-severity diagnostics.
    pub fn failures(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Failure)
    }

    /// Whether any failure-severity diagnostic was reported.
    ///
    /// Callers typically check this after `build()` to decide whether the
    /// application should refuse to start.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Number of diagnostics collected.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether no diagnostics were collected.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticsSink for DiagnosticsCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
