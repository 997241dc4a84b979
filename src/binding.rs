//! The binding pair: one identifier associated with one bound value.

use std::fmt;

use crate::identifier::Identifier;
use crate::value::{BindingKind, BindingValue, BoundValue};

/// Associates one [`Identifier`] with one bound value.
///
/// Created once per discovered association and never mutated. Equality is
/// full structural equality of the pair, which is what deduplication and
/// conflict detection operate on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding<V> {
    identifier: Identifier,
    value: V,
}

impl<V: BindingValue> Binding<V> {
    /// Create a binding of `value` to `identifier`.
    pub fn new(identifier: Identifier, value: V) -> Self {
        Self { identifier, value }
    }

    /// The identifier side of the pair.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The value side of the pair.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Erase the value kind, producing the form carried by diagnostics
    /// and the final model.
    pub fn erase(&self) -> ModelBinding {
        ModelBinding {
            identifier: self.identifier.clone(),
            value: self.value.erase(),
        }
    }
}

impl<V: BindingValue> fmt::Display for Binding<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.identifier, self.value)
    }
}

/// A binding with its value kind erased.
///
/// This is the shape the activation layer consumes: an ordered sequence of
/// `(identifier, value, kind)` triples, where the kind is recoverable from
/// the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelBinding {
    identifier: Identifier,
    value: BoundValue,
}

impl ModelBinding {
    /// The identifier side of the pair.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The kind-erased value side of the pair.
    pub fn value(&self) -> &BoundValue {
        &self.value
    }

    /// Which pipeline this binding came from.
    pub fn kind(&self) -> BindingKind {
        self.value.kind()
    }
}

impl fmt::Display for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.identifier, self.value)
    }
}
