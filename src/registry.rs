//! Append-only registry of raw bindings, keyed by identifier key.
//!
//! The registry is the accumulation side of the model builder: the
//! discovery layer appends every candidate association it finds, with no
//! validation or merging, and the reduction pipeline consumes the result
//! once at build time. Insertion order is preserved at both levels — keys
//! iterate in first-seen order, and each key's bindings iterate in the
//! order they were added — so model output and diagnostics are
//! deterministic.
//!
//! Not thread-safe by contract: accumulation happens on a single setup
//! thread (callers that fan discovery out across threads must serialize
//! `add` themselves).

use indexmap::IndexMap;
use uuid::Uuid;

use crate::binding::Binding;
use crate::error::BindingError;
use crate::value::BindingValue;

/// An insertion-ordered multimap from identifier key to the bindings
/// registered against that key.
#[derive(Debug, Clone)]
pub struct BindingRegistry<V> {
    entries: IndexMap<Uuid, Vec<Binding<V>>>,
}

impl<V: BindingValue> BindingRegistry<V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Append a binding under its identifier's key.
    ///
    /// Never rejects and never merges: duplicate and conflicting
    /// registrations are preserved verbatim for the reduction pipeline to
    /// sort out.
    pub fn add(&mut self, binding: Binding<V>) {
        let key = binding.identifier().key();
        self.entries.entry(key).or_default().push(binding);
    }

    /// Remove one occurrence of an exactly-equal binding.
    ///
    /// Removing the last binding under a key drops the key entirely.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::NotRegistered`] if no equal binding exists.
    /// This is the one contract violation that fails fast instead of
    /// degrading at build time.
    pub fn remove(&mut self, binding: &Binding<V>) -> Result<(), BindingError> {
        let key = binding.identifier().key();
        let bindings = self
            .entries
            .get_mut(&key)
            .ok_or(BindingError::NotRegistered { key })?;

        let position = bindings
            .iter()
            .position(|existing| existing == binding)
            .ok_or(BindingError::NotRegistered { key })?;
        bindings.remove(position);

        if bindings.is_empty() {
            // shift_remove keeps the remaining keys in insertion order.
            self.entries.shift_remove(&key);
        }
        Ok(())
    }

    /// Lazy, restartable iteration over `(key, bindings)` in key insertion
    /// order.
    pub fn entries(&self) -> impl Iterator<Item = (Uuid, &[Binding<V>])> {
        self.entries
            .iter()
            .map(|(key, bindings)| (*key, bindings.as_slice()))
    }

    /// Total number of bindings across all keys.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether the registry holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The bindings registered under `key`, if any.
    pub(crate) fn get(&self, key: Uuid) -> Option<&[Binding<V>]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// Consume the registry, yielding `(key, bindings)` in key insertion
    /// order. Used by the reduction stages, which each produce a fresh
    /// registry from the previous stage's output.
    pub(crate) fn into_entries(self) -> impl Iterator<Item = (Uuid, Vec<Binding<V>>)> {
        self.entries.into_iter()
    }

    /// Append a binding under an explicit key.
    ///
    /// Used by the singly-bound reducer when re-keying survivors; the key
    /// is always the binding's own identifier key there, but taking it
    /// explicitly keeps the re-keying step obvious at the call site.
    pub(crate) fn insert_under(&mut self, key: Uuid, binding: Binding<V>) {
        self.entries.entry(key).or_default().push(binding);
    }
}

impl<V: BindingValue> Default for BindingRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Identifier;
    use crate::value::TypeDescriptor;

    struct Red;
    struct Green;

    fn binding_for<T: 'static>(identifier: &Identifier) -> Binding<TypeDescriptor> {
        Binding::new(identifier.clone(), TypeDescriptor::of::<T>())
    }

    #[test]
    fn add_appends_without_merging() {
        let identifier = Identifier::aggregate_root(Uuid::new_v4()).unwrap();
        let mut registry = BindingRegistry::new();
        registry.add(binding_for::<Red>(&identifier));
        registry.add(binding_for::<Red>(&identifier));
        registry.add(binding_for::<Green>(&identifier));

        assert_eq!(registry.len(), 3);
        let (_, bindings) = registry.entries().next().unwrap();
        assert_eq!(bindings.len(), 3);
    }

    #[test]
    fn entries_preserve_key_insertion_order() {
        let first = Identifier::aggregate_root(Uuid::new_v4()).unwrap();
        let second = Identifier::event_handler(Uuid::new_v4()).unwrap();
        let third = Identifier::projection(Uuid::new_v4()).unwrap();

        let mut registry = BindingRegistry::new();
        registry.add(binding_for::<Red>(&first));
        registry.add(binding_for::<Red>(&second));
        registry.add(binding_for::<Red>(&third));
        // A later add to an existing key must not move it.
        registry.add(binding_for::<Green>(&first));

        let keys: Vec<_> = registry.entries().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![first.key(), second.key(), third.key()]);
    }

    #[test]
    fn entries_are_restartable() {
        let identifier = Identifier::embedding(Uuid::new_v4()).unwrap();
        let mut registry = BindingRegistry::new();
        registry.add(binding_for::<Red>(&identifier));

        assert_eq!(registry.entries().count(), 1);
        assert_eq!(registry.entries().count(), 1, "second pass sees the same data");
    }

    #[test]
    fn remove_drops_one_occurrence() {
        let identifier = Identifier::aggregate_root(Uuid::new_v4()).unwrap();
        let mut registry = BindingRegistry::new();
        registry.add(binding_for::<Red>(&identifier));
        registry.add(binding_for::<Red>(&identifier));

        registry.remove(&binding_for::<Red>(&identifier)).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removing_last_binding_drops_the_key() {
        let identifier = Identifier::aggregate_root(Uuid::new_v4()).unwrap();
        let mut registry = BindingRegistry::new();
        registry.add(binding_for::<Red>(&identifier));

        registry.remove(&binding_for::<Red>(&identifier)).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.entries().count(), 0);
    }

    #[test]
    fn removing_unknown_binding_is_a_hard_error() {
        let identifier = Identifier::aggregate_root(Uuid::new_v4()).unwrap();
        let mut registry: BindingRegistry<TypeDescriptor> = BindingRegistry::new();

        let err = registry
            .remove(&binding_for::<Red>(&identifier))
            .unwrap_err();
        assert!(matches!(err, BindingError::NotRegistered { key } if key == identifier.key()));
    }

    #[test]
    fn removing_wrong_value_under_known_key_is_a_hard_error() {
        let identifier = Identifier::aggregate_root(Uuid::new_v4()).unwrap();
        let mut registry = BindingRegistry::new();
        registry.add(binding_for::<Red>(&identifier));

        let err = registry
            .remove(&binding_for::<Green>(&identifier))
            .unwrap_err();
        assert!(matches!(err, BindingError::NotRegistered { .. }));
        assert_eq!(registry.len(), 1, "registry unchanged on error");
    }
}
