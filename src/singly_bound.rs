//! Second reduction stage: enforce single ownership of every value.
//!
//! One implementation artifact serves at most one domain identity. This
//! stage regroups the deduplicated bindings by value across the whole
//! registry, ignoring keys; any value claimed by two or more distinct
//! identifiers is rejected outright, with a failure diagnostic naming the
//! value and every contender.

use indexmap::IndexMap;

use crate::binding::Binding;
use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::identifier::Identifier;
use crate::registry::BindingRegistry;
use crate::value::BindingValue;

/// Keep only bindings whose value is claimed by exactly one identifier.
///
/// Survivors are re-keyed under their identifier's key, in value
/// first-occurrence order. Each rejected value produces one
/// [`Diagnostic::AmbiguousValue`].
pub(crate) fn reduce_singly_bound<V: BindingValue>(
    registry: BindingRegistry<V>,
    sink: &mut dyn DiagnosticsSink,
) -> BindingRegistry<V> {
    // Regroup by value across every key in the input.
    let mut by_value: IndexMap<V, Vec<Binding<V>>> = IndexMap::new();
    for (_, bindings) in registry.into_entries() {
        for binding in bindings {
            by_value.entry(binding.value().clone()).or_default().push(binding);
        }
    }

    let mut output = BindingRegistry::new();

    for (value, bindings) in by_value {
        let mut contenders: Vec<Identifier> = Vec::new();
        for binding in &bindings {
            if !contenders.contains(binding.identifier()) {
                contenders.push(binding.identifier().clone());
            }
        }

        if contenders.len() == 1 {
            // After deduplication a singly-claimed value has exactly one
            // binding; re-key it under its identifier.
            for binding in bindings {
                let key = binding.identifier().key();
                output.insert_under(key, binding);
            }
        } else {
            tracing::warn!(
                value = %value,
                contenders = contenders.len(),
                "value is claimed by multiple identifiers; rejecting all of its bindings"
            );
            sink.report(Diagnostic::AmbiguousValue {
                value: value.erase(),
                contenders,
            });
        }
    }

    output
}
