//! Third reduction stage: fail closed on irreconcilable bindings.
//!
//! After deduplication and single-ownership reduction, a key may still
//! hold several bindings. This stage partitions each key's bindings into
//! coexisting and conflicting subsets using the identifier coexistence
//! predicate — and if any conflict exists, withholds the entire key. A key
//! that is simultaneously correct and ambiguous is indistinguishable from
//! a misconfiguration at activation time, so nothing from it is promoted.

use crate::binding::Binding;
use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::registry::BindingRegistry;
use crate::value::BindingValue;

/// Whether two bindings under one key may both remain bound.
///
/// An exact restatement (equal identifier, equal value) always coexists,
/// regardless of what the coexistence predicate says about the pair; this
/// keeps deduplication idempotent. Deliberately distinct values coexist
/// only when the identifiers themselves allow it.
fn coexists<V: BindingValue>(a: &Binding<V>, b: &Binding<V>) -> bool {
    if a.identifier() == b.identifier() && a.value() == b.value() {
        return true;
    }
    a.identifier().can_coexist_with(b.identifier()) && a.value() != b.value()
}

/// Keep only keys whose bindings pairwise coexist.
///
/// A key with at least one conflicting pair contributes nothing to the
/// model — even its inoffensive bindings are withheld — and produces one
/// [`Diagnostic::ConflictingKey`] listing the bindings that conflicted.
pub(crate) fn resolve_conflicts<V: BindingValue>(
    registry: BindingRegistry<V>,
    sink: &mut dyn DiagnosticsSink,
) -> BindingRegistry<V> {
    let mut output = BindingRegistry::new();

    for (key, bindings) in registry.into_entries() {
        let mut conflicting = vec![false; bindings.len()];
        for i in 0..bindings.len() {
            for j in 0..bindings.len() {
                if i != j && !coexists(&bindings[i], &bindings[j]) {
                    conflicting[i] = true;
                    conflicting[j] = true;
                }
            }
        }

        if conflicting.iter().any(|&flag| flag) {
            let conflicts: Vec<_> = bindings
                .iter()
                .zip(&conflicting)
                .filter(|&(_, &flag)| flag)
                .map(|(binding, _)| binding.erase())
                .collect();
            tracing::warn!(
                %key,
                conflicts = conflicts.len(),
                "key has conflicting bindings; withholding the entire key"
            );
            sink.report(Diagnostic::ConflictingKey { key, conflicts });
        } else {
            for binding in bindings {
                output.insert_under(key, binding);
            }
        }
    }

    output
}
