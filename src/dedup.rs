//! First reduction stage: collapse exact duplicate registrations.
//!
//! Registering the same `(identifier, value)` association more than once
//! is harmless — typically the result of a module being discovered through
//! two paths — so this stage collapses each group of identical bindings to
//! a single entry and reports the collapse as an information diagnostic.
//! Nothing is ever rejected here.

use indexmap::IndexMap;

use crate::binding::Binding;
use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::registry::BindingRegistry;
use crate::value::BindingValue;

/// Collapse identical `(identifier, value)` pairs within each key.
///
/// Surviving entries keep first-occurrence order; each group that had more
/// than one member produces one [`Diagnostic::DuplicateBinding`] carrying
/// the surviving binding and the registration count.
pub(crate) fn deduplicate<V: BindingValue>(
    registry: BindingRegistry<V>,
    sink: &mut dyn DiagnosticsSink,
) -> BindingRegistry<V> {
    let mut output = BindingRegistry::new();

    for (key, bindings) in registry.into_entries() {
        // Group by the full pair; IndexMap keeps first-occurrence order.
        let mut groups: IndexMap<Binding<V>, usize> = IndexMap::new();
        for binding in bindings {
            *groups.entry(binding).or_insert(0) += 1;
        }

        for (binding, count) in groups {
            if count > 1 {
                tracing::debug!(
                    identifier = %binding.identifier(),
                    value = %binding.value(),
                    count,
                    "collapsed duplicate registrations"
                );
                sink.report(Diagnostic::DuplicateBinding {
                    binding: binding.erase(),
                    count,
                });
            }
            output.insert_under(key, binding);
        }
    }

    output
}
