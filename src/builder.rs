//! Top-level entry point that composes the reduction stages into a single
//! [`ModelBuilder`] type.
//!
//! The builder owns two registries — one for type-descriptor bindings, one
//! for processor-builder bindings — accumulated during application setup.
//! `build()` runs each registry through deduplication, single-ownership
//! reduction, and conflict resolution independently, then merges survivors
//! across both kinds into the final [`Model`]. The lifecycle is create →
//! accumulate → build → discard; there is no process-wide state.

use indexmap::IndexSet;
use uuid::Uuid;

use crate::binding::{Binding, ModelBinding};
use crate::conflicts::resolve_conflicts;
use crate::dedup::deduplicate;
use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::error::BindingError;
use crate::identifier::Identifier;
use crate::registry::BindingRegistry;
use crate::singly_bound::reduce_singly_bound;
use crate::value::{BindingKind, BindingValue, ProcessorHandle, TypeDescriptor};

/// Accumulates candidate bindings and reduces them to a conflict-free
/// [`Model`].
///
/// The builder never rejects at registration time: every candidate the
/// discovery layer produces is recorded verbatim, and all validation
/// happens in one synchronous pass inside [`build`](ModelBuilder::build).
/// Ordinary ambiguity degrades the model by omission and is reported
/// through the diagnostics sink; only misuse of the API itself (removing a
/// binding that was never added) returns an error.
///
/// # Examples
///
/// ```
/// use eventmodel::{
///     DiagnosticsCollector, Identifier, ModelBuilder, TypeDescriptor,
/// };
/// use uuid::Uuid;
///
/// struct OrderAggregate;
///
/// let identifier = Identifier::aggregate_root(Uuid::new_v4())
///     .unwrap()
///     .with_alias("Order");
///
/// let mut builder = ModelBuilder::new();
/// builder.bind_type(identifier, TypeDescriptor::of::<OrderAggregate>());
///
/// let mut diagnostics = DiagnosticsCollector::new();
/// let model = builder.build(&mut diagnostics);
///
/// assert_eq!(model.len(), 1);
/// assert!(!diagnostics.has_failures());
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder {
    types: BindingRegistry<TypeDescriptor>,
    processors: BindingRegistry<ProcessorHandle>,
}

impl ModelBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type-descriptor binding for `identifier`.
    pub fn bind_type(&mut self, identifier: Identifier, descriptor: TypeDescriptor) {
        self.types.add(Binding::new(identifier, descriptor));
    }

    /// Register a processor-builder binding for `identifier`.
    pub fn bind_processor(&mut self, identifier: Identifier, handle: ProcessorHandle) {
        self.processors.add(Binding::new(identifier, handle));
    }

    /// Direct mutable access to the type-descriptor registry.
    ///
    /// [`bind_type`](ModelBuilder::bind_type) is a convenience over this;
    /// discovery mechanisms that produce [`Binding`] values wholesale can
    /// append to the registry directly.
    pub fn type_registry_mut(&mut self) -> &mut BindingRegistry<TypeDescriptor> {
        &mut self.types
    }

    /// Direct mutable access to the processor-builder registry.
    pub fn processor_registry_mut(&mut self) -> &mut BindingRegistry<ProcessorHandle> {
        &mut self.processors
    }

    /// Remove one previously registered type-descriptor binding.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::NotRegistered`] if no such binding was ever
    /// added; this aborts setup rather than degrading at build time.
    pub fn unbind_type(
        &mut self,
        identifier: &Identifier,
        descriptor: &TypeDescriptor,
    ) -> Result<(), BindingError> {
        self.types
            .remove(&Binding::new(identifier.clone(), *descriptor))
    }

    /// Remove one previously registered processor-builder binding.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::NotRegistered`] if no such binding was ever
    /// added; this aborts setup rather than degrading at build time.
    pub fn unbind_processor(
        &mut self,
        identifier: &Identifier,
        handle: &ProcessorHandle,
    ) -> Result<(), BindingError> {
        self.processors
            .remove(&Binding::new(identifier.clone(), handle.clone()))
    }

    /// Reduce everything registered so far into the final [`Model`].
    ///
    /// Each value kind runs through the full pipeline on its own, so a key
    /// can be valid for its type binding while its processor binding is in
    /// conflict, or vice versa — each kind's acceptance is decided on its
    /// own evidence. Every accepted binding is reported to the sink as an
    /// information diagnostic; every rejection was already reported by the
    /// stage that made it.
    pub fn build(self, sink: &mut dyn DiagnosticsSink) -> Model {
        tracing::debug!(
            type_bindings = self.types.len(),
            processor_bindings = self.processors.len(),
            "building model"
        );

        let types = resolve_conflicts(
            reduce_singly_bound(deduplicate(self.types, sink), sink),
            sink,
        );
        let processors = resolve_conflicts(
            reduce_singly_bound(deduplicate(self.processors, sink), sink),
            sink,
        );

        // Union of surviving keys, in first-seen order across both kinds.
        let mut keys: IndexSet<Uuid> = IndexSet::new();
        keys.extend(types.entries().map(|(key, _)| key));
        keys.extend(processors.entries().map(|(key, _)| key));

        let mut bindings = Vec::new();
        for key in keys {
            collect_accepted(&types, key, &mut bindings);
            collect_accepted(&processors, key, &mut bindings);
        }

        for binding in &bindings {
            tracing::debug!(binding = %binding, "binding accepted");
            sink.report(Diagnostic::BindingAccepted {
                binding: binding.clone(),
            });
        }

        Model { bindings }
    }
}

/// Append `key`'s surviving bindings from one kind's registry, kind-erased.
fn collect_accepted<V: BindingValue>(
    registry: &BindingRegistry<V>,
    key: Uuid,
    bindings: &mut Vec<ModelBinding>,
) {
    if let Some(survivors) = registry.get(key) {
        bindings.extend(survivors.iter().map(Binding::erase));
    }
}

/// The final, conflict-free, deduplicated set of bindings.
///
/// Created exactly once by [`ModelBuilder::build`]; immutable; consumed by
/// the activation layer. Every value present is claimed by exactly one
/// identifier key, and every pair of bindings sharing a key coexists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    bindings: Vec<ModelBinding>,
}

impl Model {
    /// All bindings, in deterministic key-first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelBinding> {
        self.bindings.iter()
    }

    /// Number of bindings in the model.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the model holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings registered under the given identifier key, both kinds.
    pub fn bindings_for_key(&self, key: Uuid) -> impl Iterator<Item = &ModelBinding> {
        self.bindings
            .iter()
            .filter(move |binding| binding.identifier().key() == key)
    }

    /// Only the type-descriptor bindings.
    pub fn type_bindings(&self) -> impl Iterator<Item = &ModelBinding> {
        self.bindings
            .iter()
            .filter(|binding| binding.kind() == BindingKind::Type)
    }

    /// Only the processor-builder bindings.
    pub fn processor_bindings(&self) -> impl Iterator<Item = &ModelBinding> {
        self.bindings
            .iter()
            .filter(|binding| binding.kind() == BindingKind::Processor)
    }
}

impl<'a> IntoIterator for &'a Model {
    type Item = &'a ModelBinding;
    type IntoIter = std::slice::Iter<'a, ModelBinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticsCollector;
    use crate::value::BoundValue;

    struct Order;
    struct Customer;

    fn aggregate(alias: &str) -> Identifier {
        Identifier::aggregate_root(Uuid::new_v4())
            .unwrap()
            .with_alias(alias)
    }

    #[test]
    fn empty_builder_yields_empty_model() {
        let mut diagnostics = DiagnosticsCollector::new();
        let model = ModelBuilder::new().build(&mut diagnostics);
        assert!(model.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn accepted_bindings_reach_the_model_with_diagnostics() {
        let order = aggregate("Order");
        let handler = Identifier::event_handler(Uuid::new_v4()).unwrap();
        let handle = ProcessorHandle::new("order-handler");

        let mut builder = ModelBuilder::new();
        builder.bind_type(order.clone(), TypeDescriptor::of::<Order>());
        builder.bind_processor(handler.clone(), handle.clone());

        let mut diagnostics = DiagnosticsCollector::new();
        let model = builder.build(&mut diagnostics);

        assert_eq!(model.len(), 2);
        assert_eq!(model.type_bindings().count(), 1);
        assert_eq!(model.processor_bindings().count(), 1);
        assert!(!diagnostics.has_failures());
        // One acceptance diagnostic per accepted binding.
        let accepted = diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::BindingAccepted { .. }))
            .count();
        assert_eq!(accepted, 2);
    }

    #[test]
    fn model_order_follows_key_first_seen_order() {
        let first = aggregate("First");
        let second = aggregate("Second");

        let mut builder = ModelBuilder::new();
        builder.bind_type(first.clone(), TypeDescriptor::of::<Order>());
        builder.bind_type(second.clone(), TypeDescriptor::of::<Customer>());

        let mut diagnostics = DiagnosticsCollector::new();
        let model = builder.build(&mut diagnostics);

        let keys: Vec<_> = model.iter().map(|b| b.identifier().key()).collect();
        assert_eq!(keys, vec![first.key(), second.key()]);
    }

    #[test]
    fn kinds_are_decided_independently_per_key() {
        // One key: the type binding is clean, the processor binding is in
        // conflict with a second processor under the same key.
        let key = Uuid::new_v4();
        let identifier = Identifier::event_handler(key).unwrap();

        let mut builder = ModelBuilder::new();
        builder.bind_type(identifier.clone(), TypeDescriptor::of::<Order>());
        builder.bind_processor(identifier.clone(), ProcessorHandle::new("a"));
        builder.bind_processor(identifier.clone(), ProcessorHandle::new("b"));

        let mut diagnostics = DiagnosticsCollector::new();
        let model = builder.build(&mut diagnostics);

        assert_eq!(model.len(), 1, "type binding survives on its own evidence");
        assert!(matches!(
            model.iter().next().unwrap().value(),
            BoundValue::Type(_)
        ));
        assert_eq!(diagnostics.failures().count(), 1);
        assert!(matches!(
            diagnostics.failures().next().unwrap(),
            Diagnostic::ConflictingKey { key: k, .. } if *k == key
        ));
    }

    #[test]
    fn unbind_then_build_omits_the_binding() {
        let order = aggregate("Order");
        let descriptor = TypeDescriptor::of::<Order>();

        let mut builder = ModelBuilder::new();
        builder.bind_type(order.clone(), descriptor);
        builder.unbind_type(&order, &descriptor).unwrap();

        let mut diagnostics = DiagnosticsCollector::new();
        let model = builder.build(&mut diagnostics);
        assert!(model.is_empty());
    }

    #[test]
    fn unbind_never_added_is_a_hard_error() {
        let order = aggregate("Order");
        let mut builder = ModelBuilder::new();
        let err = builder
            .unbind_type(&order, &TypeDescriptor::of::<Order>())
            .unwrap_err();
        assert!(matches!(err, BindingError::NotRegistered { .. }));

        let handler = Identifier::event_handler(Uuid::new_v4()).unwrap();
        let err = builder
            .unbind_processor(&handler, &ProcessorHandle::new("orders"))
            .unwrap_err();
        assert!(matches!(err, BindingError::NotRegistered { .. }));
    }

    #[test]
    fn registry_access_feeds_the_same_pipeline() {
        let order = aggregate("Order");
        let mut builder = ModelBuilder::new();
        builder
            .type_registry_mut()
            .add(Binding::new(order.clone(), TypeDescriptor::of::<Order>()));
        builder
            .processor_registry_mut()
            .add(Binding::new(order, ProcessorHandle::new("orders")));

        let mut diagnostics = DiagnosticsCollector::new();
        let model = builder.build(&mut diagnostics);
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn bindings_for_key_spans_both_kinds() {
        let key = Uuid::new_v4();
        let identifier = Identifier::projection(key).unwrap();
        let handle = ProcessorHandle::new("totals");

        let mut builder = ModelBuilder::new();
        builder.bind_type(identifier.clone(), TypeDescriptor::of::<Order>());
        builder.bind_processor(identifier, handle);

        let mut diagnostics = DiagnosticsCollector::new();
        let model = builder.build(&mut diagnostics);

        assert_eq!(model.bindings_for_key(key).count(), 2);
        assert_eq!(model.bindings_for_key(Uuid::new_v4()).count(), 0);
    }
}
