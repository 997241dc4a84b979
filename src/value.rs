//! Bound value kinds: type descriptors and processor-builder handles.
//!
//! The reduction pipeline is generic over one opaque, equatable value type
//! per run and is instantiated twice — once for types, once for processor
//! builders. [`BoundValue`] erases the kind so diagnostics and the final
//! model stay non-generic.

use std::any::TypeId;
use std::fmt;
use std::hash::Hash;

use uuid::Uuid;

/// Which of the two pipelines a bound value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// The value is a [`TypeDescriptor`].
    Type,
    /// The value is a [`ProcessorHandle`].
    Processor,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => f.write_str("type"),
            Self::Processor => f.write_str("processor"),
        }
    }
}

/// Describes a concrete Rust type bound to a domain identifier.
///
/// Wraps [`std::any::TypeId`] so equality is the compiler's notion of
/// type identity, with the type name carried along for diagnostics.
///
/// # Examples
///
/// ```
/// use eventmodel::TypeDescriptor;
///
/// struct OrderHandler;
///
/// let a = TypeDescriptor::of::<OrderHandler>();
/// let b = TypeDescriptor::of::<OrderHandler>();
/// assert_eq!(a, b);
/// assert!(a.name().contains("OrderHandler"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    /// Build the descriptor for `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The fully qualified name of the described type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// Equality and hashing by TypeId alone; the name is derived from it.
impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Opaque handle to a registered processor builder.
///
/// Two handles are equal only when they refer to the same registered
/// builder instance: each handle is minted with a fresh v4 UUID, giving
/// reference-like equality without holding the builder itself.
#[derive(Debug, Clone)]
pub struct ProcessorHandle {
    id: Uuid,
    name: String,
}

impl ProcessorHandle {
    /// Mint a new handle with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    /// The unique identity of this handle.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The display name given at registration.
    pub fn name(&self) -> &str {
        &self.name
    }
}

// Identity equality: the name is presentation data.
impl PartialEq for ProcessorHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ProcessorHandle {}

impl Hash for ProcessorHandle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ProcessorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "processor {}", self.name)
    }
}

/// A bound value with its kind erased.
///
/// Diagnostics and the final [`Model`](crate::Model) carry `BoundValue`
/// so they need not be generic over the pipeline's value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoundValue {
    /// A type descriptor.
    Type(TypeDescriptor),
    /// A processor-builder handle.
    Processor(ProcessorHandle),
}

impl BoundValue {
    /// Which kind of value this is.
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::Type(_) => BindingKind::Type,
            Self::Processor(_) => BindingKind::Processor,
        }
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(descriptor) => descriptor.fmt(f),
            Self::Processor(handle) => handle.fmt(f),
        }
    }
}

/// Bound required of a value type flowing through the reduction pipeline.
///
/// Implemented by exactly [`TypeDescriptor`] and [`ProcessorHandle`]; the
/// pipeline itself never inspects values beyond equality, hashing, and
/// erasure for diagnostics.
pub trait BindingValue:
    Clone + PartialEq + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// The kind tag for this value type.
    const KIND: BindingKind;

    /// Erase the concrete kind for diagnostics and model output.
    fn erase(&self) -> BoundValue;
}

impl BindingValue for TypeDescriptor {
    const KIND: BindingKind = BindingKind::Type;

    fn erase(&self) -> BoundValue {
        BoundValue::Type(*self)
    }
}

impl BindingValue for ProcessorHandle {
    const KIND: BindingKind = BindingKind::Processor;

    fn erase(&self) -> BoundValue {
        BoundValue::Processor(self.clone())
    }
}
