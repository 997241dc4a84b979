//! Identifiers for the domain concepts that application code binds to.
//!
//! An [`Identifier`] names a server-side concept — an aggregate root, an
//! event handler, an event type, a projection, or an embedding — by a
//! 128-bit key. Identifiers are pure values: created once by the discovery
//! layer, compared by content, never mutated.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

use uuid::Uuid;

use crate::error::IdentifierError;

/// A domain-level identity that an implementation artifact can be bound to.
///
/// Each variant is a distinct identifier kind. Two identifiers are equal
/// iff they are the same kind with the same key; aliases and the event-type
/// generation never participate in equality or hashing.
///
/// # Coexistence
///
/// [`can_coexist_with`](Identifier::can_coexist_with) decides whether two
/// identifiers sharing a resolution key may both remain bound. The default
/// answer is `false`: distinct identifiers competing for one key are a
/// misconfiguration. `EventType` relaxes this — two event-type identifiers
/// with the same key and the same generation describe the same structure
/// and may coexist gracefully.
///
/// # Examples
///
/// ```
/// use eventmodel::Identifier;
/// use uuid::Uuid;
///
/// let key = Uuid::new_v4();
/// let a = Identifier::aggregate_root(key).unwrap().with_alias("Order");
/// let b = Identifier::aggregate_root(key).unwrap();
///
/// // Alias does not participate in equality.
/// assert_eq!(a, b);
/// // Same kind and key, but unrelated instances never coexist by default.
/// assert!(!a.can_coexist_with(&b));
/// ```
#[derive(Debug, Clone)]
pub enum Identifier {
    /// Identifies an aggregate root.
    AggregateRoot {
        /// Globally unique aggregate root id.
        key: Uuid,
        /// Optional human-readable alias for diagnostics.
        alias: Option<String>,
    },
    /// Identifies an event handler.
    EventHandler {
        /// Globally unique event handler id.
        key: Uuid,
        /// Optional human-readable alias for diagnostics.
        alias: Option<String>,
    },
    /// Identifies an event type at a specific schema generation.
    EventType {
        /// Globally unique event type id.
        key: Uuid,
        /// Schema generation. Participates in coexistence, not equality.
        generation: u32,
        /// Optional human-readable alias for diagnostics.
        alias: Option<String>,
    },
    /// Identifies a projection.
    Projection {
        /// Globally unique projection id.
        key: Uuid,
        /// Optional human-readable alias for diagnostics.
        alias: Option<String>,
    },
    /// Identifies an embedding.
    Embedding {
        /// Globally unique embedding id.
        key: Uuid,
        /// Optional human-readable alias for diagnostics.
        alias: Option<String>,
    },
}

impl Identifier {
    /// Create an aggregate-root identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::NilKey`] if `key` is the nil UUID.
    pub fn aggregate_root(key: Uuid) -> Result<Self, IdentifierError> {
        check_key(key)?;
        Ok(Self::AggregateRoot { key, alias: None })
    }

    /// Create an event-handler identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::NilKey`] if `key` is the nil UUID.
    pub fn event_handler(key: Uuid) -> Result<Self, IdentifierError> {
        check_key(key)?;
        Ok(Self::EventHandler { key, alias: None })
    }

    /// Create an event-type identifier at the given schema generation.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::NilKey`] if `key` is the nil UUID.
    pub fn event_type(key: Uuid, generation: u32) -> Result<Self, IdentifierError> {
        check_key(key)?;
        Ok(Self::EventType {
            key,
            generation,
            alias: None,
        })
    }

    /// Create a projection identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::NilKey`] if `key` is the nil UUID.
    pub fn projection(key: Uuid) -> Result<Self, IdentifierError> {
        check_key(key)?;
        Ok(Self::Projection { key, alias: None })
    }

    /// Create an embedding identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::NilKey`] if `key` is the nil UUID.
    pub fn embedding(key: Uuid) -> Result<Self, IdentifierError> {
        check_key(key)?;
        Ok(Self::Embedding { key, alias: None })
    }

    /// Attach a human-readable alias, consuming and returning `self`.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let slot = match &mut self {
            Self::AggregateRoot { alias, .. }
            | Self::EventHandler { alias, .. }
            | Self::EventType { alias, .. }
            | Self::Projection { alias, .. }
            | Self::Embedding { alias, .. } => alias,
        };
        *slot = Some(alias.into());
        self
    }

    /// Returns the 128-bit key of this identifier.
    pub fn key(&self) -> Uuid {
        match self {
            Self::AggregateRoot { key, .. }
            | Self::EventHandler { key, .. }
            | Self::EventType { key, .. }
            | Self::Projection { key, .. }
            | Self::Embedding { key, .. } => *key,
        }
    }

    /// Returns the alias, if one was set.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::AggregateRoot { alias, .. }
            | Self::EventHandler { alias, .. }
            | Self::EventType { alias, .. }
            | Self::Projection { alias, .. }
            | Self::Embedding { alias, .. } => alias.as_deref(),
        }
    }

    /// Human-readable name of the identifier kind (e.g. `"aggregate root"`).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::AggregateRoot { .. } => "aggregate root",
            Self::EventHandler { .. } => "event handler",
            Self::EventType { .. } => "event type",
            Self::Projection { .. } => "projection",
            Self::Embedding { .. } => "embedding",
        }
    }

    /// Decide whether this identifier and `other` may both remain bound
    /// within the same resolution key.
    ///
    /// Unrelated identifiers never coexist. Two `EventType` identifiers
    /// coexist when they carry the same key and the same generation — two
    /// declarations of an event type that agree on structure are a
    /// harmless restatement, not a conflict.
    pub fn can_coexist_with(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::EventType {
                    key: a,
                    generation: ga,
                    ..
                },
                Self::EventType {
                    key: b,
                    generation: gb,
                    ..
                },
            ) => a == b && ga == gb,
            _ => false,
        }
    }
}

fn check_key(key: Uuid) -> Result<(), IdentifierError> {
    if key.is_nil() {
        return Err(IdentifierError::NilKey);
    }
    Ok(())
}

// Equality is kind + key only. Aliases are presentation data, and the
// event-type generation belongs to coexistence, not identity.
impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        discriminant(self) == discriminant(other) && self.key() == other.key()
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        self.key().hash(state);
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alias() {
            Some(alias) => write!(f, "{} {alias} ({})", self.kind_name(), self.key()),
            None => write!(f, "{} {}", self.kind_name(), self.key()),
        }
    }
}
