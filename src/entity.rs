//! Entity types with identity and lifecycle

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::time::SystemTime;
use uuid::Uuid;

/// A generic entity with a typed ID
///
/// Entities are domain objects with identity that persists across time.
/// They have a lifecycle with creation and update timestamps.
///
/// # Examples
///
/// ```rust
/// use cim_domain_lodging::{Entity, EntityId};
///
/// // Define a domain entity type
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// struct Listing;
///
/// // Create a new listing entity
/// let listing = Entity::<Listing>::new();
/// assert_eq!(listing.created_at, listing.updated_at);
///
/// // Create with a specific ID
/// let id = EntityId::<Listing>::new();
/// let listing = Entity::with_id(id);
/// assert_eq!(listing.id, id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity<T> {
    /// The unique identifier for this entity
    pub id: EntityId<T>,
    /// When this entity was created
    pub created_at: SystemTime,
    /// When this entity was last updated
    pub updated_at: SystemTime,
}

impl<T> Entity<T> {
    /// Create a new entity with a generated ID
    pub fn new() -> Self {
        let now = SystemTime::now();
        Self {
            id: EntityId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an entity with a specific ID
    pub fn with_id(id: EntityId<T>) -> Self {
        let now = SystemTime::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the entity's timestamp
    pub fn touch(&mut self) {
        self.updated_at = SystemTime::now();
    }
}

impl<T> Default for Entity<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A typed entity ID using phantom types for type safety
///
/// These IDs are globally unique and persistent. The phantom type
/// parameter ensures that IDs for different entity types cannot be
/// mixed up at compile time.
///
/// # Examples
///
/// ```rust
/// use cim_domain_lodging::EntityId;
///
/// struct Property;
/// struct Booking;
///
/// let property_id = EntityId::<Property>::new();
/// let booking_id = EntityId::<Booking>::new();
///
/// // These are different types - won't compile if mixed up:
/// // let _: EntityId<Property> = booking_id; // ERROR!
///
/// // But you can explicitly cast if needed (use carefully):
/// let casted: EntityId<Booking> = property_id.cast();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct EntityId<T> {
    id: Uuid,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }

    /// Convert to a different entity ID type (use with caution)
    pub fn cast<U>(self) -> EntityId<U> {
        EntityId {
            id: self.id,
            _phantom: PhantomData,
        }
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

impl<T> From<&EntityId<T>> for Uuid {
    fn from(id: &EntityId<T>) -> Self {
        id.id
    }
}

/// Marker trait for aggregate roots
///
/// Aggregate roots are the entry points for modifying aggregates.
/// All changes to entities within an aggregate must go through the root.
///
/// # Examples
///
/// ```rust
/// use cim_domain_lodging::{AggregateRoot, EntityId};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// struct Listing;
///
/// struct ListingAggregate {
///     id: EntityId<Listing>,
///     version: u64,
///     nightly_price: u64,
/// }
///
/// impl AggregateRoot for ListingAggregate {
///     type Id = EntityId<Listing>;
///
///     fn id(&self) -> Self::Id {
///         self.id
///     }
///
///     fn version(&self) -> u64 {
///         self.version
///     }
///
///     fn increment_version(&mut self) {
///         self.version += 1;
///     }
/// }
///
/// let mut listing = ListingAggregate {
///     id: EntityId::new(),
///     version: 0,
///     nightly_price: 12000,
/// };
///
/// // All modifications go through the aggregate root
/// listing.nightly_price = 13500;
/// listing.increment_version();
/// assert_eq!(listing.version(), 1);
/// ```
pub trait AggregateRoot: Sized {
    /// The type of ID for this aggregate
    type Id: Copy + Eq + Send + Sync;

    /// Get the aggregate's ID
    fn id(&self) -> Self::Id;

    /// Get the aggregate's version for optimistic concurrency
    fn version(&self) -> u64;

    /// Increment the version
    fn increment_version(&mut self);
}

// Marker types for entity IDs
/// Marker for property aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PropertyMarker;

/// Marker for booking aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct BookingMarker;

/// Marker for review entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ReviewMarker;

/// Marker for user (guest/host) references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct UserMarker;

/// Marker for command entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CommandMarker;

/// Marker for event entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct EventMarker;

/// Type alias for property IDs
pub type PropertyId = EntityId<PropertyMarker>;

/// Type alias for booking IDs
pub type BookingId = EntityId<BookingMarker>;

/// Type alias for review IDs
pub type ReviewId = EntityId<ReviewMarker>;

/// Type alias for user IDs
pub type UserId = EntityId<UserMarker>;
