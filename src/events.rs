// Copyright 2025 Cowboy AI, LLC.

//! Domain events
//!
//! Events represent facts that have occurred in the domain. They are
//! immutable and emitted by the services after an aggregate mutation has
//! been persisted.

use crate::entity::{BookingId, PropertyId, ReviewId, UserId};
use crate::review::Rating;
use crate::stay::StayRange;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Base trait for all domain events
///
/// # Examples
///
/// ```rust
/// use cim_domain_lodging::DomainEvent;
/// use uuid::Uuid;
///
/// #[derive(Debug)]
/// struct ListingPublished {
///     property_id: Uuid,
/// }
///
/// impl DomainEvent for ListingPublished {
///     fn aggregate_id(&self) -> Uuid {
///         self.property_id
///     }
///
///     fn event_type(&self) -> &'static str {
///         "ListingPublished"
///     }
/// }
///
/// let event = ListingPublished { property_id: Uuid::new_v4() };
/// assert_eq!(event.event_type(), "ListingPublished");
/// ```
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Get the aggregate ID this event relates to
    fn aggregate_id(&self) -> Uuid;

    /// Get the event type name
    fn event_type(&self) -> &'static str;

    /// Get the schema version
    fn version(&self) -> &'static str {
        "v1"
    }
}

/// A reservation was created and its range committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BookingConfirmed {
    /// The new booking
    pub booking_id: BookingId,
    /// The booked property
    pub property_id: PropertyId,
    /// The guest who booked
    pub guest_id: UserId,
    /// The committed range
    pub stay: StayRange,
    /// Computed total in minor currency units
    pub total_price: u64,
    /// When the booking was confirmed
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for BookingConfirmed {
    fn aggregate_id(&self) -> Uuid {
        self.booking_id.into()
    }

    fn event_type(&self) -> &'static str {
        "BookingConfirmed"
    }
}

/// A reservation was cancelled and its range released
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BookingCancelled {
    /// The cancelled booking
    pub booking_id: BookingId,
    /// The property whose range was released
    pub property_id: PropertyId,
    /// The principal who cancelled (guest or host)
    pub cancelled_by: UserId,
    /// When the cancellation happened
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for BookingCancelled {
    fn aggregate_id(&self) -> Uuid {
        self.booking_id.into()
    }

    fn event_type(&self) -> &'static str {
        "BookingCancelled"
    }
}

/// A review was submitted for a completed stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewSubmitted {
    /// The new review
    pub review_id: ReviewId,
    /// The reviewed property
    pub property_id: PropertyId,
    /// The review's author
    pub author_id: UserId,
    /// The submitted rating
    pub rating: Rating,
    /// When the review was created
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for ReviewSubmitted {
    fn aggregate_id(&self) -> Uuid {
        self.review_id.into()
    }

    fn event_type(&self) -> &'static str {
        "ReviewSubmitted"
    }
}

/// An existing review was revised by its author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewUpdated {
    /// The revised review
    pub review_id: ReviewId,
    /// The reviewed property
    pub property_id: PropertyId,
    /// The replacement rating
    pub rating: Rating,
    /// When the revision happened
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for ReviewUpdated {
    fn aggregate_id(&self) -> Uuid {
        self.review_id.into()
    }

    fn event_type(&self) -> &'static str {
        "ReviewUpdated"
    }
}

/// A review was removed by its author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewDeleted {
    /// The removed review
    pub review_id: ReviewId,
    /// The property it reviewed
    pub property_id: PropertyId,
    /// When the removal happened
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for ReviewDeleted {
    fn aggregate_id(&self) -> Uuid {
        self.review_id.into()
    }

    fn event_type(&self) -> &'static str {
        "ReviewDeleted"
    }
}

/// A property's aggregate rating was recomputed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RatingRecalculated {
    /// The property whose rating changed
    pub property_id: PropertyId,
    /// The recomputed mean, `0.0` when no reviews remain
    pub rating: f64,
    /// Number of reviews in the mean
    pub review_count: usize,
    /// When the recomputation happened
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for RatingRecalculated {
    fn aggregate_id(&self) -> Uuid {
        self.property_id.into()
    }

    fn event_type(&self) -> &'static str {
        "RatingRecalculated"
    }
}

/// Event publisher trait for services to emit events
pub trait EventPublisher: Send + Sync {
    /// Publish domain events
    fn publish_events(&self, events: Vec<Box<dyn DomainEvent>>) -> Result<(), String>;
}

/// Publisher that drops everything; for callers with no event consumer
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventPublisher;

impl EventPublisher for NullEventPublisher {
    fn publish_events(&self, _events: Vec<Box<dyn DomainEvent>>) -> Result<(), String> {
        Ok(())
    }
}

/// Recording publisher for tests and projections
#[derive(Clone, Default)]
pub struct RecordingEventPublisher {
    published: Arc<RwLock<Vec<(String, Uuid)>>>,
}

impl RecordingEventPublisher {
    /// Create a new recording publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// Get `(event_type, aggregate_id)` pairs in publication order
    pub fn published_events(&self) -> Vec<(String, Uuid)> {
        self.published.read().unwrap().clone()
    }

    /// Types of all published events in order
    pub fn event_types(&self) -> Vec<String> {
        self.published
            .read()
            .unwrap()
            .iter()
            .map(|(etype, _)| etype.clone())
            .collect()
    }
}

impl EventPublisher for RecordingEventPublisher {
    fn publish_events(&self, events: Vec<Box<dyn DomainEvent>>) -> Result<(), String> {
        let mut published = self.published.write().unwrap();
        for event in events {
            published.push((event.event_type().to_string(), event.aggregate_id()));
        }
        Ok(())
    }
}
