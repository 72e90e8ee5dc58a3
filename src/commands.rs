//! Domain commands
//!
//! Commands represent requests to change state. They are processed by the
//! booking and review services, which validate business rules, persist
//! aggregates, and emit events. Field values arrive raw from the boundary;
//! validation happens in the service, so a malformed command is rejected
//! with a field-level `ValidationError` rather than failing to construct.

use crate::entity::{BookingId, BookingMarker, CommandMarker, EntityId, PropertyId, ReviewId, ReviewMarker};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A command that requests a state change
///
/// Commands are named with imperative verbs and target one aggregate.
pub trait Command: Debug + Send + Sync {
    /// The aggregate type this command targets
    type Aggregate;

    /// Get the aggregate ID this command targets, if it exists yet
    fn aggregate_id(&self) -> Option<EntityId<Self::Aggregate>>;
}

/// Type alias for command IDs
pub type CommandId = EntityId<CommandMarker>;

/// Request a new reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CreateBooking {
    /// Property to reserve
    pub property_id: PropertyId,
    /// Requested check-in instant
    pub check_in: DateTime<Utc>,
    /// Requested check-out instant
    pub check_out: DateTime<Utc>,
    /// Party size
    pub guest_count: u32,
    /// Name for the confirmation
    pub customer_name: String,
}

impl Command for CreateBooking {
    type Aggregate = BookingMarker;

    fn aggregate_id(&self) -> Option<BookingId> {
        // New booking, no ID yet
        None
    }
}

/// Cancel an existing reservation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CancelBooking {
    /// The reservation to cancel
    pub booking_id: BookingId,
}

impl Command for CancelBooking {
    type Aggregate = BookingMarker;

    fn aggregate_id(&self) -> Option<BookingId> {
        Some(self.booking_id)
    }
}

/// Submit a review for a completed stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubmitReview {
    /// The reviewed property
    pub property_id: PropertyId,
    /// Raw star rating, validated to `[1, 5]` by the service
    pub rating: u8,
    /// Free-text comment
    pub comment: String,
}

impl Command for SubmitReview {
    type Aggregate = ReviewMarker;

    fn aggregate_id(&self) -> Option<ReviewId> {
        None
    }
}

/// Revise an existing review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateReview {
    /// The review to revise
    pub review_id: ReviewId,
    /// Replacement rating, validated by the service
    pub rating: u8,
    /// Replacement comment
    pub comment: String,
}

impl Command for UpdateReview {
    type Aggregate = ReviewMarker;

    fn aggregate_id(&self) -> Option<ReviewId> {
        Some(self.review_id)
    }
}

/// Remove a review
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DeleteReview {
    /// The review to remove
    pub review_id: ReviewId,
}

impl Command for DeleteReview {
    type Aggregate = ReviewMarker;

    fn aggregate_id(&self) -> Option<ReviewId> {
        Some(self.review_id)
    }
}
