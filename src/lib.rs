//! # CIM Domain Lodging
//!
//! Booking-consistency core for a short-term rental marketplace, built from
//! Domain-Driven Design building blocks:
//! - **Entity**: Types with identity and lifecycle
//! - **Value Objects**: Immutable stay ranges and ratings defined by their attributes
//! - **Aggregates**: Properties and bookings as consistency boundaries
//! - **Domain Events**: Facts emitted after each persisted mutation
//! - **Commands**: Requests to change state, named with imperative verbs
//! - **Services**: Booking lifecycle and review eligibility orchestration
//!
//! The crate owns three pieces of domain logic and their invariants:
//! - **Availability ledger**: per-property committed date ranges; committed
//!   ranges never pairwise-overlap, with half-open `[check_in, check_out)`
//!   semantics.
//! - **Booking lifecycle**: validated creation, ceiling-priced nights, and
//!   terminal idempotent cancellation, with per-property write
//!   serialization so an admission check and its commit are one atomic
//!   step.
//! - **Review eligibility**: one review per completed stay, with the
//!   property's aggregate rating recomputed in full on every mutation.
//!
//! Everything else (HTTP routing, token issuance, media storage, UI) is a
//! collaborator behind a trait seam: callers supply an authenticated
//! [`Principal`], repositories abstract the document store, and a
//! [`Clock`] abstracts "now".

#![warn(missing_docs)]

mod availability;
mod booking;
mod booking_service;
mod clock;
mod commands;
mod entity;
mod errors;
mod events;
mod maintenance;
mod principal;
mod property;
mod repository;
mod review;
mod review_service;
mod stay;

// Re-export core types
pub use availability::{AvailabilityLedger, LedgerEntry};
pub use booking::{Booking, BookingStatus, LifecycleState};
pub use booking_service::BookingService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use commands::{
    CancelBooking, Command, CommandId, CreateBooking, DeleteReview, SubmitReview, UpdateReview,
};
pub use entity::{
    AggregateRoot, BookingId, Entity, EntityId, PropertyId, ReviewId, UserId,
};
pub use errors::{DomainError, DomainResult};
pub use events::{
    BookingCancelled, BookingConfirmed, DomainEvent, EventPublisher, NullEventPublisher,
    RatingRecalculated, RecordingEventPublisher, ReviewDeleted, ReviewSubmitted, ReviewUpdated,
};
pub use maintenance::{BookingSweep, SweepReport};
pub use principal::{Principal, Role};
pub use property::Property;
pub use repository::{
    AggregateRepository, BookingRepository, InMemoryBookingRepository,
    InMemoryPropertyRepository, InMemoryReviewRepository, PropertyRepository, ReviewRepository,
};
pub use review::{AggregateRating, Rating, Review};
pub use review_service::{PropertyReviews, ReviewService};
pub use stay::StayRange;

// Re-export common marker types
pub mod markers {
    //! Marker types for phantom type parameters
    pub use crate::entity::{
        BookingMarker, CommandMarker, EventMarker, PropertyMarker, ReviewMarker, UserMarker,
    };
}
