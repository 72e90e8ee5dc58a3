// Copyright 2025 Cowboy AI, LLC.

//! Booking aggregate and lifecycle
//!
//! A booking is created `Confirmed` (creation is only reachable after the
//! availability ledger admits the range) and can transition exactly once to
//! `Cancelled`, which is terminal. Cancelling an already-cancelled booking
//! is an idempotent no-op, not an error.

use crate::entity::{AggregateRoot, BookingId, BookingMarker, Entity, PropertyId, UserId};
use crate::errors::{DomainError, DomainResult};
use crate::stay::StayRange;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// States in an aggregate lifecycle
///
/// Transitions out of a terminal state are invalid by definition.
pub trait LifecycleState: Sized + PartialEq {
    /// State name for logging and error messages
    fn name(&self) -> &'static str;

    /// Is this a terminal state?
    fn is_terminal(&self) -> bool;

    /// Is a transition to `target` permitted?
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Guarded transition, rejecting anything the state machine forbids
    fn transition_to(&mut self, target: Self) -> DomainResult<()> {
        if !self.can_transition_to(&target) {
            return Err(DomainError::InvalidStateTransition {
                from: self.name().to_string(),
                to: target.name().to_string(),
            });
        }
        *self = target;
        Ok(())
    }
}

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Active reservation holding its date range
    Confirmed,
    /// Terminal state, the date range has been released
    Cancelled,
}

impl LifecycleState for BookingStatus {
    fn name(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (Self::Confirmed, Self::Cancelled))
    }
}

/// A guest's reservation of a property for a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    entity: Entity<BookingMarker>,
    version: u64,

    /// The guest who booked
    pub guest_id: UserId,
    /// The booked property
    pub property_id: PropertyId,
    /// The reserved `[check_in, check_out)` range
    pub stay: StayRange,
    /// Party size
    pub guest_count: u32,
    /// Nightly price times billable nights, in minor currency units
    pub total_price: u64,
    /// Name shown on the confirmation and invoice
    pub customer_name: String,

    status: BookingStatus,
}

impl Booking {
    /// Create a confirmed booking
    ///
    /// Only the booking service calls this, after validation and admission
    /// have both passed for the range.
    pub fn confirm(
        guest_id: UserId,
        property_id: PropertyId,
        stay: StayRange,
        guest_count: u32,
        total_price: u64,
        customer_name: String,
    ) -> Self {
        Self {
            entity: Entity::new(),
            version: 0,
            guest_id,
            property_id,
            stay,
            guest_count,
            total_price,
            customer_name,
            status: BookingStatus::Confirmed,
        }
    }

    /// Current lifecycle status
    pub fn status(&self) -> BookingStatus {
        self.status
    }

    /// Is the reservation still holding its range?
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// A completed stay: still confirmed and checked out before `now`
    pub fn completed_by(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.is_confirmed() && self.stay.completed_by(now)
    }

    /// Cancel the reservation
    ///
    /// Returns whether a transition happened. A booking that is already
    /// cancelled stays cancelled and reports `false`.
    pub fn cancel(&mut self) -> bool {
        match self.status.transition_to(BookingStatus::Cancelled) {
            Ok(()) => {
                self.increment_version();
                true
            }
            // Already terminal
            Err(_) => false,
        }
    }
}

impl AggregateRoot for Booking {
    type Id = BookingId;

    fn id(&self) -> Self::Id {
        self.entity.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn increment_version(&mut self) {
        self.version += 1;
        self.entity.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn stay() -> StayRange {
        StayRange::from_dates(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        )
        .unwrap()
    }

    fn booking() -> Booking {
        Booking::confirm(
            UserId::new(),
            PropertyId::new(),
            stay(),
            2,
            300,
            "Ada Lovelace".to_string(),
        )
    }

    /// Test the lifecycle transition table
    ///
    /// ```mermaid
    /// graph LR
    ///     A[Confirmed] -->|cancel| B[Cancelled]
    ///     B -->|terminal| B
    /// ```
    #[test]
    fn test_status_transitions() {
        let confirmed = BookingStatus::Confirmed;
        let cancelled = BookingStatus::Cancelled;

        assert!(confirmed.can_transition_to(&cancelled));
        assert!(!cancelled.can_transition_to(&confirmed));
        assert!(!confirmed.can_transition_to(&confirmed));
        assert!(!confirmed.is_terminal());
        assert!(cancelled.is_terminal());
    }

    #[test]
    fn test_guarded_transition_rejects_reconfirmation() {
        let mut status = BookingStatus::Cancelled;
        let err = status.transition_to(BookingStatus::Confirmed).unwrap_err();

        assert!(matches!(
            err,
            DomainError::InvalidStateTransition { .. }
        ));
        assert_eq!(
            err.to_string(),
            "Invalid state transition from Cancelled to Confirmed"
        );
    }

    #[test]
    fn test_new_bookings_are_confirmed() {
        let booking = booking();
        assert!(booking.is_confirmed());
        assert_eq!(booking.status(), BookingStatus::Confirmed);
        assert_eq!(booking.version(), 0);
    }

    /// Test cancel transitions once and is a no-op afterwards
    #[test]
    fn test_cancel_is_idempotent() {
        let mut booking = booking();

        assert!(booking.cancel());
        assert_eq!(booking.status(), BookingStatus::Cancelled);
        assert_eq!(booking.version(), 1);

        // Second cancel: same status, no version bump, no error
        assert!(!booking.cancel());
        assert_eq!(booking.status(), BookingStatus::Cancelled);
        assert_eq!(booking.version(), 1);
    }

    /// Test completed-stay detection
    #[test]
    fn test_completed_by() {
        let mut booking = booking();
        let before_checkout = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let after_checkout = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();

        assert!(!booking.completed_by(before_checkout));
        assert!(booking.completed_by(after_checkout));

        // A cancelled booking is never a completed stay
        booking.cancel();
        assert!(!booking.completed_by(after_checkout));
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
        assert_eq!(
            serde_json::to_string(&BookingStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
