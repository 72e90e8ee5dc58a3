// Copyright 2025 Cowboy AI, LLC.

//! Booking lifecycle service
//!
//! Creates, prices, and cancels bookings, mutating the property's
//! availability ledger and enforcing ownership checks.
//!
//! Admission and commit are a classic check-then-act pair: two requests
//! for overlapping ranges can both observe the range as free before
//! either commits. The service closes that gap by serializing all writes
//! for one property behind a per-property lock; the admission check, the
//! booking persist, and the ledger commit happen under the same guard.
//! Requests for different properties never contend.

use crate::booking::Booking;
use crate::clock::Clock;
use crate::commands::{CancelBooking, CreateBooking};
use crate::entity::{AggregateRoot, BookingId, PropertyId};
use crate::errors::{DomainError, DomainResult};
use crate::events::{BookingCancelled, BookingConfirmed, DomainEvent, EventPublisher};
use crate::principal::{Principal, Role};
use crate::property::Property;
use crate::repository::{BookingRepository, PropertyRepository};
use crate::stay::StayRange;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Per-property write serialization
///
/// Lock entries are created on first use and live for the registry's
/// lifetime; the registry itself is shared by clones of the service.
#[derive(Clone, Default)]
struct PropertyLockRegistry {
    locks: Arc<Mutex<HashMap<PropertyId, Arc<Mutex<()>>>>>,
}

impl PropertyLockRegistry {
    fn lock_for(&self, property_id: PropertyId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(property_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Booking lifecycle manager
#[derive(Clone)]
pub struct BookingService {
    properties: Arc<dyn PropertyRepository>,
    bookings: Arc<dyn BookingRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: PropertyLockRegistry,
}

impl BookingService {
    /// Create a service over the given collaborators
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        bookings: Arc<dyn BookingRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            properties,
            bookings,
            publisher,
            clock,
            locks: PropertyLockRegistry::default(),
        }
    }

    /// Create a booking for the requesting guest
    ///
    /// Validation order: customer name, date sanity, past dates, property
    /// existence, capacity, admission. The first failure wins and maps to
    /// the matching [`DomainError`] variant.
    pub fn create_booking(
        &self,
        principal: &Principal,
        command: CreateBooking,
    ) -> DomainResult<Booking> {
        if command.customer_name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Customer name is required".to_string(),
            ));
        }

        let stay = StayRange::new(command.check_in, command.check_out)?;

        let today = self.clock.today();
        if stay.starts_in_past(today) {
            return Err(DomainError::ValidationError(
                "Cannot book for past dates".to_string(),
            ));
        }

        // Serialize against other writers on this property before the
        // admission check; the check and the commit must be one step.
        let guard = self.locks.lock_for(command.property_id);
        let _held = guard.lock().unwrap();

        let mut property = self.load_property(command.property_id)?;

        if !property.accommodates(command.guest_count) {
            return Err(DomainError::ValidationError(format!(
                "guest count must be between 1 and {}",
                property.guest_capacity
            )));
        }

        if !property.is_available(&stay) {
            warn!(
                property_id = %command.property_id,
                %stay,
                "booking rejected: dates unavailable"
            );
            return Err(DomainError::ConflictError(
                "Selected dates are not available".to_string(),
            ));
        }

        let total_price = property.quote(&stay);
        let booking = Booking::confirm(
            principal.user_id,
            command.property_id,
            stay,
            command.guest_count,
            total_price,
            command.customer_name.trim().to_string(),
        );

        self.bookings.save(&booking)?;
        property.commit_stay(booking.id(), stay)?;
        self.properties.save(&property)?;

        info!(
            booking_id = %booking.id(),
            property_id = %command.property_id,
            %stay,
            total_price,
            "booking confirmed"
        );

        self.publish(vec![Box::new(BookingConfirmed {
            booking_id: booking.id(),
            property_id: command.property_id,
            guest_id: principal.user_id,
            stay,
            total_price,
            occurred_at: self.clock.now(),
        })])?;

        Ok(booking)
    }

    /// Cancel a booking
    ///
    /// Only the booking's guest, the owning property's host, or an admin
    /// may cancel. Cancelling an already-cancelled booking returns the
    /// booking unchanged.
    pub fn cancel_booking(
        &self,
        principal: &Principal,
        command: CancelBooking,
    ) -> DomainResult<Booking> {
        let booking = self
            .bookings
            .load(command.booking_id)?
            .ok_or_else(|| DomainError::not_found("Booking", command.booking_id))?;

        let property = self.properties.load(booking.property_id)?;
        self.authorize_booking_access(principal, &booking, property.as_ref(), "cancel")?;

        if !booking.is_confirmed() {
            // Terminal already; idempotent no-op
            return Ok(booking);
        }

        let guard = self.locks.lock_for(booking.property_id);
        let _held = guard.lock().unwrap();

        // Reload under the lock so we observe any concurrent cancel
        let mut booking = self
            .bookings
            .load(command.booking_id)?
            .ok_or_else(|| DomainError::not_found("Booking", command.booking_id))?;

        if !booking.cancel() {
            return Ok(booking);
        }
        self.bookings.save(&booking)?;

        // Release is keyed by booking id and idempotent, so a crash
        // between the status write and this point can be re-driven.
        if let Some(mut property) = self.properties.load(booking.property_id)? {
            property.release_stay(booking.id());
            self.properties.save(&property)?;
        }

        info!(
            booking_id = %booking.id(),
            property_id = %booking.property_id,
            cancelled_by = %principal.user_id,
            "booking cancelled"
        );

        self.publish(vec![Box::new(BookingCancelled {
            booking_id: booking.id(),
            property_id: booking.property_id,
            cancelled_by: principal.user_id,
            occurred_at: self.clock.now(),
        })])?;

        Ok(booking)
    }

    /// Fetch a single booking
    ///
    /// Permitted only to the booking's guest, the property's host, or an
    /// admin.
    pub fn booking_by_id(
        &self,
        principal: &Principal,
        booking_id: BookingId,
    ) -> DomainResult<Booking> {
        let booking = self
            .bookings
            .load(booking_id)?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;

        let property = self.properties.load(booking.property_id)?;
        self.authorize_booking_access(principal, &booking, property.as_ref(), "view")?;

        Ok(booking)
    }

    /// List the requesting guest's own bookings
    pub fn bookings_for_guest(&self, principal: &Principal) -> DomainResult<Vec<Booking>> {
        self.bookings.find_by_guest(principal.user_id)
    }

    /// List all bookings across the properties the requesting host owns
    pub fn bookings_for_host(&self, principal: &Principal) -> DomainResult<Vec<Booking>> {
        if principal.role != Role::Host {
            return Err(DomainError::AuthorizationError(
                "Only hosts can list property bookings".to_string(),
            ));
        }

        let mut result = Vec::new();
        for property in self.properties.find_by_host(principal.user_id)? {
            result.extend(self.bookings.find_by_property(property.id())?);
        }
        Ok(result)
    }

    fn load_property(&self, property_id: PropertyId) -> DomainResult<Property> {
        self.properties
            .load(property_id)?
            .ok_or_else(|| DomainError::not_found("Property", property_id))
    }

    fn authorize_booking_access(
        &self,
        principal: &Principal,
        booking: &Booking,
        property: Option<&Property>,
        action: &str,
    ) -> DomainResult<()> {
        let is_guest = booking.guest_id == principal.user_id;
        let is_host = property.is_some_and(|p| p.is_owned_by(principal.user_id));

        if is_guest || is_host || principal.is_admin() {
            return Ok(());
        }
        Err(DomainError::AuthorizationError(format!(
            "Not authorized to {action} this booking"
        )))
    }

    fn publish(&self, events: Vec<Box<dyn DomainEvent>>) -> DomainResult<()> {
        self.publisher
            .publish_events(events)
            .map_err(DomainError::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::entity::UserId;
    use crate::events::RecordingEventPublisher;
    use crate::repository::{AggregateRepository, InMemoryBookingRepository, InMemoryPropertyRepository};
    use chrono::{TimeZone, Utc};

    fn service() -> (
        BookingService,
        InMemoryPropertyRepository,
        RecordingEventPublisher,
    ) {
        let properties = InMemoryPropertyRepository::new();
        let publisher = RecordingEventPublisher::new();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        let service = BookingService::new(
            Arc::new(properties.clone()),
            Arc::new(InMemoryBookingRepository::new()),
            Arc::new(publisher.clone()),
            Arc::new(clock),
        );
        (service, properties, publisher)
    }

    fn listed_property(properties: &InMemoryPropertyRepository, host: UserId) -> Property {
        let property = Property::new(host, "Cottage", "Oslo", 100, 4).unwrap();
        properties.save(&property).unwrap();
        property
    }

    fn create_cmd(property_id: PropertyId, ci_day: u32, co_day: u32) -> CreateBooking {
        CreateBooking {
            property_id,
            check_in: Utc.with_ymd_and_hms(2024, 2, ci_day, 0, 0, 0).unwrap(),
            check_out: Utc.with_ymd_and_hms(2024, 2, co_day, 0, 0, 0).unwrap(),
            guest_count: 2,
            customer_name: "Ada Lovelace".to_string(),
        }
    }

    /// Test a successful creation commits the range and emits an event
    #[test]
    fn test_create_booking_commits_and_publishes() {
        let (service, properties, publisher) = service();
        let property = listed_property(&properties, UserId::new());
        let guest = Principal::guest(UserId::new());

        let booking = service
            .create_booking(&guest, create_cmd(property.id(), 1, 4))
            .unwrap();

        assert!(booking.is_confirmed());
        assert_eq!(booking.total_price, 300);

        let stored = properties.load(property.id()).unwrap().unwrap();
        assert_eq!(stored.ledger().len(), 1);
        stored.ledger().assert_no_overlaps().unwrap();

        assert_eq!(publisher.event_types(), vec!["BookingConfirmed"]);
    }

    /// Test validation failures map to the right variants, in order
    #[test]
    fn test_create_booking_validation_order() {
        let (service, properties, _) = service();
        let property = listed_property(&properties, UserId::new());
        let guest = Principal::guest(UserId::new());

        // Blank name rejects before anything else is looked at
        let mut cmd = create_cmd(PropertyId::new(), 1, 4);
        cmd.customer_name = "   ".to_string();
        assert!(service
            .create_booking(&guest, cmd)
            .unwrap_err()
            .is_validation_error());

        // Past dates reject before the property lookup
        let mut cmd = create_cmd(PropertyId::new(), 1, 4);
        cmd.check_in = Utc.with_ymd_and_hms(2023, 12, 28, 0, 0, 0).unwrap();
        cmd.check_out = Utc.with_ymd_and_hms(2023, 12, 30, 0, 0, 0).unwrap();
        assert!(service
            .create_booking(&guest, cmd)
            .unwrap_err()
            .is_validation_error());

        // Unknown property
        let err = service
            .create_booking(&guest, create_cmd(PropertyId::new(), 1, 4))
            .unwrap_err();
        assert!(err.is_not_found());

        // Oversized party
        let mut cmd = create_cmd(property.id(), 1, 4);
        cmd.guest_count = 5;
        assert!(service
            .create_booking(&guest, cmd)
            .unwrap_err()
            .is_validation_error());
    }

    /// Test overlapping dates conflict
    #[test]
    fn test_create_booking_conflicts_on_overlap() {
        let (service, properties, _) = service();
        let property = listed_property(&properties, UserId::new());
        let guest = Principal::guest(UserId::new());

        service
            .create_booking(&guest, create_cmd(property.id(), 1, 5))
            .unwrap();

        let err = service
            .create_booking(&guest, create_cmd(property.id(), 3, 8))
            .unwrap_err();
        assert!(err.is_conflict());

        // Back-to-back is fine
        service
            .create_booking(&guest, create_cmd(property.id(), 5, 8))
            .unwrap();
    }

    /// Test cancel authorization and idempotency
    #[test]
    fn test_cancel_booking_authorization() {
        let (service, properties, publisher) = service();
        let host = UserId::new();
        let property = listed_property(&properties, host);
        let guest = Principal::guest(UserId::new());

        let booking = service
            .create_booking(&guest, create_cmd(property.id(), 1, 4))
            .unwrap();

        // A stranger may not cancel
        let stranger = Principal::guest(UserId::new());
        let err = service
            .cancel_booking(
                &stranger,
                CancelBooking {
                    booking_id: booking.id(),
                },
            )
            .unwrap_err();
        assert!(err.is_authorization_error());

        // The host may
        let cancelled = service
            .cancel_booking(
                &Principal::host(host),
                CancelBooking {
                    booking_id: booking.id(),
                },
            )
            .unwrap();
        assert!(!cancelled.is_confirmed());

        // Range was released
        let stored = properties.load(property.id()).unwrap().unwrap();
        assert!(stored.ledger().is_empty());
        assert_eq!(
            publisher.event_types(),
            vec!["BookingConfirmed", "BookingCancelled"]
        );
    }

    /// Test double cancel is a no-op returning the cancelled booking
    #[test]
    fn test_cancel_twice_is_noop() {
        let (service, properties, publisher) = service();
        let property = listed_property(&properties, UserId::new());
        let guest = Principal::guest(UserId::new());

        let booking = service
            .create_booking(&guest, create_cmd(property.id(), 1, 4))
            .unwrap();
        let cmd = CancelBooking {
            booking_id: booking.id(),
        };

        let first = service.cancel_booking(&guest, cmd).unwrap();
        let second = service.cancel_booking(&guest, cmd).unwrap();

        assert_eq!(first.status(), second.status());
        assert_eq!(first.version(), second.version());
        // Only one cancellation event
        assert_eq!(
            publisher.event_types(),
            vec!["BookingConfirmed", "BookingCancelled"]
        );
    }

    /// Test read-side authorization
    #[test]
    fn test_booking_by_id_access() {
        let (service, properties, _) = service();
        let host = UserId::new();
        let property = listed_property(&properties, host);
        let guest = Principal::guest(UserId::new());

        let booking = service
            .create_booking(&guest, create_cmd(property.id(), 1, 4))
            .unwrap();

        assert!(service.booking_by_id(&guest, booking.id()).is_ok());
        assert!(service
            .booking_by_id(&Principal::host(host), booking.id())
            .is_ok());
        assert!(service
            .booking_by_id(&Principal::admin(UserId::new()), booking.id())
            .is_ok());

        let err = service
            .booking_by_id(&Principal::guest(UserId::new()), booking.id())
            .unwrap_err();
        assert!(err.is_authorization_error());
    }

    /// Test host listing requires the host role and spans owned properties
    #[test]
    fn test_bookings_for_host() {
        let (service, properties, _) = service();
        let host = UserId::new();
        let first = listed_property(&properties, host);
        let second = listed_property(&properties, host);
        let unrelated = listed_property(&properties, UserId::new());

        let guest = Principal::guest(UserId::new());
        service
            .create_booking(&guest, create_cmd(first.id(), 1, 4))
            .unwrap();
        service
            .create_booking(&guest, create_cmd(second.id(), 1, 4))
            .unwrap();
        service
            .create_booking(&guest, create_cmd(unrelated.id(), 1, 4))
            .unwrap();

        let listed = service.bookings_for_host(&Principal::host(host)).unwrap();
        assert_eq!(listed.len(), 2);

        let err = service.bookings_for_host(&guest).unwrap_err();
        assert!(err.is_authorization_error());

        assert_eq!(service.bookings_for_guest(&guest).unwrap().len(), 3);
    }
}
