// Copyright 2025 Cowboy AI, LLC.

//! Property aggregate
//!
//! A property owns its availability ledger and its derived aggregate
//! rating. Availability is mutated only through the aggregate, inside the
//! booking service's per-property serialization, so the ledger and the
//! booking records cannot diverge under concurrent writes.

use crate::availability::AvailabilityLedger;
use crate::entity::{AggregateRoot, BookingId, Entity, PropertyId, PropertyMarker, UserId};
use crate::errors::{DomainError, DomainResult};
use crate::review::AggregateRating;
use crate::stay::StayRange;
use serde::{Deserialize, Serialize};

/// A bookable property listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    entity: Entity<PropertyMarker>,
    version: u64,

    /// The owning host
    pub host_id: UserId,
    /// Listing title
    pub title: String,
    /// Human-readable location
    pub location: String,
    /// Price per night in minor currency units
    pub nightly_price: u64,
    /// Maximum number of guests per stay
    pub guest_capacity: u32,
    /// Media store references; the core never inspects content
    pub image_urls: Vec<String>,

    ledger: AvailabilityLedger,
    rating: AggregateRating,
}

impl Property {
    /// Create a listing, validating the required fields
    pub fn new(
        host_id: UserId,
        title: impl Into<String>,
        location: impl Into<String>,
        nightly_price: u64,
        guest_capacity: u32,
    ) -> DomainResult<Self> {
        let title = title.into();
        let location = location.into();

        if title.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "title is required".to_string(),
            ));
        }
        if location.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "location is required".to_string(),
            ));
        }
        if nightly_price == 0 {
            return Err(DomainError::ValidationError(
                "nightly price must be positive".to_string(),
            ));
        }
        if guest_capacity == 0 {
            return Err(DomainError::ValidationError(
                "guest capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            entity: Entity::new(),
            version: 0,
            host_id,
            title,
            location,
            nightly_price,
            guest_capacity,
            image_urls: Vec::new(),
            ledger: AvailabilityLedger::new(),
            rating: AggregateRating::none(),
        })
    }

    /// Is this property owned by the given user?
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.host_id == user_id
    }

    /// Can this property host the given party size?
    pub fn accommodates(&self, guest_count: u32) -> bool {
        guest_count >= 1 && guest_count <= self.guest_capacity
    }

    /// Total price for a stay: nightly price times billable nights
    pub fn quote(&self, range: &StayRange) -> u64 {
        self.nightly_price * u64::from(range.nights())
    }

    /// Read access to the availability ledger
    pub fn ledger(&self) -> &AvailabilityLedger {
        &self.ledger
    }

    /// Would this range be admitted?
    pub fn is_available(&self, range: &StayRange) -> bool {
        self.ledger.is_available(range)
    }

    /// Commit a booking's range into the ledger
    pub fn commit_stay(&mut self, booking_id: BookingId, range: StayRange) -> DomainResult<()> {
        self.ledger.commit(booking_id, range)?;
        self.increment_version();
        Ok(())
    }

    /// Release a booking's committed range; absent entries are a no-op
    pub fn release_stay(&mut self, booking_id: BookingId) -> bool {
        let released = self.ledger.release(booking_id);
        if released {
            self.increment_version();
        }
        released
    }

    /// Current aggregate rating
    pub fn rating(&self) -> AggregateRating {
        self.rating
    }

    /// Replace the aggregate rating after a review mutation
    pub fn set_rating(&mut self, rating: AggregateRating) {
        self.rating = rating;
        self.increment_version();
    }
}

impl AggregateRoot for Property {
    type Id = PropertyId;

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
    use chrono::NaiveDate;

    fn property() -> Property {
        Property::new(UserId::new(), "Harbor cottage", "Oslo", 100, 4).unwrap()
    }

    fn range(ci: u32, co: u32) -> StayRange {
        StayRange::from_dates(
            NaiveDate::from_ymd_opt(2024, 1, ci).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, co).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_validates_required_fields() {
        let host = UserId::new();

        assert!(Property::new(host, "  ", "Oslo", 100, 2)
            .unwrap_err()
            .is_validation_error());
        assert!(Property::new(host, "Cottage", "", 100, 2)
            .unwrap_err()
            .is_validation_error());
        assert!(Property::new(host, "Cottage", "Oslo", 0, 2)
            .unwrap_err()
            .is_validation_error());
        assert!(Property::new(host, "Cottage", "Oslo", 100, 0)
            .unwrap_err()
            .is_validation_error());
    }

    #[test]
    fn test_ownership() {
        let host = UserId::new();
        let property = Property::new(host, "Cottage", "Oslo", 100, 2).unwrap();

        assert!(property.is_owned_by(host));
        assert!(!property.is_owned_by(UserId::new()));
    }

    #[test]
    fn test_capacity_bounds() {
        let property = property();

        assert!(!property.accommodates(0));
        assert!(property.accommodates(1));
        assert!(property.accommodates(4));
        assert!(!property.accommodates(5));
    }

    /// Test the reference pricing example: 3 nights at 100 is 300
    #[test]
    fn test_quote() {
        let property = property();
        assert_eq!(property.quote(&range(1, 4)), 300);
        assert_eq!(property.quote(&range(1, 2)), 100);
    }

    /// Test commit and release bump the version
    #[test]
    fn test_ledger_mutations_version_the_aggregate() {
        let mut property = property();
        let booking = BookingId::new();
        assert_eq!(property.version(), 0);

        property.commit_stay(booking, range(1, 4)).unwrap();
        assert_eq!(property.version(), 1);
        assert!(!property.is_available(&range(2, 3)));

        assert!(property.release_stay(booking));
        assert_eq!(property.version(), 2);

        // Releasing again is a no-op and does not version
        assert!(!property.release_stay(booking));
        assert_eq!(property.version(), 2);
    }

    #[test]
    fn test_rating_replacement() {
        let mut property = property();
        assert_eq!(property.rating().value(), 0.0);

        property.set_rating(AggregateRating::from_ratings(
            [3, 5].map(|v| crate::review::Rating::new(v).unwrap()),
        ));
        assert_eq!(property.rating().value(), 4.0);
    }
}
