// Copyright 2025 Cowboy AI, LLC.

//! Repository seams over the persistent store
//!
//! The services talk to the document store only through these traits. The
//! store must provide read-your-write consistency within a request; the
//! in-memory implementations here do, and serve tests and projections.

use crate::booking::Booking;
use crate::entity::{AggregateRoot, BookingId, PropertyId, ReviewId, UserId};
use crate::errors::DomainResult;
use crate::property::Property;
use crate::review::Review;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Repository trait for loading and saving aggregates
pub trait AggregateRepository<A: AggregateRoot>: Send + Sync {
    /// Load aggregate by ID
    fn load(&self, id: A::Id) -> DomainResult<Option<A>>;

    /// Save aggregate
    fn save(&self, aggregate: &A) -> DomainResult<()>;
}

/// Store of property aggregates
pub trait PropertyRepository: AggregateRepository<Property> {
    /// All properties owned by a host
    fn find_by_host(&self, host_id: UserId) -> DomainResult<Vec<Property>>;
}

/// Store of booking aggregates with the query shapes the services need
pub trait BookingRepository: AggregateRepository<Booking> {
    /// All bookings made by a guest
    fn find_by_guest(&self, guest_id: UserId) -> DomainResult<Vec<Booking>>;

    /// All bookings on a property
    fn find_by_property(&self, property_id: PropertyId) -> DomainResult<Vec<Booking>>;

    /// Every stored booking; used by the maintenance sweep
    fn all(&self) -> DomainResult<Vec<Booking>>;

    /// Remove a booking record; absent ids are a no-op returning false
    fn delete(&self, booking_id: BookingId) -> DomainResult<bool>;
}

/// Store of reviews
///
/// Reviews are unversioned entities, so this trait stands alone rather
/// than extending [`AggregateRepository`].
pub trait ReviewRepository: Send + Sync {
    /// Load a review by ID
    fn load(&self, id: ReviewId) -> DomainResult<Option<Review>>;

    /// Insert or replace a review
    fn save(&self, review: &Review) -> DomainResult<()>;

    /// Remove a review; absent ids are a no-op returning false
    fn delete(&self, id: ReviewId) -> DomainResult<bool>;

    /// All reviews for a property
    fn find_by_property(&self, property_id: PropertyId) -> DomainResult<Vec<Review>>;

    /// The unique review a user wrote for a property, if any
    fn find_by_property_and_author(
        &self,
        property_id: PropertyId,
        author_id: UserId,
    ) -> DomainResult<Option<Review>>;
}

/// In-memory property store
#[derive(Clone, Default)]
pub struct InMemoryPropertyRepository {
    storage: Arc<RwLock<HashMap<PropertyId, Property>>>,
}

impl InMemoryPropertyRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl AggregateRepository<Property> for InMemoryPropertyRepository {
    fn load(&self, id: PropertyId) -> DomainResult<Option<Property>> {
        Ok(self.storage.read().unwrap().get(&id).cloned())
    }

    fn save(&self, aggregate: &Property) -> DomainResult<()> {
        self.storage
            .write()
            .unwrap()
            .insert(aggregate.id(), aggregate.clone());
        Ok(())
    }
}

impl PropertyRepository for InMemoryPropertyRepository {
    fn find_by_host(&self, host_id: UserId) -> DomainResult<Vec<Property>> {
        Ok(self
            .storage
            .read()
            .unwrap()
            .values()
            .filter(|p| p.host_id == host_id)
            .cloned()
            .collect())
    }
}

/// In-memory booking store
#[derive(Clone, Default)]
pub struct InMemoryBookingRepository {
    storage: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl AggregateRepository<Booking> for InMemoryBookingRepository {
    fn load(&self, id: BookingId) -> DomainResult<Option<Booking>> {
        Ok(self.storage.read().unwrap().get(&id).cloned())
    }

    fn save(&self, aggregate: &Booking) -> DomainResult<()> {
        self.storage
            .write()
            .unwrap()
            .insert(aggregate.id(), aggregate.clone());
        Ok(())
    }
}

impl BookingRepository for InMemoryBookingRepository {
    fn find_by_guest(&self, guest_id: UserId) -> DomainResult<Vec<Booking>> {
        Ok(self
            .storage
            .read()
            .unwrap()
            .values()
            .filter(|b| b.guest_id == guest_id)
            .cloned()
            .collect())
    }

    fn find_by_property(&self, property_id: PropertyId) -> DomainResult<Vec<Booking>> {
        Ok(self
            .storage
            .read()
            .unwrap()
            .values()
            .filter(|b| b.property_id == property_id)
            .cloned()
            .collect())
    }

    fn all(&self) -> DomainResult<Vec<Booking>> {
        Ok(self.storage.read().unwrap().values().cloned().collect())
    }

    fn delete(&self, booking_id: BookingId) -> DomainResult<bool> {
        Ok(self.storage.write().unwrap().remove(&booking_id).is_some())
    }
}

/// In-memory review store
#[derive(Clone, Default)]
pub struct InMemoryReviewRepository {
    storage: Arc<RwLock<HashMap<ReviewId, Review>>>,
}

impl InMemoryReviewRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReviewRepository for InMemoryReviewRepository {
    fn load(&self, id: ReviewId) -> DomainResult<Option<Review>> {
        Ok(self.storage.read().unwrap().get(&id).cloned())
    }

    fn save(&self, review: &Review) -> DomainResult<()> {
        self.storage
            .write()
            .unwrap()
            .insert(review.id, review.clone());
        Ok(())
    }

    fn delete(&self, id: ReviewId) -> DomainResult<bool> {
        Ok(self.storage.write().unwrap().remove(&id).is_some())
    }

    fn find_by_property(&self, property_id: PropertyId) -> DomainResult<Vec<Review>> {
        Ok(self
            .storage
            .read()
            .unwrap()
            .values()
            .filter(|r| r.property_id == property_id)
            .cloned()
            .collect())
    }

    fn find_by_property_and_author(
        &self,
        property_id: PropertyId,
        author_id: UserId,
    ) -> DomainResult<Option<Review>> {
        Ok(self
            .storage
            .read()
            .unwrap()
            .values()
            .find(|r| r.property_id == property_id && r.author_id == author_id)
            .cloned())
    }
}
