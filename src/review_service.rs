// Copyright 2025 Cowboy AI, LLC.

//! Review eligibility and aggregate ratings
//!
//! Gates review submission on booking history: only a guest holding a
//! confirmed booking whose checkout has passed may review, once per
//! property. Every review mutation recomputes the property's aggregate
//! rating from the full review set.

use crate::clock::Clock;
use crate::commands::{DeleteReview, SubmitReview, UpdateReview};
use crate::entity::{PropertyId, UserId};
use crate::errors::{DomainError, DomainResult};
use crate::events::{
    DomainEvent, EventPublisher, RatingRecalculated, ReviewDeleted, ReviewSubmitted, ReviewUpdated,
};
use crate::principal::Principal;
use crate::repository::{BookingRepository, PropertyRepository, ReviewRepository};
use crate::review::{AggregateRating, Rating, Review};
use std::sync::Arc;
use tracing::info;

/// Review eligibility evaluator and rating maintainer
#[derive(Clone)]
pub struct ReviewService {
    properties: Arc<dyn PropertyRepository>,
    bookings: Arc<dyn BookingRepository>,
    reviews: Arc<dyn ReviewRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

/// Reviews for a property together with the current mean
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyReviews {
    /// Reviews, newest first
    pub reviews: Vec<Review>,
    /// Arithmetic mean over `reviews`
    pub average: AggregateRating,
}

impl ReviewService {
    /// Create a service over the given collaborators
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        bookings: Arc<dyn BookingRepository>,
        reviews: Arc<dyn ReviewRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            properties,
            bookings,
            reviews,
            publisher,
            clock,
        }
    }

    /// May this user review this property right now?
    ///
    /// True iff the user holds a confirmed booking on the property with a
    /// checkout strictly before now, and has not already reviewed it.
    pub fn check_eligibility(
        &self,
        user_id: UserId,
        property_id: PropertyId,
    ) -> DomainResult<bool> {
        let completed_stay = self.has_completed_stay(user_id, property_id)?;
        let already_reviewed = self
            .reviews
            .find_by_property_and_author(property_id, user_id)?
            .is_some();

        Ok(completed_stay && !already_reviewed)
    }

    /// Submit a review for a completed stay
    ///
    /// Eligibility is re-validated here regardless of any earlier
    /// [`check_eligibility`](Self::check_eligibility) call, so a stale
    /// answer cannot admit a duplicate.
    pub fn submit_review(
        &self,
        principal: &Principal,
        command: SubmitReview,
    ) -> DomainResult<Review> {
        let rating = Rating::new(command.rating)?;

        self.properties
            .load(command.property_id)?
            .ok_or_else(|| DomainError::not_found("Property", command.property_id))?;

        if self
            .reviews
            .find_by_property_and_author(command.property_id, principal.user_id)?
            .is_some()
        {
            return Err(DomainError::ConflictError(
                "You have already reviewed this property".to_string(),
            ));
        }

        if !self.has_completed_stay(principal.user_id, command.property_id)? {
            return Err(DomainError::BusinessRuleViolation {
                rule: "Only guests who have completed their stay can review".to_string(),
            });
        }

        let review = Review::new(
            command.property_id,
            principal.user_id,
            rating,
            command.comment,
            self.clock.now(),
        );
        self.reviews.save(&review)?;

        info!(
            review_id = %review.id,
            property_id = %command.property_id,
            rating = %rating,
            "review submitted"
        );

        let mut events: Vec<Box<dyn DomainEvent>> = vec![Box::new(ReviewSubmitted {
            review_id: review.id,
            property_id: command.property_id,
            author_id: principal.user_id,
            rating,
            occurred_at: self.clock.now(),
        })];
        events.extend(self.recompute_rating(command.property_id)?);
        self.publish(events)?;

        Ok(review)
    }

    /// Revise an existing review; author only
    pub fn update_review(
        &self,
        principal: &Principal,
        command: UpdateReview,
    ) -> DomainResult<Review> {
        let mut review = self
            .reviews
            .load(command.review_id)?
            .ok_or_else(|| DomainError::not_found("Review", command.review_id))?;

        if !review.is_authored_by(principal.user_id) {
            return Err(DomainError::AuthorizationError(
                "Not authorized to update this review".to_string(),
            ));
        }

        let rating = Rating::new(command.rating)?;
        review.revise(rating, command.comment);
        self.reviews.save(&review)?;

        let mut events: Vec<Box<dyn DomainEvent>> = vec![Box::new(ReviewUpdated {
            review_id: review.id,
            property_id: review.property_id,
            rating,
            occurred_at: self.clock.now(),
        })];
        events.extend(self.recompute_rating(review.property_id)?);
        self.publish(events)?;

        Ok(review)
    }

    /// Remove a review; author only
    pub fn delete_review(&self, principal: &Principal, command: DeleteReview) -> DomainResult<()> {
        let review = self
            .reviews
            .load(command.review_id)?
            .ok_or_else(|| DomainError::not_found("Review", command.review_id))?;

        if !review.is_authored_by(principal.user_id) {
            return Err(DomainError::AuthorizationError(
                "Not authorized to delete this review".to_string(),
            ));
        }

        self.reviews.delete(review.id)?;

        info!(review_id = %review.id, property_id = %review.property_id, "review deleted");

        let mut events: Vec<Box<dyn DomainEvent>> = vec![Box::new(ReviewDeleted {
            review_id: review.id,
            property_id: review.property_id,
            occurred_at: self.clock.now(),
        })];
        events.extend(self.recompute_rating(review.property_id)?);
        self.publish(events)?;

        Ok(())
    }

    /// Reviews for a property, newest first, with the current mean
    pub fn reviews_for_property(&self, property_id: PropertyId) -> DomainResult<PropertyReviews> {
        let mut reviews = self.reviews.find_by_property(property_id)?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let average = AggregateRating::from_ratings(reviews.iter().map(|r| r.rating));
        Ok(PropertyReviews { reviews, average })
    }

    fn has_completed_stay(&self, user_id: UserId, property_id: PropertyId) -> DomainResult<bool> {
        let now = self.clock.now();
        Ok(self
            .bookings
            .find_by_property(property_id)?
            .iter()
            .any(|b| b.guest_id == user_id && b.completed_by(now)))
    }

    /// Full recompute of the stored mean; absent properties are tolerated
    fn recompute_rating(
        &self,
        property_id: PropertyId,
    ) -> DomainResult<Option<Box<dyn DomainEvent>>> {
        let Some(mut property) = self.properties.load(property_id)? else {
            return Ok(None);
        };

        let reviews = self.reviews.find_by_property(property_id)?;
        let rating = AggregateRating::from_ratings(reviews.iter().map(|r| r.rating));
        property.set_rating(rating);
        self.properties.save(&property)?;

        Ok(Some(Box::new(RatingRecalculated {
            property_id,
            rating: rating.value(),
            review_count: reviews.len(),
            occurred_at: self.clock.now(),
        })))
    }

    fn publish(&self, events: Vec<Box<dyn DomainEvent>>) -> DomainResult<()> {
        self.publisher
            .publish_events(events)
            .map_err(DomainError::InternalError)
    }
}
