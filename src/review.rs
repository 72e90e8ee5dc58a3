//! Reviews and aggregate ratings

use crate::entity::{PropertyId, ReviewId, UserId};
use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer rating in `[1, 5]`
///
/// Deserialization routes through [`Rating::new`], so an out-of-range value
/// in stored data is rejected rather than admitted silently.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> DomainResult<Self> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl Rating {
    /// Validate and wrap a raw rating value
    pub fn new(value: u8) -> DomainResult<Self> {
        if !(1..=5).contains(&value) {
            return Err(DomainError::ValidationError(format!(
                "rating must be between 1 and 5, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// The raw value
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arithmetic mean of all ratings for a property, one decimal place
///
/// Recomputed in full on every review mutation rather than adjusted
/// incrementally, so the stored value cannot drift from the review set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AggregateRating(f64);

impl AggregateRating {
    /// The rating of a property with no reviews
    pub fn none() -> Self {
        Self(0.0)
    }

    /// Recompute from the full set of ratings
    pub fn from_ratings<I: IntoIterator<Item = Rating>>(ratings: I) -> Self {
        let mut sum = 0u32;
        let mut count = 0u32;
        for rating in ratings {
            sum += u32::from(rating.value());
            count += 1;
        }
        if count == 0 {
            return Self::none();
        }
        let mean = f64::from(sum) / f64::from(count);
        Self((mean * 10.0).round() / 10.0)
    }

    /// The mean as a float, `0.0` when there are no reviews
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for AggregateRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// A guest's review of a property
///
/// At most one review exists per (property, author) pair; the review
/// service enforces this before persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier
    pub id: ReviewId,
    /// The reviewed property
    pub property_id: PropertyId,
    /// The review's author
    pub author_id: UserId,
    /// Star rating
    pub rating: Rating,
    /// Free-text comment
    pub comment: String,
    /// When the review was created
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Create a review
    pub fn new(
        property_id: PropertyId,
        author_id: UserId,
        rating: Rating,
        comment: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReviewId::new(),
            property_id,
            author_id,
            rating,
            comment,
            created_at,
        }
    }

    /// Replace rating and comment
    pub fn revise(&mut self, rating: Rating, comment: String) {
        self.rating = rating;
        self.comment = comment;
    }

    /// Was this review written by the given user?
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}
