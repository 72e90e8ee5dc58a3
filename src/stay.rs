// Copyright 2025 Cowboy AI, LLC.

//! Stay date ranges
//!
//! A stay occupies the half-open interval `[check_in, check_out)`: the
//! checkout day is free for the next guest's check-in. All overlap and
//! pricing arithmetic in the crate goes through this value object.

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

const MILLIS_PER_NIGHT: i64 = 24 * 60 * 60 * 1000;

/// A half-open `[check_in, check_out)` date range
///
/// # Examples
///
/// ```rust
/// use cim_domain_lodging::StayRange;
/// use chrono::{TimeZone, Utc};
///
/// let stay = StayRange::new(
///     Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap(),
/// ).unwrap();
///
/// assert_eq!(stay.nights(), 3);
///
/// // Back-to-back stays do not overlap: checkout day is free
/// let next = StayRange::new(
///     Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap(),
/// ).unwrap();
/// assert!(!stay.overlaps(&next));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct StayRange {
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
}

impl StayRange {
    /// Create a range, rejecting empty or inverted intervals
    pub fn new(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> DomainResult<Self> {
        if check_in >= check_out {
            return Err(DomainError::ValidationError(
                "check-out must be after check-in".to_string(),
            ));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Convenience constructor from whole dates at midnight UTC
    pub fn from_dates(check_in: NaiveDate, check_out: NaiveDate) -> DomainResult<Self> {
        Self::new(
            check_in.and_time(chrono::NaiveTime::MIN).and_utc(),
            check_out.and_time(chrono::NaiveTime::MIN).and_utc(),
        )
    }

    /// Check-in instant
    pub fn check_in(&self) -> DateTime<Utc> {
        self.check_in
    }

    /// Check-out instant
    pub fn check_out(&self) -> DateTime<Utc> {
        self.check_out
    }

    /// Open-interval overlap test: `a.start < b.end && b.start < a.end`
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Number of billable nights
    ///
    /// Ceiling division of the millisecond difference; a partial day still
    /// bills a full night, so the minimum is 1.
    pub fn nights(&self) -> u32 {
        let millis = (self.check_out - self.check_in).num_milliseconds();
        (millis as u64).div_ceil(MILLIS_PER_NIGHT as u64) as u32
    }

    /// Does either endpoint fall on a day before `today`?
    ///
    /// Date-only comparison: time-of-day is truncated on both sides.
    pub fn starts_in_past(&self, today: NaiveDate) -> bool {
        self.check_in.date_naive() < today || self.check_out.date_naive() < today
    }

    /// Has the stay fully ended as of `now`?
    pub fn completed_by(&self, now: DateTime<Utc>) -> bool {
        self.check_out < now
    }
}

impl fmt::Display for StayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.check_in.format("%Y-%m-%d"),
            self.check_out.format("%Y-%m-%d")
        )
    }
}
