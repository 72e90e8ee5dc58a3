//! Maintenance sweep over stale bookings
//!
//! Externally scheduled job that deletes booking records with no further
//! lifecycle value: cancelled bookings, and confirmed bookings whose
//! checkout has passed the retention horizon. The sweep is idempotent and
//! has no ordering dependency on live traffic; a record created between
//! two runs is simply picked up by the next one.

use crate::clock::Clock;
use crate::entity::AggregateRoot;
use crate::errors::DomainResult;
use crate::repository::BookingRepository;
use chrono::Duration;
use std::sync::Arc;
use tracing::info;

/// Outcome of one sweep run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Bookings examined
    pub examined: usize,
    /// Bookings deleted
    pub deleted: usize,
}

/// Periodic cleanup of cancelled and expired bookings
#[derive(Clone)]
pub struct BookingSweep {
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
    /// How long completed stays are retained before deletion
    retention: Duration,
}

impl BookingSweep {
    /// Default retention for completed stays
    ///
    /// Review eligibility reads confirmed past bookings, so completed
    /// stays are kept long enough for guests to write their review.
    pub const DEFAULT_RETENTION_DAYS: i64 = 90;

    /// Create a sweep with the default retention
    pub fn new(bookings: Arc<dyn BookingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self::with_retention(bookings, clock, Duration::days(Self::DEFAULT_RETENTION_DAYS))
    }

    /// Create a sweep with an explicit retention window
    pub fn with_retention(
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
        retention: Duration,
    ) -> Self {
        Self {
            bookings,
            clock,
            retention,
        }
    }

    /// Delete stale bookings and report what happened
    ///
    /// A booking is stale when it is cancelled, or when it is confirmed
    /// and checked out more than the retention window ago.
    pub fn run(&self) -> DomainResult<SweepReport> {
        let now = self.clock.now();
        let horizon = now - self.retention;

        let mut report = SweepReport::default();
        for booking in self.bookings.all()? {
            report.examined += 1;

            let stale = !booking.is_confirmed() || booking.stay.completed_by(horizon);
            if stale && self.bookings.delete(booking.id())? {
                report.deleted += 1;
            }
        }

        info!(
            examined = report.examined,
            deleted = report.deleted,
            "booking sweep finished"
        );
        Ok(report)
    }
}
