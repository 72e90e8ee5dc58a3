// Copyright 2025 Cowboy AI, LLC.

//! Per-property availability ledger
//!
//! The ledger owns the set of committed stay ranges for one property and
//! answers admission queries. Entries are keyed by the booking that
//! committed them, so release works by identity rather than by interval
//! equality and cannot strand a range when dates are re-normalized.
//!
//! Invariant: committed ranges never pairwise-overlap. `commit` refuses any
//! range that would break this, and [`AvailabilityLedger::assert_no_overlaps`]
//! re-checks the whole ledger after mutation sequences in tests.

use crate::entity::BookingId;
use crate::errors::{DomainError, DomainResult};
use crate::stay::StayRange;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One committed stay on a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The booking that committed this range
    pub booking_id: BookingId,
    /// The occupied range
    pub range: StayRange,
}

/// Committed date ranges for a single property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LedgerEntry>", into = "Vec<LedgerEntry>")]
pub struct AvailabilityLedger {
    entries: IndexMap<BookingId, StayRange>,
}

impl AvailabilityLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Would the proposed range be admitted?
    ///
    /// False iff any committed range overlaps `[start, end)`.
    pub fn is_available(&self, range: &StayRange) -> bool {
        !self.entries.values().any(|committed| committed.overlaps(range))
    }

    /// Commit a range for a booking
    ///
    /// Rejects with [`DomainError::ConflictError`] when the range overlaps a
    /// committed entry or the booking already holds one. The caller is
    /// responsible for serializing commits per property; see the booking
    /// service's lock registry.
    pub fn commit(&mut self, booking_id: BookingId, range: StayRange) -> DomainResult<()> {
        if self.entries.contains_key(&booking_id) {
            return Err(DomainError::ConflictError(format!(
                "booking {booking_id} already holds a committed range"
            )));
        }
        if !self.is_available(&range) {
            return Err(DomainError::ConflictError(
                "Selected dates are not available".to_string(),
            ));
        }
        self.entries.insert(booking_id, range);
        Ok(())
    }

    /// Release the range committed by a booking
    ///
    /// Returns whether an entry was removed. Absent id is a no-op, which
    /// makes release idempotent and retryable after partial failure.
    pub fn release(&mut self, booking_id: BookingId) -> bool {
        self.entries.shift_remove(&booking_id).is_some()
    }

    /// Release the first entry exactly matching `(start, end)`
    ///
    /// Legacy matching kept for ledgers populated before entries carried a
    /// booking id. No exact match is a no-op returning false.
    pub fn release_range(&mut self, range: &StayRange) -> bool {
        let found = self
            .entries
            .iter()
            .find(|(_, committed)| *committed == range)
            .map(|(id, _)| *id);
        match found {
            Some(id) => self.entries.shift_remove(&id).is_some(),
            None => false,
        }
    }

    /// The committed range for a booking, if any
    pub fn range_for(&self, booking_id: BookingId) -> Option<&StayRange> {
        self.entries.get(&booking_id)
    }

    /// Iterate committed entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = LedgerEntry> + '_ {
        self.entries
            .iter()
            .map(|(booking_id, range)| LedgerEntry {
                booking_id: *booking_id,
                range: *range,
            })
    }

    /// Number of committed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the ledger empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verify no two committed ranges overlap
    pub fn assert_no_overlaps(&self) -> DomainResult<()> {
        let ranges: Vec<(&BookingId, &StayRange)> = self.entries.iter().collect();
        for (i, (id_a, a)) in ranges.iter().enumerate() {
            for (id_b, b) in &ranges[i + 1..] {
                if a.overlaps(b) {
                    return Err(DomainError::InvariantViolation(format!(
                        "committed ranges overlap: {a} (booking {id_a}) and {b} (booking {id_b})"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<LedgerEntry>> for AvailabilityLedger {
    fn from(entries: Vec<LedgerEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.booking_id, e.range))
                .collect(),
        }
    }
}

impl From<AvailabilityLedger> for Vec<LedgerEntry> {
    fn from(ledger: AvailabilityLedger) -> Self {
        ledger
            .entries
            .into_iter()
            .map(|(booking_id, range)| LedgerEntry { booking_id, range })
            .collect()
    }
}
