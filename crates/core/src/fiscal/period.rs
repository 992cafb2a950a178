//! Fiscal period types and the status state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use meridian_shared::types::{FiscalPeriodId, JournalEntryId};

use crate::error::LedgerError;

/// Status of a fiscal period, gating all postings by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period is open for posting.
    Open,
    /// Period blocks new postings; reversible via unlock.
    Locked,
    /// Period is closed with a closing entry; reversible only via reopen.
    Closed,
}

impl PeriodStatus {
    /// Returns true if the period accepts new postings.
    #[must_use]
    pub const fn allows_posting(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns the status name for error reporting.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Locked => "locked",
            Self::Closed => "closed",
        }
    }

    /// Validates a status transition.
    ///
    /// Legal edges: open -> locked (lock), locked -> open (unlock),
    /// open/locked -> closed (close), closed -> open (reopen). Everything
    /// else, including same-status no-ops, is rejected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusTransition` for any other edge.
    pub fn validate_transition(self, to: Self) -> Result<(), LedgerError> {
        let valid = matches!(
            (self, to),
            (Self::Open, Self::Locked | Self::Closed)
                | (Self::Locked, Self::Open | Self::Closed)
                | (Self::Closed, Self::Open)
        );

        if valid {
            Ok(())
        } else {
            Err(LedgerError::InvalidStatusTransition {
                from: self.as_str(),
                to: to.as_str(),
            })
        }
    }

    /// Maps the status to the posting-gate error, if any.
    ///
    /// # Errors
    ///
    /// Returns `PeriodClosed` or `PeriodLocked` when posting is not allowed.
    pub const fn check_open(self) -> Result<(), LedgerError> {
        match self {
            Self::Open => Ok(()),
            Self::Locked => Err(LedgerError::PeriodLocked),
            Self::Closed => Err(LedgerError::PeriodClosed),
        }
    }
}

/// A fiscal period: a bounded date range postings are tracked within.
///
/// Periods never overlap; gaps between periods are allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Unique identifier.
    pub id: FiscalPeriodId,
    /// Period name (e.g., "January 2026").
    pub name: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Current status.
    pub status: PeriodStatus,
    /// The closing entry, set when the period is closed.
    pub closing_entry_id: Option<JournalEntryId>,
    /// Free-form close notes.
    pub notes: Option<String>,
}

impl FiscalPeriod {
    /// Returns true if postings are accepted.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status.allows_posting()
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Validates that `start_date` is strictly before `end_date`.
///
/// # Errors
///
/// Returns `InvalidDateRange` otherwise.
pub fn validate_date_range(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), LedgerError> {
    if start_date >= end_date {
        return Err(LedgerError::InvalidDateRange);
    }
    Ok(())
}

/// Checks if two inclusive date ranges overlap.
///
/// Two ranges [a_start, a_end] and [b_start, b_end] overlap if:
/// `a_start <= b_end AND a_end >= b_start`.
#[must_use]
pub fn date_ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_allows_posting() {
        assert!(PeriodStatus::Open.allows_posting());
        assert!(!PeriodStatus::Locked.allows_posting());
        assert!(!PeriodStatus::Closed.allows_posting());
    }

    #[test]
    fn test_check_open_errors() {
        assert!(PeriodStatus::Open.check_open().is_ok());
        assert!(matches!(
            PeriodStatus::Locked.check_open(),
            Err(LedgerError::PeriodLocked)
        ));
        assert!(matches!(
            PeriodStatus::Closed.check_open(),
            Err(LedgerError::PeriodClosed)
        ));
    }

    #[test]
    fn test_valid_transitions() {
        assert!(
            PeriodStatus::Open
                .validate_transition(PeriodStatus::Locked)
                .is_ok()
        );
        assert!(
            PeriodStatus::Locked
                .validate_transition(PeriodStatus::Open)
                .is_ok()
        );
        assert!(
            PeriodStatus::Open
                .validate_transition(PeriodStatus::Closed)
                .is_ok()
        );
        assert!(
            PeriodStatus::Locked
                .validate_transition(PeriodStatus::Closed)
                .is_ok()
        );
        assert!(
            PeriodStatus::Closed
                .validate_transition(PeriodStatus::Open)
                .is_ok()
        );
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(matches!(
            PeriodStatus::Closed.validate_transition(PeriodStatus::Locked),
            Err(LedgerError::InvalidStatusTransition {
                from: "closed",
                to: "locked",
            })
        ));
        // Same-status is not a legal edge: lock on a locked period is an error.
        for status in [PeriodStatus::Open, PeriodStatus::Locked, PeriodStatus::Closed] {
            assert!(status.validate_transition(status).is_err());
        }
    }

    #[test]
    fn test_contains_date() {
        let period = FiscalPeriod {
            id: FiscalPeriodId::new(),
            name: "January 2026".into(),
            start_date: day(2026, 1, 1),
            end_date: day(2026, 1, 31),
            status: PeriodStatus::Open,
            closing_entry_id: None,
            notes: None,
        };

        assert!(period.contains_date(day(2026, 1, 1)));
        assert!(period.contains_date(day(2026, 1, 31)));
        assert!(!period.contains_date(day(2025, 12, 31)));
        assert!(!period.contains_date(day(2026, 2, 1)));
    }

    #[test]
    fn test_date_range_validation() {
        assert!(validate_date_range(day(2026, 1, 1), day(2026, 1, 31)).is_ok());
        assert!(matches!(
            validate_date_range(day(2026, 1, 31), day(2026, 1, 1)),
            Err(LedgerError::InvalidDateRange)
        ));
        assert!(validate_date_range(day(2026, 1, 1), day(2026, 1, 1)).is_err());
    }

    #[test]
    fn test_overlapping_ranges() {
        assert!(date_ranges_overlap(
            day(2026, 1, 1),
            day(2026, 1, 31),
            day(2026, 1, 15),
            day(2026, 2, 15),
        ));
        // Adjacent months do not overlap.
        assert!(!date_ranges_overlap(
            day(2026, 1, 1),
            day(2026, 1, 31),
            day(2026, 2, 1),
            day(2026, 2, 28),
        ));
    }

    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (2020i32..=2030, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn range_strategy() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
        date_strategy().prop_flat_map(|start| {
            (Just(start), 1i64..=365)
                .prop_map(move |(s, days)| (s, s + chrono::Duration::days(days)))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Overlap detection is symmetric.
        #[test]
        fn prop_overlap_is_symmetric(
            (a_start, a_end) in range_strategy(),
            (b_start, b_end) in range_strategy(),
        ) {
            let ab = date_ranges_overlap(a_start, a_end, b_start, b_end);
            let ba = date_ranges_overlap(b_start, b_end, a_start, a_end);
            prop_assert_eq!(ab, ba);
        }

        /// A range starting the day after another ends never overlaps it.
        #[test]
        fn prop_adjacent_ranges_do_not_overlap((a_start, a_end) in range_strategy()) {
            let b_start = a_end + chrono::Duration::days(1);
            let b_end = b_start + chrono::Duration::days(30);
            prop_assert!(!date_ranges_overlap(a_start, a_end, b_start, b_end));
        }

        /// A range starting inside another always overlaps it.
        #[test]
        fn prop_contained_start_overlaps(
            (a_start, a_end) in range_strategy(),
            offset in 0i64..=180,
        ) {
            let b_start = a_start + chrono::Duration::days(offset);
            if b_start <= a_end {
                let b_end = b_start + chrono::Duration::days(30);
                prop_assert!(date_ranges_overlap(a_start, a_end, b_start, b_end));
            }
        }

        /// From any status, the machine accepts exactly the documented edges.
        #[test]
        fn prop_transition_edges(
            from in prop_oneof![
                Just(PeriodStatus::Open),
                Just(PeriodStatus::Locked),
                Just(PeriodStatus::Closed),
            ],
            to in prop_oneof![
                Just(PeriodStatus::Open),
                Just(PeriodStatus::Locked),
                Just(PeriodStatus::Closed),
            ],
        ) {
            let allowed = matches!(
                (from, to),
                (PeriodStatus::Open, PeriodStatus::Locked | PeriodStatus::Closed)
                    | (PeriodStatus::Locked, PeriodStatus::Open | PeriodStatus::Closed)
                    | (PeriodStatus::Closed, PeriodStatus::Open)
            );
            prop_assert_eq!(from.validate_transition(to).is_ok(), allowed);
        }
    }
}
