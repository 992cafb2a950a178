//! Ledger error taxonomy.
//!
//! Every invariant violation surfaces synchronously as a typed error. Nothing
//! is silently corrected: adjusting a ledger behind the caller's back is
//! itself a correctness bug. The only retryable kind is entry-number
//! allocation under write contention.

use chrono::NaiveDate;
use thiserror::Error;

use meridian_shared::types::{AccountId, FiscalPeriodId, JournalEntryId};

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Line & Entry Validation ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Entry debits and credits do not balance.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount in minor units.
        debit: i64,
        /// Total credit amount in minor units.
        credit: i64,
    },

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Entry has only debit lines or only credit lines.
    #[error("Journal entry must have both debit and credit lines")]
    SingleSided,

    /// Amount arithmetic overflowed the minor-unit range.
    #[error("Amount overflow while summing entry lines")]
    AmountOverflow,

    // ========== Account Registry ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Account is referenced by journal lines and cannot be retyped or removed.
    #[error("Account {account} is referenced by {lines} journal line(s)")]
    AccountInUse {
        /// The account in use.
        account: AccountId,
        /// Number of referencing journal lines.
        lines: u64,
    },

    /// System accounts cannot be recoded or deleted.
    #[error("Account {0} is a system account and cannot be modified")]
    SystemAccountImmutable(AccountId),

    /// Parent assignment is unknown or would create a cycle.
    #[error("Invalid account hierarchy for account {0}")]
    InvalidHierarchy(AccountId),

    /// A required system account (e.g., retained earnings) is not configured.
    #[error("No system account with subtype '{0}' configured")]
    MissingSystemAccount(&'static str),

    // ========== Fiscal Periods ==========
    /// No fiscal period covers the given date.
    #[error("No fiscal period found for date {0}")]
    NoFiscalPeriod(NaiveDate),

    /// Fiscal period not found.
    #[error("Fiscal period not found: {0}")]
    PeriodNotFound(FiscalPeriodId),

    /// Fiscal period is closed, no posting allowed.
    #[error("Fiscal period is closed, no posting allowed")]
    PeriodClosed,

    /// Fiscal period is locked, no posting allowed.
    #[error("Fiscal period is locked, no posting allowed")]
    PeriodLocked,

    /// Period date range intersects an existing period.
    #[error("Fiscal period overlaps with existing period '{0}'")]
    OverlappingPeriod(String),

    /// Start date must be before end date.
    #[error("Start date must be before end date")]
    InvalidDateRange,

    /// Requested period status change is not a legal transition.
    #[error("Invalid period status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: &'static str,
        /// Target status.
        to: &'static str,
    },

    /// Pre-close checklist has blocking failures.
    #[error("Fiscal period is not ready to close: {}", blocking.join("; "))]
    PeriodNotReady {
        /// Names of the blocking checklist items that failed.
        blocking: Vec<String>,
    },

    // ========== Entry Lifecycle ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Entry is already posted.
    #[error("Journal entry {0} is already posted")]
    AlreadyPosted(JournalEntryId),

    /// Entry is not posted.
    #[error("Journal entry {0} is not posted")]
    NotPosted(JournalEntryId),

    /// Entry already has a reversal.
    #[error("Journal entry {0} is already reversed")]
    AlreadyReversed(JournalEntryId),

    // ========== Integrity & Infrastructure ==========
    /// Trial balance totals diverged - a data-integrity fault, not user error.
    #[error("Trial balance mismatch: total debit {debit} != total credit {credit}")]
    TrialBalanceMismatch {
        /// Total of the debit column in minor units.
        debit: i64,
        /// Total of the credit column in minor units.
        credit: i64,
    },

    /// Concurrent modification detected (e.g., entry-number contention).
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::SingleSided => "SINGLE_SIDED",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::AccountInUse { .. } => "ACCOUNT_IN_USE",
            Self::SystemAccountImmutable(_) => "SYSTEM_ACCOUNT_IMMUTABLE",
            Self::InvalidHierarchy(_) => "INVALID_HIERARCHY",
            Self::MissingSystemAccount(_) => "MISSING_SYSTEM_ACCOUNT",
            Self::NoFiscalPeriod(_) => "NO_FISCAL_PERIOD",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::PeriodClosed => "PERIOD_CLOSED",
            Self::PeriodLocked => "PERIOD_LOCKED",
            Self::OverlappingPeriod(_) => "OVERLAPPING_PERIOD",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::PeriodNotReady { .. } => "PERIOD_NOT_READY",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::TrialBalanceMismatch { .. } => "TRIAL_BALANCE_MISMATCH",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Wraps a database-layer error.
    ///
    /// The storage crate cannot implement `From` for a foreign error type,
    /// so it funnels through this constructor instead.
    #[must_use]
    pub fn from_db(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }

    /// Returns true if this error is retryable.
    ///
    /// Only transient write contention qualifies; invariant violations never do.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::UnbalancedEntry {
                debit: 100,
                credit: 50,
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(LedgerError::PeriodClosed.error_code(), "PERIOD_CLOSED");
        assert_eq!(
            LedgerError::DuplicateCode("1-1000".into()).error_code(),
            "DUPLICATE_CODE"
        );
        assert_eq!(
            LedgerError::AlreadyPosted(JournalEntryId::new()).error_code(),
            "ALREADY_POSTED"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::ConcurrentModification.is_retryable());
        assert!(!LedgerError::InsufficientLines.is_retryable());
        assert!(!LedgerError::PeriodClosed.is_retryable());
        assert!(
            !LedgerError::TrialBalanceMismatch {
                debit: 1,
                credit: 2,
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnbalancedEntry {
            debit: 10000,
            credit: 5000,
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 10000, Credit: 5000"
        );

        let err = LedgerError::PeriodNotReady {
            blocking: vec!["unposted entries".into(), "earlier periods open".into()],
        };
        assert_eq!(
            err.to_string(),
            "Fiscal period is not ready to close: unposted entries; earlier periods open"
        );
    }
}
