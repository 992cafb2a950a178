//! Journal entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meridian_shared::types::{AccountId, Amount, FiscalPeriodId, JournalEntryId, JournalLineId};

/// Line side: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit line.
    Debit,
    /// Credit line.
    Credit,
}

impl EntryType {
    /// Returns the opposite side.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Kind of source document a journal entry traces back to.
///
/// A tagged enum plus an opaque id replaces the original's dynamic document
/// references while keeping every entry traceable to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Sales invoice.
    Invoice,
    /// Vendor bill.
    Bill,
    /// Customer receipt or vendor payment.
    Payment,
    /// Customer or vendor down payment.
    DownPayment,
    /// Customer return (credit note).
    CustomerReturn,
    /// Vendor return (debit note).
    VendorReturn,
    /// Inter-warehouse inventory move.
    WarehouseTransfer,
    /// Manually keyed entry.
    Manual,
    /// Opening balance migration entry.
    OpeningBalance,
    /// Period-close entry zeroing revenue/expense into equity.
    Closing,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Invoice => "invoice",
            Self::Bill => "bill",
            Self::Payment => "payment",
            Self::DownPayment => "down_payment",
            Self::CustomerReturn => "customer_return",
            Self::VendorReturn => "vendor_return",
            Self::WarehouseTransfer => "warehouse_transfer",
            Self::Manual => "manual",
            Self::OpeningBalance => "opening_balance",
            Self::Closing => "closing",
        };
        write!(f, "{s}")
    }
}

/// Polymorphic link from a journal entry back to its originating document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document kind.
    pub kind: SourceKind,
    /// Document id within the owning service.
    pub id: Uuid,
}

impl SourceDocument {
    /// Creates a source link.
    #[must_use]
    pub const fn new(kind: SourceKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

/// Input for a single journal line.
///
/// A line carries exactly one side; the positive `amount` lands in the
/// debit or credit column according to `entry_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Whether this is a debit or credit line.
    pub entry_type: EntryType,
    /// The amount in minor units (must be positive).
    pub amount: Amount,
    /// Optional line description.
    pub description: Option<String>,
}

impl LineInput {
    /// Creates a debit line.
    #[must_use]
    pub const fn debit(account_id: AccountId, amount: Amount) -> Self {
        Self {
            account_id,
            entry_type: EntryType::Debit,
            amount,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub const fn credit(account_id: AccountId, amount: Amount) -> Self {
        Self {
            account_id,
            entry_type: EntryType::Credit,
            amount,
            description: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Splits the line into (debit, credit) column amounts.
    #[must_use]
    pub fn debit_credit(&self) -> (Amount, Amount) {
        match self.entry_type {
            EntryType::Debit => (self.amount, Amount::ZERO),
            EntryType::Credit => (Amount::ZERO, self.amount),
        }
    }

    /// Returns the mirror line with the side flipped, for reversals.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            account_id: self.account_id,
            entry_type: self.entry_type.flipped(),
            amount: self.amount,
            description: self.description.clone(),
        }
    }
}

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct EntryInput {
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// A description of the entry.
    pub description: String,
    /// Optional external reference (e.g., invoice number).
    pub reference: Option<String>,
    /// Optional link to the originating document.
    pub source: Option<SourceDocument>,
    /// The lines (must have at least 2 and balance).
    pub lines: Vec<LineInput>,
}

/// Entry lifecycle status, derived from the posted/reversed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Not yet posted; invisible to balances, still mutable.
    Draft,
    /// Posted; immutable, included in balances.
    Posted,
    /// Posted and cancelled by a linked reversal entry.
    Reversed,
}

/// A journal entry header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Sequential human-readable number, assigned at post time.
    pub entry_number: Option<String>,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Owning fiscal period, resolved from the date.
    pub fiscal_period_id: FiscalPeriodId,
    /// Description.
    pub description: String,
    /// Optional external reference.
    pub reference: Option<String>,
    /// Optional source document link.
    pub source: Option<SourceDocument>,
    /// Whether the entry is posted.
    pub is_posted: bool,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// The entry this one reverses, if it is a reversal.
    pub reversal_of: Option<JournalEntryId>,
    /// The reversal entry cancelling this one, if any.
    pub reversed_by: Option<JournalEntryId>,
}

impl JournalEntry {
    /// Returns the lifecycle status derived from posted/reversed fields.
    #[must_use]
    pub const fn status(&self) -> EntryStatus {
        if !self.is_posted {
            EntryStatus::Draft
        } else if self.reversed_by.is_some() {
            EntryStatus::Reversed
        } else {
            EntryStatus::Posted
        }
    }
}

/// A persisted journal entry line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier.
    pub id: JournalLineId,
    /// Owning entry.
    pub journal_entry_id: JournalEntryId,
    /// Position within the entry, 1-based.
    pub line_no: i32,
    /// The account posted to.
    pub account_id: AccountId,
    /// Debit amount in minor units (zero if credit line).
    pub debit: Amount,
    /// Credit amount in minor units (zero if debit line).
    pub credit: Amount,
    /// Optional line description.
    pub description: Option<String>,
}

impl JournalLine {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Amount {
        self.debit - self.credit
    }
}

/// Entry totals for validation and display.
#[derive(Debug, Clone, Copy)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debit: Amount,
    /// Total credit amount.
    pub credit: Amount,
    /// Whether the entry is balanced (debits == credits).
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Amount, credit: Amount) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_flipped() {
        assert_eq!(EntryType::Debit.flipped(), EntryType::Credit);
        assert_eq!(EntryType::Credit.flipped(), EntryType::Debit);
    }

    #[test]
    fn test_line_debit_credit_split() {
        let account = AccountId::new();
        let debit = LineInput::debit(account, Amount::from_minor(100));
        assert_eq!(
            debit.debit_credit(),
            (Amount::from_minor(100), Amount::ZERO)
        );

        let credit = LineInput::credit(account, Amount::from_minor(100));
        assert_eq!(
            credit.debit_credit(),
            (Amount::ZERO, Amount::from_minor(100))
        );
    }

    #[test]
    fn test_line_mirrored_swaps_side() {
        let line = LineInput::debit(AccountId::new(), Amount::from_minor(250))
            .with_description("original");
        let mirror = line.mirrored();
        assert_eq!(mirror.entry_type, EntryType::Credit);
        assert_eq!(mirror.amount, line.amount);
        assert_eq!(mirror.account_id, line.account_id);
        assert_eq!(mirror.description.as_deref(), Some("original"));
    }

    #[test]
    fn test_entry_status_derivation() {
        let mut entry = JournalEntry {
            id: JournalEntryId::new(),
            entry_number: None,
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            fiscal_period_id: FiscalPeriodId::new(),
            description: "test".into(),
            reference: None,
            source: None,
            is_posted: false,
            posted_at: None,
            reversal_of: None,
            reversed_by: None,
        };
        assert_eq!(entry.status(), EntryStatus::Draft);

        entry.is_posted = true;
        assert_eq!(entry.status(), EntryStatus::Posted);

        entry.reversed_by = Some(JournalEntryId::new());
        assert_eq!(entry.status(), EntryStatus::Reversed);
    }

    #[test]
    fn test_signed_amount() {
        let line = JournalLine {
            id: JournalLineId::new(),
            journal_entry_id: JournalEntryId::new(),
            line_no: 1,
            account_id: AccountId::new(),
            debit: Amount::from_minor(300),
            credit: Amount::ZERO,
            description: None,
        };
        assert_eq!(line.signed_amount(), Amount::from_minor(300));
    }

    #[test]
    fn test_entry_totals_balanced() {
        let totals = EntryTotals::new(Amount::from_minor(100), Amount::from_minor(100));
        assert!(totals.is_balanced);

        let totals = EntryTotals::new(Amount::from_minor(100), Amount::from_minor(50));
        assert!(!totals.is_balanced);
    }
}
