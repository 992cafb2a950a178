//! Account balance calculations.
//!
//! Balances are always computed from posted lines plus the account's opening
//! balance; nothing is cached. The normal-balance polarity derived from the
//! account type drives every calculation here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use meridian_shared::types::{AccountId, Amount};

use crate::account::{AccountType, NormalBalance};

/// An account balance at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub account_id: AccountId,
    /// Total posted debits up to the as-of date.
    pub debit_total: Amount,
    /// Total posted credits up to the as-of date.
    pub credit_total: Amount,
    /// Net balance after polarity and opening balance.
    pub balance: Amount,
}

/// Computes a balance from column totals.
///
/// Debit-normal: `opening + debits - credits`.
/// Credit-normal: `opening + credits - debits`.
#[must_use]
pub fn balance_from_totals(
    polarity: NormalBalance,
    opening: Amount,
    debit_total: Amount,
    credit_total: Amount,
) -> Amount {
    opening + polarity.balance_change(debit_total, credit_total)
}

/// One row of an account ledger with its running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Entry number of the posted entry.
    pub entry_number: String,
    /// Entry description.
    pub description: String,
    /// Debit amount of this line.
    pub debit: Amount,
    /// Credit amount of this line.
    pub credit: Amount,
    /// Balance after applying this line.
    pub running_balance: Amount,
}

/// Accumulates a running balance over (debit, credit) pairs.
///
/// Seeded with the balance just before the window starts; each step applies
/// the account's polarity rule.
#[derive(Debug, Clone, Copy)]
pub struct RunningBalance {
    polarity: NormalBalance,
    current: Amount,
}

impl RunningBalance {
    /// Starts a running balance from an opening value.
    #[must_use]
    pub const fn new(polarity: NormalBalance, opening: Amount) -> Self {
        Self {
            polarity,
            current: opening,
        }
    }

    /// Applies one line and returns the balance after it.
    pub fn apply(&mut self, debit: Amount, credit: Amount) -> Amount {
        self.current = self.current + self.polarity.balance_change(debit, credit);
        self.current
    }

    /// Returns the current balance.
    #[must_use]
    pub const fn current(&self) -> Amount {
        self.current
    }
}

/// One row of a trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Amount shown in the debit column.
    pub debit_balance: Amount,
    /// Amount shown in the credit column.
    pub credit_balance: Amount,
}

/// A trial balance: every active account bucketed into debit/credit columns.
///
/// `is_balanced` is a system-wide correctness check over all posted data; a
/// mismatch indicates a bug in posting, not a user error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// As-of date.
    pub as_of: NaiveDate,
    /// Per-account rows, ordered by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of the debit column.
    pub total_debit: Amount,
    /// Sum of the credit column.
    pub total_credit: Amount,
    /// Whether total debits equal total credits.
    pub is_balanced: bool,
}

/// Buckets a polarity-signed balance into (debit column, credit column).
///
/// A positive balance lands in the account's normal column; a negative
/// balance flips to the opposite column with its sign dropped.
#[must_use]
pub fn bucket_balance(polarity: NormalBalance, balance: Amount) -> (Amount, Amount) {
    let magnitude = Amount::from_minor(balance.minor().abs());
    match (polarity, balance.is_negative()) {
        (NormalBalance::Debit, false) | (NormalBalance::Credit, true) => (magnitude, Amount::ZERO),
        (NormalBalance::Credit, false) | (NormalBalance::Debit, true) => (Amount::ZERO, magnitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_debit_normal_balance() {
        // Asset: opening 1000, Dr 500, Cr 200 -> 1300.
        let balance = balance_from_totals(
            NormalBalance::Debit,
            Amount::from_minor(1000),
            Amount::from_minor(500),
            Amount::from_minor(200),
        );
        assert_eq!(balance, Amount::from_minor(1300));
    }

    #[test]
    fn test_credit_normal_balance() {
        // Revenue: opening 0, Dr 200, Cr 1000 -> 800.
        let balance = balance_from_totals(
            NormalBalance::Credit,
            Amount::ZERO,
            Amount::from_minor(200),
            Amount::from_minor(1000),
        );
        assert_eq!(balance, Amount::from_minor(800));
    }

    #[test]
    fn test_running_balance_chain() {
        let mut rb = RunningBalance::new(NormalBalance::Debit, Amount::from_minor(100));
        assert_eq!(
            rb.apply(Amount::from_minor(50), Amount::ZERO),
            Amount::from_minor(150)
        );
        assert_eq!(
            rb.apply(Amount::ZERO, Amount::from_minor(30)),
            Amount::from_minor(120)
        );
        assert_eq!(rb.current(), Amount::from_minor(120));
    }

    #[test]
    fn test_bucket_positive_debit_normal() {
        let (d, c) = bucket_balance(NormalBalance::Debit, Amount::from_minor(500));
        assert_eq!(d, Amount::from_minor(500));
        assert_eq!(c, Amount::ZERO);
    }

    #[test]
    fn test_bucket_positive_credit_normal() {
        let (d, c) = bucket_balance(NormalBalance::Credit, Amount::from_minor(500));
        assert_eq!(d, Amount::ZERO);
        assert_eq!(c, Amount::from_minor(500));
    }

    #[test]
    fn test_bucket_negative_flips_column() {
        // An overdrawn asset shows in the credit column.
        let (d, c) = bucket_balance(NormalBalance::Debit, Amount::from_minor(-500));
        assert_eq!(d, Amount::ZERO);
        assert_eq!(c, Amount::from_minor(500));

        // A debit-standing liability shows in the debit column.
        let (d, c) = bucket_balance(NormalBalance::Credit, Amount::from_minor(-500));
        assert_eq!(d, Amount::from_minor(500));
        assert_eq!(c, Amount::ZERO);
    }

    fn amount_strategy() -> impl Strategy<Value = Amount> {
        (-10_000_000i64..10_000_000).prop_map(Amount::from_minor)
    }

    fn column_strategy() -> impl Strategy<Value = Amount> {
        (0i64..10_000_000).prop_map(Amount::from_minor)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Polarity flips sign: the same totals produce opposite balances
        /// for debit-normal and credit-normal accounts (at zero opening).
        #[test]
        fn prop_polarities_are_opposite(
            debit in column_strategy(),
            credit in column_strategy(),
        ) {
            let d = balance_from_totals(NormalBalance::Debit, Amount::ZERO, debit, credit);
            let c = balance_from_totals(NormalBalance::Credit, Amount::ZERO, debit, credit);
            prop_assert_eq!(d, -c);
        }

        /// Bucketing preserves the magnitude and uses exactly one column.
        #[test]
        fn prop_bucket_one_column(balance in amount_strategy()) {
            for polarity in [NormalBalance::Debit, NormalBalance::Credit] {
                let (d, c) = bucket_balance(polarity, balance);
                prop_assert!(d.is_zero() || c.is_zero());
                prop_assert_eq!(
                    d.minor() + c.minor(),
                    balance.minor().abs()
                );
            }
        }

        /// A running balance over N lines equals the closed-form total.
        #[test]
        fn prop_running_balance_matches_totals(
            opening in amount_strategy(),
            pairs in prop::collection::vec((column_strategy(), column_strategy()), 0..20),
        ) {
            let mut rb = RunningBalance::new(NormalBalance::Debit, opening);
            for (debit, credit) in &pairs {
                rb.apply(*debit, *credit);
            }

            let debit_total: Amount = pairs.iter().map(|(d, _)| *d).sum();
            let credit_total: Amount = pairs.iter().map(|(_, c)| *c).sum();
            let expected = balance_from_totals(
                NormalBalance::Debit,
                opening,
                debit_total,
                credit_total,
            );
            prop_assert_eq!(rb.current(), expected);
        }
    }
}
