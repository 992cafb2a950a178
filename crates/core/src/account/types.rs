//! Account domain types.

use serde::{Deserialize, Serialize};

use meridian_shared::types::{AccountId, Amount};

/// Account type, the top-level classification of the chart of accounts.
///
/// The type fixes the account's normal-balance polarity and never changes
/// once any journal line references the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, inventory).
    Asset,
    /// Obligations owed (payables, accrued liabilities).
    Liability,
    /// Owner's residual interest (capital, retained earnings).
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns the normal-balance side for this account type.
    ///
    /// This polarity is derived, never stored: asset/expense accounts grow
    /// with debits, liability/equity/revenue accounts grow with credits.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true for revenue and expense accounts, which are zeroed into
    /// retained earnings at period close.
    #[must_use]
    pub const fn is_income_statement(self) -> bool {
        matches!(self, Self::Revenue | Self::Expense)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

/// Account subtype for more specific categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSubtype {
    /// Cash on hand.
    Cash,
    /// Bank accounts.
    Bank,
    /// Trade receivables.
    AccountsReceivable,
    /// Inventory on hand.
    Inventory,
    /// Prepaid expenses.
    Prepaid,
    /// Property and equipment.
    FixedAsset,
    /// Trade payables.
    AccountsPayable,
    /// Taxes collected, owed to the authority.
    TaxPayable,
    /// Accrued liabilities.
    AccruedLiability,
    /// Customer down payments held as a liability.
    CustomerDeposits,
    /// Owner capital contributions.
    OwnerEquity,
    /// Accumulated earnings closed from revenue/expense.
    RetainedEarnings,
    /// Core trading revenue.
    OperatingRevenue,
    /// Non-core revenue.
    OtherRevenue,
    /// Direct cost of goods sold.
    CostOfGoodsSold,
    /// Core operating expenses.
    OperatingExpense,
    /// Non-core expenses.
    OtherExpense,
}

/// Normal-balance side: whether an account's balance increases with debits
/// or with credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Balance increases with debits (asset, expense).
    Debit,
    /// Balance increases with credits (liability, equity, revenue).
    Credit,
}

impl NormalBalance {
    /// Calculates the signed balance change a (debit, credit) pair applies
    /// to an account of this polarity.
    #[must_use]
    pub fn balance_change(self, debit: Amount, credit: Amount) -> Amount {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// A chart of accounts entry.
///
/// Balances are never stored on the account; `opening_balance` is the only
/// anchor, and everything else is computed from posted journal lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Human-assigned unique code (e.g., "1-1000").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Account type; fixes the normal-balance polarity.
    pub account_type: AccountType,
    /// Optional finer categorization.
    pub account_subtype: Option<AccountSubtype>,
    /// Optional parent for display/rollup; never implies balance aggregation.
    pub parent_id: Option<AccountId>,
    /// Anchor balance at the ledger epoch, in minor units.
    pub opening_balance: Amount,
    /// Whether the account accepts new postings.
    pub is_active: bool,
    /// System accounts cannot be recoded or deleted.
    pub is_system: bool,
}

impl Account {
    /// Returns the derived normal-balance side.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccountType::Asset, NormalBalance::Debit)]
    #[case(AccountType::Expense, NormalBalance::Debit)]
    #[case(AccountType::Liability, NormalBalance::Credit)]
    #[case(AccountType::Equity, NormalBalance::Credit)]
    #[case(AccountType::Revenue, NormalBalance::Credit)]
    fn test_normal_balance_by_type(
        #[case] account_type: AccountType,
        #[case] expected: NormalBalance,
    ) {
        assert_eq!(account_type.normal_balance(), expected);
    }

    #[test]
    fn test_income_statement_types() {
        assert!(AccountType::Revenue.is_income_statement());
        assert!(AccountType::Expense.is_income_statement());
        assert!(!AccountType::Asset.is_income_statement());
        assert!(!AccountType::Liability.is_income_statement());
        assert!(!AccountType::Equity.is_income_statement());
    }

    #[test]
    fn test_debit_normal_balance_change() {
        let polarity = NormalBalance::Debit;
        assert_eq!(
            polarity.balance_change(Amount::from_minor(100), Amount::ZERO),
            Amount::from_minor(100)
        );
        assert_eq!(
            polarity.balance_change(Amount::ZERO, Amount::from_minor(50)),
            Amount::from_minor(-50)
        );
    }

    #[test]
    fn test_credit_normal_balance_change() {
        let polarity = NormalBalance::Credit;
        assert_eq!(
            polarity.balance_change(Amount::ZERO, Amount::from_minor(100)),
            Amount::from_minor(100)
        );
        assert_eq!(
            polarity.balance_change(Amount::from_minor(50), Amount::ZERO),
            Amount::from_minor(-50)
        );
    }
}
