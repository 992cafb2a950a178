//! Postgres enum mappings.
//!
//! Database-side counterparts of the core domain enums, with lossless
//! conversions in both directions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use meridian_core::account;
use meridian_core::fiscal;
use meridian_core::journal;

/// Account type enum (`account_type`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity account.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Revenue account.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Expense account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<account::AccountType> for AccountType {
    fn from(value: account::AccountType) -> Self {
        match value {
            account::AccountType::Asset => Self::Asset,
            account::AccountType::Liability => Self::Liability,
            account::AccountType::Equity => Self::Equity,
            account::AccountType::Revenue => Self::Revenue,
            account::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for account::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

/// Account subtype enum (`account_subtype`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_subtype")]
#[serde(rename_all = "snake_case")]
pub enum AccountSubtype {
    /// Cash on hand.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank accounts.
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Trade receivables.
    #[sea_orm(string_value = "accounts_receivable")]
    AccountsReceivable,
    /// Inventory on hand.
    #[sea_orm(string_value = "inventory")]
    Inventory,
    /// Prepaid expenses.
    #[sea_orm(string_value = "prepaid")]
    Prepaid,
    /// Property and equipment.
    #[sea_orm(string_value = "fixed_asset")]
    FixedAsset,
    /// Trade payables.
    #[sea_orm(string_value = "accounts_payable")]
    AccountsPayable,
    /// Taxes collected, owed to the authority.
    #[sea_orm(string_value = "tax_payable")]
    TaxPayable,
    /// Accrued liabilities.
    #[sea_orm(string_value = "accrued_liability")]
    AccruedLiability,
    /// Customer down payments held as a liability.
    #[sea_orm(string_value = "customer_deposits")]
    CustomerDeposits,
    /// Owner capital contributions.
    #[sea_orm(string_value = "owner_equity")]
    OwnerEquity,
    /// Accumulated earnings closed from revenue/expense.
    #[sea_orm(string_value = "retained_earnings")]
    RetainedEarnings,
    /// Core trading revenue.
    #[sea_orm(string_value = "operating_revenue")]
    OperatingRevenue,
    /// Non-core revenue.
    #[sea_orm(string_value = "other_revenue")]
    OtherRevenue,
    /// Direct cost of goods sold.
    #[sea_orm(string_value = "cost_of_goods_sold")]
    CostOfGoodsSold,
    /// Core operating expenses.
    #[sea_orm(string_value = "operating_expense")]
    OperatingExpense,
    /// Non-core expenses.
    #[sea_orm(string_value = "other_expense")]
    OtherExpense,
}

impl From<account::AccountSubtype> for AccountSubtype {
    fn from(value: account::AccountSubtype) -> Self {
        use account::AccountSubtype as S;
        match value {
            S::Cash => Self::Cash,
            S::Bank => Self::Bank,
            S::AccountsReceivable => Self::AccountsReceivable,
            S::Inventory => Self::Inventory,
            S::Prepaid => Self::Prepaid,
            S::FixedAsset => Self::FixedAsset,
            S::AccountsPayable => Self::AccountsPayable,
            S::TaxPayable => Self::TaxPayable,
            S::AccruedLiability => Self::AccruedLiability,
            S::CustomerDeposits => Self::CustomerDeposits,
            S::OwnerEquity => Self::OwnerEquity,
            S::RetainedEarnings => Self::RetainedEarnings,
            S::OperatingRevenue => Self::OperatingRevenue,
            S::OtherRevenue => Self::OtherRevenue,
            S::CostOfGoodsSold => Self::CostOfGoodsSold,
            S::OperatingExpense => Self::OperatingExpense,
            S::OtherExpense => Self::OtherExpense,
        }
    }
}

impl From<AccountSubtype> for account::AccountSubtype {
    fn from(value: AccountSubtype) -> Self {
        use AccountSubtype as S;
        match value {
            S::Cash => Self::Cash,
            S::Bank => Self::Bank,
            S::AccountsReceivable => Self::AccountsReceivable,
            S::Inventory => Self::Inventory,
            S::Prepaid => Self::Prepaid,
            S::FixedAsset => Self::FixedAsset,
            S::AccountsPayable => Self::AccountsPayable,
            S::TaxPayable => Self::TaxPayable,
            S::AccruedLiability => Self::AccruedLiability,
            S::CustomerDeposits => Self::CustomerDeposits,
            S::OwnerEquity => Self::OwnerEquity,
            S::RetainedEarnings => Self::RetainedEarnings,
            S::OperatingRevenue => Self::OperatingRevenue,
            S::OtherRevenue => Self::OtherRevenue,
            S::CostOfGoodsSold => Self::CostOfGoodsSold,
            S::OperatingExpense => Self::OperatingExpense,
            S::OtherExpense => Self::OtherExpense,
        }
    }
}

/// Fiscal period status enum (`period_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_status")]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period is open for posting.
    #[sea_orm(string_value = "open")]
    Open,
    /// Period blocks new postings.
    #[sea_orm(string_value = "locked")]
    Locked,
    /// Period is closed with a closing entry.
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl From<fiscal::PeriodStatus> for PeriodStatus {
    fn from(value: fiscal::PeriodStatus) -> Self {
        match value {
            fiscal::PeriodStatus::Open => Self::Open,
            fiscal::PeriodStatus::Locked => Self::Locked,
            fiscal::PeriodStatus::Closed => Self::Closed,
        }
    }
}

impl From<PeriodStatus> for fiscal::PeriodStatus {
    fn from(value: PeriodStatus) -> Self {
        match value {
            PeriodStatus::Open => Self::Open,
            PeriodStatus::Locked => Self::Locked,
            PeriodStatus::Closed => Self::Closed,
        }
    }
}

/// Source document kind enum (`source_kind`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "source_kind")]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Sales invoice.
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Vendor bill.
    #[sea_orm(string_value = "bill")]
    Bill,
    /// Customer receipt or vendor payment.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Customer or vendor down payment.
    #[sea_orm(string_value = "down_payment")]
    DownPayment,
    /// Customer return (credit note).
    #[sea_orm(string_value = "customer_return")]
    CustomerReturn,
    /// Vendor return (debit note).
    #[sea_orm(string_value = "vendor_return")]
    VendorReturn,
    /// Inter-warehouse inventory move.
    #[sea_orm(string_value = "warehouse_transfer")]
    WarehouseTransfer,
    /// Manually keyed entry.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Opening balance migration entry.
    #[sea_orm(string_value = "opening_balance")]
    OpeningBalance,
    /// Period-close entry.
    #[sea_orm(string_value = "closing")]
    Closing,
}

impl From<journal::SourceKind> for SourceKind {
    fn from(value: journal::SourceKind) -> Self {
        use journal::SourceKind as S;
        match value {
            S::Invoice => Self::Invoice,
            S::Bill => Self::Bill,
            S::Payment => Self::Payment,
            S::DownPayment => Self::DownPayment,
            S::CustomerReturn => Self::CustomerReturn,
            S::VendorReturn => Self::VendorReturn,
            S::WarehouseTransfer => Self::WarehouseTransfer,
            S::Manual => Self::Manual,
            S::OpeningBalance => Self::OpeningBalance,
            S::Closing => Self::Closing,
        }
    }
}

impl From<SourceKind> for journal::SourceKind {
    fn from(value: SourceKind) -> Self {
        use SourceKind as S;
        match value {
            S::Invoice => Self::Invoice,
            S::Bill => Self::Bill,
            S::Payment => Self::Payment,
            S::DownPayment => Self::DownPayment,
            S::CustomerReturn => Self::CustomerReturn,
            S::VendorReturn => Self::VendorReturn,
            S::WarehouseTransfer => Self::WarehouseTransfer,
            S::Manual => Self::Manual,
            S::OpeningBalance => Self::OpeningBalance,
            S::Closing => Self::Closing,
        }
    }
}
