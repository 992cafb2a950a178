//! Database seeder for Meridian development and testing.
//!
//! Seeds a standard chart of accounts (including the system accounts the
//! engine depends on) and monthly fiscal periods for the current year.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::Datelike;

use meridian_db::entities::sea_orm_active_enums::{AccountSubtype, AccountType};
use meridian_db::repositories::account::CreateAccountInput;
use meridian_db::{AccountRepository, FiscalRepository};
use meridian_shared::types::Amount;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    tracing::info!("connecting to database");
    let db = meridian_db::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let accounts = AccountRepository::new(db.clone());
    let fiscal = FiscalRepository::new(db);

    tracing::info!("seeding chart of accounts");
    seed_chart_of_accounts(&accounts).await?;

    tracing::info!("seeding fiscal periods");
    seed_fiscal_periods(&fiscal).await?;

    tracing::info!("seeding complete");
    Ok(())
}

/// A seed row: (code, name, type, subtype, is_system).
type SeedAccount = (
    &'static str,
    &'static str,
    AccountType,
    Option<AccountSubtype>,
    bool,
);

const CHART: &[SeedAccount] = &[
    // Assets
    ("1-1000", "Cash on Hand", AccountType::Asset, Some(AccountSubtype::Cash), false),
    ("1-1100", "Bank Account", AccountType::Asset, Some(AccountSubtype::Bank), false),
    ("1-1200", "Accounts Receivable", AccountType::Asset, Some(AccountSubtype::AccountsReceivable), true),
    ("1-1300", "Inventory", AccountType::Asset, Some(AccountSubtype::Inventory), false),
    ("1-1400", "Prepaid Expenses", AccountType::Asset, Some(AccountSubtype::Prepaid), false),
    ("1-1500", "Fixed Assets", AccountType::Asset, Some(AccountSubtype::FixedAsset), false),
    // Liabilities
    ("2-1000", "Accounts Payable", AccountType::Liability, Some(AccountSubtype::AccountsPayable), true),
    ("2-1100", "Tax Payable", AccountType::Liability, Some(AccountSubtype::TaxPayable), true),
    ("2-1200", "Accrued Liabilities", AccountType::Liability, Some(AccountSubtype::AccruedLiability), false),
    ("2-1300", "Customer Deposits", AccountType::Liability, Some(AccountSubtype::CustomerDeposits), true),
    // Equity
    ("3-1000", "Owner's Equity", AccountType::Equity, Some(AccountSubtype::OwnerEquity), false),
    ("3-2000", "Retained Earnings", AccountType::Equity, Some(AccountSubtype::RetainedEarnings), true),
    // Revenue
    ("4-1000", "Sales Revenue", AccountType::Revenue, Some(AccountSubtype::OperatingRevenue), false),
    ("4-2000", "Other Revenue", AccountType::Revenue, Some(AccountSubtype::OtherRevenue), false),
    // Expenses
    ("5-1000", "Cost of Goods Sold", AccountType::Expense, Some(AccountSubtype::CostOfGoodsSold), false),
    ("5-2000", "Operating Expenses", AccountType::Expense, Some(AccountSubtype::OperatingExpense), false),
    ("5-3000", "Other Expenses", AccountType::Expense, Some(AccountSubtype::OtherExpense), false),
];

async fn seed_chart_of_accounts(accounts: &AccountRepository) -> anyhow::Result<()> {
    for (code, name, account_type, account_subtype, is_system) in CHART {
        if accounts.find_by_code(code).await?.is_some() {
            tracing::debug!(code, "account already exists, skipping");
            continue;
        }

        accounts
            .create(CreateAccountInput {
                code: (*code).to_string(),
                name: (*name).to_string(),
                description: None,
                account_type: account_type.clone(),
                account_subtype: account_subtype.clone(),
                parent_id: None,
                opening_balance: Amount::ZERO,
                is_active: true,
                is_system: *is_system,
            })
            .await
            .with_context(|| format!("failed to seed account {code}"))?;
        tracing::info!(code, name, "account seeded");
    }

    Ok(())
}

async fn seed_fiscal_periods(fiscal: &FiscalRepository) -> anyhow::Result<()> {
    let year = chrono::Utc::now().date_naive().year();

    if !fiscal.list().await?.is_empty() {
        tracing::debug!("fiscal periods already exist, skipping");
        return Ok(());
    }

    fiscal
        .create_monthly_periods(year)
        .await
        .context("failed to seed fiscal periods")?;
    tracing::info!(year, "monthly fiscal periods seeded");

    Ok(())
}
