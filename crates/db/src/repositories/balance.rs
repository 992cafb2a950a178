//! Balance and ledger query engine.
//!
//! Pure reads over posted lines: point-in-time balances, running ledgers,
//! and the trial balance. No running totals are cached anywhere; every query
//! combines the account's opening balance with a scan of posted lines, so
//! readers never block writers.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use meridian_core::LedgerError;
use meridian_core::account::AccountType;
use meridian_core::balance::{
    AccountBalance, LedgerRow, RunningBalance, TrialBalance, TrialBalanceRow, balance_from_totals,
    bucket_balance,
};
use meridian_core::fiscal::AccountMovement;
use meridian_shared::types::{AccountId, Amount};

use crate::entities::{accounts, journal_entries, journal_lines};

use super::journal::map_db_err;

/// Balance and ledger query repository.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes an account balance as of a date (default: today).
    ///
    /// Sums debits and credits across all posted lines with
    /// `entry_date <= as_of`, combines the opening balance, and applies the
    /// account's normal-balance polarity. Draft entries never contribute.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown account.
    pub async fn balance(
        &self,
        account_id: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<AccountBalance, LedgerError> {
        let account = self.fetch_account(account_id).await?;
        let as_of = as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());

        let (debit_total, credit_total) = self
            .account_totals_between(account_id, None, Some(as_of))
            .await?;

        let polarity = core_type(&account).normal_balance();
        let balance = balance_from_totals(
            polarity,
            Amount::from_minor(account.opening_balance),
            debit_total,
            credit_total,
        );

        Ok(AccountBalance {
            account_id,
            debit_total,
            credit_total,
            balance,
        })
    }

    /// Produces an account's ledger rows between two dates, inclusive.
    ///
    /// Rows are ordered by (entry date, entry number); the running balance
    /// is seeded from the balance just before `start` and accumulates with
    /// the account's polarity rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `start > end` and `AccountNotFound`
    /// for an unknown account.
    pub async fn ledger(
        &self,
        account_id: AccountId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LedgerRow>, LedgerError> {
        if start > end {
            return Err(LedgerError::InvalidDateRange);
        }
        let account = self.fetch_account(account_id).await?;
        let polarity = core_type(&account).normal_balance();

        // Balance just before the window: opening balance plus everything
        // posted strictly before `start`.
        let (before_debit, before_credit) = self
            .account_totals_between(account_id, None, start.pred_opt())
            .await?;
        let opening = balance_from_totals(
            polarity,
            Amount::from_minor(account.opening_balance),
            before_debit,
            before_credit,
        );

        // Posted entries in the window, keyed for row assembly.
        let entries: Vec<journal_entries::Model> = journal_entries::Entity::find()
            .filter(journal_entries::Column::IsPosted.eq(true))
            .filter(journal_entries::Column::EntryDate.gte(start))
            .filter(journal_entries::Column::EntryDate.lte(end))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let entry_ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
        let by_id: HashMap<Uuid, &journal_entries::Model> =
            entries.iter().map(|e| (e.id, e)).collect();

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(account_id.into_inner()))
            .filter(journal_lines::Column::JournalEntryId.is_in(entry_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        // Order by (date, entry number, line number) before accumulating.
        let mut keyed: Vec<(NaiveDate, i64, i32, journal_lines::Model)> = lines
            .into_iter()
            .filter_map(|line| {
                by_id.get(&line.journal_entry_id).map(|entry| {
                    (
                        entry.entry_date,
                        entry.entry_seq.unwrap_or(i64::MAX),
                        line.line_no,
                        line,
                    )
                })
            })
            .collect();
        keyed.sort_by_key(|(date, seq, line_no, _)| (*date, *seq, *line_no));

        let mut running = RunningBalance::new(polarity, opening);
        let rows = keyed
            .into_iter()
            .map(|(date, _, _, line)| {
                let entry = by_id[&line.journal_entry_id];
                let debit = Amount::from_minor(line.debit);
                let credit = Amount::from_minor(line.credit);
                LedgerRow {
                    entry_date: date,
                    entry_number: entry.entry_number.clone().unwrap_or_default(),
                    description: line
                        .description
                        .clone()
                        .unwrap_or_else(|| entry.description.clone()),
                    debit,
                    credit,
                    running_balance: running.apply(debit, credit),
                }
            })
            .collect();

        Ok(rows)
    }

    /// Computes the trial balance as of a date.
    ///
    /// Every active account's balance is bucketed into a debit or credit
    /// column; the totals must agree. A mismatch is a data-integrity fault
    /// in the posting pipeline and is logged as such, never a user error.
    pub async fn trial_balance(&self, as_of: NaiveDate) -> Result<TrialBalance, LedgerError> {
        let account_rows = accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut rows = Vec::with_capacity(account_rows.len());
        let mut total_debit = Amount::ZERO;
        let mut total_credit = Amount::ZERO;

        for account in account_rows {
            let account_id = AccountId::from_uuid(account.id);
            let (debit_total, credit_total) = self
                .account_totals_between(account_id, None, Some(as_of))
                .await?;

            let account_type = core_type(&account);
            let polarity = account_type.normal_balance();
            let balance = balance_from_totals(
                polarity,
                Amount::from_minor(account.opening_balance),
                debit_total,
                credit_total,
            );
            let (debit_balance, credit_balance) = bucket_balance(polarity, balance);

            total_debit = total_debit
                .checked_add(debit_balance)
                .ok_or(LedgerError::AmountOverflow)?;
            total_credit = total_credit
                .checked_add(credit_balance)
                .ok_or(LedgerError::AmountOverflow)?;

            rows.push(TrialBalanceRow {
                account_id,
                code: account.code,
                name: account.name,
                account_type,
                debit_balance,
                credit_balance,
            });
        }

        let is_balanced = total_debit == total_credit;
        if !is_balanced {
            tracing::error!(
                total_debit = total_debit.minor(),
                total_credit = total_credit.minor(),
                %as_of,
                "trial balance mismatch - ledger integrity fault"
            );
        }

        Ok(TrialBalance {
            as_of,
            rows,
            total_debit,
            total_credit,
            is_balanced,
        })
    }

    /// Asserts the trial balance invariant, surfacing a mismatch as an error.
    pub async fn verify_trial_balance(&self, as_of: NaiveDate) -> Result<(), LedgerError> {
        let tb = self.trial_balance(as_of).await?;
        if tb.is_balanced {
            Ok(())
        } else {
            Err(LedgerError::TrialBalanceMismatch {
                debit: tb.total_debit.minor(),
                credit: tb.total_credit.minor(),
            })
        }
    }

    /// Net movements of revenue and expense accounts over a date range.
    ///
    /// Used by the fiscal period controller to build the closing entry.
    pub async fn income_statement_movements(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AccountMovement>, LedgerError> {
        use crate::entities::sea_orm_active_enums::AccountType as DbAccountType;

        let account_rows = accounts::Entity::find()
            .filter(
                accounts::Column::AccountType
                    .is_in([DbAccountType::Revenue, DbAccountType::Expense]),
            )
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut movements = Vec::with_capacity(account_rows.len());
        for account in account_rows {
            let account_id = AccountId::from_uuid(account.id);
            let (debit_total, credit_total) = self
                .account_totals_between(account_id, Some(start), Some(end))
                .await?;

            movements.push(AccountMovement {
                account_id,
                account_type: core_type(&account),
                debit_total,
                credit_total,
            });
        }

        Ok(movements)
    }

    /// Sums posted debits and credits for an account over a date range.
    ///
    /// `None` bounds are unbounded on that side.
    async fn account_totals_between(
        &self,
        account_id: AccountId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(Amount, Amount), LedgerError> {
        let mut entry_query = journal_entries::Entity::find()
            .select_only()
            .column(journal_entries::Column::Id)
            .filter(journal_entries::Column::IsPosted.eq(true));

        if let Some(start) = start {
            entry_query = entry_query.filter(journal_entries::Column::EntryDate.gte(start));
        }
        if let Some(end) = end {
            entry_query = entry_query.filter(journal_entries::Column::EntryDate.lte(end));
        }

        let entry_ids: Vec<Uuid> = entry_query
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        if entry_ids.is_empty() {
            return Ok((Amount::ZERO, Amount::ZERO));
        }

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(account_id.into_inner()))
            .filter(journal_lines::Column::JournalEntryId.is_in(entry_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut debit_total = Amount::ZERO;
        let mut credit_total = Amount::ZERO;
        for line in lines {
            debit_total = debit_total
                .checked_add(Amount::from_minor(line.debit))
                .ok_or(LedgerError::AmountOverflow)?;
            credit_total = credit_total
                .checked_add(Amount::from_minor(line.credit))
                .ok_or(LedgerError::AmountOverflow)?;
        }

        Ok((debit_total, credit_total))
    }

    async fn fetch_account(&self, account_id: AccountId) -> Result<accounts::Model, LedgerError> {
        accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }
}

/// Converts the stored account type to the domain enum.
fn core_type(account: &accounts::Model) -> AccountType {
    account.account_type.clone().into()
}
