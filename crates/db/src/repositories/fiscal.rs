//! Fiscal period repository and controller.
//!
//! Period CRUD with the non-overlap invariant, the open/locked/closed state
//! machine, and the close/reopen flows that generate and reverse closing
//! entries through the journal store.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use meridian_core::LedgerError;
use meridian_core::fiscal::{
    ChecklistItem, ClosingChecklist, ClosingSummary, build_closing_lines, validate_date_range,
};
use meridian_core::journal::{EntryInput, SourceDocument, SourceKind};
use meridian_shared::config::LedgerConfig;
use meridian_shared::types::{AccountId, FiscalPeriodId, JournalEntryId};

use crate::entities::{
    accounts, fiscal_periods, journal_entries,
    sea_orm_active_enums::{AccountSubtype, PeriodStatus},
};

use super::balance::BalanceRepository;
use super::journal::{JournalRepository, map_db_err};

/// Outcome of a period close.
#[derive(Debug, Clone)]
pub struct CloseOutcome {
    /// The closed period.
    pub period: fiscal_periods::Model,
    /// The closing entry, absent when the period had no net activity.
    pub closing_entry: Option<journal_entries::Model>,
    /// Revenue/expense/net-income totals of the close.
    pub summary: Option<ClosingSummary>,
}

/// Fiscal period repository.
#[derive(Debug, Clone)]
pub struct FiscalRepository {
    db: DatabaseConnection,
    journal: JournalRepository,
    balances: BalanceRepository,
}

impl FiscalRepository {
    /// Creates a new fiscal repository with default ledger settings.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let journal = JournalRepository::new(db.clone());
        let balances = BalanceRepository::new(db.clone());
        Self {
            db,
            journal,
            balances,
        }
    }

    /// Creates a new fiscal repository with explicit ledger settings.
    #[must_use]
    pub fn with_config(db: DatabaseConnection, config: LedgerConfig) -> Self {
        let journal = JournalRepository::with_config(db.clone(), config);
        let balances = BalanceRepository::new(db.clone());
        Self {
            db,
            journal,
            balances,
        }
    }

    /// Creates a fiscal period.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `start >= end` and
    /// `OverlappingPeriod` when the range intersects an existing period.
    /// Gaps between periods are allowed.
    pub async fn create_period(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<fiscal_periods::Model, LedgerError> {
        validate_date_range(start_date, end_date)?;

        let overlapping = fiscal_periods::Entity::find()
            .filter(fiscal_periods::Column::StartDate.lte(end_date))
            .filter(fiscal_periods::Column::EndDate.gte(start_date))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        if let Some(existing) = overlapping {
            return Err(LedgerError::OverlappingPeriod(existing.name));
        }

        let now = chrono::Utc::now().into();
        let period = fiscal_periods::ActiveModel {
            id: Set(FiscalPeriodId::new().into_inner()),
            name: Set(name.to_string()),
            start_date: Set(start_date),
            end_date: Set(end_date),
            status: Set(PeriodStatus::Open),
            closing_entry_id: Set(None),
            notes: Set(None),
            closed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let period = period.insert(&self.db).await.map_err(map_db_err)?;
        tracing::debug!(name = %period.name, "fiscal period created");
        Ok(period)
    }

    /// Generates monthly periods covering a calendar year.
    ///
    /// # Errors
    ///
    /// As `create_period` for each generated month.
    pub async fn create_monthly_periods(
        &self,
        year: i32,
    ) -> Result<Vec<fiscal_periods::Model>, LedgerError> {
        let mut periods = Vec::with_capacity(12);
        for month in 1..=12 {
            let start = NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or(LedgerError::InvalidDateRange)?;
            let end = last_day_of_month(year, month);
            let name = format!("{} {year}", month_name(month));
            periods.push(self.create_period(&name, start, end).await?);
        }
        Ok(periods)
    }

    /// Finds a period by ID.
    pub async fn find_by_id(
        &self,
        id: FiscalPeriodId,
    ) -> Result<Option<fiscal_periods::Model>, LedgerError> {
        fiscal_periods::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Resolves the period containing a date.
    ///
    /// Explicit and uncached: posting transactions re-resolve under their
    /// own transaction rather than trusting an earlier answer.
    pub async fn resolve_period(
        &self,
        date: NaiveDate,
    ) -> Result<Option<fiscal_periods::Model>, LedgerError> {
        fiscal_periods::Entity::find()
            .filter(fiscal_periods::Column::StartDate.lte(date))
            .filter(fiscal_periods::Column::EndDate.gte(date))
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Lists all periods ordered by start date.
    pub async fn list(&self) -> Result<Vec<fiscal_periods::Model>, LedgerError> {
        fiscal_periods::Entity::find()
            .order_by_asc(fiscal_periods::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Locks a period, blocking new postings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusTransition` if the period is already locked or
    /// closed.
    pub async fn lock(&self, id: FiscalPeriodId) -> Result<fiscal_periods::Model, LedgerError> {
        self.transition(id, PeriodStatus::Locked).await
    }

    /// Unlocks a locked period.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusTransition` if the period is open or closed.
    pub async fn unlock(&self, id: FiscalPeriodId) -> Result<fiscal_periods::Model, LedgerError> {
        self.transition(id, PeriodStatus::Open).await
    }

    /// Assembles the pre-close checklist for a period.
    ///
    /// Engine-owned items: the period is not already closed, no unposted
    /// entries are dated inside it, and every earlier period is closed.
    /// Collaborators append their own items (bank reconciliation and the
    /// like) before deciding to close.
    pub async fn closing_checklist(
        &self,
        id: FiscalPeriodId,
    ) -> Result<ClosingChecklist, LedgerError> {
        let period = self
            .find_by_id(id)
            .await?
            .ok_or(LedgerError::PeriodNotFound(id))?;

        let mut items = Vec::new();

        items.push(if period.status == PeriodStatus::Closed {
            ChecklistItem::blocked("period not already closed", "period is closed")
        } else {
            ChecklistItem::passed("period not already closed")
        });

        let draft_count = journal_entries::Entity::find()
            .filter(journal_entries::Column::IsPosted.eq(false))
            .filter(journal_entries::Column::EntryDate.gte(period.start_date))
            .filter(journal_entries::Column::EntryDate.lte(period.end_date))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        items.push(if draft_count > 0 {
            ChecklistItem::blocked(
                "no unposted entries in period",
                format!("{draft_count} draft entries"),
            )
        } else {
            ChecklistItem::passed("no unposted entries in period")
        });

        let earlier_open = fiscal_periods::Entity::find()
            .filter(fiscal_periods::Column::StartDate.lt(period.start_date))
            .filter(fiscal_periods::Column::Status.ne(PeriodStatus::Closed))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        // Advisory only: closing out of order is unusual but not invalid.
        items.push(if earlier_open > 0 {
            ChecklistItem::warning(
                "earlier periods closed",
                format!("{earlier_open} earlier periods still open"),
            )
        } else {
            ChecklistItem::passed("earlier periods closed")
        });

        Ok(ClosingChecklist::new(items))
    }

    /// Closes a period.
    ///
    /// Runs the pre-close checklist (engine items plus any collaborator
    /// items), computes net income over the period, posts a single closing
    /// entry zeroing revenue and expense into the retained-earnings system
    /// account, and flips the period to closed.
    ///
    /// # Errors
    ///
    /// `PeriodNotReady` with the blocking item names when the checklist
    /// fails, `MissingSystemAccount` when no retained-earnings account is
    /// configured, `InvalidStatusTransition` when already closed.
    pub async fn close(
        &self,
        id: FiscalPeriodId,
        notes: Option<String>,
        collaborator_items: &[ChecklistItem],
    ) -> Result<CloseOutcome, LedgerError> {
        let period = self
            .find_by_id(id)
            .await?
            .ok_or(LedgerError::PeriodNotFound(id))?;

        let status: meridian_core::fiscal::PeriodStatus = period.status.clone().into();
        status.validate_transition(meridian_core::fiscal::PeriodStatus::Closed)?;

        let mut checklist = self.closing_checklist(id).await?;
        checklist.items.extend_from_slice(collaborator_items);
        if !checklist.is_ready() {
            return Err(LedgerError::PeriodNotReady {
                blocking: checklist.blocking_failures(),
            });
        }

        let movements = self
            .balances
            .income_statement_movements(period.start_date, period.end_date)
            .await?;
        let retained_earnings = self.retained_earnings_account().await?;

        let built = build_closing_lines(&movements, retained_earnings)?;
        let (closing_entry, summary) = match built {
            Some((lines, summary)) => {
                let input = EntryInput {
                    entry_date: period.end_date,
                    description: format!("Closing entry for {}", period.name),
                    reference: None,
                    source: Some(SourceDocument::new(
                        SourceKind::Closing,
                        period.id,
                    )),
                    lines,
                };
                // The gate is skipped on purpose: the entry belongs to the
                // period being transitioned, which may already be locked.
                let created = self.journal.create_posted_unchecked(&input).await?;
                (Some(created.entry), Some(summary))
            }
            None => (None, None),
        };

        let now = chrono::Utc::now().into();
        let mut active: fiscal_periods::ActiveModel = period.into();
        active.status = Set(PeriodStatus::Closed);
        active.closing_entry_id = Set(closing_entry.as_ref().map(|e| e.id));
        active.notes = Set(notes);
        active.closed_at = Set(Some(now));
        let period = active.update(&self.db).await.map_err(map_db_err)?;

        tracing::info!(
            period = %period.name,
            closing_entry = closing_entry.as_ref().map(|e| e.id.to_string()).as_deref().unwrap_or("-"),
            "fiscal period closed"
        );

        Ok(CloseOutcome {
            period,
            closing_entry,
            summary,
        })
    }

    /// Reopens a closed period.
    ///
    /// Reverses the stored closing entry (dated at the period end, so both
    /// sides of the pair live inside the period) and flips the period back
    /// to open. Re-closing an untouched period reproduces the same closing
    /// amounts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusTransition` unless the period is closed.
    pub async fn reopen(&self, id: FiscalPeriodId) -> Result<fiscal_periods::Model, LedgerError> {
        let period = self
            .find_by_id(id)
            .await?
            .ok_or(LedgerError::PeriodNotFound(id))?;

        if period.status != PeriodStatus::Closed {
            let status: meridian_core::fiscal::PeriodStatus = period.status.clone().into();
            return Err(LedgerError::InvalidStatusTransition {
                from: status.as_str(),
                to: "open",
            });
        }

        if let Some(closing_entry_id) = period.closing_entry_id {
            // The period is still closed while this runs; the unchecked
            // variant lets the controller reverse its own closing entry.
            self.journal
                .reverse_unchecked(
                    JournalEntryId::from_uuid(closing_entry_id),
                    Some(format!("Reopen {}", period.name)),
                    Some(period.end_date),
                )
                .await?;
        }

        let name = period.name.clone();
        let mut active: fiscal_periods::ActiveModel = period.into();
        active.status = Set(PeriodStatus::Open);
        active.closing_entry_id = Set(None);
        active.closed_at = Set(None);
        let period = active.update(&self.db).await.map_err(map_db_err)?;

        tracing::info!(period = %name, "fiscal period reopened");
        Ok(period)
    }

    async fn transition(
        &self,
        id: FiscalPeriodId,
        to: PeriodStatus,
    ) -> Result<fiscal_periods::Model, LedgerError> {
        let period = self
            .find_by_id(id)
            .await?
            .ok_or(LedgerError::PeriodNotFound(id))?;

        let from: meridian_core::fiscal::PeriodStatus = period.status.clone().into();
        from.validate_transition(to.clone().into())?;

        let mut active: fiscal_periods::ActiveModel = period.into();
        active.status = Set(to);
        let updated = active.update(&self.db).await.map_err(map_db_err)?;

        tracing::debug!(period = %updated.name, status = ?updated.status, "period status changed");
        Ok(updated)
    }

    /// Finds the system retained-earnings account.
    async fn retained_earnings_account(&self) -> Result<AccountId, LedgerError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::AccountSubtype.eq(AccountSubtype::RetainedEarnings))
            .filter(accounts::Column::IsSystem.eq(true))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::MissingSystemAccount("retained_earnings"))?;

        Ok(AccountId::from_uuid(account.id))
    }
}

/// Returns the last day of a month.
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap())
}

/// Returns the English month name.
fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(2026, 1),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
        );
        assert_eq!(
            last_day_of_month(2026, 2),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert_eq!(
            last_day_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        ); // Leap year
        assert_eq!(
            last_day_of_month(2026, 12),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }
}
