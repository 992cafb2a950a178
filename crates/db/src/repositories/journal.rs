//! Journal entry store.
//!
//! Drafting, posting, and reversing balanced journal entries. Every mutating
//! operation is a single database transaction; the period-open gate and the
//! balance invariant are re-validated inside that transaction, not before it.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use meridian_core::LedgerError;
use meridian_core::journal::{EntryInput, LineInput, validate_lines};
use meridian_shared::config::LedgerConfig;
use meridian_shared::types::{Amount, JournalEntryId};

use crate::entities::{
    accounts, fiscal_periods, journal_entries, journal_lines, sea_orm_active_enums,
};

/// A journal entry together with its lines.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// Owned lines, ordered by line number.
    pub lines: Vec<journal_lines::Model>,
}

impl EntryWithLines {
    /// Converts to the core domain representation.
    #[must_use]
    pub fn into_domain(
        self,
    ) -> (
        meridian_core::journal::JournalEntry,
        Vec<meridian_core::journal::JournalLine>,
    ) {
        (
            self.entry.into(),
            self.lines.into_iter().map(Into::into).collect(),
        )
    }
}

/// Filter options for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by posted state.
    pub is_posted: Option<bool>,
    /// Filter by source document kind.
    pub source_type: Option<sea_orm_active_enums::SourceKind>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl JournalRepository {
    /// Creates a new journal repository with default ledger settings.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            config: LedgerConfig::default(),
        }
    }

    /// Creates a new journal repository with explicit ledger settings.
    #[must_use]
    pub const fn with_config(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Creates a draft entry.
    ///
    /// Validates the line invariants, resolves the fiscal period from the
    /// entry date and requires it open, then persists header and lines in
    /// one transaction. Drafts carry no entry number and are invisible to
    /// balances.
    ///
    /// # Errors
    ///
    /// `UnbalancedEntry` and friends from line validation, `NoFiscalPeriod`,
    /// `PeriodClosed`/`PeriodLocked` from the date gate.
    pub async fn create_draft(&self, input: &EntryInput) -> Result<EntryWithLines, LedgerError> {
        self.try_create(input, false, true).await
    }

    /// Creates an entry, optionally posting it in the same transaction.
    ///
    /// # Errors
    ///
    /// As `create_draft`; posting additionally surfaces
    /// `ConcurrentModification` if the number-allocation retry budget is
    /// exhausted.
    pub async fn create_entry(
        &self,
        input: &EntryInput,
        auto_post: bool,
    ) -> Result<EntryWithLines, LedgerError> {
        if !auto_post {
            return self.create_draft(input).await;
        }

        let mut attempts = 0;
        loop {
            match self.try_create(input, true, true).await {
                Err(LedgerError::ConcurrentModification)
                    if attempts < self.config.post_retry_attempts =>
                {
                    attempts += 1;
                    tracing::warn!(attempts, "entry number contention on create, retrying");
                }
                other => return other,
            }
        }
    }

    /// Creates and posts an entry without the period-open gate.
    ///
    /// Only the fiscal period controller uses this, to post closing entries
    /// into periods it is itself transitioning.
    pub(crate) async fn create_posted_unchecked(
        &self,
        input: &EntryInput,
    ) -> Result<EntryWithLines, LedgerError> {
        let mut attempts = 0;
        loop {
            match self.try_create(input, true, false).await {
                Err(LedgerError::ConcurrentModification)
                    if attempts < self.config.post_retry_attempts =>
                {
                    attempts += 1;
                    tracing::warn!(attempts, "entry number contention on create, retrying");
                }
                other => return other,
            }
        }
    }

    /// Posts a draft entry.
    ///
    /// Re-validates the balance invariant and the period gate inside the
    /// transaction (both are time-sensitive), assigns the next entry number,
    /// and flips the entry to posted. Number allocation retries on unique
    /// conflict up to the configured budget.
    ///
    /// # Errors
    ///
    /// `AlreadyPosted` on a second call, `EntryNotFound`, the validation and
    /// period errors of `create_draft`, and `ConcurrentModification` once
    /// the retry budget is spent.
    pub async fn post(&self, entry_id: JournalEntryId) -> Result<journal_entries::Model, LedgerError> {
        let mut attempts = 0;
        loop {
            match self.try_post(entry_id).await {
                Err(LedgerError::ConcurrentModification)
                    if attempts < self.config.post_retry_attempts =>
                {
                    attempts += 1;
                    tracing::warn!(attempts, %entry_id, "entry number contention on post, retrying");
                }
                other => return other,
            }
        }
    }

    /// Reverses a posted entry.
    ///
    /// Creates a mirror entry (every line's debit/credit swapped), dated
    /// `date` (default today), posts it immediately, and links both entries.
    /// The original is never mutated beyond its `reversed_by` link, so the
    /// audit history stays intact.
    ///
    /// # Errors
    ///
    /// `NotPosted` if the original is a draft, `AlreadyReversed` on a second
    /// reversal, plus the posting errors of `post`.
    pub async fn reverse(
        &self,
        entry_id: JournalEntryId,
        description: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<EntryWithLines, LedgerError> {
        self.reverse_inner(entry_id, description, date, true).await
    }

    /// Reversal variant without the period-open gate, for period reopen.
    pub(crate) async fn reverse_unchecked(
        &self,
        entry_id: JournalEntryId,
        description: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<EntryWithLines, LedgerError> {
        self.reverse_inner(entry_id, description, date, false).await
    }

    async fn reverse_inner(
        &self,
        entry_id: JournalEntryId,
        description: Option<String>,
        date: Option<NaiveDate>,
        enforce_gate: bool,
    ) -> Result<EntryWithLines, LedgerError> {
        let mut attempts = 0;
        loop {
            match self
                .try_reverse(entry_id, description.as_deref(), date, enforce_gate)
                .await
            {
                Err(LedgerError::ConcurrentModification)
                    if attempts < self.config.post_retry_attempts =>
                {
                    attempts += 1;
                    tracing::warn!(attempts, %entry_id, "entry number contention on reverse, retrying");
                }
                other => return other,
            }
        }
    }

    /// Finds an entry by ID.
    pub async fn find_by_id(
        &self,
        id: JournalEntryId,
    ) -> Result<Option<journal_entries::Model>, LedgerError> {
        journal_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Finds an entry with its lines.
    pub async fn find_with_lines(
        &self,
        id: JournalEntryId,
    ) -> Result<Option<EntryWithLines>, LedgerError> {
        let Some(entry) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let lines = self.lines_of(&self.db, entry.id).await?;
        Ok(Some(EntryWithLines { entry, lines }))
    }

    /// Finds the entries linked to a source document, newest first.
    pub async fn find_by_source(
        &self,
        source_type: sea_orm_active_enums::SourceKind,
        source_id: Uuid,
    ) -> Result<Vec<journal_entries::Model>, LedgerError> {
        journal_entries::Entity::find()
            .filter(journal_entries::Column::SourceType.eq(source_type))
            .filter(journal_entries::Column::SourceId.eq(source_id))
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Lists entries with optional filters, newest first.
    pub async fn list(
        &self,
        filter: EntryFilter,
    ) -> Result<Vec<journal_entries::Model>, LedgerError> {
        let mut query = journal_entries::Entity::find();

        if let Some(is_posted) = filter.is_posted {
            query = query.filter(journal_entries::Column::IsPosted.eq(is_posted));
        }
        if let Some(source_type) = filter.source_type {
            query = query.filter(journal_entries::Column::SourceType.eq(source_type));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(date_to));
        }

        query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn try_create(
        &self,
        input: &EntryInput,
        post_now: bool,
        enforce_gate: bool,
    ) -> Result<EntryWithLines, LedgerError> {
        validate_lines(&input.lines)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let period = resolve_period_on(&txn, input.entry_date).await?;
        if enforce_gate {
            check_period_open(&period)?;
            // Controller-owned postings (closing entries) skip this too: a
            // deactivated revenue account must still be closeable.
            validate_accounts(&txn, &input.lines).await?;
        }

        let now = chrono::Utc::now();
        let entry_id = JournalEntryId::new();

        let (entry_seq, entry_number, posted_at) = if post_now {
            let seq = self.next_entry_seq(&txn).await?;
            (
                Some(seq),
                Some(self.format_entry_number(seq)),
                Some(now.into()),
            )
        } else {
            (None, None, None)
        };

        let entry = journal_entries::ActiveModel {
            id: Set(entry_id.into_inner()),
            entry_seq: Set(entry_seq),
            entry_number: Set(entry_number),
            entry_date: Set(input.entry_date),
            fiscal_period_id: Set(period.id),
            description: Set(input.description.clone()),
            reference: Set(input.reference.clone()),
            source_type: Set(input
                .source
                .map(|s| sea_orm_active_enums::SourceKind::from(s.kind))),
            source_id: Set(input.source.map(|s| s.id)),
            is_posted: Set(post_now),
            posted_at: Set(posted_at),
            reversal_of: Set(None),
            reversed_by: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let entry = entry.insert(&txn).await.map_err(map_db_err)?;

        let lines = self
            .insert_lines(&txn, entry.id, &input.lines, now.into())
            .await?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(
            entry_id = %entry.id,
            entry_number = entry.entry_number.as_deref().unwrap_or("-"),
            posted = post_now,
            "journal entry created"
        );

        Ok(EntryWithLines { entry, lines })
    }

    async fn try_post(
        &self,
        entry_id: JournalEntryId,
    ) -> Result<journal_entries::Model, LedgerError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        if entry.is_posted {
            return Err(LedgerError::AlreadyPosted(entry_id));
        }

        // Both the balance invariant and the period gate are re-checked here:
        // the draft may predate a period lock or a line-level fix.
        let lines = self.lines_of(&txn, entry.id).await?;
        validate_lines(&line_inputs_from_models(&lines))?;

        let period = resolve_period_on(&txn, entry.entry_date).await?;
        check_period_open(&period)?;

        let seq = self.next_entry_seq(&txn).await?;
        let number = self.format_entry_number(seq);
        let now = chrono::Utc::now();

        let mut active: journal_entries::ActiveModel = entry.into();
        active.entry_seq = Set(Some(seq));
        active.entry_number = Set(Some(number.clone()));
        active.fiscal_period_id = Set(period.id);
        active.is_posted = Set(true);
        active.posted_at = Set(Some(now.into()));
        let updated = active.update(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(entry_id = %entry_id, entry_number = %number, "journal entry posted");
        Ok(updated)
    }

    async fn try_reverse(
        &self,
        entry_id: JournalEntryId,
        description: Option<&str>,
        date: Option<NaiveDate>,
        enforce_gate: bool,
    ) -> Result<EntryWithLines, LedgerError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let original = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        if !original.is_posted {
            return Err(LedgerError::NotPosted(entry_id));
        }
        if original.reversed_by.is_some() {
            return Err(LedgerError::AlreadyReversed(entry_id));
        }

        let reversal_date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
        let period = resolve_period_on(&txn, reversal_date).await?;
        if enforce_gate {
            check_period_open(&period)?;
        }

        let original_lines = self.lines_of(&txn, original.id).await?;
        let mirrored: Vec<LineInput> = line_inputs_from_models(&original_lines)
            .iter()
            .map(LineInput::mirrored)
            .collect();
        validate_lines(&mirrored)?;

        let seq = self.next_entry_seq(&txn).await?;
        let number = self.format_entry_number(seq);
        let now = chrono::Utc::now();
        let reversal_id = JournalEntryId::new();

        let original_label = original
            .entry_number
            .clone()
            .unwrap_or_else(|| original.id.to_string());
        let description = description.map_or_else(
            || format!("Reversal of {original_label}"),
            ToString::to_string,
        );

        let reversal = journal_entries::ActiveModel {
            id: Set(reversal_id.into_inner()),
            entry_seq: Set(Some(seq)),
            entry_number: Set(Some(number.clone())),
            entry_date: Set(reversal_date),
            fiscal_period_id: Set(period.id),
            description: Set(description),
            reference: Set(original.reference.clone()),
            // Reversals trace their origin through reversal_of; they carry no
            // source link of their own so a document maps to at most one
            // active entry.
            source_type: Set(None),
            source_id: Set(None),
            is_posted: Set(true),
            posted_at: Set(Some(now.into())),
            reversal_of: Set(Some(original.id)),
            reversed_by: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let reversal = reversal.insert(&txn).await.map_err(map_db_err)?;

        let lines = self
            .insert_lines(&txn, reversal.id, &mirrored, now.into())
            .await?;

        let mut original_active: journal_entries::ActiveModel = original.into();
        original_active.reversed_by = Set(Some(reversal.id));
        original_active.update(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(
            original = %entry_id,
            reversal = %reversal.id,
            entry_number = %number,
            "journal entry reversed"
        );

        Ok(EntryWithLines {
            entry: reversal,
            lines,
        })
    }

    async fn insert_lines(
        &self,
        txn: &DatabaseTransaction,
        entry_id: Uuid,
        inputs: &[LineInput],
        now: sea_orm::prelude::DateTimeWithTimeZone,
    ) -> Result<Vec<journal_lines::Model>, LedgerError> {
        let mut result = Vec::with_capacity(inputs.len());

        for (index, input) in inputs.iter().enumerate() {
            let (debit, credit) = input.debit_credit();
            let line = journal_lines::ActiveModel {
                id: Set(Uuid::now_v7()),
                journal_entry_id: Set(entry_id),
                line_no: Set(i32::try_from(index + 1).map_err(LedgerError::from_db)?),
                account_id: Set(input.account_id.into_inner()),
                debit: Set(debit.minor()),
                credit: Set(credit.minor()),
                description: Set(input.description.clone()),
                created_at: Set(now),
            };
            result.push(line.insert(txn).await.map_err(map_db_err)?);
        }

        Ok(result)
    }

    async fn lines_of<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry_id: Uuid,
    ) -> Result<Vec<journal_lines::Model>, LedgerError> {
        journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalEntryId.eq(entry_id))
            .order_by_asc(journal_lines::Column::LineNo)
            .all(conn)
            .await
            .map_err(map_db_err)
    }

    /// Allocates the next entry sequence inside the caller's transaction.
    ///
    /// Max-plus-one under read-committed isolation can race; the unique
    /// index on `entry_seq` turns the race into a conflict the caller
    /// retries.
    async fn next_entry_seq(&self, txn: &DatabaseTransaction) -> Result<i64, LedgerError> {
        let latest = journal_entries::Entity::find()
            .filter(journal_entries::Column::EntrySeq.is_not_null())
            .order_by_desc(journal_entries::Column::EntrySeq)
            .limit(1)
            .one(txn)
            .await
            .map_err(map_db_err)?;

        Ok(latest.and_then(|e| e.entry_seq).unwrap_or(0) + 1)
    }

    fn format_entry_number(&self, seq: i64) -> String {
        format!("{}-{seq:06}", self.config.entry_number_prefix)
    }
}

/// Maps stored line rows back to validation inputs.
pub(crate) fn line_inputs_from_models(lines: &[journal_lines::Model]) -> Vec<LineInput> {
    lines
        .iter()
        .map(|line| {
            let input = if line.debit > 0 {
                LineInput::debit(
                    meridian_shared::types::AccountId::from_uuid(line.account_id),
                    Amount::from_minor(line.debit),
                )
            } else {
                LineInput::credit(
                    meridian_shared::types::AccountId::from_uuid(line.account_id),
                    Amount::from_minor(line.credit),
                )
            };
            match &line.description {
                Some(d) => input.with_description(d.clone()),
                None => input,
            }
        })
        .collect()
}

/// Checks that every line's account exists and is active.
async fn validate_accounts<C: ConnectionTrait>(
    conn: &C,
    lines: &[LineInput],
) -> Result<(), LedgerError> {
    let mut seen = std::collections::HashSet::new();
    for line in lines {
        if !seen.insert(line.account_id) {
            continue;
        }
        let account = accounts::Entity::find_by_id(line.account_id.into_inner())
            .one(conn)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::AccountNotFound(line.account_id))?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(line.account_id));
        }
    }
    Ok(())
}

/// Resolves the fiscal period containing a date, inside the given connection.
///
/// Called at the start of every posting transaction; never cached.
pub(crate) async fn resolve_period_on<C: ConnectionTrait>(
    conn: &C,
    date: NaiveDate,
) -> Result<fiscal_periods::Model, LedgerError> {
    fiscal_periods::Entity::find()
        .filter(fiscal_periods::Column::StartDate.lte(date))
        .filter(fiscal_periods::Column::EndDate.gte(date))
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(LedgerError::NoFiscalPeriod(date))
}

/// Applies the period-open gate to a period row.
pub(crate) fn check_period_open(period: &fiscal_periods::Model) -> Result<(), LedgerError> {
    let status: meridian_core::fiscal::PeriodStatus = period.status.clone().into();
    status.check_open()
}

/// Maps a database error to the ledger taxonomy.
///
/// Unique-constraint conflicts become `ConcurrentModification` so posting
/// wrappers can retry number allocation; everything else is opaque.
pub(crate) fn map_db_err(err: DbErr) -> LedgerError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        LedgerError::ConcurrentModification
    } else {
        LedgerError::from_db(err)
    }
}
