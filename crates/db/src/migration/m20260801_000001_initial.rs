//! Initial database migration.
//!
//! Creates the ledger enums, tables, constraints, and triggers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: FISCAL PERIODS
        // ============================================================
        db.execute_unprepared(FISCAL_PERIODS_SQL).await?;

        // ============================================================
        // PART 4: JOURNAL ENTRIES & LINES
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account types
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

-- Account subtypes
CREATE TYPE account_subtype AS ENUM (
    'cash',
    'bank',
    'accounts_receivable',
    'inventory',
    'prepaid',
    'fixed_asset',
    'accounts_payable',
    'tax_payable',
    'accrued_liability',
    'customer_deposits',
    'owner_equity',
    'retained_earnings',
    'operating_revenue',
    'other_revenue',
    'cost_of_goods_sold',
    'operating_expense',
    'other_expense'
);

-- Fiscal period status
CREATE TYPE period_status AS ENUM (
    'open',
    'locked',
    'closed'
);

-- Source document kinds
CREATE TYPE source_kind AS ENUM (
    'invoice',
    'bill',
    'payment',
    'down_payment',
    'customer_return',
    'vendor_return',
    'warehouse_transfer',
    'manual',
    'opening_balance',
    'closing'
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    code VARCHAR(32) NOT NULL,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    account_type account_type NOT NULL,
    account_subtype account_subtype,
    parent_id UUID REFERENCES accounts(id),
    -- Anchor balance at the ledger epoch, in minor currency units
    opening_balance BIGINT NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    is_system BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE UNIQUE INDEX idx_accounts_code ON accounts(code);
CREATE INDEX idx_accounts_parent ON accounts(parent_id);
CREATE INDEX idx_accounts_type ON accounts(account_type);
";

const FISCAL_PERIODS_SQL: &str = r"
CREATE TABLE fiscal_periods (
    id UUID PRIMARY KEY,
    name VARCHAR(64) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status period_status NOT NULL DEFAULT 'open',
    closing_entry_id UUID,
    notes TEXT,
    closed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_period_dates CHECK (start_date < end_date)
);

CREATE INDEX idx_fiscal_periods_range ON fiscal_periods(start_date, end_date);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    -- Monotonic sequence and derived number, assigned at post time.
    -- The unique indexes close the concurrent-allocation race: the losing
    -- transaction fails and retries with a fresh sequence value.
    entry_seq BIGINT,
    entry_number VARCHAR(32),
    entry_date DATE NOT NULL,
    fiscal_period_id UUID NOT NULL REFERENCES fiscal_periods(id),
    description TEXT NOT NULL,
    reference VARCHAR(255),
    source_type source_kind,
    source_id UUID,
    is_posted BOOLEAN NOT NULL DEFAULT FALSE,
    posted_at TIMESTAMPTZ,
    reversal_of UUID REFERENCES journal_entries(id),
    reversed_by UUID REFERENCES journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- source_type and source_id are set together
    CONSTRAINT chk_source_pair CHECK ((source_type IS NULL) = (source_id IS NULL)),
    -- posted entries carry a number, drafts never do
    CONSTRAINT chk_posted_number CHECK (NOT is_posted OR entry_seq IS NOT NULL)
);

-- fiscal_periods is created first, so the closing-entry FK lands here
ALTER TABLE fiscal_periods
    ADD CONSTRAINT fk_periods_closing_entry
    FOREIGN KEY (closing_entry_id) REFERENCES journal_entries(id);

CREATE UNIQUE INDEX idx_journal_entries_seq ON journal_entries(entry_seq);
CREATE UNIQUE INDEX idx_journal_entries_number ON journal_entries(entry_number);
CREATE INDEX idx_journal_entries_date ON journal_entries(entry_date);
CREATE INDEX idx_journal_entries_period ON journal_entries(fiscal_period_id);
CREATE INDEX idx_journal_entries_source ON journal_entries(source_type, source_id);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit BIGINT NOT NULL DEFAULT 0,
    credit BIGINT NOT NULL DEFAULT 0,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Exactly one side per line, both nonnegative
    CONSTRAINT chk_one_side CHECK (
        debit >= 0 AND credit >= 0 AND ((debit > 0) != (credit > 0))
    ),
    CONSTRAINT uq_entry_line_no UNIQUE (journal_entry_id, line_no)
);

CREATE INDEX idx_journal_lines_entry ON journal_lines(journal_entry_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
";

const TRIGGERS_SQL: &str = r"
-- Keep updated_at current on every row update
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_accounts_updated_at
    BEFORE UPDATE ON accounts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_fiscal_periods_updated_at
    BEFORE UPDATE ON fiscal_periods
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_journal_entries_updated_at
    BEFORE UPDATE ON journal_entries
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS fiscal_periods CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;

DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS source_kind;
DROP TYPE IF EXISTS period_status;
DROP TYPE IF EXISTS account_subtype;
DROP TYPE IF EXISTS account_type;
";
