//! `SeaORM` Entity for the journal_lines table.
//!
//! A line carries exactly one side: the table CHECK constraint enforces
//! `debit >= 0 AND credit >= 0 AND (debit > 0) != (credit > 0)`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A journal entry line.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_lines")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning journal entry.
    pub journal_entry_id: Uuid,
    /// Position within the entry, 1-based.
    pub line_no: i32,
    /// The account posted to.
    pub account_id: Uuid,
    /// Debit amount in minor units (zero if credit line).
    pub debit: i64,
    /// Credit amount in minor units (zero if debit line).
    pub credit: i64,
    /// Optional line description.
    pub description: Option<String>,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning journal entry.
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntry,
    /// Account posted to.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Account,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntry.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for meridian_core::journal::JournalLine {
    fn from(model: Model) -> Self {
        use meridian_shared::types::{AccountId, Amount, JournalEntryId, JournalLineId};

        Self {
            id: JournalLineId::from_uuid(model.id),
            journal_entry_id: JournalEntryId::from_uuid(model.journal_entry_id),
            line_no: model.line_no,
            account_id: AccountId::from_uuid(model.account_id),
            debit: Amount::from_minor(model.debit),
            credit: Amount::from_minor(model.credit),
            description: model.description,
        }
    }
}
