//! `SeaORM` Entity for the journal_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::SourceKind;

/// A journal entry header.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Monotonic sequence, assigned at post time.
    #[sea_orm(unique)]
    pub entry_seq: Option<i64>,
    /// Human-readable number derived from the sequence (e.g., "JE-000042").
    #[sea_orm(unique)]
    pub entry_number: Option<String>,
    /// Accounting date.
    pub entry_date: Date,
    /// Owning fiscal period, resolved from the date.
    pub fiscal_period_id: Uuid,
    /// Description.
    pub description: String,
    /// Optional external reference (e.g., invoice number).
    pub reference: Option<String>,
    /// Source document kind, set together with `source_id`.
    pub source_type: Option<SourceKind>,
    /// Source document id, set together with `source_type`.
    pub source_id: Option<Uuid>,
    /// Whether the entry is posted.
    pub is_posted: bool,
    /// When the entry was posted.
    pub posted_at: Option<DateTimeWithTimeZone>,
    /// The entry this one reverses, if it is a reversal.
    pub reversal_of: Option<Uuid>,
    /// The reversal entry cancelling this one, if any.
    pub reversed_by: Option<Uuid>,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Row update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning fiscal period.
    #[sea_orm(
        belongs_to = "super::fiscal_periods::Entity",
        from = "Column::FiscalPeriodId",
        to = "super::fiscal_periods::Column::Id"
    )]
    FiscalPeriod,
    /// Lines owned by this entry.
    #[sea_orm(has_many = "super::journal_lines::Entity")]
    JournalLines,
}

impl Related<super::fiscal_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FiscalPeriod.def()
    }
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for meridian_core::journal::JournalEntry {
    fn from(model: Model) -> Self {
        use meridian_shared::types::{FiscalPeriodId, JournalEntryId};

        let source = match (model.source_type, model.source_id) {
            (Some(kind), Some(id)) => Some(meridian_core::journal::SourceDocument::new(
                kind.into(),
                id,
            )),
            _ => None,
        };

        Self {
            id: JournalEntryId::from_uuid(model.id),
            entry_number: model.entry_number,
            entry_date: model.entry_date,
            fiscal_period_id: FiscalPeriodId::from_uuid(model.fiscal_period_id),
            description: model.description,
            reference: model.reference,
            source,
            is_posted: model.is_posted,
            posted_at: model.posted_at.map(|t| t.with_timezone(&chrono::Utc)),
            reversal_of: model.reversal_of.map(JournalEntryId::from_uuid),
            reversed_by: model.reversed_by.map(JournalEntryId::from_uuid),
        }
    }
}
