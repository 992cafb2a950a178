//! `SeaORM` Entity for the fiscal_periods table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PeriodStatus;

/// A fiscal period row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fiscal_periods")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Period name (e.g., "January 2026").
    pub name: String,
    /// First day of the period.
    pub start_date: Date,
    /// Last day of the period (inclusive).
    pub end_date: Date,
    /// Current status.
    pub status: PeriodStatus,
    /// The closing entry, set when the period is closed.
    pub closing_entry_id: Option<Uuid>,
    /// Free-form close notes.
    pub notes: Option<String>,
    /// When the period was last closed.
    pub closed_at: Option<DateTimeWithTimeZone>,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Row update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Entries dated within this period.
    #[sea_orm(has_many = "super::journal_entries::Entity")]
    JournalEntries,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for meridian_core::fiscal::FiscalPeriod {
    fn from(model: Model) -> Self {
        Self {
            id: meridian_shared::types::FiscalPeriodId::from_uuid(model.id),
            name: model.name,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status.into(),
            closing_entry_id: model
                .closing_entry_id
                .map(meridian_shared::types::JournalEntryId::from_uuid),
            notes: model.notes,
        }
    }
}
