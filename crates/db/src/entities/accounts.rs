//! `SeaORM` Entity for the accounts table (chart of accounts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AccountSubtype, AccountType};

/// A chart of accounts row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-assigned unique code (e.g., "1-1000").
    #[sea_orm(unique)]
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Account type; fixes the normal-balance polarity.
    pub account_type: AccountType,
    /// Optional finer categorization.
    pub account_subtype: Option<AccountSubtype>,
    /// Optional parent for display/rollup.
    pub parent_id: Option<Uuid>,
    /// Anchor balance at the ledger epoch, in minor units.
    pub opening_balance: i64,
    /// Whether the account accepts new postings.
    pub is_active: bool,
    /// System accounts cannot be recoded or deleted.
    pub is_system: bool,
    /// Row creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Row update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Parent account (self-reference).
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    /// Journal lines posted to this account.
    #[sea_orm(has_many = "super::journal_lines::Entity")]
    JournalLines,
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for meridian_core::account::Account {
    fn from(model: Model) -> Self {
        Self {
            id: meridian_shared::types::AccountId::from_uuid(model.id),
            code: model.code,
            name: model.name,
            description: model.description,
            account_type: model.account_type.into(),
            account_subtype: model.account_subtype.map(Into::into),
            parent_id: model
                .parent_id
                .map(meridian_shared::types::AccountId::from_uuid),
            opening_balance: meridian_shared::types::Amount::from_minor(model.opening_balance),
            is_active: model.is_active,
            is_system: model.is_system,
        }
    }
}
