//! Account repository for chart of accounts database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use meridian_core::LedgerError;
use meridian_core::account::rules;
use meridian_shared::types::{AccountId, Amount};

use crate::entities::{
    accounts, journal_lines,
    sea_orm_active_enums::{AccountSubtype, AccountType},
};

use super::journal::map_db_err;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (must be unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account description.
    pub description: Option<String>,
    /// Account type (asset, liability, equity, revenue, expense).
    pub account_type: AccountType,
    /// Account subtype for more specific categorization.
    pub account_subtype: Option<AccountSubtype>,
    /// Parent account ID for hierarchical structure.
    pub parent_id: Option<AccountId>,
    /// Anchor balance at the ledger epoch, in minor units.
    pub opening_balance: Amount,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether this is a protected system account.
    pub is_system: bool,
}

/// Input for updating an account.
///
/// `None` leaves a field untouched; the double-`Option` fields distinguish
/// "leave as is" from "clear".
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: Option<String>,
    /// Account description.
    pub description: Option<Option<String>>,
    /// Account type (only while no journal lines reference the account).
    pub account_type: Option<AccountType>,
    /// Account subtype.
    pub account_subtype: Option<Option<AccountSubtype>>,
    /// Parent account ID.
    pub parent_id: Option<Option<AccountId>>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by parent ID (`Some(None)` = root accounts only).
    pub parent_id: Option<Option<AccountId>>,
}

/// Account repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with validation.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCode` if the code is taken and `InvalidHierarchy`
    /// if the parent is unknown.
    pub async fn create(&self, input: CreateAccountInput) -> Result<accounts::Model, LedgerError> {
        let account_id = AccountId::new();

        let code_taken = self.code_exists(&input.code, None).await?;
        rules::validate_new_code(&input.code, code_taken)?;

        if let Some(parent_id) = input.parent_id {
            let parent_exists = accounts::Entity::find_by_id(parent_id.into_inner())
                .one(&self.db)
                .await
                .map_err(map_db_err)?
                .is_some();
            // A fresh id cannot be part of a cycle; only existence matters here.
            rules::validate_parent(account_id, parent_id, parent_exists, |_| None)?;
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(account_id.into_inner()),
            code: Set(input.code),
            name: Set(input.name),
            description: Set(input.description),
            account_type: Set(input.account_type),
            account_subtype: Set(input.account_subtype),
            parent_id: Set(input.parent_id.map(AccountId::into_inner)),
            opening_balance: Set(input.opening_balance.minor()),
            is_active: Set(input.is_active),
            is_system: Set(input.is_system),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account.insert(&self.db).await.map_err(map_db_err)?;
        tracing::debug!(code = %account.code, "account created");
        Ok(account)
    }

    /// Finds an account by ID.
    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<accounts::Model>, LedgerError> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Finds an account by code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<accounts::Model>, LedgerError> {
        accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Lists accounts with optional filters, ordered by code.
    pub async fn list(&self, filter: AccountFilter) -> Result<Vec<accounts::Model>, LedgerError> {
        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Code);

        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(account_type));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }
        if let Some(parent_id) = filter.parent_id {
            query = match parent_id {
                Some(pid) => query.filter(accounts::Column::ParentId.eq(pid.into_inner())),
                None => query.filter(accounts::Column::ParentId.is_null()),
            };
        }

        query.all(&self.db).await.map_err(map_db_err)
    }

    /// Updates an account with validation.
    ///
    /// # Errors
    ///
    /// Returns `SystemAccountImmutable` when recoding a system account,
    /// `AccountInUse` when retyping an account with journal lines,
    /// `DuplicateCode` and `InvalidHierarchy` as for `create`.
    pub async fn update(
        &self,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, LedgerError> {
        let account = self
            .find_by_id(id)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))?;

        if let Some(new_code) = &input.code
            && *new_code != account.code
        {
            let code_taken = self.code_exists(new_code, Some(id)).await?;
            rules::validate_recode(id, account.is_system, new_code, code_taken)?;
        }

        if let Some(new_type) = &input.account_type
            && *new_type != account.account_type
        {
            let line_count = self.count_lines(id).await?;
            rules::validate_retype(id, line_count)?;
        }

        if let Some(Some(parent_id)) = input.parent_id {
            let parent_chain = self.load_parent_map().await?;
            let parent_exists = parent_chain.contains_key(&parent_id.into_inner())
                || accounts::Entity::find_by_id(parent_id.into_inner())
                    .one(&self.db)
                    .await
                    .map_err(map_db_err)?
                    .is_some();
            rules::validate_parent(id, parent_id, parent_exists, |child| {
                parent_chain
                    .get(&child.into_inner())
                    .and_then(|p| p.map(AccountId::from_uuid))
            })?;
        }

        let mut active: accounts::ActiveModel = account.into();
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type);
        }
        if let Some(account_subtype) = input.account_subtype {
            active.account_subtype = Set(account_subtype);
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(parent_id.map(AccountId::into_inner));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map_err(map_db_err)
    }

    /// Deactivates an account, blocking new postings but keeping history.
    ///
    /// # Errors
    ///
    /// Returns `SystemAccountImmutable` for system accounts.
    pub async fn deactivate(&self, id: AccountId) -> Result<accounts::Model, LedgerError> {
        let account = self
            .find_by_id(id)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))?;

        rules::validate_deactivate(id, account.is_system)?;

        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await.map_err(map_db_err)
    }

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountInUse` if any journal line references the account,
    /// `SystemAccountImmutable` for system accounts, and `InvalidHierarchy`
    /// if child accounts still point at it.
    pub async fn delete(&self, id: AccountId) -> Result<(), LedgerError> {
        let account = self
            .find_by_id(id)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))?;

        let line_count = self.count_lines(id).await?;
        let child_count = accounts::Entity::find()
            .filter(accounts::Column::ParentId.eq(id.into_inner()))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        rules::validate_delete(id, account.is_system, line_count, child_count)?;

        accounts::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        tracing::debug!(code = %account.code, "account deleted");
        Ok(())
    }

    /// Lists the direct children of an account, for display rollups.
    ///
    /// Balance aggregation over a subtree stays explicit: callers sum the
    /// children they fetched, the engine never does it implicitly.
    pub async fn children(&self, id: AccountId) -> Result<Vec<accounts::Model>, LedgerError> {
        accounts::Entity::find()
            .filter(accounts::Column::ParentId.eq(id.into_inner()))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn code_exists(
        &self,
        code: &str,
        exclude: Option<AccountId>,
    ) -> Result<bool, LedgerError> {
        let mut query = accounts::Entity::find().filter(accounts::Column::Code.eq(code));
        if let Some(id) = exclude {
            query = query.filter(accounts::Column::Id.ne(id.into_inner()));
        }
        let existing = query.one(&self.db).await.map_err(map_db_err)?;
        Ok(existing.is_some())
    }

    async fn count_lines(&self, id: AccountId) -> Result<u64, LedgerError> {
        journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(id.into_inner()))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Loads the id -> parent_id map used for cycle detection.
    async fn load_parent_map(
        &self,
    ) -> Result<std::collections::HashMap<Uuid, Option<Uuid>>, LedgerError> {
        let rows = accounts::Entity::find()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(|a| (a.id, a.parent_id)).collect())
    }
}
