//! Registry rules for the chart of accounts.
//!
//! Pure validation functions; the repository supplies current state (code
//! collisions, line counts, parent chains) and persists only when these
//! rules pass.

use meridian_shared::types::AccountId;

use crate::error::LedgerError;

/// Validates that a proposed account code is unused.
///
/// # Errors
///
/// Returns `DuplicateCode` if another account already carries the code.
pub fn validate_new_code(code: &str, code_taken: bool) -> Result<(), LedgerError> {
    if code_taken {
        return Err(LedgerError::DuplicateCode(code.to_string()));
    }
    Ok(())
}

/// Validates a parent assignment against the existing hierarchy.
///
/// `parent_chain` walks parent links starting from the proposed parent; the
/// walk must terminate without revisiting `account_id`. A missing parent is
/// reported by the caller passing `parent_exists = false`.
///
/// # Errors
///
/// Returns `InvalidHierarchy` if the parent is unknown or the assignment
/// would create a cycle.
pub fn validate_parent<F>(
    account_id: AccountId,
    parent_id: AccountId,
    parent_exists: bool,
    mut parent_of: F,
) -> Result<(), LedgerError>
where
    F: FnMut(AccountId) -> Option<AccountId>,
{
    if !parent_exists {
        return Err(LedgerError::InvalidHierarchy(account_id));
    }
    if parent_id == account_id {
        return Err(LedgerError::InvalidHierarchy(account_id));
    }

    // Walk upward from the proposed parent; hitting the account itself means
    // the assignment would close a cycle. The walk is bounded by the chain
    // length, which the non-cyclic invariant keeps finite.
    let mut cursor = Some(parent_id);
    while let Some(current) = cursor {
        if current == account_id {
            return Err(LedgerError::InvalidHierarchy(account_id));
        }
        cursor = parent_of(current);
    }

    Ok(())
}

/// Validates a code change.
///
/// # Errors
///
/// Returns `SystemAccountImmutable` when attempting to recode a system
/// account, or `DuplicateCode` when the new code is taken.
pub fn validate_recode(
    account_id: AccountId,
    is_system: bool,
    new_code: &str,
    code_taken: bool,
) -> Result<(), LedgerError> {
    if is_system {
        return Err(LedgerError::SystemAccountImmutable(account_id));
    }
    validate_new_code(new_code, code_taken)
}

/// Validates an account type change.
///
/// The type fixes the normal-balance polarity of every historical line, so
/// it is frozen once any journal line references the account.
///
/// # Errors
///
/// Returns `AccountInUse` if any journal line references the account.
pub fn validate_retype(account_id: AccountId, line_count: u64) -> Result<(), LedgerError> {
    if line_count > 0 {
        return Err(LedgerError::AccountInUse {
            account: account_id,
            lines: line_count,
        });
    }
    Ok(())
}

/// Validates account deletion.
///
/// # Errors
///
/// Returns `SystemAccountImmutable` for system accounts, `AccountInUse` if
/// journal lines reference the account, or `InvalidHierarchy` if children
/// still point at it.
pub fn validate_delete(
    account_id: AccountId,
    is_system: bool,
    line_count: u64,
    child_count: u64,
) -> Result<(), LedgerError> {
    if is_system {
        return Err(LedgerError::SystemAccountImmutable(account_id));
    }
    if line_count > 0 {
        return Err(LedgerError::AccountInUse {
            account: account_id,
            lines: line_count,
        });
    }
    if child_count > 0 {
        return Err(LedgerError::InvalidHierarchy(account_id));
    }
    Ok(())
}

/// Validates deactivation.
///
/// Deactivation blocks new postings but keeps history intact, so referencing
/// lines do not prevent it; only system accounts are protected.
///
/// # Errors
///
/// Returns `SystemAccountImmutable` for system accounts.
pub fn validate_deactivate(account_id: AccountId, is_system: bool) -> Result<(), LedgerError> {
    if is_system {
        return Err(LedgerError::SystemAccountImmutable(account_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_duplicate_code_rejected() {
        assert!(matches!(
            validate_new_code("1-1000", true),
            Err(LedgerError::DuplicateCode(code)) if code == "1-1000"
        ));
        assert!(validate_new_code("1-1000", false).is_ok());
    }

    #[test]
    fn test_parent_must_exist() {
        let account = AccountId::new();
        let parent = AccountId::new();
        assert!(matches!(
            validate_parent(account, parent, false, |_| None),
            Err(LedgerError::InvalidHierarchy(_))
        ));
    }

    #[test]
    fn test_self_parent_rejected() {
        let account = AccountId::new();
        assert!(matches!(
            validate_parent(account, account, true, |_| None),
            Err(LedgerError::InvalidHierarchy(_))
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        // a -> b -> c; reparenting c under a is fine, but a under c cycles.
        let a = AccountId::new();
        let b = AccountId::new();
        let c = AccountId::new();
        let mut parents = HashMap::new();
        parents.insert(b, a);
        parents.insert(c, b);

        let lookup = |id: AccountId| parents.get(&id).copied();

        assert!(validate_parent(c, a, true, lookup).is_ok());
        assert!(matches!(
            validate_parent(a, c, true, lookup),
            Err(LedgerError::InvalidHierarchy(_))
        ));
    }

    #[test]
    fn test_system_account_recode_rejected() {
        let id = AccountId::new();
        assert!(matches!(
            validate_recode(id, true, "3-9999", false),
            Err(LedgerError::SystemAccountImmutable(_))
        ));
        assert!(validate_recode(id, false, "3-9999", false).is_ok());
    }

    #[test]
    fn test_retype_with_lines_rejected() {
        let id = AccountId::new();
        assert!(matches!(
            validate_retype(id, 3),
            Err(LedgerError::AccountInUse { lines: 3, .. })
        ));
        assert!(validate_retype(id, 0).is_ok());
    }

    #[test]
    fn test_delete_guards() {
        let id = AccountId::new();
        assert!(matches!(
            validate_delete(id, true, 0, 0),
            Err(LedgerError::SystemAccountImmutable(_))
        ));
        assert!(matches!(
            validate_delete(id, false, 1, 0),
            Err(LedgerError::AccountInUse { .. })
        ));
        assert!(matches!(
            validate_delete(id, false, 0, 2),
            Err(LedgerError::InvalidHierarchy(_))
        ));
        assert!(validate_delete(id, false, 0, 0).is_ok());
    }

    #[test]
    fn test_deactivate_system_account_rejected() {
        let id = AccountId::new();
        assert!(matches!(
            validate_deactivate(id, true),
            Err(LedgerError::SystemAccountImmutable(_))
        ));
        assert!(validate_deactivate(id, false).is_ok());
    }
}
