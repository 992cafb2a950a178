//! Balanced-line validation for journal entries.
//!
//! Checked before a draft is created and re-checked at post time, since the
//! entry may have been created long before it is posted.

use meridian_shared::types::Amount;

use super::types::{EntryTotals, EntryType, LineInput};
use crate::error::LedgerError;

/// Validates a set of journal lines and returns their totals.
///
/// Rules:
/// 1. At least 2 lines.
/// 2. Every amount strictly positive (the side is carried by `entry_type`,
///    so a line never holds both a debit and a credit).
/// 3. At least one debit and one credit line.
/// 4. Total debits equal total credits.
///
/// # Errors
///
/// Returns the first violated rule as a `LedgerError`.
pub fn validate_lines(lines: &[LineInput]) -> Result<EntryTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    let mut total_debit = Amount::ZERO;
    let mut total_credit = Amount::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if line.amount.is_negative() {
            return Err(LedgerError::NegativeAmount);
        }

        match line.entry_type {
            EntryType::Debit => {
                total_debit = total_debit
                    .checked_add(line.amount)
                    .ok_or(LedgerError::AmountOverflow)?;
                has_debit = true;
            }
            EntryType::Credit => {
                total_credit = total_credit
                    .checked_add(line.amount)
                    .ok_or(LedgerError::AmountOverflow)?;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    if total_debit != total_credit {
        return Err(LedgerError::UnbalancedEntry {
            debit: total_debit.minor(),
            credit: total_credit.minor(),
        });
    }

    Ok(EntryTotals::new(total_debit, total_credit))
}
