//! Closing-entry computation.
//!
//! At period close every revenue and expense account is zeroed into the
//! retained-earnings equity account by a single balanced entry. The
//! computation is pure: the controller supplies per-account movements over
//! the period and posts the resulting lines through the journal store.

use serde::{Deserialize, Serialize};

use meridian_shared::types::{AccountId, Amount};

use crate::account::AccountType;
use crate::error::LedgerError;
use crate::journal::types::LineInput;

/// Net movement of one account over a period.
#[derive(Debug, Clone)]
pub struct AccountMovement {
    /// The account.
    pub account_id: AccountId,
    /// Account type; only revenue and expense participate in the close.
    pub account_type: AccountType,
    /// Posted debits within the period.
    pub debit_total: Amount,
    /// Posted credits within the period.
    pub credit_total: Amount,
}

impl AccountMovement {
    /// Net movement on the account's normal side.
    ///
    /// Revenue: credits minus debits. Expense: debits minus credits.
    /// Negative nets (contra movement) are legal and handled by flipping
    /// the closing line's side.
    #[must_use]
    pub fn normal_net(&self) -> Amount {
        self.account_type
            .normal_balance()
            .balance_change(self.debit_total, self.credit_total)
    }
}

/// Totals produced by a period close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingSummary {
    /// Net revenue over the period.
    pub revenue_total: Amount,
    /// Net expense over the period.
    pub expense_total: Amount,
    /// Net income: revenue minus expense; negative means a loss.
    pub net_income: Amount,
}

/// Builds the closing lines zeroing revenue/expense into retained earnings.
///
/// Each revenue account is debited by its net credit movement, each expense
/// account credited by its net debit movement, and retained earnings takes
/// the balancing net income (credit for profit, debit for loss). Accounts
/// with zero net movement produce no line. Returns `None` when there is
/// nothing to close.
///
/// # Errors
///
/// Returns `AmountOverflow` if the period totals exceed the minor-unit range.
pub fn build_closing_lines(
    movements: &[AccountMovement],
    retained_earnings: AccountId,
) -> Result<Option<(Vec<LineInput>, ClosingSummary)>, LedgerError> {
    let mut lines = Vec::new();
    let mut revenue_total = Amount::ZERO;
    let mut expense_total = Amount::ZERO;

    for movement in movements {
        if !movement.account_type.is_income_statement() {
            continue;
        }

        let net = movement.normal_net();
        if net.is_zero() {
            continue;
        }

        let magnitude = Amount::from_minor(net.minor().abs());
        match movement.account_type {
            AccountType::Revenue => {
                revenue_total = revenue_total
                    .checked_add(net)
                    .ok_or(LedgerError::AmountOverflow)?;
                // Zero a credit-standing revenue account with a debit; a
                // contra (debit-standing) one with a credit.
                if net.is_positive() {
                    lines.push(LineInput::debit(movement.account_id, magnitude));
                } else {
                    lines.push(LineInput::credit(movement.account_id, magnitude));
                }
            }
            AccountType::Expense => {
                expense_total = expense_total
                    .checked_add(net)
                    .ok_or(LedgerError::AmountOverflow)?;
                if net.is_positive() {
                    lines.push(LineInput::credit(movement.account_id, magnitude));
                } else {
                    lines.push(LineInput::debit(movement.account_id, magnitude));
                }
            }
            _ => unreachable!("filtered to income-statement accounts above"),
        }
    }

    let net_income = revenue_total
        .checked_sub(expense_total)
        .ok_or(LedgerError::AmountOverflow)?;

    if lines.is_empty() {
        return Ok(None);
    }

    if !net_income.is_zero() {
        let magnitude = Amount::from_minor(net_income.minor().abs());
        let line = if net_income.is_positive() {
            LineInput::credit(retained_earnings, magnitude)
        } else {
            LineInput::debit(retained_earnings, magnitude)
        };
        lines.push(line.with_description("Net income to retained earnings"));
    }

    let summary = ClosingSummary {
        revenue_total,
        expense_total,
        net_income,
    };

    Ok(Some((lines, summary)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::types::EntryType;
    use crate::journal::validation::validate_lines;
    use proptest::prelude::*;

    fn revenue(credit: i64, debit: i64) -> AccountMovement {
        AccountMovement {
            account_id: AccountId::new(),
            account_type: AccountType::Revenue,
            debit_total: Amount::from_minor(debit),
            credit_total: Amount::from_minor(credit),
        }
    }

    fn expense(debit: i64, credit: i64) -> AccountMovement {
        AccountMovement {
            account_id: AccountId::new(),
            account_type: AccountType::Expense,
            debit_total: Amount::from_minor(debit),
            credit_total: Amount::from_minor(credit),
        }
    }

    #[test]
    fn test_profit_close() {
        // Revenue Cr 1,000,000 and expense Dr 400,000 over the period.
        let movements = [revenue(1_000_000, 0), expense(400_000, 0)];
        let retained = AccountId::new();

        let (lines, summary) = build_closing_lines(&movements, retained).unwrap().unwrap();

        assert_eq!(summary.revenue_total, Amount::from_minor(1_000_000));
        assert_eq!(summary.expense_total, Amount::from_minor(400_000));
        assert_eq!(summary.net_income, Amount::from_minor(600_000));

        // Dr Revenue 1,000,000; Cr Expense 400,000; Cr Retained Earnings 600,000.
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].entry_type, EntryType::Debit);
        assert_eq!(lines[0].amount, Amount::from_minor(1_000_000));
        assert_eq!(lines[1].entry_type, EntryType::Credit);
        assert_eq!(lines[1].amount, Amount::from_minor(400_000));
        assert_eq!(lines[2].account_id, retained);
        assert_eq!(lines[2].entry_type, EntryType::Credit);
        assert_eq!(lines[2].amount, Amount::from_minor(600_000));

        assert!(validate_lines(&lines).unwrap().is_balanced);
    }

    #[test]
    fn test_loss_close_debits_retained_earnings() {
        let movements = [revenue(100_000, 0), expense(250_000, 0)];
        let retained = AccountId::new();

        let (lines, summary) = build_closing_lines(&movements, retained).unwrap().unwrap();

        assert_eq!(summary.net_income, Amount::from_minor(-150_000));
        let re_line = lines.last().unwrap();
        assert_eq!(re_line.account_id, retained);
        assert_eq!(re_line.entry_type, EntryType::Debit);
        assert_eq!(re_line.amount, Amount::from_minor(150_000));
        assert!(validate_lines(&lines).unwrap().is_balanced);
    }

    #[test]
    fn test_nothing_to_close() {
        assert!(
            build_closing_lines(&[], AccountId::new())
                .unwrap()
                .is_none()
        );

        // Zero-net movements close to nothing.
        let movements = [revenue(500, 500), expense(300, 300)];
        assert!(
            build_closing_lines(&movements, AccountId::new())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_contra_revenue_closed_with_credit() {
        // A debit-standing revenue account (refund-heavy month).
        let movements = [revenue(100, 400), expense(0, 0)];
        let retained = AccountId::new();

        let (lines, summary) = build_closing_lines(&movements, retained).unwrap().unwrap();
        assert_eq!(summary.revenue_total, Amount::from_minor(-300));
        assert_eq!(lines[0].entry_type, EntryType::Credit);
        assert_eq!(lines[0].amount, Amount::from_minor(300));
        // Loss of 300 lands as a debit to retained earnings.
        assert_eq!(lines[1].entry_type, EntryType::Debit);
        assert!(validate_lines(&lines).unwrap().is_balanced);
    }

    #[test]
    fn test_balance_sheet_movements_ignored() {
        let movements = [
            AccountMovement {
                account_id: AccountId::new(),
                account_type: AccountType::Asset,
                debit_total: Amount::from_minor(9999),
                credit_total: Amount::ZERO,
            },
            revenue(1000, 0),
        ];
        let (lines, summary) = build_closing_lines(&movements, AccountId::new())
            .unwrap()
            .unwrap();
        assert_eq!(summary.revenue_total, Amount::from_minor(1000));
        // Only the revenue line and the retained-earnings line.
        assert_eq!(lines.len(), 2);
    }

    fn movement_strategy() -> impl Strategy<Value = AccountMovement> {
        (
            prop_oneof![Just(AccountType::Revenue), Just(AccountType::Expense)],
            0i64..10_000_000,
            0i64..10_000_000,
        )
            .prop_map(|(account_type, debit, credit)| AccountMovement {
                account_id: AccountId::new(),
                account_type,
                debit_total: Amount::from_minor(debit),
                credit_total: Amount::from_minor(credit),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any closing entry balances, and its totals reconcile to the summary.
        #[test]
        fn prop_closing_lines_balance(
            movements in prop::collection::vec(movement_strategy(), 1..12),
        ) {
            let retained = AccountId::new();
            if let Some((lines, summary)) =
                build_closing_lines(&movements, retained).unwrap()
            {
                let totals = validate_lines(&lines).unwrap();
                prop_assert!(totals.is_balanced);

                let expected: Amount = movements
                    .iter()
                    .filter(|m| m.account_type == AccountType::Revenue)
                    .map(AccountMovement::normal_net)
                    .sum();
                prop_assert_eq!(summary.revenue_total, expected);
            }
        }

        /// After applying the closing lines, every income-statement account's
        /// period net is zero.
        #[test]
        fn prop_close_zeroes_accounts(
            movements in prop::collection::vec(movement_strategy(), 1..12),
        ) {
            let retained = AccountId::new();
            if let Some((lines, _)) = build_closing_lines(&movements, retained).unwrap() {
                for movement in &movements {
                    let closing_change: Amount = lines
                        .iter()
                        .filter(|l| l.account_id == movement.account_id)
                        .map(|l| {
                            let (debit, credit) = l.debit_credit();
                            movement.account_type.normal_balance().balance_change(debit, credit)
                        })
                        .sum();
                    let after = movement.normal_net() + closing_change;
                    prop_assert_eq!(after, Amount::ZERO);
                }
            }
        }
    }
}
