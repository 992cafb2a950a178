//! Property-based tests for journal line validation.

use proptest::prelude::*;

use meridian_shared::types::{AccountId, Amount};

use super::types::{EntryType, LineInput};
use super::validation::validate_lines;
use crate::error::LedgerError;

/// Strategy for positive line amounts in minor units.
fn amount_strategy() -> impl Strategy<Value = Amount> {
    (1i64..10_000_000).prop_map(Amount::from_minor)
}

/// Strategy for a balanced line set: N debit amounts mirrored by one credit
/// per debit, shuffled sides stay balanced by construction.
fn balanced_lines_strategy() -> impl Strategy<Value = Vec<LineInput>> {
    prop::collection::vec(amount_strategy(), 1..8).prop_map(|amounts| {
        let mut lines = Vec::with_capacity(amounts.len() * 2);
        for amount in amounts {
            lines.push(LineInput::debit(AccountId::new(), amount));
            lines.push(LineInput::credit(AccountId::new(), amount));
        }
        lines
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any mirrored line set validates and reports equal totals.
    #[test]
    fn prop_balanced_sets_accepted(lines in balanced_lines_strategy()) {
        let totals = validate_lines(&lines).unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit, totals.credit);
    }

    /// Perturbing any single line of a balanced set breaks the balance and
    /// is rejected with `UnbalancedEntry`.
    #[test]
    fn prop_perturbed_sets_rejected(
        lines in balanced_lines_strategy(),
        index in any::<prop::sample::Index>(),
        delta in 1i64..1_000_000,
    ) {
        let mut lines = lines;
        let i = index.index(lines.len());
        lines[i].amount = lines[i].amount + Amount::from_minor(delta);

        let is_unbalanced = matches!(
            validate_lines(&lines),
            Err(LedgerError::UnbalancedEntry { .. })
        );
        prop_assert!(is_unbalanced);
    }

    /// Validation totals equal the column sums, independent of line order.
    #[test]
    fn prop_totals_match_column_sums(lines in balanced_lines_strategy()) {
        let totals = validate_lines(&lines).unwrap();

        let debit_sum: Amount = lines
            .iter()
            .filter(|l| l.entry_type == EntryType::Debit)
            .map(|l| l.amount)
            .sum();
        let credit_sum: Amount = lines
            .iter()
            .filter(|l| l.entry_type == EntryType::Credit)
            .map(|l| l.amount)
            .sum();

        prop_assert_eq!(totals.debit, debit_sum);
        prop_assert_eq!(totals.credit, credit_sum);
    }

    /// A mirrored (reversed) line set validates whenever the original does,
    /// with the totals swapped.
    #[test]
    fn prop_mirrored_set_validates(lines in balanced_lines_strategy()) {
        let original = validate_lines(&lines).unwrap();

        let mirrored: Vec<LineInput> = lines.iter().map(LineInput::mirrored).collect();
        let reversed = validate_lines(&mirrored).unwrap();

        prop_assert_eq!(reversed.debit, original.credit);
        prop_assert_eq!(reversed.credit, original.debit);
    }

    /// Single-sided sets are always rejected, regardless of amounts.
    #[test]
    fn prop_single_sided_rejected(amounts in prop::collection::vec(amount_strategy(), 2..6)) {
        let lines: Vec<LineInput> = amounts
            .iter()
            .map(|a| LineInput::debit(AccountId::new(), *a))
            .collect();

        prop_assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::SingleSided)
        ));
    }
}
