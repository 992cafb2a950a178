//! Property-based tests for the posting rules.
//!
//! Every builder must produce lines that pass `validate_lines` for any
//! well-formed document: balanced by construction, not by luck.

use proptest::prelude::*;
use uuid::Uuid;

use meridian_shared::types::{AccountId, Amount};

use super::documents::{
    BillDocument, ChargeLine, DownPaymentDocument, InvoiceDocument, PaymentDirection,
    PaymentDocument, ReturnDocument, RevenueLine, TaxCharge,
};
use super::rules::{
    bill_lines, customer_return_lines, down_payment_lines, invoice_lines, payment_lines,
    vendor_return_lines,
};
use crate::journal::validation::validate_lines;

fn amount_strategy() -> impl Strategy<Value = Amount> {
    (1i64..100_000_000).prop_map(Amount::from_minor)
}

fn tax_strategy() -> impl Strategy<Value = Option<TaxCharge>> {
    prop::option::of(amount_strategy().prop_map(|amount| TaxCharge {
        account: AccountId::new(),
        amount,
    }))
}

fn direction_strategy() -> impl Strategy<Value = PaymentDirection> {
    prop_oneof![
        Just(PaymentDirection::CustomerReceipt),
        Just(PaymentDirection::VendorPayment),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Invoices always balance, with the AR debit equal to the total.
    #[test]
    fn prop_invoice_lines_balance(
        amounts in prop::collection::vec(amount_strategy(), 1..6),
        tax in tax_strategy(),
    ) {
        let invoice = InvoiceDocument {
            id: Uuid::now_v7(),
            number: "INV-P".into(),
            receivable_account: AccountId::new(),
            lines: amounts
                .into_iter()
                .map(|amount| RevenueLine {
                    revenue_account: AccountId::new(),
                    amount,
                })
                .collect(),
            tax,
        };

        let lines = invoice_lines(&invoice).unwrap();
        let totals = validate_lines(&lines).unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit, invoice.total());
    }

    /// Bills always balance, with the AP credit equal to the total.
    #[test]
    fn prop_bill_lines_balance(
        amounts in prop::collection::vec(amount_strategy(), 1..6),
        tax in tax_strategy(),
    ) {
        let bill = BillDocument {
            id: Uuid::now_v7(),
            number: "BILL-P".into(),
            payable_account: AccountId::new(),
            lines: amounts
                .into_iter()
                .map(|amount| ChargeLine {
                    account: AccountId::new(),
                    amount,
                })
                .collect(),
            tax,
        };

        let lines = bill_lines(&bill).unwrap();
        let totals = validate_lines(&lines).unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.credit, bill.total());
    }

    /// Payments always balance in both directions.
    #[test]
    fn prop_payment_lines_balance(
        amount in amount_strategy(),
        direction in direction_strategy(),
    ) {
        let payment = PaymentDocument {
            id: Uuid::now_v7(),
            number: "PAY-P".into(),
            direction,
            deposit_account: AccountId::new(),
            counterparty_account: AccountId::new(),
            amount,
        };

        let lines = payment_lines(&payment).unwrap();
        prop_assert!(validate_lines(&lines).unwrap().is_balanced);
    }

    /// Down payments always balance in both directions.
    #[test]
    fn prop_down_payment_lines_balance(
        amount in amount_strategy(),
        direction in direction_strategy(),
    ) {
        let dp = DownPaymentDocument {
            id: Uuid::now_v7(),
            number: "DP-P".into(),
            direction,
            deposit_account: AccountId::new(),
            deposit_holding_account: AccountId::new(),
            amount,
        };

        let lines = down_payment_lines(&dp).unwrap();
        prop_assert!(validate_lines(&lines).unwrap().is_balanced);
    }

    /// Returns always balance and mirror their source document shape.
    #[test]
    fn prop_return_lines_balance(
        amounts in prop::collection::vec(amount_strategy(), 1..6),
        tax in tax_strategy(),
    ) {
        let ret = ReturnDocument {
            id: Uuid::now_v7(),
            number: "RET-P".into(),
            counterparty_account: AccountId::new(),
            lines: amounts
                .into_iter()
                .map(|amount| ChargeLine {
                    account: AccountId::new(),
                    amount,
                })
                .collect(),
            tax,
        };

        let customer = customer_return_lines(&ret).unwrap();
        let customer_totals = validate_lines(&customer).unwrap();
        prop_assert!(customer_totals.is_balanced);

        let vendor = vendor_return_lines(&ret).unwrap();
        let vendor_totals = validate_lines(&vendor).unwrap();
        prop_assert!(vendor_totals.is_balanced);

        // Same document value flows through both directions.
        prop_assert_eq!(customer_totals.debit, vendor_totals.debit);
    }
}
