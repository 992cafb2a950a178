//! Pure posting rules: document snapshot in, balanced journal lines out.
//!
//! Every builder validates its amounts and emits lines whose debits equal
//! credits by construction; `validate_lines` still re-checks the result at
//! the store boundary.

use meridian_shared::types::Amount;

use super::documents::{
    BillDocument, DownPaymentDocument, InvoiceDocument, PaymentDirection, PaymentDocument,
    ReturnDocument, WarehouseTransferDocument,
};
use crate::error::LedgerError;
use crate::journal::types::LineInput;

fn require_positive(amount: Amount) -> Result<(), LedgerError> {
    if amount.is_negative() {
        return Err(LedgerError::NegativeAmount);
    }
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    Ok(())
}

/// Builds the lines for a sales invoice.
///
/// Dr accounts receivable for the total; Cr each revenue account for its
/// subtotal; Cr tax payable for the tax.
///
/// # Errors
///
/// Returns `ZeroAmount`/`NegativeAmount` for non-positive amounts and
/// `InsufficientLines` for an invoice without revenue lines.
pub fn invoice_lines(invoice: &InvoiceDocument) -> Result<Vec<LineInput>, LedgerError> {
    if invoice.lines.is_empty() {
        return Err(LedgerError::InsufficientLines);
    }

    let mut lines = Vec::with_capacity(invoice.lines.len() + 2);
    lines.push(
        LineInput::debit(invoice.receivable_account, invoice.total())
            .with_description(format!("Invoice {}", invoice.number)),
    );

    for line in &invoice.lines {
        require_positive(line.amount)?;
        lines.push(LineInput::credit(line.revenue_account, line.amount));
    }

    if let Some(tax) = &invoice.tax {
        require_positive(tax.amount)?;
        lines.push(LineInput::credit(tax.account, tax.amount).with_description("Sales tax"));
    }

    Ok(lines)
}

/// Builds the lines for a vendor bill.
///
/// Dr each expense/asset account; Dr tax receivable for input tax; Cr
/// accounts payable for the total.
///
/// # Errors
///
/// Returns `ZeroAmount`/`NegativeAmount` for non-positive amounts and
/// `InsufficientLines` for a bill without charge lines.
pub fn bill_lines(bill: &BillDocument) -> Result<Vec<LineInput>, LedgerError> {
    if bill.lines.is_empty() {
        return Err(LedgerError::InsufficientLines);
    }

    let mut lines = Vec::with_capacity(bill.lines.len() + 2);

    for line in &bill.lines {
        require_positive(line.amount)?;
        lines.push(LineInput::debit(line.account, line.amount));
    }

    if let Some(tax) = &bill.tax {
        require_positive(tax.amount)?;
        lines.push(LineInput::debit(tax.account, tax.amount).with_description("Input tax"));
    }

    lines.push(
        LineInput::credit(bill.payable_account, bill.total())
            .with_description(format!("Bill {}", bill.number)),
    );

    Ok(lines)
}

/// Builds the lines for a payment.
///
/// Customer receipt: Dr cash/bank, Cr accounts receivable.
/// Vendor payment: Dr accounts payable, Cr cash/bank.
///
/// # Errors
///
/// Returns `ZeroAmount`/`NegativeAmount` for a non-positive amount.
pub fn payment_lines(payment: &PaymentDocument) -> Result<Vec<LineInput>, LedgerError> {
    require_positive(payment.amount)?;

    let description = format!("Payment {}", payment.number);
    let lines = match payment.direction {
        PaymentDirection::CustomerReceipt => vec![
            LineInput::debit(payment.deposit_account, payment.amount)
                .with_description(description),
            LineInput::credit(payment.counterparty_account, payment.amount),
        ],
        PaymentDirection::VendorPayment => vec![
            LineInput::debit(payment.counterparty_account, payment.amount)
                .with_description(description),
            LineInput::credit(payment.deposit_account, payment.amount),
        ],
    };

    Ok(lines)
}

/// Builds the lines for a down payment.
///
/// Received: Dr cash/bank, Cr customer-deposits liability.
/// Paid: Dr vendor-prepayment asset, Cr cash/bank.
///
/// # Errors
///
/// Returns `ZeroAmount`/`NegativeAmount` for a non-positive amount.
pub fn down_payment_lines(dp: &DownPaymentDocument) -> Result<Vec<LineInput>, LedgerError> {
    require_positive(dp.amount)?;

    let description = format!("Down payment {}", dp.number);
    let lines = match dp.direction {
        PaymentDirection::CustomerReceipt => vec![
            LineInput::debit(dp.deposit_account, dp.amount).with_description(description),
            LineInput::credit(dp.deposit_holding_account, dp.amount),
        ],
        PaymentDirection::VendorPayment => vec![
            LineInput::debit(dp.deposit_holding_account, dp.amount).with_description(description),
            LineInput::credit(dp.deposit_account, dp.amount),
        ],
    };

    Ok(lines)
}

/// Builds the lines for a customer return (credit note).
///
/// The mirror of an invoice: Dr each revenue account, Dr tax payable,
/// Cr accounts receivable for the total.
///
/// # Errors
///
/// Returns `ZeroAmount`/`NegativeAmount` for non-positive amounts and
/// `InsufficientLines` for a return without lines.
pub fn customer_return_lines(ret: &ReturnDocument) -> Result<Vec<LineInput>, LedgerError> {
    if ret.lines.is_empty() {
        return Err(LedgerError::InsufficientLines);
    }

    let mut lines = Vec::with_capacity(ret.lines.len() + 2);

    for line in &ret.lines {
        require_positive(line.amount)?;
        lines.push(LineInput::debit(line.account, line.amount));
    }

    if let Some(tax) = &ret.tax {
        require_positive(tax.amount)?;
        lines.push(LineInput::debit(tax.account, tax.amount).with_description("Sales tax"));
    }

    lines.push(
        LineInput::credit(ret.counterparty_account, ret.total())
            .with_description(format!("Customer return {}", ret.number)),
    );

    Ok(lines)
}

/// Builds the lines for a vendor return (debit note).
///
/// The mirror of a bill: Dr accounts payable for the total, Cr each charge
/// account, Cr tax receivable.
///
/// # Errors
///
/// Returns `ZeroAmount`/`NegativeAmount` for non-positive amounts and
/// `InsufficientLines` for a return without lines.
pub fn vendor_return_lines(ret: &ReturnDocument) -> Result<Vec<LineInput>, LedgerError> {
    if ret.lines.is_empty() {
        return Err(LedgerError::InsufficientLines);
    }

    let mut lines = Vec::with_capacity(ret.lines.len() + 2);
    lines.push(
        LineInput::debit(ret.counterparty_account, ret.total())
            .with_description(format!("Vendor return {}", ret.number)),
    );

    for line in &ret.lines {
        require_positive(line.amount)?;
        lines.push(LineInput::credit(line.account, line.amount));
    }

    if let Some(tax) = &ret.tax {
        require_positive(tax.amount)?;
        lines.push(LineInput::credit(tax.account, tax.amount).with_description("Input tax"));
    }

    Ok(lines)
}

/// Builds the lines for an inter-warehouse inventory move.
///
/// Dr destination inventory account, Cr source inventory account for the
/// same value. Returns `None` when both warehouses share one account: the
/// move is ledger-neutral and no entry exists.
///
/// # Errors
///
/// Returns `ZeroAmount`/`NegativeAmount` for a non-positive value.
pub fn warehouse_transfer_lines(
    transfer: &WarehouseTransferDocument,
) -> Result<Option<Vec<LineInput>>, LedgerError> {
    require_positive(transfer.value)?;

    if transfer.from_account == transfer.to_account {
        return Ok(None);
    }

    let description = format!("Warehouse transfer {}", transfer.number);
    Ok(Some(vec![
        LineInput::debit(transfer.to_account, transfer.value).with_description(description),
        LineInput::credit(transfer.from_account, transfer.value),
    ]))
}
