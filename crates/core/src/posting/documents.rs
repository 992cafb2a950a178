//! Document snapshots consumed by the posting rules.
//!
//! These are the ledger-relevant projections of documents owned by external
//! services: just the amounts and the accounts they map onto. Statuses,
//! contacts, stock movements and the rest stay with the owning service.

use uuid::Uuid;

use meridian_shared::types::{AccountId, Amount};

/// A revenue line of an invoice or customer return.
#[derive(Debug, Clone)]
pub struct RevenueLine {
    /// Revenue account to credit.
    pub revenue_account: AccountId,
    /// Line subtotal in minor units.
    pub amount: Amount,
}

/// An expense/asset charge line of a bill or vendor return.
#[derive(Debug, Clone)]
pub struct ChargeLine {
    /// Expense or asset account to debit.
    pub account: AccountId,
    /// Line amount in minor units.
    pub amount: Amount,
}

/// A tax amount and the balance-sheet account carrying it.
#[derive(Debug, Clone)]
pub struct TaxCharge {
    /// Tax payable (sales) or tax receivable (purchases) account.
    pub account: AccountId,
    /// Tax amount in minor units.
    pub amount: Amount,
}

/// Ledger projection of a sales invoice.
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    /// Invoice id in the owning service.
    pub id: Uuid,
    /// Invoice number, used as the entry reference.
    pub number: String,
    /// Accounts receivable account to debit for the total.
    pub receivable_account: AccountId,
    /// Revenue lines (at least one).
    pub lines: Vec<RevenueLine>,
    /// Optional sales tax.
    pub tax: Option<TaxCharge>,
}

impl InvoiceDocument {
    /// Invoice total: subtotal plus tax.
    #[must_use]
    pub fn total(&self) -> Amount {
        let subtotal: Amount = self.lines.iter().map(|l| l.amount).sum();
        subtotal + self.tax.as_ref().map_or(Amount::ZERO, |t| t.amount)
    }
}

/// Ledger projection of a vendor bill.
#[derive(Debug, Clone)]
pub struct BillDocument {
    /// Bill id in the owning service.
    pub id: Uuid,
    /// Bill number, used as the entry reference.
    pub number: String,
    /// Accounts payable account to credit for the total.
    pub payable_account: AccountId,
    /// Charge lines (at least one).
    pub lines: Vec<ChargeLine>,
    /// Optional input tax.
    pub tax: Option<TaxCharge>,
}

impl BillDocument {
    /// Bill total: charges plus tax.
    #[must_use]
    pub fn total(&self) -> Amount {
        let subtotal: Amount = self.lines.iter().map(|l| l.amount).sum();
        subtotal + self.tax.as_ref().map_or(Amount::ZERO, |t| t.amount)
    }
}

/// Direction of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentDirection {
    /// Money received from a customer.
    CustomerReceipt,
    /// Money paid to a vendor.
    VendorPayment,
}

/// Ledger projection of a payment.
#[derive(Debug, Clone)]
pub struct PaymentDocument {
    /// Payment id in the owning service.
    pub id: Uuid,
    /// Payment number, used as the entry reference.
    pub number: String,
    /// Direction of the money flow.
    pub direction: PaymentDirection,
    /// Cash or bank account.
    pub deposit_account: AccountId,
    /// Accounts receivable (receipt) or accounts payable (payment).
    pub counterparty_account: AccountId,
    /// Payment amount in minor units.
    pub amount: Amount,
}

/// Ledger projection of a down payment.
///
/// Money moves before the document it settles exists, so the counterside is
/// a deposit account: a customer-deposits liability for money received, a
/// prepayment asset for money paid out.
#[derive(Debug, Clone)]
pub struct DownPaymentDocument {
    /// Down payment id in the owning service.
    pub id: Uuid,
    /// Document number, used as the entry reference.
    pub number: String,
    /// Direction of the money flow.
    pub direction: PaymentDirection,
    /// Cash or bank account.
    pub deposit_account: AccountId,
    /// Customer-deposits liability or vendor-prepayment asset account.
    pub deposit_holding_account: AccountId,
    /// Amount in minor units.
    pub amount: Amount,
}

/// Ledger projection of a customer or vendor return.
///
/// A customer return mirrors an invoice; a vendor return mirrors a bill.
/// `lines` carries revenue accounts for customer returns and charge accounts
/// for vendor returns.
#[derive(Debug, Clone)]
pub struct ReturnDocument {
    /// Return id in the owning service.
    pub id: Uuid,
    /// Document number, used as the entry reference.
    pub number: String,
    /// The receivable (customer) or payable (vendor) account.
    pub counterparty_account: AccountId,
    /// Accounts and amounts being returned.
    pub lines: Vec<ChargeLine>,
    /// Optional tax being returned.
    pub tax: Option<TaxCharge>,
}

impl ReturnDocument {
    /// Return total: lines plus tax.
    #[must_use]
    pub fn total(&self) -> Amount {
        let subtotal: Amount = self.lines.iter().map(|l| l.amount).sum();
        subtotal + self.tax.as_ref().map_or(Amount::ZERO, |t| t.amount)
    }
}

/// Ledger projection of an inter-warehouse inventory move.
///
/// When both warehouses map to the same inventory account the move is
/// ledger-neutral and produces no entry.
#[derive(Debug, Clone)]
pub struct WarehouseTransferDocument {
    /// Transfer id in the owning service.
    pub id: Uuid,
    /// Document number, used as the entry reference.
    pub number: String,
    /// Inventory account of the source warehouse.
    pub from_account: AccountId,
    /// Inventory account of the destination warehouse.
    pub to_account: AccountId,
    /// Value of the moved stock in minor units.
    pub value: Amount,
}
