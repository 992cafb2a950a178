//! Document-to-ledger posting rules.
//!
//! One pure builder per document type, each returning journal lines that
//! balance by construction. The document services own their documents'
//! lifecycles; this module only knows how a document maps onto accounts.

pub mod documents;
pub mod rules;

#[cfg(test)]
mod rules_props;

pub use documents::{
    BillDocument, ChargeLine, DownPaymentDocument, InvoiceDocument, PaymentDirection,
    PaymentDocument, ReturnDocument, RevenueLine, TaxCharge, WarehouseTransferDocument,
};
pub use rules::{
    bill_lines, customer_return_lines, down_payment_lines, invoice_lines, payment_lines,
    vendor_return_lines, warehouse_transfer_lines,
};
