//! Posting service: wires document snapshots to the journal store.
//!
//! Each `post_*` method guards idempotency first (a document maps to at most
//! one active entry), then runs the pure posting rule and creates a posted
//! entry carrying the document's source link. `void_document` reverses the
//! active entry; the owning service rolls back its own document state in the
//! same logical operation.

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use meridian_core::LedgerError;
use meridian_core::journal::{EntryInput, LineInput, SourceDocument, SourceKind};
use meridian_core::posting::{
    BillDocument, DownPaymentDocument, InvoiceDocument, PaymentDocument, ReturnDocument,
    WarehouseTransferDocument, bill_lines, customer_return_lines, down_payment_lines,
    invoice_lines, payment_lines, vendor_return_lines, warehouse_transfer_lines,
};
use meridian_shared::config::LedgerConfig;
use meridian_shared::types::JournalEntryId;

use crate::entities::journal_entries;

use super::journal::{EntryWithLines, JournalRepository};

/// Document posting service.
#[derive(Debug, Clone)]
pub struct PostingService {
    journal: JournalRepository,
}

impl PostingService {
    /// Creates a new posting service with default ledger settings.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            journal: JournalRepository::new(db),
        }
    }

    /// Creates a new posting service with explicit ledger settings.
    #[must_use]
    pub fn with_config(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self {
            journal: JournalRepository::with_config(db, config),
        }
    }

    /// Posts a sales invoice.
    ///
    /// # Errors
    ///
    /// `AlreadyPosted` if the invoice already has an active entry, plus the
    /// creation errors of the journal store.
    pub async fn post_invoice(
        &self,
        invoice: &InvoiceDocument,
        entry_date: NaiveDate,
    ) -> Result<EntryWithLines, LedgerError> {
        let source = SourceDocument::new(SourceKind::Invoice, invoice.id);
        self.guard_not_posted(source).await?;

        let lines = invoice_lines(invoice)?;
        self.post_document(
            source,
            entry_date,
            format!("Invoice {}", invoice.number),
            Some(invoice.number.clone()),
            lines,
        )
        .await
    }

    /// Posts a vendor bill.
    ///
    /// # Errors
    ///
    /// As `post_invoice`.
    pub async fn post_bill(
        &self,
        bill: &BillDocument,
        entry_date: NaiveDate,
    ) -> Result<EntryWithLines, LedgerError> {
        let source = SourceDocument::new(SourceKind::Bill, bill.id);
        self.guard_not_posted(source).await?;

        let lines = bill_lines(bill)?;
        self.post_document(
            source,
            entry_date,
            format!("Bill {}", bill.number),
            Some(bill.number.clone()),
            lines,
        )
        .await
    }

    /// Posts a payment.
    ///
    /// # Errors
    ///
    /// As `post_invoice`.
    pub async fn post_payment(
        &self,
        payment: &PaymentDocument,
        entry_date: NaiveDate,
    ) -> Result<EntryWithLines, LedgerError> {
        let source = SourceDocument::new(SourceKind::Payment, payment.id);
        self.guard_not_posted(source).await?;

        let lines = payment_lines(payment)?;
        self.post_document(
            source,
            entry_date,
            format!("Payment {}", payment.number),
            Some(payment.number.clone()),
            lines,
        )
        .await
    }

    /// Posts a down payment.
    ///
    /// # Errors
    ///
    /// As `post_invoice`.
    pub async fn post_down_payment(
        &self,
        dp: &DownPaymentDocument,
        entry_date: NaiveDate,
    ) -> Result<EntryWithLines, LedgerError> {
        let source = SourceDocument::new(SourceKind::DownPayment, dp.id);
        self.guard_not_posted(source).await?;

        let lines = down_payment_lines(dp)?;
        self.post_document(
            source,
            entry_date,
            format!("Down payment {}", dp.number),
            Some(dp.number.clone()),
            lines,
        )
        .await
    }

    /// Posts a customer return (credit note).
    ///
    /// # Errors
    ///
    /// As `post_invoice`.
    pub async fn post_customer_return(
        &self,
        ret: &ReturnDocument,
        entry_date: NaiveDate,
    ) -> Result<EntryWithLines, LedgerError> {
        let source = SourceDocument::new(SourceKind::CustomerReturn, ret.id);
        self.guard_not_posted(source).await?;

        let lines = customer_return_lines(ret)?;
        self.post_document(
            source,
            entry_date,
            format!("Customer return {}", ret.number),
            Some(ret.number.clone()),
            lines,
        )
        .await
    }

    /// Posts a vendor return (debit note).
    ///
    /// # Errors
    ///
    /// As `post_invoice`.
    pub async fn post_vendor_return(
        &self,
        ret: &ReturnDocument,
        entry_date: NaiveDate,
    ) -> Result<EntryWithLines, LedgerError> {
        let source = SourceDocument::new(SourceKind::VendorReturn, ret.id);
        self.guard_not_posted(source).await?;

        let lines = vendor_return_lines(ret)?;
        self.post_document(
            source,
            entry_date,
            format!("Vendor return {}", ret.number),
            Some(ret.number.clone()),
            lines,
        )
        .await
    }

    /// Posts an inter-warehouse transfer.
    ///
    /// Returns `None` when the move is ledger-neutral (both warehouses map
    /// to the same inventory account).
    ///
    /// # Errors
    ///
    /// As `post_invoice`.
    pub async fn post_warehouse_transfer(
        &self,
        transfer: &WarehouseTransferDocument,
        entry_date: NaiveDate,
    ) -> Result<Option<EntryWithLines>, LedgerError> {
        let source = SourceDocument::new(SourceKind::WarehouseTransfer, transfer.id);
        self.guard_not_posted(source).await?;

        let Some(lines) = warehouse_transfer_lines(transfer)? else {
            return Ok(None);
        };
        let entry = self
            .post_document(
                source,
                entry_date,
                format!("Warehouse transfer {}", transfer.number),
                Some(transfer.number.clone()),
                lines,
            )
            .await?;
        Ok(Some(entry))
    }

    /// Voids a posted document by reversing its active entry.
    ///
    /// The reversal is dated `date` (default today). The owning service
    /// updates its own outstanding amounts afterwards.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` when the document has no active entry, and
    /// the reversal errors of the journal store.
    pub async fn void_document(
        &self,
        kind: SourceKind,
        document_id: Uuid,
        description: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<EntryWithLines, LedgerError> {
        let entry = self
            .active_entry_for(SourceDocument::new(kind, document_id))
            .await?
            .ok_or(LedgerError::EntryNotFound(JournalEntryId::from_uuid(
                document_id,
            )))?;

        self.journal
            .reverse(JournalEntryId::from_uuid(entry.id), description, date)
            .await
    }

    /// Returns the active (posted, unreversed) entry for a document, if any.
    pub async fn active_entry_for(
        &self,
        source: SourceDocument,
    ) -> Result<Option<journal_entries::Model>, LedgerError> {
        let entries = self
            .journal
            .find_by_source(source.kind.into(), source.id)
            .await?;

        Ok(entries
            .into_iter()
            .find(|e| e.is_posted && e.reversed_by.is_none()))
    }

    /// Fails with `AlreadyPosted` if the document already has an active entry.
    ///
    /// Runs before the posting rule, so a non-postable document never
    /// reaches the adapter. A document whose prior entry was reversed
    /// (voided) may be posted again.
    async fn guard_not_posted(&self, source: SourceDocument) -> Result<(), LedgerError> {
        if let Some(existing) = self.active_entry_for(source).await? {
            return Err(LedgerError::AlreadyPosted(JournalEntryId::from_uuid(
                existing.id,
            )));
        }
        Ok(())
    }

    async fn post_document(
        &self,
        source: SourceDocument,
        entry_date: NaiveDate,
        description: String,
        reference: Option<String>,
        lines: Vec<LineInput>,
    ) -> Result<EntryWithLines, LedgerError> {
        let input = EntryInput {
            entry_date,
            description,
            reference,
            source: Some(source),
            lines,
        };
        let entry = self.journal.create_entry(&input, true).await?;
        tracing::info!(
            source_kind = %source.kind,
            source_id = %source.id,
            entry_id = %entry.entry.id,
            "document posted to ledger"
        );
        Ok(entry)
    }
}
