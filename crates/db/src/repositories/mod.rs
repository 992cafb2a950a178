//! Repository abstractions for the ledger engine.
//!
//! Every mutating operation runs inside a single database transaction; the
//! repositories surface `meridian_core::LedgerError` so callers see one
//! error taxonomy regardless of where a violation is caught.

pub mod account;
pub mod balance;
pub mod fiscal;
pub mod journal;
pub mod posting;

pub use account::AccountRepository;
pub use balance::BalanceRepository;
pub use fiscal::FiscalRepository;
pub use journal::JournalRepository;
pub use posting::PostingService;
