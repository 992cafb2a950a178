//! Journal entries and balanced-line validation.
//!
//! A journal entry is a dated set of lines where total debits equal total
//! credits. Entries are created as drafts, become immutable when posted, and
//! can only be undone by an additive reversal entry.

pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use types::{
    EntryInput, EntryStatus, EntryTotals, EntryType, JournalEntry, JournalLine, LineInput,
    SourceDocument, SourceKind,
};
pub use validation::validate_lines;
