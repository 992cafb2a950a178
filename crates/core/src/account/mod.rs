//! Chart of accounts.
//!
//! Account types, the derived normal-balance polarity, and the pure registry
//! rules (code uniqueness, system-account immutability, hierarchy checks).

pub mod rules;
pub mod types;

pub use types::{Account, AccountSubtype, AccountType, NormalBalance};
