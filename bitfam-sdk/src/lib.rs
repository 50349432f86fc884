#![deny(missing_docs)]

//! Bitcoin and BitcoinCash transaction SDK.
//!
//! Re-exports the primitives, script and transaction crates for
//! single-crate usage.

pub use bitfam_primitives as primitives;
pub use bitfam_script as script;
pub use bitfam_transaction as transaction;
