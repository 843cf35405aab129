//! Transactions imported from CSV files.
//!
//! This module contains:
//! - The `Transaction` model, its classification and the `TransactionSet`
//! - The read-only category filter used by the transactions table
//! - The transactions page handler

mod core;
mod filter;
mod transactions_page;

pub use core::{Transaction, TransactionKind, TransactionSet};
pub use transactions_page::get_transactions_page;
