//! Defines the core data models for transactions and the transaction set.

use std::{ops::Deref, sync::Arc};

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

// ============================================================================
// MODELS
// ============================================================================

/// Lower-case substrings that mark a transaction type as income.
const INCOME_TOKENS: [&str; 2] = ["ingreso", "income"];
/// Lower-case substrings that mark a transaction type as an expense.
const EXPENSE_TOKENS: [&str; 2] = ["gasto", "expense"];

/// Whether money was earned or spent.
///
/// Derived once from the free-text transaction type so that aggregation never
/// has to look at the raw text again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money earned, e.g. "Ingreso" or "Income".
    Income,
    /// Money spent, e.g. "Gasto" or "Expense".
    Expense,
    /// Anything else, e.g. "Transfer". Counted as neither income nor expenses.
    Unclassified,
}

impl TransactionKind {
    /// Classify the free-text transaction type `kind`.
    ///
    /// Matching is a case-insensitive substring search and income tokens are
    /// checked before expense tokens.
    pub fn classify(kind: &str) -> Self {
        let kind = kind.to_lowercase();

        if INCOME_TOKENS.iter().any(|token| kind.contains(token)) {
            TransactionKind::Income
        } else if EXPENSE_TOKENS.iter().any(|token| kind.contains(token)) {
            TransactionKind::Expense
        } else {
            TransactionKind::Unclassified
        }
    }
}

/// An expense or income imported from one CSV row.
///
/// To create a new `Transaction`, use [Transaction::new].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredTransaction", into = "StoredTransaction")]
pub struct Transaction {
    date: String,
    kind_label: String,
    kind: TransactionKind,
    category: String,
    amount: f64,
}

impl Transaction {
    /// Create a new transaction and classify its type.
    ///
    /// A non-finite `amount` is replaced with zero.
    pub fn new(date: &str, kind: &str, category: &str, amount: f64) -> Self {
        Self {
            date: date.to_owned(),
            kind_label: kind.to_owned(),
            kind: TransactionKind::classify(kind),
            category: category.to_owned(),
            amount: if amount.is_finite() { amount } else { 0.0 },
        }
    }

    /// The date exactly as it appeared in the source.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// The date parsed as a calendar date, or `None` if it is not in a supported format.
    pub fn parsed_date(&self) -> Option<Date> {
        parse_date(&self.date)
    }

    /// The transaction type exactly as it appeared in the source.
    pub fn kind_label(&self) -> &str {
        &self.kind_label
    }

    /// The classified transaction type.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// The category label, used verbatim for grouping.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The amount of money earned or spent. Always finite.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// The persisted form of a [Transaction].
///
/// The classification is not stored, it is derived again when loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTransaction {
    date: String,
    kind: String,
    category: String,
    amount: f64,
}

impl From<StoredTransaction> for Transaction {
    fn from(stored: StoredTransaction) -> Self {
        Transaction::new(&stored.date, &stored.kind, &stored.category, stored.amount)
    }
}

impl From<Transaction> for StoredTransaction {
    fn from(transaction: Transaction) -> Self {
        Self {
            date: transaction.date,
            kind: transaction.kind_label,
            category: transaction.category,
            amount: transaction.amount,
        }
    }
}

/// The ordered transactions currently shown by the dashboard.
///
/// The set is immutable and cheap to clone. It is only ever replaced as a
/// whole, see [crate::AppState::replace_transactions].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSet(Arc<[Transaction]>);

impl TransactionSet {
    /// Create a set from `transactions`, keeping their order.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self(Arc::from(transactions))
    }

    /// The transactions as a slice in insertion order.
    pub fn as_slice(&self) -> &[Transaction] {
        &self.0
    }
}

impl Default for TransactionSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for TransactionSet {
    type Target = [Transaction];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ============================================================================
// DATE PARSING
// ============================================================================

const DATE_FORMATS: [&[BorrowedFormatItem]; 5] = [
    format_description!("[year]-[month padding:none]-[day padding:none]"),
    format_description!("[year]/[month padding:none]/[day padding:none]"),
    format_description!("[day padding:none]/[month padding:none]/[year]"),
    format_description!("[day padding:none]-[month padding:none]-[year]"),
    format_description!("[day padding:none].[month padding:none].[year]"),
];

/// Parse the date portion of `text`.
///
/// Anything after a `T` or a space is ignored, so ISO 8601 date-times work.
/// Day-first formats are tried after the year-first ones.
pub fn parse_date(text: &str) -> Option<Date> {
    let date_part = text.trim().split(['T', ' ']).next()?;

    DATE_FORMATS
        .iter()
        .find_map(|format| Date::parse(date_part, format).ok())
}
