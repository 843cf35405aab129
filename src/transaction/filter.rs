//! Read-only views of the transaction set used by the transactions table.

use std::collections::HashSet;

use super::core::Transaction;

/// Which transactions the table should show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Show every transaction.
    #[default]
    All,
    /// Show only transactions whose category equals the given label exactly.
    Category(String),
}

impl CategoryFilter {
    /// Build a filter from an optional query parameter.
    ///
    /// A missing or empty value selects all transactions.
    pub fn from_param(category: Option<&str>) -> Self {
        match category {
            Some(category) if !category.is_empty() => CategoryFilter::Category(category.to_owned()),
            _ => CategoryFilter::All,
        }
    }

    fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => transaction.category() == category,
        }
    }
}

/// Returns the transactions that match `filter`, in their original order.
///
/// This never affects the dashboard totals, which always use the full set.
pub fn filter_by_category<'a>(
    transactions: &'a [Transaction],
    filter: &CategoryFilter,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .collect()
}

/// Returns each category label once, in the order it first appears.
pub fn distinct_categories(transactions: &[Transaction]) -> Vec<&str> {
    let mut seen = HashSet::new();

    transactions
        .iter()
        .map(Transaction::category)
        .filter(|category| seen.insert(*category))
        .collect()
}
