//! Short advisory facts derived from the aggregates.

use crate::{
    dashboard::aggregation::{
        calculate_category_breakdown, calculate_monthly_buckets, calculate_summary, ratio,
    },
    transaction::{Transaction, TransactionKind},
};

/// One fact shown on the insights panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    /// The month with the highest profit.
    BestMonth { label: String, profit: f64 },
    /// The category that brought in the most income.
    TopIncomeCategory { category: String, total: f64 },
    /// Expenses as a percentage of income, zero when there is no income.
    ExpenseRatio { percentage: f64 },
    /// Income earned per unit spent, zero when there are no expenses.
    ReturnOnSpend { ratio: f64 },
}

/// Derives the insights for `transactions`.
///
/// An empty list gives no insights. The month and category insights are left
/// out when there is no data for them. When several months share the best
/// profit, the earliest one is picked.
pub fn generate_insights(transactions: &[Transaction]) -> Vec<Insight> {
    if transactions.is_empty() {
        return Vec::new();
    }

    let mut insights = Vec::with_capacity(4);

    let mut best_month: Option<(String, f64)> = None;
    for bucket in calculate_monthly_buckets(transactions) {
        let profit = bucket.profit();

        // Strictly greater, so ties keep the earlier month.
        if best_month
            .as_ref()
            .is_none_or(|(_, best_profit)| profit > *best_profit)
        {
            best_month = Some((bucket.label, profit));
        }
    }

    if let Some((label, profit)) = best_month {
        insights.push(Insight::BestMonth { label, profit });
    }

    if let Some(top) = calculate_category_breakdown(transactions, TransactionKind::Income)
        .into_iter()
        .next()
    {
        insights.push(Insight::TopIncomeCategory {
            category: top.category,
            total: top.total,
        });
    }

    let summary = calculate_summary(transactions);

    insights.push(Insight::ExpenseRatio {
        percentage: ratio(summary.expenses, summary.income) * 100.0,
    });
    insights.push(Insight::ReturnOnSpend {
        ratio: ratio(summary.income, summary.expenses),
    });

    insights
}
