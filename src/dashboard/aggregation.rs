//! Transaction data aggregation for the dashboard.
//!
//! Provides the summary totals, monthly buckets and category breakdowns that
//! the cards, charts and insights are built from. Every function here is pure
//! and recomputes its result from the full transaction list.

use std::collections::{BTreeMap, HashMap};

use time::{Date, Month};

use crate::transaction::{Transaction, TransactionKind};

/// Totals over a list of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// Sum of income amounts.
    pub income: f64,
    /// Sum of expense amounts.
    pub expenses: f64,
    /// Sum of amounts that are neither income nor expenses.
    pub unclassified: f64,
    /// `income - expenses`.
    pub profit: f64,
    /// Profit as a percentage of income, or zero when there is no income.
    pub margin: f64,
    /// The number of transactions summarised.
    pub transaction_count: usize,
}

/// Calculates the income, expense and profit totals for `transactions`.
pub fn calculate_summary(transactions: &[Transaction]) -> Summary {
    let mut summary = Summary {
        transaction_count: transactions.len(),
        ..Default::default()
    };

    for transaction in transactions {
        match transaction.kind() {
            TransactionKind::Income => summary.income += transaction.amount(),
            TransactionKind::Expense => summary.expenses += transaction.amount(),
            TransactionKind::Unclassified => summary.unclassified += transaction.amount(),
        }
    }

    summary.profit = summary.income - summary.expenses;
    summary.margin = ratio(summary.profit, summary.income) * 100.0;

    summary
}

/// Divides `numerator` by `denominator`, returning zero instead of a non-finite result.
pub(super) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }

    let value = numerator / denominator;

    if value.is_finite() { value } else { 0.0 }
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    /// The first day of the month, used for ordering.
    pub month: Date,
    /// Display label such as "Jan 24".
    pub label: String,
    pub income: f64,
    pub expenses: f64,
}

impl MonthlyBucket {
    pub fn profit(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Groups income and expenses by calendar month in chronological order.
///
/// Transactions whose date cannot be parsed are skipped, as are transactions
/// that are neither income nor expenses. Months without any income or
/// expenses do not get a bucket.
pub fn calculate_monthly_buckets(transactions: &[Transaction]) -> Vec<MonthlyBucket> {
    let mut totals: BTreeMap<Date, (f64, f64)> = BTreeMap::new();
    let mut unparsed_dates = 0;

    for transaction in transactions {
        let Some(month) = transaction.parsed_date().map(first_day_of_month) else {
            unparsed_dates += 1;
            continue;
        };

        let (income, expenses) = match transaction.kind() {
            TransactionKind::Income => (transaction.amount(), 0.0),
            TransactionKind::Expense => (0.0, transaction.amount()),
            TransactionKind::Unclassified => continue,
        };

        let entry = totals.entry(month).or_insert((0.0, 0.0));
        entry.0 += income;
        entry.1 += expenses;
    }

    if unparsed_dates > 0 {
        tracing::debug!("Left {unparsed_dates} transactions with unparsable dates out of monthly totals");
    }

    totals
        .into_iter()
        .map(|(month, (income, expenses))| MonthlyBucket {
            month,
            label: format_month_label(month),
            income,
            expenses,
        })
        .collect()
}

fn first_day_of_month(date: Date) -> Date {
    // Every month has a first day, so this never falls back.
    date.replace_day(1).unwrap_or(date)
}

/// Formats a month as a three-letter abbreviation and two-digit year, e.g. "Jan 24".
pub fn format_month_label(month: Date) -> String {
    let name = match month.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{name} {:02}", month.year().rem_euclid(100))
}

/// The total amount for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Sums the amounts of `kind` transactions per category.
///
/// Sorted by descending total. Categories with equal totals keep the order in
/// which they first appear.
pub fn calculate_category_breakdown(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> Vec<CategoryTotal> {
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();
    let mut breakdown: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions.iter().filter(|transaction| transaction.kind() == kind) {
        match index_by_category.get(transaction.category()) {
            Some(&index) => breakdown[index].total += transaction.amount(),
            None => {
                index_by_category.insert(transaction.category(), breakdown.len());
                breakdown.push(CategoryTotal {
                    category: transaction.category().to_owned(),
                    total: transaction.amount(),
                });
            }
        }
    }

    // Stable sort keeps first-seen order for ties.
    breakdown.sort_by(|a, b| b.total.total_cmp(&a.total));

    breakdown
}

#[cfg(test)]
mod aggregation_tests {
    use time::macros::date;

    use crate::transaction::{Transaction, TransactionKind};

    use super::{
        CategoryTotal, MonthlyBucket, Summary, calculate_category_breakdown,
        calculate_monthly_buckets, calculate_summary, format_month_label,
    };

    fn example_transactions() -> Vec<Transaction> {
        vec![
            Transaction::new("2024-01-15", "Ingreso", "Salario", 1000.0),
            Transaction::new("2024-01-20", "Gasto", "Ocio", 200.0),
            Transaction::new("2024-02-01", "Ingreso", "Salario", 1000.0),
        ]
    }

    #[test]
    fn summary_of_example() {
        let summary = calculate_summary(&example_transactions());

        assert_eq!(
            summary,
            Summary {
                income: 2000.0,
                expenses: 200.0,
                unclassified: 0.0,
                profit: 1800.0,
                margin: 90.0,
                transaction_count: 3,
            }
        );
    }

    #[test]
    fn margin_is_zero_without_income() {
        let transactions = vec![Transaction::new("2024-01-20", "Gasto", "Ocio", 200.0)];

        let summary = calculate_summary(&transactions);

        assert_eq!(summary.margin, 0.0);
        assert_eq!(summary.profit, -200.0);
    }

    #[test]
    fn summary_of_empty_set_is_zero() {
        assert_eq!(calculate_summary(&[]), Summary::default());
    }

    #[test]
    fn defaulted_amount_does_not_change_totals() {
        let mut transactions = example_transactions();
        transactions.push(Transaction::new("2024-01-01", "Gasto", "Comida", 0.0));

        let summary = calculate_summary(&transactions);

        assert_eq!(summary.expenses, 200.0);
        assert_eq!(summary.transaction_count, 4);
    }

    #[test]
    fn unclassified_counts_as_neither_income_nor_expense() {
        let transactions = vec![
            Transaction::new("2024-01-15", "Ingreso", "Salario", 1000.0),
            Transaction::new("2024-01-16", "Transfer", "Ahorro", 300.0),
        ];

        let summary = calculate_summary(&transactions);

        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.expenses, 0.0);
        assert_eq!(summary.unclassified, 300.0);
        assert_eq!(summary.profit, 1000.0);
    }

    #[test]
    fn monthly_buckets_of_example() {
        let buckets = calculate_monthly_buckets(&example_transactions());

        assert_eq!(
            buckets,
            vec![
                MonthlyBucket {
                    month: date!(2024 - 01 - 01),
                    label: "Jan 24".to_owned(),
                    income: 1000.0,
                    expenses: 200.0,
                },
                MonthlyBucket {
                    month: date!(2024 - 02 - 01),
                    label: "Feb 24".to_owned(),
                    income: 1000.0,
                    expenses: 0.0,
                },
            ]
        );
        assert_eq!(buckets[0].profit(), 800.0);
    }

    #[test]
    fn monthly_buckets_are_chronological_not_lexical() {
        let transactions = vec![
            Transaction::new("2024-02-10", "Ingreso", "Salario", 1.0),
            Transaction::new("2023-12-10", "Ingreso", "Salario", 2.0),
            Transaction::new("10/01/2024", "Ingreso", "Salario", 3.0),
            Transaction::new("2023-04-10", "Ingreso", "Salario", 4.0),
        ];

        let labels: Vec<_> = calculate_monthly_buckets(&transactions)
            .into_iter()
            .map(|bucket| bucket.label)
            .collect();

        assert_eq!(labels, vec!["Apr 23", "Dec 23", "Jan 24", "Feb 24"]);
    }

    #[test]
    fn monthly_buckets_skip_unparsable_dates() {
        let transactions = vec![
            Transaction::new("ayer", "Gasto", "Comida", 10.0),
            Transaction::new("2024-03-05", "Gasto", "Comida", 20.0),
        ];

        let buckets = calculate_monthly_buckets(&transactions);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].expenses, 20.0);
    }

    #[test]
    fn bucket_sums_match_summary_totals() {
        let transactions = vec![
            Transaction::new("2024-01-15", "Ingreso", "Salario", 1000.0),
            Transaction::new("2024-01-20", "Gasto", "Ocio", 200.5),
            Transaction::new("2024-03-01", "Gasto", "Comida", 45.25),
            Transaction::new("2024-03-02", "Transfer", "Ahorro", 99.0),
            Transaction::new("2024-05-30", "Ingreso", "Extra", 120.0),
        ];

        let summary = calculate_summary(&transactions);
        let buckets = calculate_monthly_buckets(&transactions);

        let income: f64 = buckets.iter().map(|bucket| bucket.income).sum();
        let expenses: f64 = buckets.iter().map(|bucket| bucket.expenses).sum();
        assert_eq!(income, summary.income);
        assert_eq!(expenses, summary.expenses);
    }

    #[test]
    fn month_label_uses_two_digit_year() {
        assert_eq!(format_month_label(date!(2024 - 01 - 01)), "Jan 24");
        assert_eq!(format_month_label(date!(2005 - 12 - 01)), "Dec 05");
        assert_eq!(format_month_label(date!(2100 - 07 - 01)), "Jul 00");
    }

    #[test]
    fn expense_breakdown_sorted_by_total() {
        let transactions = vec![
            Transaction::new("2024-01-01", "Gasto", "Comida", 30.0),
            Transaction::new("2024-01-02", "Gasto", "Ocio", 50.0),
            Transaction::new("2024-01-03", "Ingreso", "Salario", 1000.0),
            Transaction::new("2024-01-04", "Gasto", "Comida", 40.0),
            Transaction::new("2024-01-05", "Gasto", "Casa", 50.0),
        ];

        let breakdown = calculate_category_breakdown(&transactions, TransactionKind::Expense);

        assert_eq!(
            breakdown,
            vec![
                CategoryTotal {
                    category: "Comida".to_owned(),
                    total: 70.0
                },
                CategoryTotal {
                    category: "Ocio".to_owned(),
                    total: 50.0
                },
                CategoryTotal {
                    category: "Casa".to_owned(),
                    total: 50.0
                },
            ]
        );
    }

    #[test]
    fn income_breakdown_ignores_expenses() {
        let breakdown =
            calculate_category_breakdown(&example_transactions(), TransactionKind::Income);

        assert_eq!(
            breakdown,
            vec![CategoryTotal {
                category: "Salario".to_owned(),
                total: 2000.0
            }]
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let transactions = example_transactions();

        assert_eq!(calculate_summary(&transactions), calculate_summary(&transactions));
        assert_eq!(
            calculate_monthly_buckets(&transactions),
            calculate_monthly_buckets(&transactions)
        );
    }
}
