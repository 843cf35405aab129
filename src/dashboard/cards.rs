//! Card components for the summary metrics and insights.

use maud::{Markup, html};

use crate::{
    dashboard::{aggregation::Summary, insights::Insight},
    html::{format_currency, format_percentage},
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

/// Renders the income, expenses, profit and margin cards.
pub(super) fn metric_cards_view(summary: &Summary) -> Markup {
    let profit_style = if summary.profit < 0.0 {
        "text-3xl font-bold text-red-600 dark:text-red-400"
    } else {
        "text-3xl font-bold text-green-600 dark:text-green-400"
    };

    html! {
        section id="metrics" class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                (metric_card("income", "Total income", &format_currency(summary.income), "text-3xl font-bold"))
                (metric_card("expenses", "Total expenses", &format_currency(summary.expenses), "text-3xl font-bold"))
                (metric_card("profit", "Net profit", &format_currency(summary.profit), profit_style))
                (metric_card("margin", "Margin", &format_percentage(summary.margin), "text-3xl font-bold"))
            }

            p class="mt-2 text-sm text-gray-600 dark:text-gray-400"
            {
                (summary.transaction_count) " transactions"

                @if summary.unclassified != 0.0 {
                    ", " (format_currency(summary.unclassified))
                    " not counted as income or expenses"
                }
            }
        }
    }
}

fn metric_card(metric: &str, title: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) data-metric=(metric)
        {
            h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2" { (title) }
            div class=(value_style) { (value) }
        }
    }
}

/// Renders one card per insight.
pub(super) fn insight_cards_view(insights: &[Insight]) -> Markup {
    html! {
        section id="insights" class="w-full mx-auto mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Insights" }

            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                @for insight in insights {
                    @let (title, description) = describe(insight);

                    div class=(CARD_STYLE)
                    {
                        h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2" { (title) }
                        p class="text-lg font-semibold" { (description) }
                    }
                }
            }
        }
    }
}

fn describe(insight: &Insight) -> (&'static str, String) {
    match insight {
        Insight::BestMonth { label, profit } => {
            ("Best month", format!("{label} with {} profit", format_currency(*profit)))
        }
        Insight::TopIncomeCategory { category, total } => (
            "Top income category",
            format!("{category} ({})", format_currency(*total)),
        ),
        Insight::ExpenseRatio { percentage } => (
            "Expense to income",
            format!("{} of income is spent", format_percentage(*percentage)),
        ),
        Insight::ReturnOnSpend { ratio } => (
            "Return on spend",
            format!("{ratio:.2}x income per euro spent"),
        ),
    }
}
