//! The page that lists the imported transactions with a category filter.

use std::sync::{Arc, RwLock};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    app_state::get_transactions_snapshot,
    endpoints,
    html::{
        CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
};

use super::{
    core::{Transaction, TransactionKind, TransactionSet},
    filter::{CategoryFilter, distinct_categories, filter_by_category},
};

/// The max number of graphemes to display in the category column before
/// truncating and displaying ellipses.
const MAX_CATEGORY_GRAPHEMES: usize = 32;

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    pub transactions: Arc<RwLock<TransactionSet>>,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
        }
    }
}

/// The query string for the transactions page.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// Only show transactions with this category. Empty or missing shows all.
    pub category: Option<String>,
}

/// Route handler for the transactions page.
///
/// HTMX requests, sent when the category filter changes, only get the table.
pub async fn get_transactions_page(
    State(state): State<TransactionsState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let transactions = get_transactions_snapshot(&state.transactions)?;
    let filter = CategoryFilter::from_param(query.category.as_deref());
    let rows = filter_by_category(&transactions, &filter);

    if is_htmx_request {
        return Ok(transactions_table_view(&rows).into_response());
    }

    let categories = distinct_categories(&transactions);

    Ok(transactions_view(&categories, &filter, &rows).into_response())
}

fn transactions_view(
    categories: &[&str],
    filter: &CategoryFilter,
    rows: &[&Transaction],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let has_transactions = !categories.is_empty();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                h2 class="text-xl font-bold mb-4" { "Transactions" }

                @if has_transactions {
                    (category_filter_view(categories, filter))
                    (transactions_table_view(rows))
                } @else {
                    p
                    {
                        "No transactions yet, "
                        (link(endpoints::IMPORT_VIEW, "import a CSV file"))
                        " to get started."
                    }
                }
            }
        }
    };

    base("Transactions", &[], &content)
}

fn category_filter_view(categories: &[&str], filter: &CategoryFilter) -> Markup {
    let is_selected = |category: &str| matches!(filter, CategoryFilter::Category(selected) if selected == category);

    html! {
        form
            hx-get=(endpoints::TRANSACTIONS_VIEW)
            hx-trigger="change"
            hx-target="#transactions-table"
            hx-swap="outerHTML"
            hx-push-url="true"
            class="mb-4 max-w-xs"
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select id="category" name="category" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[*filter == CategoryFilter::All] { "All" }

                @for category in categories {
                    option value=(category) selected[is_selected(*category)] { (category) }
                }
            }
        }
    }
}

fn transactions_table_view(rows: &[&Transaction]) -> Markup {
    html! {
        div id="transactions-table" class="relative overflow-x-auto shadow-md sm:rounded-lg"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                    }
                }

                tbody
                {
                    @for transaction in rows {
                        (transaction_row_view(transaction))
                    }

                    @if rows.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="4" class={ (TABLE_CELL_STYLE) " text-center" }
                            {
                                "No transactions match this category."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "text-green-700 dark:text-green-300",
        TransactionKind::Expense => "text-red-700 dark:text-red-300",
        TransactionKind::Unclassified => "text-gray-700 dark:text-gray-300",
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let (category, tooltip) = format_category(transaction.category());

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date()) }
            td class=(TABLE_CELL_STYLE) { (transaction.kind_label()) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) title=[tooltip] { (category) }
            }
            td class={ "px-6 py-4 text-right " (amount_class(transaction.kind())) }
            {
                (format_currency(transaction.amount()))
            }
        }
    }
}

fn format_category(category: &str) -> (String, Option<&str>) {
    let category_length = category.graphemes(true).count();

    if category_length <= MAX_CATEGORY_GRAPHEMES {
        (category.to_owned(), None)
    } else {
        let truncated: String = category
            .graphemes(true)
            .take(MAX_CATEGORY_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(category))
    }
}
