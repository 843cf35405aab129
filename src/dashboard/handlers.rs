//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, RwLock};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    app_state::get_transactions_snapshot,
    dashboard::{
        aggregation::{
            Summary, calculate_category_breakdown, calculate_monthly_buckets, calculate_summary,
        },
        cards::{insight_cards_view, metric_cards_view},
        charts::{
            DashboardChart, charts_script, charts_view, expense_categories_chart, monthly_chart,
        },
        insights::{Insight, generate_insights},
        simulator::simulator_view,
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    transaction::{TransactionKind, TransactionSet},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The transactions to summarise.
    pub transactions: Arc<RwLock<TransactionSet>>,
}

impl DashboardState {
    pub(super) fn transactions(&self) -> Result<TransactionSet, Error> {
        get_transactions_snapshot(&self.transactions)
    }
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    summary: Summary,
    insights: Vec<Insight>,
    charts: [DashboardChart; 2],
}

/// Display a page with an overview of the imported transactions.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let transactions = state.transactions()?;
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let data = build_dashboard_data(&transactions);

    Ok(dashboard_view(nav_bar, &data).into_response())
}

fn build_dashboard_data(transactions: &TransactionSet) -> DashboardData {
    let summary = calculate_summary(transactions);
    let insights = generate_insights(transactions);
    let buckets = calculate_monthly_buckets(transactions);
    let expense_categories = calculate_category_breakdown(transactions, TransactionKind::Expense);

    let charts = [
        DashboardChart {
            id: "monthly-chart",
            options: monthly_chart(&buckets).to_string(),
        },
        DashboardChart {
            id: "expense-categories-chart",
            options: expense_categories_chart(&expense_categories).to_string(),
        },
    ];

    DashboardData {
        summary,
        insights,
        charts,
    }
}

fn dashboard_view(nav_bar: NavBar, data: &DashboardData) -> Markup {
    let nav_bar = nav_bar.into_html();
    let scripts = [
        HeadElement::ScriptLink("/static/echarts-6.0.0.min.js".to_owned()),
        charts_script(&data.charts),
    ];

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                (metric_cards_view(&data.summary))
                (insight_cards_view(&data.insights))
                (charts_view(&data.charts))
                (simulator_view(&data.summary))
            }
        }
    };

    base("Dashboard", &scripts, &content)
}

/// Renders the dashboard page when no transaction data exists.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let import_link = link(endpoints::IMPORT_VIEW, "import a CSV file");

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            section id="no-data" class="max-w-md text-center"
            {
                h2 class="text-xl font-bold mb-4" { "Not enough data" }
                p
                {
                    "There are no transactions to summarise yet. "
                    (import_link) " to see your income, expenses and profit."
                }
            }
        }
    };

    base("Dashboard", &[], &content)
}
