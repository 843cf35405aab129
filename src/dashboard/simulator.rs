//! The what-if simulator that projects income and expenses under percentage changes.
//!
//! Slider positions only live in the page, nothing here is persisted.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    dashboard::{
        aggregation::{Summary, calculate_summary},
        handlers::DashboardState,
    },
    endpoints,
    html::{FORM_LABEL_STYLE, FORM_RANGE_INPUT_STYLE, format_currency},
};

const SLIDER_MAX: u8 = 100;
const SLIDER_STEP: u8 = 5;

/// The slider positions, both in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SimulatorInput {
    #[serde(default)]
    pub income_growth: f64,
    #[serde(default)]
    pub expense_reduction: f64,
}

impl SimulatorInput {
    /// Keeps both percentages within the slider range, treating non-finite
    /// values as zero.
    fn sanitized(self) -> Self {
        let to_slider_range = |value: f64| {
            if value.is_finite() {
                value.clamp(0.0, f64::from(SLIDER_MAX))
            } else {
                0.0
            }
        };

        Self {
            income_growth: to_slider_range(self.income_growth),
            expense_reduction: to_slider_range(self.expense_reduction),
        }
    }
}

/// Hypothetical totals after applying a [SimulatorInput].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub income: f64,
    pub expenses: f64,
    pub profit: f64,
}

/// Projects `summary` forward with income grown and expenses cut by the
/// percentages in `input`.
pub fn project(summary: &Summary, input: SimulatorInput) -> Projection {
    let input = input.sanitized();
    let income = summary.income * (1.0 + input.income_growth / 100.0);
    let expenses = summary.expenses * (1.0 - input.expense_reduction / 100.0);

    Projection {
        income,
        expenses,
        profit: income - expenses,
    }
}

/// Formats a slider position such as "+10%" or "-12.5%".
///
/// The value is shown in full so the label matches the projection.
fn format_adjustment(sign: char, percentage: f64) -> String {
    if percentage == 0.0 {
        "0%".to_owned()
    } else {
        format!("{sign}{percentage}%")
    }
}

/// Renders the simulator panel with the sliders at zero.
pub(super) fn simulator_view(summary: &Summary) -> Markup {
    let input = SimulatorInput::default();

    html! {
        section id="simulator" class="w-full mx-auto mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "What-if simulator" }

            div class="bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700 rounded-lg p-4 shadow-md"
            {
                form
                    hx-get=(endpoints::SIMULATOR)
                    hx-trigger="input changed delay:100ms"
                    hx-target="#simulator-results"
                    hx-swap="outerHTML"
                    class="grid grid-cols-1 md:grid-cols-2 gap-6 mb-6"
                {
                    div
                    {
                        label for="income_growth" class=(FORM_LABEL_STYLE) { "Income growth" }
                        input
                            id="income_growth"
                            name="income_growth"
                            type="range"
                            min="0"
                            max=(SLIDER_MAX)
                            step=(SLIDER_STEP)
                            value="0"
                            class=(FORM_RANGE_INPUT_STYLE);
                    }

                    div
                    {
                        label for="expense_reduction" class=(FORM_LABEL_STYLE) { "Expense reduction" }
                        input
                            id="expense_reduction"
                            name="expense_reduction"
                            type="range"
                            min="0"
                            max=(SLIDER_MAX)
                            step=(SLIDER_STEP)
                            value="0"
                            class=(FORM_RANGE_INPUT_STYLE);
                    }
                }

                (simulator_results_view(input, &project(summary, input)))
            }
        }
    }
}

fn simulator_results_view(input: SimulatorInput, projection: &Projection) -> Markup {
    let profit_style = if projection.profit < 0.0 {
        "text-2xl font-bold text-red-600 dark:text-red-400"
    } else {
        "text-2xl font-bold text-green-600 dark:text-green-400"
    };

    html! {
        div id="simulator-results" class="grid grid-cols-1 md:grid-cols-3 gap-4"
        {
            div
            {
                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Projected income "
                    span data-adjustment="income" { (format_adjustment('+', input.income_growth)) }
                }
                p class="text-2xl font-bold" data-projection="income" { (format_currency(projection.income)) }
            }

            div
            {
                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Projected expenses "
                    span data-adjustment="expenses" { (format_adjustment('-', input.expense_reduction)) }
                }
                p class="text-2xl font-bold" data-projection="expenses" { (format_currency(projection.expenses)) }
            }

            div
            {
                p class="text-sm text-gray-600 dark:text-gray-400" { "Projected profit" }
                p class=(profit_style) data-projection="profit" { (format_currency(projection.profit)) }
            }
        }
    }
}

/// Route handler that recomputes the simulator results for the slider positions.
pub async fn get_simulator(
    State(state): State<DashboardState>,
    Query(input): Query<SimulatorInput>,
) -> Result<Response, Error> {
    let transactions = state.transactions()?;
    let summary = calculate_summary(&transactions);
    let input = input.sanitized();
    let projection = project(&summary, input);

    tracing::debug!("Simulator {input:?} gives {projection:?}");

    Ok(simulator_results_view(input, &projection).into_response())
}

#[cfg(test)]
mod simulator_tests {
    use std::sync::{Arc, RwLock};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        dashboard::{aggregation::Summary, handlers::DashboardState},
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_fragment,
        },
        transaction::{Transaction, TransactionSet},
    };

    use super::{
        Projection, SimulatorInput, format_adjustment, get_simulator, project, simulator_view,
    };

    fn summary(income: f64, expenses: f64) -> Summary {
        Summary {
            income,
            expenses,
            profit: income - expenses,
            ..Default::default()
        }
    }

    #[test]
    fn projects_growth_and_reduction() {
        let projection = project(
            &summary(1000.0, 500.0),
            SimulatorInput {
                income_growth: 10.0,
                expense_reduction: 20.0,
            },
        );

        assert_eq!(
            projection,
            Projection {
                income: 1100.0,
                expenses: 400.0,
                profit: 700.0
            }
        );
    }

    #[test]
    fn zero_adjustments_keep_totals() {
        let projection = project(&summary(1000.0, 500.0), SimulatorInput::default());

        assert_eq!(projection.income, 1000.0);
        assert_eq!(projection.expenses, 500.0);
        assert_eq!(projection.profit, 500.0);
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let projection = project(
            &summary(1000.0, 500.0),
            SimulatorInput {
                income_growth: f64::NAN,
                expense_reduction: f64::INFINITY,
            },
        );

        assert_eq!(projection.profit, 500.0);
    }

    #[test]
    fn formats_adjustment_labels() {
        assert_eq!(format_adjustment('+', 10.0), "+10%");
        assert_eq!(format_adjustment('-', 20.0), "-20%");
        assert_eq!(format_adjustment('+', 0.0), "0%");
        assert_eq!(format_adjustment('+', 12.5), "+12.5%");
    }

    #[test]
    fn out_of_range_input_is_clamped_to_slider_range() {
        let input = SimulatorInput {
            income_growth: -10.0,
            expense_reduction: 150.0,
        }
        .sanitized();

        assert_eq!(
            input,
            SimulatorInput {
                income_growth: 0.0,
                expense_reduction: 100.0,
            }
        );
        assert_eq!(format_adjustment('+', input.income_growth), "0%");

        let projection = project(&summary(1000.0, 500.0), input);
        assert_eq!(projection.income, 1000.0);
        assert_eq!(projection.expenses, 0.0);
        assert_eq!(projection.profit, 1000.0);
    }

    #[test]
    fn simulator_form_has_sliders() {
        let html = scraper::Html::parse_fragment(&simulator_view(&summary(100.0, 50.0)).into_string());
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::SIMULATOR, "hx-get");
        assert_form_input(&form, "income_growth", "range");
        assert_form_input(&form, "expense_reduction", "range");

        let results = html
            .select(&Selector::parse("#simulator-results [data-projection=profit]").unwrap())
            .next()
            .expect("No projected profit found");
        assert_eq!(results.text().collect::<String>().trim(), "€50.00");
    }

    #[test]
    fn decodes_query_with_missing_fields() {
        let input: SimulatorInput = serde_html_form::from_str("income_growth=15").unwrap();

        assert_eq!(
            input,
            SimulatorInput {
                income_growth: 15.0,
                expense_reduction: 0.0
            }
        );
    }

    #[tokio::test]
    async fn simulator_endpoint_renders_projection() {
        let state = DashboardState {
            transactions: Arc::new(RwLock::new(TransactionSet::new(vec![
                Transaction::new("2024-01-15", "Ingreso", "Salario", 1000.0),
                Transaction::new("2024-01-20", "Gasto", "Ocio", 500.0),
            ]))),
        };

        let response = get_simulator(
            State(state),
            Query(SimulatorInput {
                income_growth: 10.0,
                expense_reduction: 20.0,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let text_of = |selector: &str| {
            html.select(&Selector::parse(selector).unwrap())
                .next()
                .map(|element| element.text().collect::<String>().trim().to_owned())
                .unwrap_or_else(|| panic!("No element for {selector}"))
        };

        assert_eq!(text_of("[data-projection=income]"), "€1,100.00");
        assert_eq!(text_of("[data-projection=expenses]"), "€400.00");
        assert_eq!(text_of("[data-projection=profit]"), "€700.00");
        assert_eq!(text_of("[data-adjustment=income]"), "+10%");
        assert_eq!(text_of("[data-adjustment=expenses]"), "-20%");
    }
}
