use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    app_state::get_transactions_snapshot,
    csv_import::{
        header::{AMOUNT_HEADERS, CATEGORY_HEADERS, DATE_HEADERS, KIND_HEADERS},
        import_transactions::ImportState,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
};

/// The columns a CSV file needs, with the header names accepted for each.
const ACCEPTED_COLUMNS: [(&str, &[&str]); 4] = [
    ("Date", &DATE_HEADERS),
    ("Type", &KIND_HEADERS),
    ("Category", &CATEGORY_HEADERS),
    ("Amount", &AMOUNT_HEADERS),
];

/// Route handler for the import CSV page.
pub async fn get_import_page(State(state): State<ImportState>) -> Result<Response, Error> {
    let current_count = get_transactions_snapshot(&state.transactions)?.len();

    let content = html! {
        (NavBar::new(endpoints::IMPORT_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="relative w-full max-w-md space-y-6"
            {
                (upload_form())
                (replace_warning(current_count))
                (accepted_columns_table())
            }
        }
    };

    Ok(base("Import Transactions", &[], &content).into_response())
}

fn upload_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::IMPORT)
            enctype="multipart/form-data"
            hx-disabled-elt="#file, #submit-button"
            hx-indicator="#indicator"
            hx-swap="none"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            label for="file" class=(FORM_LABEL_STYLE) { "CSV file" }
            input
                id="file"
                type="file"
                name="file"
                accept=".csv,text/csv"
                required
                class=(FORM_TEXT_INPUT_STYLE);

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                " Import"
            }
        }
    }
}

fn replace_warning(current_count: usize) -> Markup {
    html! {
        p id="replace-warning" class="text-sm text-gray-600 dark:text-gray-400"
        {
            @if current_count == 0 {
                "No transactions are loaded yet."
            } @else {
                "Importing replaces the " (current_count) " transactions currently loaded."
            }
        }
    }
}

fn accepted_columns_table() -> Markup {
    html! {
        table id="accepted-columns" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Column" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Accepted headers" }
                }
            }

            tbody
            {
                @for (column, headers) in ACCEPTED_COLUMNS {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (column) }
                        td class=(TABLE_CELL_STYLE) { (headers.join(", ")) }
                    }
                }
            }
        }
    }
}
