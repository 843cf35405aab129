use std::{
    sync::{Arc, Mutex, RwLock},
    time::Instant,
};

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    app_state::replace_transactions,
    csv_import::{
        alert::import_success,
        parse_csv,
    },
    endpoints,
    storage::save_transactions,
    transaction::TransactionSet,
};

/// The name of the form field that holds the uploaded file.
const FILE_FIELD_NAME: &str = "file";

/// Content types browsers send for CSV files.
const CSV_CONTENT_TYPES: [&str; 3] = ["text/csv", "application/vnd.ms-excel", "text/plain"];

/// The state needed for importing transactions.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for persisting the imported transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The transactions shown by the dashboard and transactions pages.
    pub transactions: Arc<RwLock<TransactionSet>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            transactions: state.transactions.clone(),
        }
    }
}

/// Route handler for importing transactions from a CSV file.
///
/// A successful import replaces the whole transaction set, saves it to the
/// storage slot and redirects the client to the dashboard. On any failure the
/// current transactions are left untouched.
pub async fn import_transactions(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Result<Response, Response> {
    let start_time = Instant::now();
    let mut csv_data = None;

    loop {
        let field = multipart
            .next_field()
            .await
            .inspect_err(|error| tracing::error!("Could not read multipart form: {error}"))
            .map_err(|error| Error::MultipartError(error.body_text()).into_alert_response())?;

        let Some(field) = field else {
            break;
        };

        if field.name() != Some(FILE_FIELD_NAME) {
            tracing::debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        csv_data = Some(
            parse_multipart_field(field)
                .await
                .map_err(|error| error.into_alert_response())?,
        );
        break;
    }

    let Some(csv_data) = csv_data else {
        return Err((
            StatusCode::BAD_REQUEST,
            Alert::ErrorSimple {
                message: "Choose a CSV file to import.".to_owned(),
            }
            .into_html(),
        )
            .into_response());
    };

    let parse_result = parse_csv(&csv_data)
        .inspect_err(|error| tracing::debug!("Failed to parse CSV: {error}"))
        .map_err(|error| Error::from(error).into_alert_response())?;

    save_and_replace(&state, TransactionSet::new(parse_result.transactions)).map_err(
        |error| match error {
            Error::SqlError(_) | Error::JsonSerializationError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Import failed".to_owned(),
                    details: "The transactions could not be saved, please try again later."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            error => error.into_alert_response(),
        },
    )?;

    let alert = import_success(&parse_result.report, start_time.elapsed());

    Ok((
        StatusCode::CREATED,
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        alert.into_html(),
    )
        .into_response())
}

/// Save `transactions` to the storage slot and make them the current set.
///
/// The database lock is held until the swap is done so that the slot and the
/// in-memory set always end up holding the same import.
fn save_and_replace(state: &ImportState, transactions: TransactionSet) -> Result<(), Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    save_transactions(&transactions, &connection)
        .inspect_err(|error| tracing::error!("Failed to save imported transactions: {error}"))?;

    replace_transactions(&state.transactions, transactions)
}

async fn parse_multipart_field(field: Field<'_>) -> Result<String, Error> {
    let file_name = field.file_name().map(str::to_owned);

    if !is_csv(field.content_type(), file_name.as_deref()) {
        tracing::debug!(
            "Rejected file {file_name:?} with content type {:?}",
            field.content_type()
        );
        return Err(Error::NotCsv);
    }

    let data = field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    tracing::debug!("Received file {:?} that is {} bytes", file_name, data.len());

    Ok(data)
}

fn is_csv(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let has_csv_content_type = content_type.is_some_and(|content_type| {
        let mime = content_type.split(';').next().unwrap_or_default().trim();
        CSV_CONTENT_TYPES
            .iter()
            .any(|csv_type| mime.eq_ignore_ascii_case(csv_type))
    });

    let has_csv_extension = file_name.is_some_and(|name| {
        name.rsplit_once('.')
            .is_some_and(|(_, extension)| extension.eq_ignore_ascii_case("csv"))
    });

    has_csv_content_type || has_csv_extension
}
