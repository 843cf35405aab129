//! Import result handling for generating appropriate alert messages.

use std::{sync::OnceLock, time::Duration};

use numfmt::{Formatter, Precision};

use crate::alert::Alert;

use super::{ImportError, ImportReport};

/// Creates a success alert describing how many rows were imported and skipped.
pub fn import_success(report: &ImportReport, duration: Duration) -> Alert {
    let imported = format_count(report.rows_imported);
    let skipped = format_count(report.rows_skipped());
    let duration_ms = format_count(duration.as_millis() as usize);

    let mut details = if report.rows_skipped() == 0 {
        format!("Imported {imported} transactions in {duration_ms}ms.")
    } else {
        format!(
            "Imported {imported} transactions and skipped {skipped} incomplete rows in {duration_ms}ms."
        )
    };

    if report.defaulted_amounts > 0 {
        details.push_str(&format!(
            " {} amounts could not be read and were set to zero.",
            format_count(report.defaulted_amounts)
        ));
    }

    tracing::info!(
        "Import completed in {duration_ms}ms: {imported} transactions imported, {skipped} rows skipped, {} amounts defaulted",
        report.defaulted_amounts
    );

    Alert::Success {
        message: "Import completed successfully!".to_owned(),
        details,
    }
}

/// Creates an error alert explaining why the CSV file could not be imported.
pub fn import_failure(error: &ImportError) -> Alert {
    let details = match error {
        ImportError::EmptyInput => {
            "The file needs a header row followed by at least one transaction.".to_owned()
        }
        ImportError::MissingColumns { missing } => format!(
            "Could not find the {} column(s). Check that the file has the columns \
            Fecha, Tipo, Categoría and Cantidad (or Date, Type, Category and Amount).",
            missing.join(", ")
        ),
    };

    Alert::Error {
        message: "Failed to parse CSV".to_owned(),
        details,
    }
}

fn format_count(count: usize) -> String {
    match get_thousands_separator_formatter() {
        Some(formatter) => formatter.fmt_string(count),
        None => count.to_string(),
    }
}

fn get_thousands_separator_formatter() -> Option<&'static Formatter> {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    FORMATTER
        .get_or_init(|| {
            Formatter::new()
                .separator(',')
                .inspect_err(|error| tracing::error!("could not create count formatter: {error}"))
                .ok()
                .map(|formatter| formatter.precision(Precision::Decimals(0)))
        })
        .as_ref()
}
