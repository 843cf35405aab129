//! Importing transactions from CSV files.
//!
//! Covers the upload page, header resolution, row parsing and the import
//! endpoint that swaps the parsed transactions into the app state.

mod alert;
mod csv;
mod header;
mod import_page;
mod import_transactions;

pub(crate) use alert::import_failure;
pub use csv::{ImportReport, parse_csv};
pub use import_page::get_import_page;
pub use import_transactions::import_transactions;

/// Errors that abort a CSV import.
///
/// Problems with single rows never abort an import, they are counted in
/// [ImportReport] instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImportError {
    /// The file has a header row but no data rows, or is empty.
    #[error("the CSV file contains no data rows")]
    EmptyInput,

    /// One or more of the required columns could not be found in the header.
    #[error(
        "missing columns {missing:?}, the CSV file needs the columns \
        Fecha, Tipo, Categoría and Cantidad (or Date, Type, Category and Amount)"
    )]
    MissingColumns {
        /// The logical names of the columns that were not found, e.g. "amount".
        missing: Vec<&'static str>,
    },
}
