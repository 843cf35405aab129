//! Functions to parse transactions from CSV text.
//!
//! The expected format is a header row followed by comma separated data rows.
//! Fields are never quoted, so a comma always starts a new field.

use csv::{ReaderBuilder, StringRecord};

use crate::transaction::Transaction;

use super::{
    ImportError,
    header::{ColumnIndex, resolve_columns},
};

/// A non-fatal problem with a single data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDefect {
    /// The row had fewer fields than the header and was dropped.
    ShortRow,
    /// The date, type or category was empty and the row was dropped.
    MissingField,
    /// The amount could not be parsed and was set to zero. The row was kept.
    DefaultedAmount,
}

/// Counts of what happened to the data rows of one CSV file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// The number of data rows read, not counting the header or blank lines.
    pub rows_read: usize,
    /// The number of rows that became transactions.
    pub rows_imported: usize,
    /// Rows dropped for having fewer fields than the header.
    pub short_rows: usize,
    /// Rows dropped for an empty date, type or category.
    pub incomplete_rows: usize,
    /// Rows kept with their amount set to zero.
    pub defaulted_amounts: usize,
}

impl ImportReport {
    /// The number of data rows that did not become transactions.
    pub fn rows_skipped(&self) -> usize {
        self.short_rows + self.incomplete_rows
    }

    fn record(&mut self, defect: RowDefect) {
        match defect {
            RowDefect::ShortRow => self.short_rows += 1,
            RowDefect::MissingField => self.incomplete_rows += 1,
            RowDefect::DefaultedAmount => self.defaulted_amounts += 1,
        }
    }
}

/// The transactions found after parsing a CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseCsvResult {
    /// The transactions in row order, may be empty.
    pub transactions: Vec<Transaction>,
    /// What happened to each data row.
    pub report: ImportReport,
}

/// Parses transactions from CSV text.
///
/// Expects `text` to contain a header row naming the date, type, category and
/// amount columns (Spanish or English names) followed by data rows. Lines may
/// end with `\n` or `\r\n`.
///
/// Defective rows are skipped or repaired and counted in the returned report.
///
/// # Errors
/// Returns [ImportError::EmptyInput] if there is no data row and
/// [ImportError::MissingColumns] if a required column cannot be found.
pub fn parse_csv(text: &str) -> Result<ParseCsvResult, ImportError> {
    let text = text.trim_start_matches('\u{feff}').trim();

    if text.lines().take(2).count() < 2 {
        return Err(ImportError::EmptyInput);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let headers = match records.next() {
        Some(Ok(headers)) => headers,
        Some(Err(error)) => {
            tracing::error!("Could not read CSV header: {error}");
            return Err(ImportError::EmptyInput);
        }
        None => return Err(ImportError::EmptyInput),
    };

    let columns = resolve_columns(headers.iter())?;
    let header_length = headers.len();

    let mut transactions = Vec::new();
    let mut report = ImportReport::default();

    for (row_number, record) in records.enumerate() {
        // Line numbers are one-based and the header is line 1.
        let line_number = row_number + 2;
        report.rows_read += 1;

        let record = match record {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!("Skipping unreadable CSV line {line_number}: {error}");
                report.record(RowDefect::ShortRow);
                continue;
            }
        };

        match parse_row(&record, header_length, columns) {
            Ok((transaction, defect)) => {
                if let Some(defect) = defect {
                    tracing::debug!("CSV line {line_number}: {defect:?}");
                    report.record(defect);
                }

                transactions.push(transaction);
            }
            Err(defect) => {
                tracing::debug!("Dropping CSV line {line_number}: {defect:?}");
                report.record(defect);
            }
        }
    }

    report.rows_imported = transactions.len();

    Ok(ParseCsvResult {
        transactions,
        report,
    })
}

/// Converts one data row into a transaction.
///
/// Returns the transaction along with any repair that was made, or the defect
/// that caused the row to be dropped.
fn parse_row(
    record: &StringRecord,
    header_length: usize,
    columns: ColumnIndex,
) -> Result<(Transaction, Option<RowDefect>), RowDefect> {
    if record.len() < header_length {
        return Err(RowDefect::ShortRow);
    }

    let field = |index: usize| clean_field(record.get(index).unwrap_or_default());

    let date = field(columns.date);
    let kind = field(columns.kind);
    let category = field(columns.category);

    if date.is_empty() || kind.is_empty() || category.is_empty() {
        return Err(RowDefect::MissingField);
    }

    let (amount, defect) = match parse_amount(&field(columns.amount)) {
        Some(amount) => (amount, None),
        None => (0.0, Some(RowDefect::DefaultedAmount)),
    };

    Ok((Transaction::new(&date, &kind, &category, amount), defect))
}

/// Strips double quotes and surrounding whitespace from a field.
fn clean_field(field: &str) -> String {
    field.replace('"', "").trim().to_owned()
}

/// Parses a decimal amount that may use either `.` or `,` as the decimal separator.
///
/// Only the first comma is treated as a decimal separator and the longest
/// numeric prefix is used, so `"12,5 EUR"` parses as `12.5`.
/// Returns `None` if there is no numeric prefix or the value is not finite.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim().replacen(',', ".", 1);
    let prefix = numeric_prefix(&text);

    prefix
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

/// Returns the longest prefix of `text` that looks like a decimal number,
/// e.g. `-1.5e3` from `"-1.5e3abc"`.
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let integer_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digit_count = end - integer_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        digit_count += fraction_end - fraction_start;

        // A trailing dot is fine as long as there are digits somewhere.
        if digit_count > 0 {
            end = fraction_end;
        }
    }

    if digit_count == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while bytes.get(exponent_end).is_some_and(u8::is_ascii_digit) {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }

    &text[..end]
}
