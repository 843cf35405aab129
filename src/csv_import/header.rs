//! Header normalization and column resolution for imported CSV files.

use unicode_normalization::UnicodeNormalization;

use super::ImportError;

/// Accepted header names for each column, after normalization.
pub const DATE_HEADERS: [&str; 2] = ["fecha", "date"];
pub const KIND_HEADERS: [&str; 3] = ["tipo", "type", "kind"];
pub const CATEGORY_HEADERS: [&str; 2] = ["categoria", "category"];
pub const AMOUNT_HEADERS: [&str; 4] = ["cantidad", "monto", "amount", "quantity"];

/// The names of the logical columns, used in error messages.
pub const DATE_COLUMN: &str = "date";
pub const KIND_COLUMN: &str = "type";
pub const CATEGORY_COLUMN: &str = "category";
pub const AMOUNT_COLUMN: &str = "amount";

/// Zero-based positions of the logical columns in a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub date: usize,
    pub kind: usize,
    pub category: usize,
    pub amount: usize,
}

/// Normalize a header cell for comparison.
///
/// Trims whitespace, strips double quotes, removes diacritics and lower-cases
/// the result, e.g. `" \"Categoría\" "` becomes `"categoria"`.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .replace('"', "")
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect::<String>()
        .to_lowercase()
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Find the logical columns in `headers`.
///
/// A column matches when its normalized text is exactly one of the accepted
/// names. Substrings do not match, so "Categoría (principal)" is rejected.
/// The first matching column wins.
///
/// # Errors
/// Returns [ImportError::MissingColumns] naming every column that could not
/// be found.
pub fn resolve_columns<'a>(
    headers: impl IntoIterator<Item = &'a str>,
) -> Result<ColumnIndex, ImportError> {
    let normalized: Vec<String> = headers.into_iter().map(normalize_header).collect();

    let find = |names: &[&str]| {
        normalized
            .iter()
            .position(|header| names.contains(&header.as_str()))
    };

    let date = find(&DATE_HEADERS);
    let kind = find(&KIND_HEADERS);
    let category = find(&CATEGORY_HEADERS);
    let amount = find(&AMOUNT_HEADERS);

    match (date, kind, category, amount) {
        (Some(date), Some(kind), Some(category), Some(amount)) => Ok(ColumnIndex {
            date,
            kind,
            category,
            amount,
        }),
        _ => {
            let missing = [
                (date, DATE_COLUMN),
                (kind, KIND_COLUMN),
                (category, CATEGORY_COLUMN),
                (amount, AMOUNT_COLUMN),
            ]
            .into_iter()
            .filter_map(|(index, name)| index.is_none().then_some(name))
            .collect();

            tracing::error!("Could not resolve CSV columns, headers detected: {normalized:?}");

            Err(ImportError::MissingColumns { missing })
        }
    }
}
