//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page with the summary metrics, charts and simulator.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying and filtering the imported transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for importing transactions from a CSV file.
pub const IMPORT_VIEW: &str = "/import";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to upload a CSV file for importing transactions.
pub const IMPORT: &str = "/api/import";
/// The route that recomputes the what-if simulator.
pub const SIMULATOR: &str = "/api/simulator";
