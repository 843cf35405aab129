//! Dashboard module
//!
//! Provides an overview page showing the summary metrics, insights, charts
//! and the what-if simulator for the imported transactions.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod insights;
mod simulator;

pub use handlers::get_dashboard_page;
pub use simulator::get_simulator;
