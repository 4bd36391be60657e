//! Dashboard module
//!
//! Provides the overview page of a store: the selected month's totals, a
//! breakdown by cost center and the history of every month, with charts.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use aggregation::{
    OTHER_COST_CENTER_LABEL, StoreSummary, Summary, owned_in_month, store_summaries,
};
pub use handlers::{DashboardQuery, get_dashboard_page, store_overview};
