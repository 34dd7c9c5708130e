//! Dashboard module
//!
//! Provides an overview page showing spending per category for the active
//! filters, as a bar chart, a donut chart and a legend with the total.

mod aggregation;
mod charts;
mod handlers;
mod legend;

pub use handlers::{get_dashboard_content, get_dashboard_page};
