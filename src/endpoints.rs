//! The endpoint URIs served by the dashboard.
//!
//! For endpoints that take parameters, e.g., '/transactions/{transaction_id}/{field}',
//! use [format_endpoint] once per parameter.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page with the spending charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The fragment with the filter controls and charts, requested on filter changes.
pub const DASHBOARD_CONTENT: &str = "/dashboard/content";
/// The page with the table of transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The fragment with the filter controls and table, requested on filter changes.
pub const TRANSACTIONS_CONTENT: &str = "/transactions/content";
/// The inline editor for one field of a transaction.
pub const EDIT_TRANSACTION_FIELD_VIEW: &str = "/transactions/{transaction_id}/{field}/edit";
/// The route that saves one field of a transaction.
pub const TRANSACTION_FIELD: &str = "/transactions/{transaction_id}/{field}";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the first parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}', '{transaction_id}'
/// is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: impl std::fmt::Display) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.char_indices() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}
