//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::{get_dashboard_content, get_dashboard_page},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        get_field_editor, get_transactions_content, get_transactions_page,
        update_transaction_field,
    },
};

/// Return a router with all the app's routes.
///
/// Authentication is left to the backend: the browser's cookies are forwarded
/// on every backend request and a rejected session is redirected to the
/// log-in URL in [AppState].
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DASHBOARD_CONTENT, get(get_dashboard_content))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::TRANSACTIONS_CONTENT,
            get(get_transactions_content),
        )
        .route(
            endpoints::EDIT_TRANSACTION_FIELD_VIEW,
            get(get_field_editor),
        )
        .route(
            endpoints::TRANSACTION_FIELD,
            post(update_transaction_field),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
