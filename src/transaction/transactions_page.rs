//! Route handlers for the transactions page and the fragment requested by its filter form.
//!
//! Unlike the dashboard, the transactions page does not write its filters to
//! the address bar. The URL is only read when the page is first loaded or a
//! column header is clicked, and carries the table sort next to the filters.

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode, header::COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    app_state::ViewState,
    filter::{StoreOptions, rewrites_controls},
    filtered_view::{
        current_url_query, fetch_view, open_store, open_store_for_submission, trigger_name,
    },
    timezone::get_local_now,
};

use super::{
    sort::TableSort,
    view::{transactions_content, transactions_results, transactions_view},
};

const STORE_OPTIONS: StoreOptions = StoreOptions { sync_url: false };

/// Display the transactions table for the filters and sort in the URL.
pub async fn get_transactions_page(
    State(state): State<ViewState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let query = query.unwrap_or_default();
    let now = match get_local_now(&state.local_timezone) {
        Ok(now) => now,
        Err(error) => return error.into_response(),
    };

    let sort = TableSort::from_query(&query);
    let store = open_store(&query, now.date(), STORE_OPTIONS);
    let backend = state.backend.for_session(headers.get(COOKIE));
    let view = match fetch_view(store, backend).await {
        Ok(view) => view,
        Err(error) => return error.into_response(),
    };

    if view.result.is_unauthenticated() {
        return Redirect::to(&state.log_in_url).into_response();
    }

    transactions_view(&view, now.offset(), sort).into_response()
}

/// Apply a submission of the filter form and return the updated table.
///
/// Date mode changes and resets get the controls and the table, any other
/// change gets the table only. The table keeps the sort of the page URL.
pub async fn get_transactions_content(
    State(state): State<ViewState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let query = query.unwrap_or_default();
    let now = match get_local_now(&state.local_timezone) {
        Ok(now) => now,
        Err(error) => return error.into_alert_response(),
    };

    let location = current_url_query(&headers).unwrap_or_else(|| query.clone());
    let sort = TableSort::from_query(&location);
    let trigger_name = trigger_name(&headers);
    let store =
        open_store_for_submission(&location, &query, trigger_name, now.date(), STORE_OPTIONS);

    let backend = state.backend.for_session(headers.get(COOKIE));
    let view = match fetch_view(store, backend).await {
        Ok(view) => view,
        Err(error) => return error.into_alert_response(),
    };

    if view.result.is_unauthenticated() {
        return (HxRedirect(state.log_in_url), StatusCode::OK).into_response();
    }

    if rewrites_controls(trigger_name) {
        transactions_content(&view, now.offset(), sort).into_response()
    } else {
        transactions_results(&view, now.offset(), sort).into_response()
    }
}
