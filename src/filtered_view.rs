//! Loads the transactions for the filters of a page or fragment request.
//!
//! Each request gets its own [FilterStore] over a [ResponseHistory]. Full page
//! requests initialise the store from the request URL. Fragment requests made
//! by the filter form initialise it from the browser's current URL (the
//! `HX-Current-URL` header) and then dispatch the [FilterEvent] for the
//! submitted controls.

use axum::http::HeaderMap;
use axum_htmx::{HX_CURRENT_URL, HX_HISTORY_RESTORE_REQUEST, HX_TRIGGER_NAME};
use reqwest::Url;
use time::Date;

use crate::{
    Error,
    backend::{FetchResult, TransactionSource},
    filter::{FilterEvent, FilterState, FilterStore, HistoryUpdate, ResponseHistory, StoreOptions},
    refresh::LatestFetch,
};

/// The query string of the page the browser is showing, if htmx sent it.
pub fn current_url_query(headers: &HeaderMap) -> Option<String> {
    let current_url = headers.get(HX_CURRENT_URL)?.to_str().ok()?;
    let url = Url::parse(current_url).ok()?;

    Some(url.query().unwrap_or_default().to_owned())
}

/// The name of the control that triggered an htmx request.
pub fn trigger_name(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(HX_TRIGGER_NAME)
        .and_then(|name| name.to_str().ok())
}

/// Whether htmx is restoring a history entry after a back or forward navigation.
pub fn is_history_restore(headers: &HeaderMap) -> bool {
    headers
        .get(HX_HISTORY_RESTORE_REQUEST)
        .is_some_and(|value| value == "true")
}

/// Create and initialise a store for a request whose location carries `query`.
pub fn open_store(query: &str, today: Date, options: StoreOptions) -> FilterStore<ResponseHistory> {
    let mut store = FilterStore::new(ResponseHistory::new(query), today);
    store.initialize(options);
    store
}

/// Create a store for an htmx history restore of a location carrying `query`.
///
/// The store is restored from the location as after a back or forward
/// navigation, so the entry is replaced rather than a new one pushed.
pub fn open_store_for_restore(
    query: &str,
    today: Date,
    options: StoreOptions,
) -> FilterStore<ResponseHistory> {
    let mut store = open_store(query, today, options);
    store.restore_from_location();
    store
}

/// Create a store from the browser's location and apply the submitted controls.
///
/// `location` is the query string of the page being shown and `submission`
/// the query string of the filter form.
pub fn open_store_for_submission(
    location: &str,
    submission: &str,
    trigger_name: Option<&str>,
    today: Date,
    options: StoreOptions,
) -> FilterStore<ResponseHistory> {
    let mut store = open_store(location, today, options);
    store.dispatch(FilterEvent::from_submission(trigger_name, submission));
    store
}

/// The filters and transactions to render for a request.
#[derive(Debug)]
pub struct FilteredView {
    /// The filters the transactions were fetched for.
    pub filters: FilterState,
    /// The query string sent to the backend.
    pub query: String,
    /// What the backend returned.
    pub result: FetchResult,
    /// The last history update made by the store.
    pub history_update: Option<HistoryUpdate>,
}

/// Fetch the transactions for the current state of `store`, then dispose it.
///
/// # Errors
/// Returns [Error::StoreDisposed] if `store` was disposed before the fetch finished.
pub async fn fetch_view<S>(
    mut store: FilterStore<ResponseHistory>,
    source: S,
) -> Result<FilteredView, Error>
where
    S: TransactionSource + Clone + Send + Sync + 'static,
{
    let refresher = LatestFetch::spawn(store.subscribe()?, source);
    let outcome = refresher
        .wait_for(store.revision())
        .await
        .ok_or(Error::StoreDisposed)?;
    store.dispose();

    Ok(FilteredView {
        filters: store.get_values(),
        query: outcome.query,
        result: outcome.result,
        history_update: store.history().update().cloned(),
    })
}
