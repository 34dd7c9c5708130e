//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page and the fragment requested by the filter form
//! - HTML view functions for rendering the dashboard UI

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode, header::COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::{HxPushUrl, HxRedirect, HxReplaceUrl};
use maud::{Markup, html};

use crate::{
    app_state::ViewState,
    dashboard::{
        aggregation::aggregate_by_category,
        charts::{category_charts, charts_script, charts_view},
        legend::{legend_view, total_view},
    },
    endpoints,
    filter::{FilterTargets, History, StoreOptions, filter_controls, rewrites_controls, url_for},
    filtered_view::{
        FilteredView, current_url_query, fetch_view, is_history_restore, open_store,
        open_store_for_restore, open_store_for_submission, trigger_name,
    },
    html::{ECHARTS_SCRIPT, HeadElement, PAGE_CONTAINER_STYLE, base, fetch_error_banner},
    navigation::NavBar,
    timezone::get_local_date,
};

/// The ID of the element holding the filter controls and the results.
const DASHBOARD_CONTENT_ID: &str = "dashboard-content";

/// The ID of the element replaced on every filter change.
const DASHBOARD_RESULTS_ID: &str = "dashboard-results";

const STORE_OPTIONS: StoreOptions = StoreOptions { sync_url: true };

/// Display the dashboard for the filters in the URL.
///
/// A URL without filters, or with filters in a non-canonical form, is
/// redirected to the canonical URL. When htmx restores a history entry the
/// filters are restored from the URL, the page is rendered straight away and
/// the address bar is corrected with `HX-Replace-Url` instead.
pub async fn get_dashboard_page(
    State(state): State<ViewState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let query = query.unwrap_or_default();
    let today = match get_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    let is_restore = is_history_restore(&headers);
    let store = if is_restore {
        open_store_for_restore(&query, today, STORE_OPTIONS)
    } else {
        open_store(&query, today, STORE_OPTIONS)
    };
    let canonical_url = store
        .history()
        .changed_location(&query)
        .then(|| url_for(endpoints::DASHBOARD_VIEW, store.history().query()));

    if let (Some(canonical_url), false) = (&canonical_url, is_restore) {
        tracing::debug!("redirecting to canonical dashboard URL {canonical_url}");
        return Redirect::to(canonical_url).into_response();
    }

    let backend = state.backend.for_session(headers.get(COOKIE));
    let view = match fetch_view(store, backend).await {
        Ok(view) => view,
        Err(error) => return error.into_response(),
    };

    if view.result.is_unauthenticated() {
        return Redirect::to(&state.log_in_url).into_response();
    }

    let page = dashboard_view(NavBar::new(endpoints::DASHBOARD_VIEW), &view);

    match canonical_url {
        Some(canonical_url) => (HxReplaceUrl(canonical_url), page).into_response(),
        None => page.into_response(),
    }
}

/// Apply a submission of the filter form and return the updated dashboard.
///
/// Date mode changes and resets get the controls and the results, any other
/// change gets the results only. The new filters are pushed onto the browser
/// history with `HX-Push-Url`.
pub async fn get_dashboard_content(
    State(state): State<ViewState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let query = query.unwrap_or_default();
    let today = match get_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let location = current_url_query(&headers).unwrap_or_else(|| query.clone());
    let trigger_name = trigger_name(&headers);
    let store = open_store_for_submission(&location, &query, trigger_name, today, STORE_OPTIONS);
    let pushed_url = store
        .history()
        .changed_location(&location)
        .then(|| url_for(endpoints::DASHBOARD_VIEW, store.history().query()));

    let backend = state.backend.for_session(headers.get(COOKIE));
    let view = match fetch_view(store, backend).await {
        Ok(view) => view,
        Err(error) => return error.into_alert_response(),
    };

    if view.result.is_unauthenticated() {
        return (HxRedirect(state.log_in_url), StatusCode::OK).into_response();
    }

    let content = if rewrites_controls(trigger_name) {
        dashboard_content(&view)
    } else {
        dashboard_results(&view)
    };

    match pushed_url {
        Some(pushed_url) => (HxPushUrl(pushed_url), content).into_response(),
        None => content.into_response(),
    }
}

/// Renders the full dashboard page.
fn dashboard_view(nav_bar: NavBar, view: &FilteredView) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="self-start text-2xl font-bold mb-4" { "Spending" }

            (dashboard_content(view))
        }
    );

    let scripts = [HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())];

    base("Dashboard", &scripts, &content)
}

/// Renders the filter controls and the results for `view`.
fn dashboard_content(view: &FilteredView) -> Markup {
    let results_target = format!("#{DASHBOARD_RESULTS_ID}");
    let content_target = format!("#{DASHBOARD_CONTENT_ID}");
    let targets = FilterTargets {
        endpoint: endpoints::DASHBOARD_CONTENT,
        results: &results_target,
        content: &content_target,
    };

    html!(
        div id=(DASHBOARD_CONTENT_ID) class="w-full"
        {
            (filter_controls(&view.filters, targets))
            (dashboard_results(view))
        }
    )
}

/// Renders the charts, legend and total for `view`.
///
/// This is the element the filter form replaces on every change.
fn dashboard_results(view: &FilteredView) -> Markup {
    let totals = aggregate_by_category(&view.result.transactions);
    let message = view.result.problem.and_then(|problem| problem.message());

    html!(
        div id=(DASHBOARD_RESULTS_ID) class="w-full"
        {
            @if let Some(message) = &message {
                (fetch_error_banner(message))
            } @else if totals.is_empty() {
                p class="text-center text-gray-600 dark:text-gray-400"
                {
                    "No transactions match these filters."
                }

                (total_view(totals.total))
            } @else {
                @let charts = category_charts(&totals);

                (charts_view(&charts))
                (legend_view(&totals))
                (charts_script(&charts))
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{RawQuery, State},
        http::{HeaderMap, HeaderValue, StatusCode, header::COOKIE},
    };
    use axum_htmx::{HX_CURRENT_URL, HX_HISTORY_RESTORE_REQUEST, HX_TRIGGER_NAME};
    use scraper::Selector;
    use serde_json::{Value, json};

    use crate::{
        app_state::ViewState,
        backend::BackendClient,
        dashboard::charts::{BAR_CHART_ID, DONUT_CHART_ID},
        test_utils::{
            FakeBackend, assert_hx_redirect, assert_status_ok, assert_valid_html, get_header,
            parse_html_document, parse_html_fragment,
        },
    };

    use super::{get_dashboard_content, get_dashboard_page};

    const CANONICAL_QUERY: &str = "dateMode=ym&year=2025&month=6";

    fn sample_transactions() -> Value {
        json!([
            {"id": 1, "date": "2025-06-02", "amount": 1000, "type": "debito", "category": "Comida"},
            {"id": 2, "date": "2025-06-03", "amount": 500, "type": "debito", "category": "comida"},
            {"id": 3, "date": "2025-06-04", "amount": 200, "type": "credito", "category": null},
        ])
    }

    async fn view_state(backend: &FakeBackend) -> ViewState {
        ViewState {
            backend: BackendClient::new(&backend.serve().await).unwrap(),
            local_timezone: "America/Santiago".to_owned(),
            log_in_url: "/login".to_owned(),
        }
    }

    fn htmx_headers(current_query: &str, trigger_name: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HX_CURRENT_URL,
            HeaderValue::from_str(&format!("http://localhost:3000/dashboard?{current_query}"))
                .unwrap(),
        );

        if let Some(trigger_name) = trigger_name {
            headers.insert(HX_TRIGGER_NAME, HeaderValue::from_static(trigger_name));
        }

        headers
    }

    #[tokio::test]
    async fn page_without_filters_redirects_to_canonical_url() {
        let backend = FakeBackend::with_transactions(sample_transactions());
        let state = view_state(&backend).await;

        let response = get_dashboard_page(State(state), RawQuery(None), HeaderMap::new()).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = get_header(&response, "location");
        assert!(
            location.starts_with("/dashboard?dateMode=ym&year="),
            "got {location}"
        );
        assert!(backend.queries().is_empty());
    }

    #[tokio::test]
    async fn page_renders_charts_and_legend() {
        let backend = FakeBackend::with_transactions(sample_transactions());
        let state = view_state(&backend).await;
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("session=abc"));

        let response = get_dashboard_page(
            State(state),
            RawQuery(Some(CANONICAL_QUERY.to_owned())),
            headers,
        )
        .await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        for id in [BAR_CHART_ID, DONUT_CHART_ID, "category-legend", "filter-form"] {
            let selector = Selector::parse(&format!("#{id}")).unwrap();
            assert!(html.select(&selector).next().is_some(), "missing #{id}");
        }

        let legend_text = html
            .select(&Selector::parse("#category-legend").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert!(legend_text.contains("comida"), "got {legend_text:?}");
        assert!(legend_text.contains("$1.500"), "got {legend_text:?}");
        assert!(legend_text.contains("otros"), "got {legend_text:?}");

        let total = html
            .select(&Selector::parse("#total").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert_eq!(total, "$1.700");

        assert_eq!(backend.queries(), [CANONICAL_QUERY]);
        assert_eq!(backend.cookies(), ["session=abc"]);
    }

    #[tokio::test]
    async fn page_redirects_to_log_in_when_unauthenticated() {
        let backend = FakeBackend::with_transactions(sample_transactions())
            .fetch_status(StatusCode::UNAUTHORIZED);
        let state = view_state(&backend).await;

        let response = get_dashboard_page(
            State(state),
            RawQuery(Some(CANONICAL_QUERY.to_owned())),
            HeaderMap::new(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), "/login");
    }

    #[tokio::test]
    async fn page_shows_message_when_backend_fails() {
        let backend = FakeBackend::with_transactions(sample_transactions())
            .fetch_status(StatusCode::INTERNAL_SERVER_ERROR);
        let state = view_state(&backend).await;

        let response = get_dashboard_page(
            State(state),
            RawQuery(Some(CANONICAL_QUERY.to_owned())),
            HeaderMap::new(),
        )
        .await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        let banner = html
            .select(&Selector::parse("#fetch-error").unwrap())
            .next()
            .expect("No error banner found")
            .text()
            .collect::<String>();
        assert_eq!(banner.trim(), "Could not load transactions (500).");
        assert!(
            html.select(&Selector::parse("#category-legend").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn history_restore_renders_page_and_replaces_url() {
        let backend = FakeBackend::with_transactions(sample_transactions());
        let state = view_state(&backend).await;
        let mut headers = HeaderMap::new();
        headers.insert(HX_HISTORY_RESTORE_REQUEST, HeaderValue::from_static("true"));

        let response = get_dashboard_page(
            State(state),
            RawQuery(Some("year=2025&month=6".to_owned())),
            headers,
        )
        .await;

        assert_status_ok(&response);
        assert_eq!(
            get_header(&response, "hx-replace-url"),
            "/dashboard?dateMode=ym&year=2025&month=6"
        );
    }

    #[tokio::test]
    async fn content_pushes_new_filters() {
        let backend = FakeBackend::with_transactions(sample_transactions());
        let state = view_state(&backend).await;
        let submission = "dateMode=ym&year=2024&month=&type=none&type=debito&q=jumbo";

        let response = get_dashboard_content(
            State(state),
            RawQuery(Some(submission.to_owned())),
            htmx_headers(CANONICAL_QUERY, None),
        )
        .await;

        assert_status_ok(&response);
        assert_eq!(
            get_header(&response, "hx-push-url"),
            "/dashboard?dateMode=ym&year=2024&month=&type=debito&q=jumbo"
        );
        assert_eq!(
            backend.queries().last().map(String::as_str),
            Some("dateMode=ym&year=2024&month=&type=debito&q=jumbo")
        );

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert!(
            html.select(&Selector::parse("#dashboard-results #category-legend").unwrap())
                .next()
                .is_some()
        );
        assert!(
            html.select(&Selector::parse("#filter-form").unwrap())
                .next()
                .is_none(),
            "a plain change must leave the controls in place"
        );
    }

    #[tokio::test]
    async fn content_resets_dates_when_date_mode_changes() {
        let backend = FakeBackend::with_transactions(sample_transactions());
        let state = view_state(&backend).await;

        let response = get_dashboard_content(
            State(state),
            RawQuery(Some("dateMode=range&type=none&type=credito".to_owned())),
            htmx_headers(CANONICAL_QUERY, Some("dateMode")),
        )
        .await;

        assert_status_ok(&response);
        let pushed_url = get_header(&response, "hx-push-url");
        assert!(pushed_url.starts_with("/dashboard?dateMode=range&start="), "got {pushed_url}");
        assert!(pushed_url.ends_with("&type=credito"), "got {pushed_url}");

        let html = parse_html_fragment(response).await;
        let range_radio = html
            .select(&Selector::parse("#dashboard-content #date-mode-range").unwrap())
            .next()
            .expect("No range radio found");
        assert!(range_radio.value().attr("checked").is_some());
        assert!(
            html.select(&Selector::parse("#dashboard-content #dashboard-results").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn content_rerenders_controls_on_reset() {
        let backend = FakeBackend::with_transactions(sample_transactions());
        let state = view_state(&backend).await;

        let response = get_dashboard_content(
            State(state),
            RawQuery(Some("dateMode=ym&year=2019&month=&reset=1".to_owned())),
            htmx_headers(CANONICAL_QUERY, Some("reset")),
        )
        .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let year = html
            .select(&Selector::parse("#filter-form #filter-year").unwrap())
            .next()
            .expect("No year input found");
        assert_ne!(year.value().attr("value"), Some("2019"));
    }

    #[tokio::test]
    async fn empty_result_keeps_total_visible() {
        let backend = FakeBackend::with_transactions(json!([]));
        let state = view_state(&backend).await;

        let response = get_dashboard_content(
            State(state),
            RawQuery(Some(CANONICAL_QUERY.to_owned())),
            htmx_headers(CANONICAL_QUERY, None),
        )
        .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let total = html
            .select(&Selector::parse("#dashboard-results #total").unwrap())
            .next()
            .expect("No total found")
            .text()
            .collect::<String>();
        assert_eq!(total, "$0");
        assert!(
            html.select(&Selector::parse(&format!("#{BAR_CHART_ID}")).unwrap())
                .next()
                .is_none()
        );
        let results = html
            .select(&Selector::parse("#dashboard-results").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert!(results.contains("No transactions match these filters."), "got {results:?}");
    }

    #[tokio::test]
    async fn content_without_changes_does_not_push() {
        let backend = FakeBackend::with_transactions(sample_transactions());
        let state = view_state(&backend).await;

        let response = get_dashboard_content(
            State(state),
            RawQuery(Some(format!("{CANONICAL_QUERY}&type=none&type=debito&type=credito&type=transferencia"))),
            htmx_headers(CANONICAL_QUERY, None),
        )
        .await;

        assert_status_ok(&response);
        assert!(response.headers().get("hx-push-url").is_none());
    }

    #[tokio::test]
    async fn content_redirects_to_log_in_when_unauthenticated() {
        let backend = FakeBackend::with_transactions(sample_transactions())
            .fetch_status(StatusCode::UNAUTHORIZED);
        let state = view_state(&backend).await;

        let response = get_dashboard_content(
            State(state),
            RawQuery(Some(CANONICAL_QUERY.to_owned())),
            htmx_headers(CANONICAL_QUERY, None),
        )
        .await;

        assert_status_ok(&response);
        assert_hx_redirect(&response, "/login");
    }
}
