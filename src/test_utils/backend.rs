use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode, header::COOKIE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::backend::{TRANSACTIONS_PATH, UPDATE_TRANSACTION_PATH};

/// An in-process stand-in for the transactions backend.
///
/// Records every query string, cookie and update it receives.
#[derive(Debug, Clone)]
pub(crate) struct FakeBackend {
    transactions: Value,
    fetch_status: StatusCode,
    update_status: StatusCode,
    queries: Arc<Mutex<Vec<String>>>,
    cookies: Arc<Mutex<Vec<String>>>,
    updates: Arc<Mutex<Vec<Value>>>,
}

impl FakeBackend {
    pub(crate) fn with_transactions(transactions: Value) -> Self {
        Self {
            transactions,
            fetch_status: StatusCode::OK,
            update_status: StatusCode::OK,
            queries: Default::default(),
            cookies: Default::default(),
            updates: Default::default(),
        }
    }

    pub(crate) fn fetch_status(mut self, status: StatusCode) -> Self {
        self.fetch_status = status;
        self
    }

    pub(crate) fn update_status(mut self, status: StatusCode) -> Self {
        self.update_status = status;
        self
    }

    /// Serve the fake backend on an ephemeral local port and return its base URL.
    pub(crate) async fn serve(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind fake backend");
        let address = listener.local_addr().expect("Could not get local address");

        let router = Router::new()
            .route(TRANSACTIONS_PATH, get(list_transactions))
            .route(UPDATE_TRANSACTION_PATH, post(update_transaction))
            .with_state(self.clone());

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Fake backend stopped");
        });

        format!("http://{address}")
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn cookies(&self) -> Vec<String> {
        self.cookies.lock().unwrap().clone()
    }

    pub(crate) fn updates(&self) -> Vec<Value> {
        self.updates.lock().unwrap().clone()
    }
}

async fn list_transactions(
    State(backend): State<FakeBackend>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    backend
        .queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());

    if let Some(cookie) = headers.get(COOKIE).and_then(|cookie| cookie.to_str().ok()) {
        backend.cookies.lock().unwrap().push(cookie.to_owned());
    }

    if backend.fetch_status.is_success() {
        Json(backend.transactions.clone()).into_response()
    } else {
        backend.fetch_status.into_response()
    }
}

async fn update_transaction(State(backend): State<FakeBackend>, Json(patch): Json<Value>) -> Response {
    backend.updates.lock().unwrap().push(patch);

    if backend.update_status.is_success() {
        Json(serde_json::json!({"ok": true})).into_response()
    } else {
        backend.update_status.into_response()
    }
}

/// A local URL that nothing is listening on.
pub(crate) async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind listener");
    let address = listener.local_addr().expect("Could not get local address");
    drop(listener);

    format!("http://{address}")
}
