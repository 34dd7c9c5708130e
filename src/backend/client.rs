//! HTTP client for the transactions backend.

use std::future::Future;

use axum::http::{HeaderValue, StatusCode, header::COOKIE};
use reqwest::{Client, RequestBuilder, Url};

use crate::{Error, filter::url_for};

use super::transaction::{Transaction, TransactionPatch};

/// The backend route that lists transactions.
pub const TRANSACTIONS_PATH: &str = "/api/transactions";
/// The backend route that updates a single transaction field.
pub const UPDATE_TRANSACTION_PATH: &str = "/api/update_transaction";

/// Why a fetch did not produce transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchProblem {
    /// The backend answered `401 Unauthorized`.
    Unauthenticated,
    /// The backend answered with another unsuccessful status code.
    Status(u16),
    /// The request could not be sent or the response could not be received.
    Unreachable,
    /// The response body was not a list of transactions.
    InvalidBody,
}

impl FetchProblem {
    /// The message shown to the user, if any.
    ///
    /// Unauthenticated requests are redirected to the log-in page instead.
    pub fn message(self) -> Option<String> {
        match self {
            Self::Unauthenticated => None,
            Self::Status(code) => Some(format!("Could not load transactions ({code}).")),
            Self::Unreachable => Some("Could not connect to the server.".to_owned()),
            Self::InvalidBody => Some("Could not read the transactions.".to_owned()),
        }
    }
}

/// The result of fetching transactions.
///
/// On failure the transaction list is empty and `problem` says why.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    /// The transactions as returned by the backend.
    pub transactions: Vec<Transaction>,
    /// Set if the fetch failed.
    pub problem: Option<FetchProblem>,
}

impl FetchResult {
    /// A successful fetch.
    pub fn loaded(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            problem: None,
        }
    }

    /// A failed fetch.
    pub fn failed(problem: FetchProblem) -> Self {
        Self {
            transactions: Vec::new(),
            problem: Some(problem),
        }
    }

    /// Whether the backend rejected the session.
    pub fn is_unauthenticated(&self) -> bool {
        self.problem == Some(FetchProblem::Unauthenticated)
    }
}

/// The result of a single field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The backend accepted the update.
    Saved,
    /// The backend answered `401 Unauthorized`.
    Unauthenticated,
    /// The update failed, with a message for the user.
    Failed(String),
}

/// Anything that can fetch transactions for a filter query string.
pub trait TransactionSource {
    /// Fetch the transactions matching `query`, a query string without the leading `?`.
    fn fetch_transactions(&self, query: &str) -> impl Future<Output = FetchResult> + Send;
}

/// Client for the transactions backend.
///
/// The client is cheap to clone. Use [BackendClient::for_session] to forward
/// the browser's cookies so that the backend can authenticate the request.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    cookie: Option<HeaderValue>,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`, e.g. "http://localhost:8000".
    ///
    /// # Errors
    /// Returns [Error::InvalidBackendUrl] if `base_url` is not an absolute URL
    /// and [Error::HttpClientError] if the HTTP client could not be built.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Url::parse(base_url)
            .map_err(|error| Error::InvalidBackendUrl(format!("{base_url}: {error}")))?;

        let http = Client::builder()
            .build()
            .map_err(|error| Error::HttpClientError(error.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            cookie: None,
        })
    }

    /// A copy of this client that sends `cookie` as the `Cookie` header.
    pub fn for_session(&self, cookie: Option<&HeaderValue>) -> Self {
        Self {
            cookie: cookie.cloned(),
            ..self.clone()
        }
    }

    /// The base URL of the backend, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    /// Fetch the transactions matching `query`.
    ///
    /// Never fails: problems are reported in [FetchResult::problem] together
    /// with an empty list.
    pub async fn fetch_transactions(&self, query: &str) -> FetchResult {
        let url = url_for(&format!("{}{TRANSACTIONS_PATH}", self.base_url), query);
        tracing::debug!("fetching transactions from {url}");

        let response = match self.with_session(self.http.get(&url)).send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!("could not fetch transactions from {url}: {error}");
                return FetchResult::failed(FetchProblem::Unreachable);
            }
        };

        match response.status() {
            StatusCode::UNAUTHORIZED => FetchResult::failed(FetchProblem::Unauthenticated),
            status if status.is_success() => match response.json::<Vec<Transaction>>().await {
                Ok(transactions) => FetchResult::loaded(transactions),
                Err(error) => {
                    tracing::warn!("could not decode transactions from {url}: {error}");
                    FetchResult::failed(FetchProblem::InvalidBody)
                }
            },
            status => {
                tracing::warn!("backend answered {status} for {url}");
                FetchResult::failed(FetchProblem::Status(status.as_u16()))
            }
        }
    }

    /// Send a single field update. The update is not retried.
    pub async fn update_transaction(&self, patch: &TransactionPatch) -> UpdateOutcome {
        let url = format!("{}{UPDATE_TRANSACTION_PATH}", self.base_url);
        tracing::debug!("updating transaction {} {}", patch.id, patch.field.as_str());

        let request = self.with_session(self.http.post(&url)).json(patch);

        match request.send().await {
            Ok(response) if response.status() == StatusCode::UNAUTHORIZED => {
                UpdateOutcome::Unauthenticated
            }
            Ok(response) if response.status().is_success() => UpdateOutcome::Saved,
            Ok(response) => {
                tracing::warn!(
                    "backend answered {} when updating transaction {}",
                    response.status(),
                    patch.id
                );
                UpdateOutcome::Failed(format!(
                    "Could not save the change ({}).",
                    response.status().as_u16()
                ))
            }
            Err(error) => {
                tracing::warn!("could not update transaction {}: {error}", patch.id);
                UpdateOutcome::Failed("Could not save the change.".to_owned())
            }
        }
    }
}

impl TransactionSource for BackendClient {
    fn fetch_transactions(&self, query: &str) -> impl Future<Output = FetchResult> + Send {
        BackendClient::fetch_transactions(self, query)
    }
}
