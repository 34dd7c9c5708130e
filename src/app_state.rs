//! Implements a struct that holds the state of the web server.

use axum::extract::FromRef;

use crate::{Error, backend::BackendClient, timezone::get_local_offset};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the transactions backend.
    pub backend: BackendClient,

    /// The local timezone as a canonical timezone name, e.g. "America/Santiago".
    pub local_timezone: String,

    /// Where to send users whose session the backend rejected.
    pub log_in_url: String,
}

impl AppState {
    /// Create a new [AppState] for the backend at `backend_url`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "America/Santiago".
    ///
    /// # Errors
    /// Returns an error if the timezone is not recognised, the backend URL is
    /// not absolute or the HTTP client cannot be created.
    pub fn new(backend_url: &str, local_timezone: &str, log_in_url: &str) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            backend: BackendClient::new(backend_url)?,
            local_timezone: local_timezone.to_owned(),
            log_in_url: log_in_url.to_owned(),
        })
    }
}

/// The state needed by the dashboard and transactions pages.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// The client for the transactions backend, without a session.
    pub backend: BackendClient,
    /// The local timezone as a canonical timezone name, e.g. "America/Santiago".
    pub local_timezone: String,
    /// Where to send users whose session the backend rejected.
    pub log_in_url: String,
}

impl FromRef<AppState> for ViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            local_timezone: state.local_timezone.clone(),
            log_in_url: state.log_in_url.clone(),
        }
    }
}
