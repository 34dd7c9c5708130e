//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The backend URL is not an absolute URL.
    #[error("invalid backend URL {0}")]
    InvalidBackendUrl(String),

    /// The HTTP client for the backend could not be created.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not create the HTTP client: {0}")]
    HttpClientError(String),

    /// Tried to use a filter store after it was disposed.
    #[error("the filter store has been disposed")]
    StoreDisposed,
}

fn invalid_timezone_fix(timezone: &str) -> String {
    format!(
        "Could not get local timezone \"{timezone}\". Check your server settings and \
        ensure the timezone has been set to valid, canonical timezone string"
    )
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &invalid_timezone_fix(&timezone),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: invalid_timezone_fix(&timezone),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_document, parse_html_fragment};

    use super::Error;

    #[tokio::test]
    async fn invalid_timezone_renders_error_page() {
        let response = Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Invalid Timezone Settings"));
        assert!(text.contains("Mars/Olympus_Mons"));
    }

    #[tokio::test]
    async fn unexpected_error_alert_hides_details() {
        let response = Error::HttpClientError("tls backend missing".to_owned()).into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_fragment(response).await;
        let message = html
            .select(&Selector::parse("#alert-container p.text-sm.font-medium").unwrap())
            .next()
            .expect("No alert message found")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), "Something went wrong");
        assert!(!html.root_element().text().any(|text| text.contains("tls")));
    }
}
