//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, header::COOKIE, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a request or response body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level with session
/// cookies redacted. If the body is longer than [LOG_BODY_LENGTH_LIMIT]
/// bytes, it is truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return axum::http::StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &redact_cookies(&parts.headers), &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &redact_cookies(&parts.headers), &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn body_to_text(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

/// A copy of `headers` with the value of every cookie header replaced.
fn redact_cookies(headers: &HeaderMap) -> HeaderMap {
    let mut redacted = headers.clone();

    for name in [COOKIE, SET_COOKIE] {
        if redacted.contains_key(&name) {
            redacted.insert(name, HeaderValue::from_static(REDACTED));
        }
    }

    redacted
}

/// The first [LOG_BODY_LENGTH_LIMIT] bytes of `body`, shortened to the
/// nearest character boundary.
fn truncate_body(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(parts: &axum::http::request::Parts, headers: &HeaderMap, body: &str) {
    let method = &parts.method;
    let uri = &parts.uri;

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {method} {uri} {headers:#?}\nbody: {:}...",
            truncate_body(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {method} {uri} {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &axum::http::response::Parts, headers: &HeaderMap, body: &str) {
    let status = parts.status;

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {status} {headers:#?}\nbody: {:}...",
            truncate_body(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {status} {headers:#?}\nbody: {body:?}");
    }
}
