use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Store request information
#[derive(Debug)]
pub struct RequestInfo {
    pub method: String,
    pub uri: String,
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
}

impl RequestInfo {
    pub fn from_request(req: &Request) -> Self {
        let headers = req.headers();

        Self {
            method: req.method().to_string(),
            uri: req.uri().to_string(),
            user_agent: headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string()),
            content_type: headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string()),
        }
    }
}

/// Main middleware for request logs.
///
/// Captures information about each request and response and logs the
/// completion at a level chosen by the status class.
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_info = RequestInfo::from_request(&req);
    let method = request_info.method.clone();
    let uri = request_info.uri.clone();

    debug!(
        method = %method,
        uri = %uri,
        user_agent = ?request_info.user_agent,
        "Incoming request"
    );

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    match status.as_u16() {
        200..=299 => {
            info!(
                method = %method,
                uri = %uri,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                user_agent = ?request_info.user_agent,
                content_type = ?request_info.content_type,
                "Request completed successfully"
            );
        }
        300..=399 => {
            info!(
                method = %method,
                uri = %uri,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Request redirected"
            );
        }
        400..=499 => {
            warn!(
                method = %method,
                uri = %uri,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                user_agent = ?request_info.user_agent,
                "Client error"
            );
        }
        500..=599 => {
            error!(
                method = %method,
                uri = %uri,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                user_agent = ?request_info.user_agent,
                content_type = ?request_info.content_type,
                "Server error occurred"
            );
        }
        _ => {
            debug!(
                method = %method,
                uri = %uri,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Request completed with unusual status"
            );
        }
    }

    response
}
