use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::{header::USER_AGENT, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::api::RequestFailure;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Emits one structured record per request once the response is ready.
/// Server errors are logged as failures; a rejected request (4xx) still
/// completed and carries its error text alongside.
///
/// The request id comes from the `x-request-id` header, which is filled in
/// upstream when the client did not send one.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = header_value(request.headers(), REQUEST_ID_HEADER)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = client_address(&request);
    let user_agent = header_value(request.headers(), USER_AGENT.as_str()).unwrap_or_default();

    let span = tracing::info_span!("request", request_id = %request_id);
    let response = next.run(request).instrument(span).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    let failure = response
        .extensions()
        .get::<RequestFailure>()
        .map(|RequestFailure(error)| error.as_str());

    if response.status().is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status,
            duration_ms,
            request_id = %request_id,
            ip = %client_ip,
            user_agent = %user_agent,
            error = failure,
            "request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            status,
            duration_ms,
            request_id = %request_id,
            ip = %client_ip,
            user_agent = %user_agent,
            error = failure,
            "request completed"
        );
    }

    response
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Peer address from the listener, falling back to proxy headers when the
/// router is served without connect info.
fn client_address(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    header_value(request.headers(), "x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next().map(|ip| ip.trim().to_string()))
        .or_else(|| header_value(request.headers(), "x-real-ip"))
        .unwrap_or_else(|| "unknown".to_string())
}
