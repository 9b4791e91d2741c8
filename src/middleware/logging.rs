use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

/// One log line per request, written before dispatch.
///
/// The remote address comes from `ConnectInfo`, which is only present when
/// the server was started with `into_make_service_with_connect_info`.
pub async fn log_request(request: Request, next: Next) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    let uri = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    tracing::info!(
        "{} - {:?} {} {}",
        remote,
        request.version(),
        request.method(),
        uri
    );

    next.run(request).await
}
