use crate::error::status_text_response;
use crate::middleware::headers::set_secure_headers;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use std::any::Any;
use std::backtrace::Backtrace;

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer`.
///
/// Logs the panic payload with a stack trace and answers with a single
/// generic 500 that also closes the connection. The security headers are
/// stamped here as well, since the unwind skipped the layer that sets them.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!("panic: {}\n{}", detail, Backtrace::force_capture());

    let mut response = status_text_response(StatusCode::INTERNAL_SERVER_ERROR);
    let headers = response.headers_mut();
    set_secure_headers(headers);
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}
