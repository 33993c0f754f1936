//! HTTP response building module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build the response for completed work: default status, no extra headers.
pub fn build_body_response(body: Bytes) -> Response<Full<Bytes>> {
    Response::new(Full::new(body))
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("500 Internal Server Error")))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::from("500 Internal Server Error")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
