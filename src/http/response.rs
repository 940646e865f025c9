//! HTTP response building module
//!
//! Builders for every response the server produces. A builder never panics:
//! if `Response::builder` fails, the error is logged and a bare response is returned.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// Build 200 HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    build_body_response(StatusCode::OK, HTML, Bytes::from(content), is_head)
}

/// Build 200 JSON response
///
/// Serialization failure is reported as a 500.
pub fn build_json_response<T: Serialize>(body: &T, is_head: bool) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => build_body_response(StatusCode::OK, JSON, Bytes::from(json), is_head),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            build_500_response(None, is_head)
        }
    }
}

/// Build 204 response for OPTIONS requests
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<Full<Bytes>> {
    build_body_response(
        StatusCode::NOT_FOUND,
        TEXT,
        Bytes::from_static(b"404 Not Found"),
        is_head,
    )
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut resp = build_body_response(
        StatusCode::METHOD_NOT_ALLOWED,
        TEXT,
        Bytes::from_static(b"405 Method Not Allowed"),
        false,
    );
    resp.headers_mut()
        .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    resp
}

/// Build 500 Internal Server Error response
///
/// `detail` is only shown when the caller decides it is safe (debug mode).
pub fn build_500_response(detail: Option<&str>, is_head: bool) -> Response<Full<Bytes>> {
    let body = match detail {
        Some(d) => format!("500 Internal Server Error\n\n{d}"),
        None => "500 Internal Server Error".to_string(),
    };
    build_body_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        TEXT,
        Bytes::from(body),
        is_head,
    )
}

/// `Content-Length` always reflects the full body, also for HEAD
fn build_body_response(
    status: StatusCode,
    content_type: &'static str,
    body: Bytes,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = body.len();
    let body = if is_head { Bytes::new() } else { body };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_json_response() {
        let resp = build_json_response(&serde_json::json!({"status": "ok"}), false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], JSON);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "15");
        assert_eq!(body_bytes(resp).await, Bytes::from_static(br#"{"status":"ok"}"#));
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = build_html_response("<p>hi</p>".to_string(), true);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "9");
        assert!(body_bytes(resp).await.is_empty());
    }

    #[test]
    fn test_405_has_allow() {
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], ALLOWED_METHODS);
    }

    #[test]
    fn test_options_cors() {
        let plain = build_options_response(false);
        assert_eq!(plain.status(), StatusCode::NO_CONTENT);
        assert!(!plain.headers().contains_key("access-control-allow-origin"));

        let cors = build_options_response(true);
        assert_eq!(cors.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_500_detail() {
        let generic = body_bytes(build_500_response(None, false)).await;
        assert_eq!(generic, Bytes::from_static(b"500 Internal Server Error"));

        let detailed = body_bytes(build_500_response(Some("template not found"), false)).await;
        assert!(String::from_utf8_lossy(&detailed).contains("template not found"));
    }
}
