//! Placeholder JSON endpoints
//!
//! Data lives in the browser's local storage; these routes reserve the API
//! surface for server-side features and currently acknowledge with a fixed body.

use crate::handler::router::RequestContext;
use crate::http;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Serialize;

/// `{"status":"ok"}`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusBody {
    pub status: &'static str,
}

impl StatusBody {
    pub const fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// `GET /api/data`
pub fn get_data(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    http::build_json_response(&StatusBody::ok(), ctx.is_head)
}

/// `GET /api/export`
///
/// No export artifact is produced; the client builds exports itself.
pub fn export_data(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    http::build_json_response(&StatusBody::ok(), ctx.is_head)
}
