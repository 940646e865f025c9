//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route lookup, method validation,
//! dispatch, common headers and access logging.

use crate::config::AppState;
use crate::handler::{api, pages};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// What a matched path resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Index,
    Data,
    Export,
}

/// Route table, exact path match
pub const ROUTES: [(&str, RouteKind); 3] = [
    ("/", RouteKind::Index),
    ("/api/data", RouteKind::Data),
    ("/api/export", RouteKind::Export),
];

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

pub fn lookup(path: &str) -> Option<RouteKind> {
    ROUTES
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, kind)| *kind)
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    peer: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = state.access_log().then(|| {
        AccessLogEntry::from_request(peer, req.method(), req.uri(), req.version(), req.headers())
    });

    let ctx = RequestContext {
        path: req.uri().path(),
        is_head: *req.method() == Method::HEAD,
    };

    let mut response = route_request(&ctx, req.method(), &state);

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes, started);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve the route first, then check the method against it
fn route_request(ctx: &RequestContext<'_>, method: &Method, state: &AppState) -> Response<Full<Bytes>> {
    let Some(kind) = lookup(ctx.path) else {
        logger::log_debug(&format!("No route for {method} {}", ctx.path));
        return http::build_404_response(ctx.is_head);
    };

    match *method {
        Method::GET | Method::HEAD => dispatch(ctx, kind, state),
        Method::OPTIONS => http::build_options_response(state.config.http.enable_cors),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {}", ctx.path));
            http::build_405_response()
        }
    }
}

fn dispatch(ctx: &RequestContext<'_>, kind: RouteKind, state: &AppState) -> Response<Full<Bytes>> {
    match kind {
        RouteKind::Index => pages::index(ctx, state),
        RouteKind::Data => api::get_data(ctx),
        RouteKind::Export => api::export_data(ctx),
    }
}
