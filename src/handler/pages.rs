//! HTML page handlers

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Serialize;

#[derive(Serialize)]
struct IndexContext {
    app_name: &'static str,
    version: &'static str,
}

/// `GET /` renders the configured index template
pub fn index(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let page = IndexContext {
        app_name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    };

    match state.templates.render(&state.config.templates.index, &page) {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to render '{}': {e:#}",
                state.config.templates.index
            ));
            let detail = state.debug().then(|| e.to_string());
            http::build_500_response(detail.as_deref(), ctx.is_head)
        }
    }
}
