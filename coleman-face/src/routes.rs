//! Default handler for the face page route.

use std::sync::{Arc, Weak};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use coleman_shared::{ColemanHost, RequestHandler};
use tera::Context;

use crate::face::{FACE_ID, WS_ROUTE};
use crate::template::SOCKETS_TEMPLATE;

/// Route factory rendering the precompiled page template on every request.
///
/// The template is read from the host's settings, never from disk. The host
/// owns the handler, so the handler holds the host weakly and answers 503 once
/// the host is gone.
pub fn sockets_page(host: Arc<dyn ColemanHost>) -> RequestHandler {
    let host = Arc::downgrade(&host);
    RequestHandler::new(move |_request: Request| {
        let host = Weak::clone(&host);
        async move {
            match host.upgrade() {
                Some(host) => render_page(&*host),
                None => (StatusCode::SERVICE_UNAVAILABLE, "host is shutting down").into_response(),
            }
        }
    })
}

fn render_page(host: &dyn ColemanHost) -> Response {
    let Some(template) = SOCKETS_TEMPLATE.fetch(host) else {
        tracing::error!(
            key = SOCKETS_TEMPLATE.name(),
            "Page template missing from host settings"
        );
        return (StatusCode::INTERNAL_SERVER_ERROR, "page template unavailable").into_response();
    };

    let mut context = Context::new();
    context.insert("plugin_id", FACE_ID);
    context.insert("socket_path", WS_ROUTE);

    match template.render(&context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render page template");
            (StatusCode::INTERNAL_SERVER_ERROR, "page render failed").into_response()
        }
    }
}
