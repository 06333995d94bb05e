//! Type-erased request handler passed from plugins to the host.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};

/// Boxed future returned by a [`RequestHandler`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

type HandlerFn = dyn Fn(Request) -> HandlerFuture + Send + Sync;

/// A cloneable async request handler.
///
/// Clones share the same underlying function, so a host can tell whether the
/// handler it mounted is the one a plugin produced via [`RequestHandler::ptr_eq`].
#[derive(Clone)]
pub struct RequestHandler {
    inner: Arc<HandlerFn>,
}

impl RequestHandler {
    pub fn new<F, Fut, R>(handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let inner: Arc<HandlerFn> = Arc::new(move |request: Request| -> HandlerFuture {
            let response = handler(request);
            Box::pin(async move { response.await.into_response() })
        });
        Self { inner }
    }

    /// Handle one request.
    pub fn call(&self, request: Request) -> HandlerFuture {
        (self.inner)(request)
    }

    /// Whether both handlers share the same underlying function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}
