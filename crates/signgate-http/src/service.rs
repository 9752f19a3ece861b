//! The hyper `Service` wrapping [`GateHandler`].
//!
//! [`GateHttpService`] assigns a request id, hands the request head to the
//! handler, and logs the outcome. The request body is never read.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use hyper::service::Service;
use signgate_core::ObjectStore;
use tracing::{debug, info};
use uuid::Uuid;

use crate::body::GateResponseBody;
use crate::handler::{GateHandler, GateHttpConfig};

/// Hyper service serving signed object requests.
///
/// Cheap to clone; all clones share one handler.
#[derive(Debug)]
pub struct GateHttpService<S> {
    handler: Arc<GateHandler<S>>,
}

impl<S> Clone for GateHttpService<S> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S: ObjectStore> GateHttpService<S> {
    /// Create a service over `store`.
    #[must_use]
    pub fn new(store: Arc<S>, config: GateHttpConfig) -> Self {
        Self::from_handler(GateHandler::new(store, config))
    }

    /// Create a service around an existing handler.
    #[must_use]
    pub fn from_handler(handler: GateHandler<S>) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// The shared handler.
    #[must_use]
    pub fn handler(&self) -> &GateHandler<S> {
        &self.handler
    }
}

impl<S, B> Service<http::Request<B>> for GateHttpService<S>
where
    S: ObjectStore,
    B: Send + 'static,
{
    type Response = http::Response<GateResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let started = Instant::now();
            let (parts, _body) = req.into_parts();
            debug!(method = %parts.method, uri = %parts.uri, request_id, "processing request");

            let response = handler.handle(&parts).await;

            info!(
                method = %parts.method,
                path = parts.uri.path(),
                status = response.status().as_u16(),
                elapsed_ms = started.elapsed().as_millis(),
                request_id,
                "request completed",
            );
            Ok(response)
        })
    }
}
