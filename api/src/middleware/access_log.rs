use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service, ServiceExt};
use tower_http::request_id::RequestId;

/// Tower Layer for access pattern logging.
///
/// Logs method/path/status/latency and the propagated request id via
/// `tracing` after the response is sent. Never blocks or fails the response.
#[derive(Clone, Default)]
pub struct AccessLogLayer;

impl AccessLogLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for AccessLogLayer {
    type Service = AccessLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessLogService { inner }
    }
}

#[derive(Clone)]
pub struct AccessLogService<S> {
    inner: S,
}

impl<S> Service<Request> for AccessLogService<S>
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let not_ready = self.inner.clone();
        let ready = std::mem::replace(&mut self.inner, not_ready);

        Box::pin(async move {
            let start = Instant::now();
            let method = req.method().to_string();
            let path = req.uri().path().to_owned();
            // Read from the request extension `SetRequestIdLayer` populates,
            // not the response header `PropagateRequestIdLayer` writes —
            // robust regardless of exactly where this layer sits relative
            // to those two in the stack.
            let request_id = req
                .extensions()
                .get::<RequestId>()
                .and_then(|id| id.header_value().to_str().ok())
                .unwrap_or("-")
                .to_string();

            let response = ready.oneshot(req).await.into_response();
            let status = response.status().as_u16();
            let elapsed_ms = start.elapsed().as_millis();

            tracing::info!(
                method = %method,
                path = %path,
                status,
                elapsed_ms,
                request_id = %request_id,
                "request completed"
            );

            Ok(response)
        })
    }
}
