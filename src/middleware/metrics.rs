//! Per-request id and `voss_http_*` metrics
//!
//! Series are labelled with the matched route template, so
//! `/api/land-inquiries/{id}/status` is one series however many inquiries
//! exist. Requests that match no route share the `unmatched` label.

use crate::telemetry::metrics::{
    HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS,
};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Request},
    response::Response,
};
use metrics::{counter, gauge, histogram};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const UNMATCHED_ROUTE: &str = "unmatched";

#[derive(Clone)]
pub struct ObservabilityLayer;

impl<S> Layer<S> for ObservabilityLayer {
    type Service = ObservabilityMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ObservabilityMiddleware { inner }
    }
}

#[derive(Clone)]
pub struct ObservabilityMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for ObservabilityMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let method = request.method().as_str().to_string();
        let route = route_label(&request);
        let request_id = request_id(&request);

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            route = %route
        );
        let mut inner = self.inner.clone();

        gauge!(HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
        let start = Instant::now();

        Box::pin(
            async move {
                let result = inner.call(request).await;
                gauge!(HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);
                let mut response = result?;

                let status = response.status().as_u16().to_string();
                counter!(HTTP_REQUESTS_TOTAL, "method" => method.clone(), "path" => route.clone(), "status" => status)
                    .increment(1);
                histogram!(HTTP_REQUEST_DURATION_SECONDS, "method" => method, "path" => route)
                    .record(start.elapsed().as_secs_f64());

                if let Ok(value) = HeaderValue::from_str(&request_id) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// Caller-supplied id if it is a valid header value, else a fresh v4 UUID.
fn request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}
