// src/server/handler.rs
use crate::health::{HealthEngine, HealthResponse, ProbeType};
use crate::metrics::MetricsRegistry;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;
use tracing::Instrument;

/// Serves the readiness and liveness routes, plus metrics when enabled.
#[derive(Clone)]
pub struct HealthHandler {
    engine: Arc<HealthEngine>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl HealthHandler {
    pub fn new(engine: Arc<HealthEngine>) -> Self {
        Self {
            engine,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, registry: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(registry);
        self
    }

    async fn route(self, req: Request<Body>) -> Response<Body> {
        let config = self.engine.config();
        let path = req.uri().path();

        let probe_type = [ProbeType::Readiness, ProbeType::Liveness]
            .into_iter()
            .find(|p| config.route(*p) == path);

        if let Some(probe_type) = probe_type {
            if req.method() != Method::GET {
                return plain(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            }
            let response = self.engine.check(probe_type).await;
            return health_response(&response);
        }

        match &self.metrics {
            Some(registry) if config.metrics.enabled && path == config.metrics.path => {
                match registry.gather() {
                    Ok(body) => {
                        let mut res = Response::new(Body::from(body));
                        res.headers_mut().insert(
                            CONTENT_TYPE,
                            HeaderValue::from_static("text/plain; version=0.0.4"),
                        );
                        res
                    }
                    Err(e) => {
                        tracing::error!(%e, "failed to encode metrics");
                        plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                    }
                }
            }
            _ => plain(StatusCode::NOT_FOUND, "Not Found"),
        }
    }
}

/// 200 when UP, 503 when DOWN; the JSON body is the same either way.
pub fn health_response(response: &HealthResponse) -> Response<Body> {
    let status = if response.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let mut res = Response::new(Body::from(response.to_json()));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}

fn plain(status: StatusCode, message: &'static str) -> Response<Body> {
    let mut res = Response::new(Body::from(message));
    *res.status_mut() = status;
    res
}

impl Service<Request<Body>> for HealthHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        let span = tracing::info_span!(
            "request",
            request_id = %uuid::Uuid::new_v4(),
            method = %req.method(),
            path = %req.uri().path()
        );
        Box::pin(async move { Ok(handler.route(req).await) }.instrument(span))
    }
}
