//! Prometheus metrics collection and exposition endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{MatchedPath, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use super::Telemetry;

/// Service metrics, registered in a registry owned by this value
#[derive(Debug, Clone)]
pub struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_response_time_seconds: HistogramVec,
    pvz_created_total: IntCounter,
    reception_created_total: IntCounter,
    products_added_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests by method, route and status."),
            &["method", "path", "status"],
        )?;
        let http_response_time_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_response_time_seconds",
                "HTTP response time in seconds by method and route.",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0]),
            &["method", "path"],
        )?;
        let pvz_created_total =
            IntCounter::new("pvz_created_total", "Pickup points registered.")?;
        let reception_created_total =
            IntCounter::new("reception_created_total", "Receptions opened.")?;
        let products_added_total =
            IntCounter::new("products_added_total", "Products added to receptions.")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_response_time_seconds.clone()))?;
        registry.register(Box::new(pvz_created_total.clone()))?;
        registry.register(Box::new(reception_created_total.clone()))?;
        registry.register(Box::new(products_added_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_response_time_seconds,
            pvz_created_total,
            reception_created_total,
            products_added_total,
        })
    }

    pub fn observe_request(&self, method: &str, path: &str, status: u16, duration_seconds: f64) {
        let status = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status.as_str()])
            .inc();
        self.http_response_time_seconds
            .with_label_values(&[method, path])
            .observe(duration_seconds);
    }

    /// Text exposition format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut encoded = Vec::new();
        encoder.encode(&self.registry.gather(), &mut encoded)?;
        Ok(String::from_utf8_lossy(&encoded).into_owned())
    }
}

impl Telemetry for Metrics {
    fn pickup_point_created(&self) {
        self.pvz_created_total.inc();
    }

    fn reception_created(&self) {
        self.reception_created_total.inc();
    }

    fn product_added(&self) {
        self.products_added_total.inc();
    }
}

/// Records every request against its matched route template
pub async fn track_http(State(metrics): State<Arc<Metrics>>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let started = Instant::now();
    let response = next.run(req).await;

    metrics.observe_request(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}

async fn metrics_handler(State(metrics): State<Arc<Metrics>>) -> Response {
    match metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics response: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Router served on the dedicated metrics port
pub fn metrics_router(metrics: Arc<Metrics>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}
