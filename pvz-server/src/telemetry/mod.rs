//! Observability: structured logging setup, Prometheus metrics and the
//! business-event hook the lifecycle engine reports through.

pub mod logging;
pub mod metrics;

pub use metrics::Metrics;

/// Business events counted by the lifecycle engine.
///
/// Recording is infallible so a metrics problem can never fail or roll back
/// the mutation that triggered it.
pub trait Telemetry: Send + Sync {
    fn pickup_point_created(&self);
    fn reception_created(&self);
    fn product_added(&self);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn pickup_point_created(&self) {}
    fn reception_created(&self) {}
    fn product_added(&self) {}
}
