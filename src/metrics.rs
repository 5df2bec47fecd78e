//! Process self-metrics for the exporter itself.
//!
//! These live in a registry initialized once at process startup and serve
//! `GET /metrics`. Probe samples never land here: each probe request builds
//! its own registry (see [`crate::probe::aggregator`]) so label sets cannot
//! leak between scrapes.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Content type of the Prometheus text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Long-lived registry for process self-metrics. Torn down never.
static PROCESS_REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();

    registry
        .register(Box::new(HTTP_REQUESTS.clone()))
        .expect("register http request counter");

    #[cfg(target_os = "linux")]
    registry
        .register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))
        .expect("register process collector");

    registry
});

/// Requests served per endpoint since process start.
pub static HTTP_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "s3probe_http_requests_total",
            "Total HTTP requests served, by path",
        ),
        &["path"],
    )
    .expect("create http request counter")
});

/// Render the process registry in the text exposition format.
pub fn render() -> prometheus::Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&PROCESS_REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
