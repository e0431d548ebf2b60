//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_requests_total` (counter): view-set dispatches by resource, operation
//!
//! Without an installed recorder the macros are no-ops, so handlers record
//! unconditionally and only the exporter is optional.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::Operation;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Prometheus metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

pub fn record_dispatch(resource: &str, operation: Operation) {
    metrics::counter!(
        "api_requests_total",
        "resource" => resource.to_string(),
        "operation" => operation.as_str()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_counter_labels() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_dispatch("trips", Operation::List);
            record_dispatch("trips", Operation::List);
            record_dispatch("logs", Operation::Destroy);
        });

        let rendered = handle.render();
        let sample = |resource: &str, operation: &str| {
            rendered
                .lines()
                .find(|line| {
                    line.starts_with("api_requests_total{")
                        && line.contains(&format!("resource=\"{resource}\""))
                        && line.contains(&format!("operation=\"{operation}\""))
                })
                .map(|line| line.rsplit(' ').next().unwrap_or_default().to_string())
        };

        assert_eq!(sample("trips", "list").as_deref(), Some("2"));
        assert_eq!(sample("logs", "destroy").as_deref(), Some("1"));
        assert_eq!(sample("logs", "list"), None);
    }
}
