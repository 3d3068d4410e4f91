use anyhow::{Context, Result};
use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Prometheus recorder wrapper; rendering is text-only (no HTTP listener here).
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process) and publish the configured top-K.
    pub fn init(top_k: usize) -> Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        gauge!("pipeline_top_k").set(top_k as f64);

        Ok(Self { handle })
    }

    /// Prometheus exposition text for the current process.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}
