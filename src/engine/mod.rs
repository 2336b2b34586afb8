mod bucket;
mod series;

pub use series::compute_series;

use crate::model::{duration_ms, LatencyReport, PlotConfig, Protocol, ProtocolSeries};
use anyhow::{Context, Result};
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info};

pub struct AnalysisEngine {
    cfg: PlotConfig,
}

impl AnalysisEngine {
    pub fn new(cfg: PlotConfig) -> Self {
        Self { cfg }
    }

    /// Compute the TCP, QUIC and UDP series, in that order.
    ///
    /// QUIC is read and averaged even when it will not be plotted, so missing
    /// QUIC data fails the run like any other protocol.
    pub fn run(self) -> Result<LatencyReport> {
        let plotted = self.cfg.plotted();
        let mut series = Vec::with_capacity(Protocol::ALL.len());

        for protocol in Protocol::ALL {
            let dir = self.cfg.protocol_dir(protocol);
            let buckets = compute_series(&dir, &self.cfg.clients, self.cfg.sample_unit)
                .inspect_err(|e| {
                    debug!(
                        "{protocol} bucket for {} clients failed ({})",
                        e.client_count(),
                        e.path().display()
                    )
                })
                .with_context(|| format!("computing {protocol} series from {}", dir.display()))?;
            let s = ProtocolSeries { protocol, buckets };
            info!(
                "{protocol}: {} buckets, overall avg {:.3} ms",
                s.buckets.len(),
                overall_mean_ms(&s.averages())
            );
            if !plotted.contains(&protocol) {
                info!("{protocol} series computed but not plotted (use --plot-quic)");
            }
            series.push(s);
        }

        let generated_at_utc = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("format report timestamp")?;

        Ok(LatencyReport {
            generated_at_utc,
            base_dir: self.cfg.base_dir.clone(),
            sample_unit: self.cfg.sample_unit,
            client_counts: self.cfg.clients.counts(),
            series,
            plotted,
        })
    }
}

fn overall_mean_ms(averages: &[Duration]) -> f64 {
    if averages.is_empty() {
        return 0.0;
    }
    averages.iter().map(|d| duration_ms(*d)).sum::<f64>() / averages.len() as f64
}
