//! Text summary builder for CLI output.
//!
//! Formats the averaged series as a table plus per-protocol metrics.

use crate::metrics;
use crate::model::{duration_ms, LatencyReport};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary from a computed report. Every series is listed,
/// plotted or not.
pub(crate) fn build_text_summary(report: &LatencyReport) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!("Data: {}", report.base_dir.display()));
    lines.push(format!("Sample unit: {}", report.sample_unit));

    let mut header = format!("{:>8}", "clients");
    for s in &report.series {
        header.push_str(&format!(" {:>12}", format!("{} ms", s.protocol)));
    }
    lines.push(header);

    for (idx, count) in report.client_counts.iter().enumerate() {
        let mut row = format!("{:>8}", count);
        for s in &report.series {
            match s.buckets.get(idx) {
                Some(b) => row.push_str(&format!(" {:>12.3}", duration_ms(b.average))),
                None => row.push_str(&format!(" {:>12}", "-")),
            }
        }
        lines.push(row);
    }

    for s in &report.series {
        let values: Vec<f64> = s.averages().into_iter().map(duration_ms).collect();
        let suffix = if report.plotted.contains(&s.protocol) {
            ""
        } else {
            " (not plotted)"
        };
        match metrics::compute_metrics(&values) {
            Some((mean, median, p25, p75)) => lines.push(format!(
                "{}: avg {:.3} med {:.3} p25 {:.3} p75 {:.3} ms{}",
                s.protocol, mean, median, p25, p75, suffix
            )),
            None => lines.push(format!("{}: no data{}", s.protocol, suffix)),
        }
    }

    TextSummary { lines }
}
