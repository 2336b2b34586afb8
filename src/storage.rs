use crate::model::{duration_ms, LatencyReport};
use anyhow::{Context, Result};
use std::path::Path;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    Ok(())
}

pub fn export_json(path: &Path, report: &LatencyReport) -> Result<()> {
    ensure_parent(path)?;
    let out = serde_json::to_string_pretty(report)?;
    std::fs::write(path, out).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// One row per client count, one `<protocol>_ms` column per series.
pub fn export_csv(path: &Path, report: &LatencyReport) -> Result<()> {
    ensure_parent(path)?;
    let mut w =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;

    let mut header = vec!["clients".to_string()];
    header.extend(report.series.iter().map(|s| format!("{}_ms", s.protocol)));
    w.write_record(&header)?;

    for (idx, count) in report.client_counts.iter().enumerate() {
        let mut row = vec![count.to_string()];
        for s in &report.series {
            row.push(
                s.buckets
                    .get(idx)
                    .map(|b| format!("{:.3}", duration_ms(b.average)))
                    .unwrap_or_default(),
            );
        }
        w.write_record(&row)?;
    }
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
