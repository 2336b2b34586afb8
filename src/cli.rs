use crate::engine::AnalysisEngine;
use crate::model::{ClientRange, LatencyReport, PlotConfig, SampleUnit};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "latency-plot",
    version,
    about = "Compare TCP, QUIC and UDP benchmark latencies per client count"
)]
pub struct Cli {
    /// Directory holding TCP/, QUIC/ and UDP/ subdirectories of <count>_clients.csv files
    pub base_dir: PathBuf,

    /// First client count
    #[arg(long, default_value_t = 20)]
    pub clients_start: u32,

    /// Last client count (inclusive)
    #[arg(long, default_value_t = 200)]
    pub clients_end: u32,

    /// Distance between client counts
    #[arg(long, default_value_t = 20)]
    pub clients_step: u32,

    /// Unit of the raw timing values in the CSV files
    #[arg(long, value_enum, default_value_t = SampleUnit::Microseconds)]
    pub sample_unit: SampleUnit,

    /// Draw the QUIC series too (it is always read and averaged)
    #[arg(long)]
    pub plot_quic: bool,

    /// Print JSON report and exit (no TUI)
    #[arg(long, conflicts_with = "text")]
    pub json: bool,

    /// Print text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Export the report as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Export the averaged series as CSV
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Log progress to stderr (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Build a validated `PlotConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> Result<PlotConfig> {
    if args.clients_step == 0 {
        anyhow::bail!("--clients-step must be greater than zero");
    }
    if args.clients_start == 0 {
        anyhow::bail!("--clients-start must be greater than zero");
    }
    if args.clients_start > args.clients_end {
        anyhow::bail!(
            "--clients-start ({}) must not exceed --clients-end ({})",
            args.clients_start,
            args.clients_end
        );
    }
    Ok(PlotConfig {
        base_dir: args.base_dir.clone(),
        clients: ClientRange {
            start: args.clients_start,
            end: args.clients_end,
            step: args.clients_step,
        },
        sample_unit: args.sample_unit,
        plot_quic: args.plot_quic,
    })
}

pub fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args)?;
    info!(
        "Reading {} buckets per protocol from {}",
        cfg.clients.len(),
        cfg.base_dir.display()
    );

    // Every bucket is read before anything is printed or drawn.
    let report = AnalysisEngine::new(cfg).run()?;

    handle_exports(&args, &report)?;

    if args.json {
        let out = serde_json::to_string_pretty(&report)?;
        println!("{out}");
        return Ok(());
    }

    if !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(&report);
        }
    }

    run_text(&report)
}

fn run_text(report: &LatencyReport) -> Result<()> {
    let summary = crate::text_summary::build_text_summary(report);
    let stdout = std::io::stdout();
    let mut out = std::io::LineWriter::new(stdout.lock());
    for line in summary.lines {
        writeln!(out, "{line}").context("write summary")?;
    }
    out.flush().context("flush summary")?;
    Ok(())
}

/// Handle export operations (JSON and CSV) for every output mode.
fn handle_exports(args: &Cli, report: &LatencyReport) -> Result<()> {
    if let Some(p) = args.export_json.as_deref() {
        crate::storage::export_json(p, report)?;
        info!("Exported JSON: {}", p.display());
    }
    if let Some(p) = args.export_csv.as_deref() {
        crate::storage::export_csv(p, report)?;
        info!("Exported CSV: {}", p.display());
    }
    Ok(())
}
