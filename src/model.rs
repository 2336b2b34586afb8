use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Protocol {
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "QUIC")]
    Quic,
    #[serde(rename = "UDP")]
    Udp,
}

impl Protocol {
    /// Protocols in the order their series are computed.
    pub const ALL: [Protocol; 3] = [Protocol::Tcp, Protocol::Quic, Protocol::Udp];

    /// Name of the protocol's subdirectory under the base directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Quic => "QUIC",
            Protocol::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Inclusive arithmetic range of client counts, e.g. 20, 40, ..., 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientRange {
    pub start: u32,
    pub end: u32,
    pub step: u32,
}

impl Default for ClientRange {
    fn default() -> Self {
        Self {
            start: 20,
            end: 200,
            step: 20,
        }
    }
}

impl ClientRange {
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        // step_by panics on zero; an empty range is returned instead.
        let range = if self.step == 0 {
            1..=0
        } else {
            self.start..=self.end
        };
        range.step_by(self.step.max(1) as usize)
    }

    pub fn counts(&self) -> Vec<u32> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// File name holding the bucket for `client_count`.
    pub fn bucket_file_name(client_count: u32) -> String {
        format!("{client_count}_clients.csv")
    }
}

/// Unit the raw CSV timing values are recorded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
pub enum SampleUnit {
    #[serde(rename = "ns")]
    #[value(name = "ns")]
    Nanoseconds,
    #[default]
    #[serde(rename = "us")]
    #[value(name = "us")]
    Microseconds,
    #[serde(rename = "ms")]
    #[value(name = "ms")]
    Milliseconds,
}

impl SampleUnit {
    pub fn nanos_per_sample(self) -> u128 {
        match self {
            SampleUnit::Nanoseconds => 1,
            SampleUnit::Microseconds => 1_000,
            SampleUnit::Milliseconds => 1_000_000,
        }
    }
}

impl fmt::Display for SampleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SampleUnit::Nanoseconds => "ns",
            SampleUnit::Microseconds => "us",
            SampleUnit::Milliseconds => "ms",
        })
    }
}

#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub base_dir: PathBuf,
    pub clients: ClientRange,
    pub sample_unit: SampleUnit,
    pub plot_quic: bool,
}

impl PlotConfig {
    pub fn protocol_dir(&self, protocol: Protocol) -> PathBuf {
        self.base_dir.join(protocol.dir_name())
    }

    /// Protocols drawn on the chart. QUIC is computed regardless, but only
    /// drawn when asked for.
    pub fn plotted(&self) -> Vec<Protocol> {
        Protocol::ALL
            .into_iter()
            .filter(|p| *p != Protocol::Quic || self.plot_quic)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketAverage {
    pub client_count: u32,
    #[serde(with = "humantime_serde")]
    pub average: Duration,
    /// Number of numeric samples that went into the average.
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolSeries {
    pub protocol: Protocol,
    pub buckets: Vec<BucketAverage>,
}

impl ProtocolSeries {
    pub fn averages(&self) -> Vec<Duration> {
        self.buckets.iter().map(|b| b.average).collect()
    }

    /// (client count, average in milliseconds) pairs, ready for charting.
    pub fn points_ms(&self) -> Vec<(f64, f64)> {
        self.buckets
            .iter()
            .map(|b| (b.client_count as f64, duration_ms(b.average)))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LatencyReport {
    pub generated_at_utc: String,
    pub base_dir: PathBuf,
    pub sample_unit: SampleUnit,
    pub client_counts: Vec<u32>,
    pub series: Vec<ProtocolSeries>,
    pub plotted: Vec<Protocol>,
}

impl LatencyReport {
    pub fn series_for(&self, protocol: Protocol) -> Option<&ProtocolSeries> {
        self.series.iter().find(|s| s.protocol == protocol)
    }
}

pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}
