use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn one bucket file into an average latency.
///
/// Every variant names the file and the client count it belongs to.
#[derive(Debug, Error)]
pub enum BucketError {
    #[error("missing bucket file for {client_count} clients: {}", .path.display())]
    MissingFile {
        path: PathBuf,
        client_count: u32,
        #[source]
        source: io::Error,
    },
    #[error("cannot read bucket file for {client_count} clients: {}", .path.display())]
    Unreadable {
        path: PathBuf,
        client_count: u32,
        #[source]
        source: csv::Error,
    },
    #[error("no samples in bucket file for {client_count} clients: {}", .path.display())]
    EmptyBucket { path: PathBuf, client_count: u32 },
    #[error(
        "malformed sample {value:?} at field {field} in bucket file for {client_count} clients: {}",
        .path.display()
    )]
    MalformedSample {
        path: PathBuf,
        client_count: u32,
        value: String,
        field: usize,
    },
}

impl BucketError {
    pub fn client_count(&self) -> u32 {
        match self {
            BucketError::MissingFile { client_count, .. }
            | BucketError::Unreadable { client_count, .. }
            | BucketError::EmptyBucket { client_count, .. }
            | BucketError::MalformedSample { client_count, .. } => *client_count,
        }
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            BucketError::MissingFile { path, .. }
            | BucketError::Unreadable { path, .. }
            | BucketError::EmptyBucket { path, .. }
            | BucketError::MalformedSample { path, .. } => path,
        }
    }
}
