use super::bucket::read_bucket;
use crate::error::BucketError;
use crate::model::{BucketAverage, ClientRange, SampleUnit};
use std::path::Path;
use tracing::debug;

/// Average every bucket of one protocol directory, in ascending client-count order.
///
/// The first bucket that cannot be read or averaged aborts the whole series.
pub fn compute_series(
    dir: &Path,
    clients: &ClientRange,
    unit: SampleUnit,
) -> Result<Vec<BucketAverage>, BucketError> {
    let mut series = Vec::with_capacity(clients.len());
    for client_count in clients.iter() {
        let path = dir.join(ClientRange::bucket_file_name(client_count));
        let bucket = read_bucket(&path, client_count)?;
        let average = bucket.average(&path, unit)?;
        debug!(
            "{} clients: {} samples, avg {}",
            client_count,
            bucket.samples.len(),
            humantime::format_duration(average)
        );
        series.push(BucketAverage {
            client_count,
            average,
            samples: bucket.samples.len(),
        });
    }
    Ok(series)
}
