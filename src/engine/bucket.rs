use crate::error::BucketError;
use crate::model::SampleUnit;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

/// Raw timing samples read from one `<count>_clients.csv` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub client_count: u32,
    pub samples: Vec<u64>,
}

/// Read every numeric field of a bucket file. Empty fields are skipped.
pub fn read_bucket(path: &Path, client_count: u32) -> Result<Bucket, BucketError> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            BucketError::MissingFile {
                path: path.to_path_buf(),
                client_count,
                source,
            }
        } else {
            BucketError::Unreadable {
                path: path.to_path_buf(),
                client_count,
                source: source.into(),
            }
        }
    })?;
    let samples = parse_samples(file, path, client_count)?;
    Ok(Bucket {
        client_count,
        samples,
    })
}

fn parse_samples<R: Read>(
    reader: R,
    path: &Path,
    client_count: u32,
) -> Result<Vec<u64>, BucketError> {
    // Benchmark writers emit a single unquoted row; `|` is accepted as quote char.
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote(b'|')
        .trim(Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut field = 0usize;
    for record in reader.byte_records() {
        let record = record.map_err(|source| BucketError::Unreadable {
            path: path.to_path_buf(),
            client_count,
            source,
        })?;
        for raw in record.iter() {
            field += 1;
            if raw.is_empty() {
                continue;
            }
            let malformed = || BucketError::MalformedSample {
                path: path.to_path_buf(),
                client_count,
                value: String::from_utf8_lossy(raw).into_owned(),
                field,
            };
            let sample = std::str::from_utf8(raw)
                .map_err(|_| malformed())?
                .parse::<u64>()
                .map_err(|_| malformed())?;
            samples.push(sample);
        }
    }
    Ok(samples)
}

/// Arithmetic mean of `samples` as a duration, `None` when there are no samples.
pub fn average_duration(samples: &[u64], unit: SampleUnit) -> Option<Duration> {
    if samples.is_empty() {
        return None;
    }
    let sum: u128 = samples.iter().map(|&s| s as u128).sum();
    let nanos = sum * unit.nanos_per_sample() / samples.len() as u128;
    // The mean never exceeds u64::MAX samples, so whole seconds always fit in u64.
    Some(Duration::new(
        (nanos / 1_000_000_000) as u64,
        (nanos % 1_000_000_000) as u32,
    ))
}

impl Bucket {
    pub fn average(&self, path: &Path, unit: SampleUnit) -> Result<Duration, BucketError> {
        average_duration(&self.samples, unit).ok_or_else(|| BucketError::EmptyBucket {
            path: path.to_path_buf(),
            client_count: self.client_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::write_bucket;
    use tempfile::TempDir;

    fn average_of(contents: &str) -> Result<Duration, BucketError> {
        let dir = TempDir::new().unwrap();
        let path = write_bucket(dir.path(), 20, contents);
        let bucket = read_bucket(&path, 20)?;
        bucket.average(&path, SampleUnit::Microseconds)
    }

    #[test]
    fn averages_a_single_row() {
        assert_eq!(average_of("100,200,300").unwrap(), Duration::from_micros(200));
    }

    #[test]
    fn empty_fields_are_excluded_from_sum_and_count() {
        assert_eq!(average_of("100,,300").unwrap(), Duration::from_micros(200));
        assert_eq!(average_of("100,,300,\n").unwrap(), Duration::from_micros(200));
    }

    #[test]
    fn only_empty_fields_is_an_empty_bucket() {
        let err = average_of(",,,").unwrap_err();
        assert!(matches!(err, BucketError::EmptyBucket { client_count: 20, .. }));
    }

    #[test]
    fn empty_file_is_an_empty_bucket() {
        let err = average_of("").unwrap_err();
        assert!(matches!(err, BucketError::EmptyBucket { .. }));
    }

    #[test]
    fn non_numeric_field_is_malformed() {
        let err = average_of("100,abc,300").unwrap_err();
        match err {
            BucketError::MalformedSample { value, field, .. } => {
                assert_eq!(value, "abc");
                assert_eq!(field, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_sample_is_malformed() {
        let err = average_of("100,-5").unwrap_err();
        assert!(matches!(err, BucketError::MalformedSample { .. }));
    }

    #[test]
    fn invalid_utf8_field_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("20_clients.csv");
        std::fs::write(&path, b"100,\xff\xfe,300").unwrap();

        let err = read_bucket(&path, 20).unwrap_err();
        match err {
            BucketError::MalformedSample {
                client_count,
                field,
                ..
            } => {
                assert_eq!(client_count, 20);
                assert_eq!(field, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn directory_in_place_of_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("20_clients.csv");
        std::fs::create_dir(&path).unwrap();

        let err = read_bucket(&path, 20).unwrap_err();
        assert!(matches!(err, BucketError::Unreadable { client_count: 20, .. }));
        assert_eq!(err.path(), &path);
    }

    #[test]
    fn huge_averages_are_not_capped() {
        let avg = average_duration(&[20_000_000_000_000], SampleUnit::Milliseconds).unwrap();
        assert_eq!(avg.as_secs(), 20_000_000_000);
        let max = average_duration(&[u64::MAX], SampleUnit::Milliseconds).unwrap();
        assert_eq!(max.as_secs(), u64::MAX / 1_000);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("40_clients.csv");
        let err = read_bucket(&path, 40).unwrap_err();
        assert!(matches!(err, BucketError::MissingFile { client_count: 40, .. }));
        assert_eq!(err.path(), &path);
        assert!(err.to_string().contains("40_clients.csv"));
    }

    #[test]
    fn rows_and_padding_all_count_towards_the_bucket() {
        assert_eq!(
            average_of(" 100 , 200\n300,|400|\n").unwrap(),
            Duration::from_micros(250)
        );
    }

    #[test]
    fn sample_unit_scales_the_average() {
        assert_eq!(
            average_duration(&[1_000, 3_000], SampleUnit::Nanoseconds),
            Some(Duration::from_micros(2))
        );
        assert_eq!(
            average_duration(&[50, 50], SampleUnit::Milliseconds),
            Some(Duration::from_millis(50))
        );
        assert_eq!(average_duration(&[], SampleUnit::Microseconds), None);
    }
}
