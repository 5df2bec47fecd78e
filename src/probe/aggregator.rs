use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::types::ObjectEntry;

const OBJECT_COUNT_METRIC: &str = "s3_object_count";
const OBJECT_COUNT_HELP: &str = "Total number of objects in S3 bucket";
const OBJECT_SIZE_METRIC: &str = "s3_object_size_sum_bytes";
const OBJECT_SIZE_HELP: &str = "Total size of objects in S3 bucket";

/// Derive the grouping key for an object under the request's
/// prefix/delimiter/depth.
///
/// The literal leading `prefix` is stripped from the key (keys that do not
/// start with it are used as-is), the remainder is split on `delimiter` into
/// at most `depth + 1` segments, and the first up-to-`depth` segments are
/// rejoined under the prefix with one trailing delimiter marking the group
/// as directory-style. With `depth == 0` every object collapses into the
/// request prefix verbatim.
///
/// Callers must reject an empty delimiter when `depth > 0`; splitting on an
/// empty separator has no defined segment semantics here.
pub fn synthetic_prefix(key: &str, prefix: &str, delimiter: &str, depth: usize) -> String {
    if depth == 0 {
        return prefix.to_string();
    }

    let trimmed = key.strip_prefix(prefix).unwrap_or(key);
    let segments: Vec<&str> = trimmed.splitn(depth + 1, delimiter).take(depth).collect();

    format!("{prefix}{}{delimiter}", segments.join(delimiter))
}

/// Per-request accumulator for the two probe gauge families.
///
/// Owns a registry created fresh for each probe request, so label sets from
/// one scrape cannot leak into the next. Dropped with the request after
/// [`Aggregator::render`].
pub struct Aggregator {
    registry: Registry,
    object_count: GaugeVec,
    object_size: GaugeVec,
    prefix: String,
    delimiter: String,
    depth: usize,
}

impl Aggregator {
    pub fn new(prefix: &str, delimiter: &str, depth: usize) -> prometheus::Result<Self> {
        let registry = Registry::new();

        let object_count = GaugeVec::new(
            Opts::new(OBJECT_COUNT_METRIC, OBJECT_COUNT_HELP),
            &["bucket", "prefix"],
        )?;
        let object_size = GaugeVec::new(
            Opts::new(OBJECT_SIZE_METRIC, OBJECT_SIZE_HELP),
            &["bucket", "prefix"],
        )?;

        registry.register(Box::new(object_count.clone()))?;
        registry.register(Box::new(object_size.clone()))?;

        Ok(Self {
            registry,
            object_count,
            object_size,
            prefix: prefix.to_string(),
            delimiter: delimiter.to_string(),
            depth,
        })
    }

    /// Fold one object record into the (bucket, synthetic prefix) sample
    /// pair: count += 1, size += entry.size.
    pub fn record(&self, bucket: &str, entry: &ObjectEntry) {
        let group = synthetic_prefix(&entry.key, &self.prefix, &self.delimiter, self.depth);
        let labels = [bucket, group.as_str()];

        self.object_count.with_label_values(&labels).inc();
        self.object_size
            .with_label_values(&labels)
            .add(entry.size as f64);
    }

    /// Encode the accumulated samples in the Prometheus text exposition
    /// format, consuming the request-scoped registry.
    pub fn render(self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    #[cfg(test)]
    fn sample(&self, bucket: &str, group: &str) -> (f64, f64) {
        let labels = [bucket, group];
        (
            self.object_count.with_label_values(&labels).get(),
            self.object_size.with_label_values(&labels).get(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- synthetic_prefix unit tests ---

    #[test]
    fn depth_zero_returns_prefix_verbatim() {
        assert_eq!(synthetic_prefix("a/b/1.txt", "", "/", 0), "");
        assert_eq!(synthetic_prefix("a/b/1.txt", "a/", "/", 0), "a/");
        assert_eq!(synthetic_prefix("anything", "logs/2024/", "/", 0), "logs/2024/");
    }

    #[test]
    fn depth_one_takes_first_segment() {
        assert_eq!(synthetic_prefix("a/b/1.txt", "", "/", 1), "a/");
        assert_eq!(synthetic_prefix("a/c/3.txt", "", "/", 1), "a/");
    }

    #[test]
    fn depth_two_takes_two_segments() {
        assert_eq!(synthetic_prefix("a/b/1.txt", "", "/", 2), "a/b/");
        assert_eq!(synthetic_prefix("a/c/3.txt", "", "/", 2), "a/c/");
    }

    #[test]
    fn prefix_is_stripped_before_splitting() {
        assert_eq!(synthetic_prefix("logs/2024/app/x.gz", "logs/", "/", 1), "logs/2024/");
        assert_eq!(
            synthetic_prefix("logs/2024/app/x.gz", "logs/", "/", 2),
            "logs/2024/app/"
        );
    }

    #[test]
    fn key_without_prefix_strips_nothing() {
        // Standard prefix-trim semantics: no leading match, nothing removed.
        assert_eq!(synthetic_prefix("other/file", "logs/", "/", 1), "logs/other/");
    }

    #[test]
    fn fewer_segments_than_depth_uses_all_available() {
        assert_eq!(synthetic_prefix("file.txt", "", "/", 2), "file.txt/");
        assert_eq!(synthetic_prefix("a/file.txt", "", "/", 5), "a/file.txt/");
    }

    #[test]
    fn multi_character_delimiter() {
        assert_eq!(synthetic_prefix("a::b::c", "", "::", 1), "a::");
        assert_eq!(synthetic_prefix("a::b::c", "", "::", 2), "a::b::");
    }

    #[test]
    fn grouping_is_idempotent() {
        let first = synthetic_prefix("a/b/1.txt", "", "/", 2);
        let second = synthetic_prefix("a/b/1.txt", "", "/", 2);
        assert_eq!(first, second);
    }

    // --- Aggregator tests ---

    fn record_all(aggregator: &Aggregator, bucket: &str, entries: &[(&str, i64)]) {
        for (key, size) in entries {
            aggregator.record(bucket, &ObjectEntry::new(*key, *size));
        }
    }

    #[test]
    fn depth_zero_collapses_into_single_sample() {
        let aggregator = Aggregator::new("", "", 0).unwrap();
        record_all(
            &aggregator,
            "data",
            &[("a/b/1.txt", 100), ("a/b/2.txt", 50), ("a/c/3.txt", 25)],
        );

        assert_eq!(aggregator.sample("data", ""), (3.0, 175.0));
    }

    #[test]
    fn depth_one_worked_example() {
        let aggregator = Aggregator::new("", "/", 1).unwrap();
        record_all(
            &aggregator,
            "data",
            &[("a/b/1.txt", 100), ("a/b/2.txt", 50), ("a/c/3.txt", 25)],
        );

        assert_eq!(aggregator.sample("data", "a/"), (3.0, 175.0));
    }

    #[test]
    fn depth_two_worked_example() {
        let aggregator = Aggregator::new("", "/", 2).unwrap();
        record_all(
            &aggregator,
            "data",
            &[("a/b/1.txt", 100), ("a/b/2.txt", 50), ("a/c/3.txt", 25)],
        );

        assert_eq!(aggregator.sample("data", "a/b/"), (2.0, 150.0));
        assert_eq!(aggregator.sample("data", "a/c/"), (1.0, 25.0));
    }

    #[test]
    fn buckets_do_not_share_samples() {
        let aggregator = Aggregator::new("", "", 0).unwrap();
        aggregator.record("first", &ObjectEntry::new("x", 1));
        aggregator.record("second", &ObjectEntry::new("x", 2));

        assert_eq!(aggregator.sample("first", ""), (1.0, 1.0));
        assert_eq!(aggregator.sample("second", ""), (2.0, 2.0));
    }

    #[test]
    fn render_emits_both_gauge_families() {
        let aggregator = Aggregator::new("", "/", 1).unwrap();
        aggregator.record("data", &ObjectEntry::new("a/1.txt", 7));

        let body = aggregator.render().unwrap();
        assert!(body.contains("# TYPE s3_object_count gauge"));
        assert!(body.contains("# TYPE s3_object_size_sum_bytes gauge"));
        assert!(body.contains("s3_object_count{bucket=\"data\",prefix=\"a/\"} 1"));
        assert!(body.contains("s3_object_size_sum_bytes{bucket=\"data\",prefix=\"a/\"} 7"));
    }

    #[test]
    fn render_with_no_records_has_no_samples() {
        let aggregator = Aggregator::new("", "/", 1).unwrap();
        let body = aggregator.render().unwrap();
        assert!(!body.contains("s3_object_count{"));
        assert!(!body.contains("s3_object_size_sum_bytes{"));
    }
}
