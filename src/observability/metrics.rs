//! Counters and histograms for both pipelines.
//!
//! Recording goes through the `metrics` facade, so calls are no-ops until a
//! recorder is installed with [`init`].

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    LookupsSuccess,
    LookupsFailed,
    LookupsSkipped,
    PhotosPerPlace,
    RowsWritten,
    MergeRows,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::LookupsSuccess => "enricher_lookups_success_total",
            MetricName::LookupsFailed => "enricher_lookups_failed_total",
            MetricName::LookupsSkipped => "enricher_lookups_skipped_total",
            MetricName::PhotosPerPlace => "enricher_photos_per_place",
            MetricName::RowsWritten => "enricher_rows_written_total",
            MetricName::MergeRows => "merge_rows_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        [
            MetricName::LookupsSuccess,
            MetricName::LookupsFailed,
            MetricName::LookupsSkipped,
            MetricName::PhotosPerPlace,
            MetricName::RowsWritten,
            MetricName::MergeRows,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder. The returned handle renders the current
/// snapshot in text exposition format.
pub fn init() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    tracing::debug!("Metrics recorder installed");
    Ok(handle)
}

// ============================================================================
// Lookup Metrics
// ============================================================================

pub mod lookup {
    use super::MetricName;

    pub fn success() {
        ::metrics::counter!(MetricName::LookupsSuccess.as_str()).increment(1);
    }

    pub fn failed() {
        ::metrics::counter!(MetricName::LookupsFailed.as_str()).increment(1);
    }

    /// Empty business name, no request issued
    pub fn skipped() {
        ::metrics::counter!(MetricName::LookupsSkipped.as_str()).increment(1);
    }

    pub fn photos(count: usize) {
        ::metrics::histogram!(MetricName::PhotosPerPlace.as_str()).record(count as f64);
    }
}

// ============================================================================
// Output Metrics
// ============================================================================

pub mod output {
    use super::MetricName;

    pub fn rows_written(count: usize) {
        ::metrics::counter!(MetricName::RowsWritten.as_str()).increment(count as u64);
    }

    pub fn merge_rows(count: usize) {
        ::metrics::counter!(MetricName::MergeRows.as_str()).increment(count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique() {
        let names: HashSet<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        assert_eq!(names.len(), MetricName::all_metrics().count());
    }

    #[test]
    fn test_merge_rows_visible_in_snapshot() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            output::merge_rows(3);
            lookup::failed();
        });

        let rendered = handle.render();
        assert!(rendered.contains("merge_rows_total 3"));
        assert!(rendered.contains("enricher_lookups_failed_total 1"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        lookup::success();
        lookup::photos(3);
        output::rows_written(2);
    }
}
