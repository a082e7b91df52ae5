//! Perf graph domain types (SeriesConfig, Source, Series, TimeDomain, MergedSeries)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::{Validate, ValidationError};

pub const DEFAULT_REPO: &str = "mozilla-central";

fn default_repo() -> String {
    DEFAULT_REPO.to_string()
}

/// Query describing which Perfherder signatures back one chart line.
///
/// Only the fetch adapter interprets it; the merge and windowing code passes
/// it through untouched.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SeriesConfig {
    #[serde(default = "default_repo")]
    #[validate(length(min = 1))]
    pub repo: String,
    pub framework: u32,
    #[validate(length(min = 1))]
    pub suite: String,
    pub test: Option<String>,
    /// One source family per platform variant (e.g. `windows10-64-shippable`).
    #[validate(length(min = 1))]
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Option collection name such as `opt` or `pgo`.
    pub option: Option<String>,
    #[serde(default)]
    pub extra_options: Vec<String>,
}

/// Per-series display options carried through to the datasets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesOptions {
    #[serde(default)]
    pub include_subtests: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Push time, unix seconds.
    pub push_timestamp: i64,
    pub value: f64,
}

impl DataPoint {
    pub fn new(push_timestamp: i64, value: f64) -> Self {
        Self { push_timestamp, value }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.push_timestamp, 0)
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub repo: String,
    /// Perfherder signature id.
    pub id: u64,
    pub framework: u32,
    pub lower_is_better: bool,
    pub signature_hash: Option<String>,
    pub platform: Option<String>,
    pub suite: Option<String>,
    pub test: Option<String>,
}

/// One fetched data stream. Point order is irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub meta: Meta,
    pub data: Vec<DataPoint>,
}

impl Source {
    pub fn latest_push(&self) -> Option<i64> {
        self.data.iter().map(|p| p.push_timestamp).max()
    }
}

/// A chart line request, before any data is fetched.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub label: String,
    pub series_config: SeriesConfig,
    pub options: Option<SeriesOptions>,
}

/// A chart line together with every source fetched for it.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub series_config: SeriesConfig,
    pub options: Option<SeriesOptions>,
    pub sources: Vec<Source>,
}

impl Series {
    pub fn from_descriptor(descriptor: SeriesDescriptor, sources: Vec<Source>) -> Self {
        Self {
            label: descriptor.label,
            series_config: descriptor.series_config,
            options: descriptor.options,
            sources,
        }
    }

    pub fn has_data(&self) -> bool {
        self.sources.iter().any(|s| !s.data.is_empty())
    }
}

/// Result of merging every source of a series.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedSeries {
    pub label: String,
    pub series_config: SeriesConfig,
    pub options: Option<SeriesOptions>,
    /// Meta of the source with the most recent point; `None` without sources.
    pub meta: Option<Meta>,
    /// Sorted ascending by `push_timestamp`.
    pub data: Vec<DataPoint>,
}

/// Inclusive time range shown on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_time_domain"))]
pub struct TimeDomain {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

fn validate_time_domain(domain: &TimeDomain) -> Result<(), ValidationError> {
    if domain.min > domain.max {
        return Err(ValidationError::new("time_domain_min_after_max"));
    }
    Ok(())
}

impl TimeDomain {
    pub fn new(min: DateTime<Utc>, max: DateTime<Utc>) -> Self {
        Self { min, max }
    }

    /// `days` whole days ending at `today`. Saturates at the earliest
    /// representable instant.
    pub fn past_days(today: DateTime<Utc>, days: i64) -> Self {
        let min = Duration::try_days(days)
            .and_then(|span| today.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { min, max: today }
    }

    pub fn includes(&self, push_timestamp: i64) -> bool {
        self.min.timestamp() <= push_timestamp && push_timestamp <= self.max.timestamp()
    }
}

/// Horizontal reference line drawn across the chart.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub label: String,
    pub value: Option<f64>,
}
