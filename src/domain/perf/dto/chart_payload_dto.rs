use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::domain::perf::model::{MergedSeries, Meta, SeriesConfig, SeriesOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisLabel {
    Duration,
    Score,
}

impl AxisLabel {
    pub fn for_polarity(lower_is_better: bool) -> Self {
        if lower_is_better {
            AxisLabel::Duration
        } else {
            AxisLabel::Score
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipOptions {
    pub enabled: bool,
}

/// Initial display options handed to the chart widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub reverse: bool,
    pub tooltips: TooltipOptions,
    #[serde(rename = "axis.y.label")]
    pub y_label: AxisLabel,
    #[serde(rename = "axis.x.min")]
    pub x_min: DateTime<Utc>,
    #[serde(rename = "axis.x.max")]
    pub x_max: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: DateTime<Utc>,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStyle {
    #[serde(rename = "type")]
    pub kind: String,
    pub background_color: String,
    pub border_color: String,
    pub fill: bool,
    pub point_radius: u32,
    pub point_hover_radius: u32,
    pub point_hover_background_color: String,
    pub line_tension: f64,
}

impl DatasetStyle {
    /// Flat gray line without point markers.
    pub fn reference_line() -> Self {
        Self {
            kind: "line".into(),
            background_color: "gray".into(),
            border_color: "gray".into(),
            fill: false,
            point_radius: 0,
            point_hover_radius: 0,
            point_hover_background_color: "gray".into(),
            line_tension: 0.0,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub series_config: Option<SeriesConfig>,
    pub options: Option<SeriesOptions>,
    pub meta: Option<Meta>,
    pub data: Vec<ChartPoint>,
    pub style: Option<DatasetStyle>,
}

impl Dataset {
    pub fn is_reference(&self) -> bool {
        self.style.is_some() && self.series_config.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub datasets: Vec<Dataset>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub options: ChartOptions,
    /// Perfherder graph view of the same series; absent when the time range
    /// cannot be expressed and the policy is to omit it.
    pub joint_url: Option<String>,
    pub data: ChartData,
    pub series: Vec<MergedSeries>,
}

impl ChartPayload {
    pub fn has_reference_line(&self) -> bool {
        self.data.datasets.iter().any(Dataset::is_reference)
    }
}
