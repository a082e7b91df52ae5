//! Graph API DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::perf::model::{Reference, SeriesConfig, SeriesDescriptor, SeriesOptions, TimeDomain};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GraphSeriesRequest {
    #[validate(length(min = 1))]
    pub label: String,
    #[validate(nested)]
    pub series_config: SeriesConfig,
    pub options: Option<SeriesOptions>,
}

impl From<GraphSeriesRequest> for SeriesDescriptor {
    fn from(req: GraphSeriesRequest) -> Self {
        Self {
            label: req.label,
            series_config: req.series_config,
            options: req.options,
        }
    }
}

/// One chart: its lines, optional reference line and time window.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GraphRequest {
    pub title: Option<String>,
    #[validate(length(min = 1), nested)]
    pub series: Vec<GraphSeriesRequest>,
    pub reference: Option<Reference>,
    /// Falls back to the configured default window.
    #[validate(nested)]
    pub time_domain: Option<TimeDomain>,
}

impl GraphRequest {
    pub fn descriptors(&self) -> Vec<SeriesDescriptor> {
        self.series.iter().cloned().map(SeriesDescriptor::from).collect()
    }
}

/// Chart hover event: which point the pointer is over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TooltipHoverRequest {
    pub dataset_index: usize,
    pub point_index: usize,
    /// Pointer position on the canvas, passed back untouched.
    pub caret_x: Option<f64>,
    pub caret_y: Option<f64>,
}
