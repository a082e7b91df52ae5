use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::perf::dto::chart_payload_dto::{
    AxisLabel, ChartData, ChartOptions, ChartPayload, ChartPoint, Dataset, DatasetStyle,
    TooltipOptions,
};
use crate::domain::perf::error::PerfGraphError;
use crate::domain::perf::model::{MergedSeries, Reference, Series, TimeDomain};
use crate::domain::perf::service::joint_url::build_joint_url;
use crate::domain::perf::service::range_bucket::{resolve_timerange, TimerangePolicy};
use crate::domain::perf::service::source_merger::merge_all;

/// Everything the builder needs besides the data itself.
#[derive(Debug, Clone)]
pub struct PayloadContext<'a> {
    pub base_url: &'a str,
    pub now: DateTime<Utc>,
    pub policy: TimerangePolicy,
}

/// Polarity shared by every source of the chart.
///
/// A chart has a single y axis, so mixing lower-is-better and
/// higher-is-better sources is rejected. With no sources at all the chart
/// reads as lower-is-better.
pub fn chart_polarity(series: &[Series]) -> Result<bool, PerfGraphError> {
    let mut lower = Vec::new();
    let mut higher = Vec::new();

    for s in series {
        for source in &s.sources {
            let bucket = if source.meta.lower_is_better { &mut lower } else { &mut higher };
            if !bucket.contains(&s.label) {
                bucket.push(s.label.clone());
            }
        }
    }

    match (lower.is_empty(), higher.is_empty()) {
        (false, false) => Err(PerfGraphError::MixedPolarity { lower, higher }),
        (true, false) => Ok(false),
        _ => Ok(true),
    }
}

pub fn initial_options(lower_is_better: bool, domain: &TimeDomain) -> ChartOptions {
    ChartOptions {
        reverse: !lower_is_better,
        tooltips: TooltipOptions { enabled: false },
        y_label: AxisLabel::for_polarity(lower_is_better),
        x_min: domain.min,
        x_max: domain.max,
    }
}

pub fn to_dataset(merged: &MergedSeries) -> Dataset {
    Dataset {
        label: merged.label.clone(),
        series_config: Some(merged.series_config.clone()),
        options: merged.options.clone(),
        meta: merged.meta.clone(),
        data: merged
            .data
            .iter()
            .filter_map(|p| p.instant().map(|x| ChartPoint { x, y: p.value }))
            .collect(),
        style: None,
    }
}

/// Append a flat line at `reference.value` spanning every plotted point.
///
/// Returns whether a line was added: nothing happens without a value or
/// without any point to span.
pub fn append_reference_line(datasets: &mut Vec<Dataset>, reference: &Reference) -> bool {
    let Some(value) = reference.value else {
        return false;
    };

    let xs = || datasets.iter().flat_map(|d| d.data.iter().map(|p| p.x));

    let (Some(min), Some(max)) = (xs().min(), xs().max()) else {
        debug!(label = %reference.label, "no points to span, skipping reference line");
        return false;
    };

    datasets.push(Dataset {
        label: reference.label.clone(),
        series_config: None,
        options: None,
        meta: None,
        data: vec![ChartPoint { x: min, y: value }, ChartPoint { x: max, y: value }],
        style: Some(DatasetStyle::reference_line()),
    });
    true
}

/// Turn already windowed series into the payload the chart widget consumes.
pub fn build_chart_payload(
    series: &[Series],
    domain: &TimeDomain,
    reference: Option<&Reference>,
    ctx: &PayloadContext<'_>,
) -> Result<ChartPayload> {
    let lower_is_better = chart_polarity(series)?;
    let merged = merge_all(series);

    let mut datasets: Vec<Dataset> = merged.iter().map(to_dataset).collect();
    if let Some(reference) = reference {
        append_reference_line(&mut datasets, reference);
    }

    let joint_url = resolve_timerange(domain.min, ctx.now, ctx.policy)
        .map(|timerange| build_joint_url(ctx.base_url, timerange, series));

    Ok(ChartPayload {
        options: initial_options(lower_is_better, domain),
        joint_url,
        data: ChartData { datasets },
        series: merged,
    })
}
