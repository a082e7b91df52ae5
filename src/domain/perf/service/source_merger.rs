use crate::domain::perf::model::{DataPoint, MergedSeries, Series};

/// Collapse every source of a series into one chronological line.
///
/// The meta of the source holding the most recent push labels the line.
/// `max_by_key` returns the last of equal maxima, so a later source wins a tie.
pub fn merge_series(series: &Series) -> MergedSeries {
    let meta = series
        .sources
        .iter()
        .max_by_key(|s| s.latest_push())
        .map(|s| s.meta.clone());

    let mut data: Vec<DataPoint> = series
        .sources
        .iter()
        .flat_map(|s| s.data.iter().copied())
        .collect();
    data.sort_by_key(|p| p.push_timestamp);

    MergedSeries {
        label: series.label.clone(),
        series_config: series.series_config.clone(),
        options: series.options.clone(),
        meta,
        data,
    }
}

pub fn merge_all(series: &[Series]) -> Vec<MergedSeries> {
    series.iter().map(merge_series).collect()
}
