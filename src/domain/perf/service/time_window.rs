use crate::domain::perf::model::{DataPoint, Series, Source, TimeDomain};

/// Keep only the points pushed inside `domain`, preserving order.
pub fn filter_to_domain(points: &[DataPoint], domain: &TimeDomain) -> Vec<DataPoint> {
    points
        .iter()
        .filter(|p| domain.includes(p.push_timestamp))
        .copied()
        .collect()
}

pub fn filter_source(source: Source, domain: &TimeDomain) -> Source {
    let data = filter_to_domain(&source.data, domain);
    Source { data, ..source }
}

/// Apply the window to every source of a series. Sources left empty are kept.
pub fn filter_series(series: Series, domain: &TimeDomain) -> Series {
    let sources = series
        .sources
        .into_iter()
        .map(|s| filter_source(s, domain))
        .collect();
    Series { sources, ..series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn domain(min: i64, max: i64) -> TimeDomain {
        TimeDomain::new(
            Utc.timestamp_opt(min, 0).unwrap(),
            Utc.timestamp_opt(max, 0).unwrap(),
        )
    }

    #[test]
    fn keeps_boundaries_and_drops_outside() {
        let points = vec![
            DataPoint::new(99, 1.0),
            DataPoint::new(100, 2.0),
            DataPoint::new(150, 3.0),
            DataPoint::new(200, 4.0),
            DataPoint::new(201, 5.0),
        ];

        let kept = filter_to_domain(&points, &domain(100, 200));
        let ts: Vec<i64> = kept.iter().map(|p| p.push_timestamp).collect();
        assert_eq!(ts, vec![100, 150, 200]);
    }

    #[test]
    fn empty_result_is_fine() {
        let points = vec![DataPoint::new(10, 1.0)];
        assert!(filter_to_domain(&points, &domain(100, 200)).is_empty());
    }

    proptest! {
        #[test]
        fn filter_keeps_exactly_in_range_points_in_order(
            stamps in proptest::collection::vec(0i64..1_000, 0..64),
            min in 0i64..1_000,
            width in 0i64..500,
        ) {
            let points: Vec<DataPoint> = stamps
                .iter()
                .enumerate()
                .map(|(i, t)| DataPoint::new(*t, i as f64))
                .collect();
            let max = min + width;

            let kept = filter_to_domain(&points, &domain(min, max));
            let expected: Vec<DataPoint> = points
                .iter()
                .filter(|p| min <= p.push_timestamp && p.push_timestamp <= max)
                .copied()
                .collect();

            prop_assert_eq!(kept, expected);
        }
    }
}
