use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Time ranges Perfherder's graph view accepts, in seconds.
pub const ALLOWED_TIMERANGES: [i64; 7] = [
    SECONDS_PER_DAY,
    2 * SECONDS_PER_DAY,
    7 * SECONDS_PER_DAY,
    14 * SECONDS_PER_DAY,
    30 * SECONDS_PER_DAY,
    60 * SECONDS_PER_DAY,
    90 * SECONDS_PER_DAY,
];

/// What to do when the domain is wider than the largest allowed range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerangePolicy {
    /// Fall back to the largest range.
    #[default]
    Clamp,
    /// Drop the Perfherder link.
    Omit,
}

impl FromStr for TimerangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(TimerangePolicy::Clamp),
            "omit" => Ok(TimerangePolicy::Omit),
            other => Err(format!("unknown timerange policy {:?} (expected clamp|omit)", other)),
        }
    }
}

/// Smallest allowed range covering `now - domain_min`, if any.
pub fn best_timerange(domain_min: DateTime<Utc>, now: DateTime<Utc>) -> Option<i64> {
    let span = now.timestamp() - domain_min.timestamp();
    ALLOWED_TIMERANGES.iter().copied().find(|t| *t >= span)
}

/// `best_timerange` with the overflow policy applied.
pub fn resolve_timerange(
    domain_min: DateTime<Utc>,
    now: DateTime<Utc>,
    policy: TimerangePolicy,
) -> Option<i64> {
    match best_timerange(domain_min, now) {
        Some(t) => Some(t),
        None => {
            let span_days = (now - domain_min).num_days();
            warn!(span_days, ?policy, "time domain wider than any Perfherder timerange");
            match policy {
                TimerangePolicy::Clamp => ALLOWED_TIMERANGES.last().copied(),
                TimerangePolicy::Omit => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn zero_span_uses_one_day() {
        assert_eq!(best_timerange(now(), now()), Some(86_400));
    }

    #[test]
    fn ten_days_uses_two_weeks() {
        assert_eq!(best_timerange(now() - Duration::days(10), now()), Some(1_209_600));
    }

    #[test]
    fn exact_bucket_is_not_rounded_up() {
        assert_eq!(best_timerange(now() - Duration::days(7), now()), Some(7 * SECONDS_PER_DAY));
        assert_eq!(best_timerange(now() - Duration::days(90), now()), Some(90 * SECONDS_PER_DAY));
    }

    #[test]
    fn ninety_one_days_has_no_bucket() {
        assert_eq!(best_timerange(now() - Duration::days(91), now()), None);
    }

    #[test]
    fn overflow_policy() {
        let min = now() - Duration::days(120);
        assert_eq!(
            resolve_timerange(min, now(), TimerangePolicy::Clamp),
            Some(90 * SECONDS_PER_DAY)
        );
        assert_eq!(resolve_timerange(min, now(), TimerangePolicy::Omit), None);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Clamp".parse::<TimerangePolicy>(), Ok(TimerangePolicy::Clamp));
        assert_eq!(" omit ".parse::<TimerangePolicy>(), Ok(TimerangePolicy::Omit));
        assert!("round".parse::<TimerangePolicy>().is_err());
    }
}
