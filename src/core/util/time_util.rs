use chrono::{DateTime, NaiveTime, Utc};

pub struct TimeUtil;

impl TimeUtil {
    /// Midnight (UTC) of the given instant's day.
    #[inline]
    pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
        at.date_naive().and_time(NaiveTime::MIN).and_utc()
    }

    /// Midnight (UTC) of the current day.
    #[inline]
    pub fn today() -> DateTime<Utc> {
        Self::start_of_day(Utc::now())
    }
}
