use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::domain::perf::service::range_bucket::{TimerangePolicy, SECONDS_PER_DAY};

pub const DEFAULT_TREEHERDER_URL: &str = "https://treeherder.mozilla.org";
pub const LOG_FILE_PREFIX: &str = "perfgraph.log";

/// Upper bound for the day-count settings; keeps date arithmetic in range.
pub const MAX_DAYS: i64 = 36_500;
/// Upper bound for the session idle TTL (30 days).
pub const MAX_SESSION_TTL_SECS: u64 = 30 * 86_400;

/// Process configuration, read once at startup from `PERFGRAPH_*` variables.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Treeherder API root, also used for Perfherder deep links.
    pub treeherder_url: String,
    /// Width of the default time domain, ending today.
    pub default_domain_days: i64,
    pub timerange_policy: TimerangePolicy,
    /// History requested from Treeherder per signature.
    pub fetch_interval_days: i64,
    pub http_timeout_ms: u64,
    /// Sessions not touched for this long are dropped by the idle sweep.
    pub session_ttl_secs: u64,
    pub session_sweep_secs: u64,
    pub log_dir: PathBuf,
    pub debug_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".into(),
            server_port: 5000,
            treeherder_url: DEFAULT_TREEHERDER_URL.into(),
            default_domain_days: 60,
            timerange_policy: TimerangePolicy::Clamp,
            fetch_interval_days: 365,
            http_timeout_ms: 30_000,
            session_ttl_secs: 1_800,
            session_sweep_secs: 60,
            log_dir: PathBuf::from("logs"),
            debug_mode: false,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("invalid value {:?} for {}", raw, key)),
        _ => Ok(default),
    }
}

fn check_range<T>(key: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(anyhow!("{} must be between {} and {}, got {}", key, min, max, value));
    }
    Ok(())
}

impl AppConfig {
    /// Read configuration from the process environment (after `.env`).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let d = Self::default();

        let config = Self {
            server_host: lookup("PERFGRAPH_SERVER_HOST").unwrap_or(d.server_host),
            server_port: parse_var(&lookup, "PERFGRAPH_SERVER_PORT", d.server_port)?,
            treeherder_url: lookup("PERFGRAPH_TREEHERDER_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(d.treeherder_url),
            default_domain_days: parse_var(&lookup, "PERFGRAPH_DEFAULT_DOMAIN_DAYS", d.default_domain_days)?,
            timerange_policy: parse_var(&lookup, "PERFGRAPH_TIMERANGE_POLICY", d.timerange_policy)?,
            fetch_interval_days: parse_var(&lookup, "PERFGRAPH_FETCH_INTERVAL_DAYS", d.fetch_interval_days)?,
            http_timeout_ms: parse_var(&lookup, "PERFGRAPH_HTTP_TIMEOUT_MS", d.http_timeout_ms)?,
            session_ttl_secs: parse_var(&lookup, "PERFGRAPH_SESSION_TTL_SECS", d.session_ttl_secs)?,
            session_sweep_secs: parse_var(&lookup, "PERFGRAPH_SESSION_SWEEP_SECS", d.session_sweep_secs)?,
            log_dir: lookup("PERFGRAPH_LOG_DIR").map(PathBuf::from).unwrap_or(d.log_dir),
            debug_mode: lookup("PERFGRAPH_DEBUG_MODE")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        check_range("PERFGRAPH_DEFAULT_DOMAIN_DAYS", config.default_domain_days, 1, MAX_DAYS)?;
        check_range("PERFGRAPH_FETCH_INTERVAL_DAYS", config.fetch_interval_days, 1, MAX_DAYS)?;
        check_range("PERFGRAPH_SESSION_TTL_SECS", config.session_ttl_secs, 1, MAX_SESSION_TTL_SECS)?;
        check_range("PERFGRAPH_SESSION_SWEEP_SECS", config.session_sweep_secs, 1, MAX_SESSION_TTL_SECS)?;

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn fetch_interval_seconds(&self) -> i64 {
        self.fetch_interval_days * SECONDS_PER_DAY
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs)
    }
}
