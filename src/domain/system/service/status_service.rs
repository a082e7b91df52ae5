use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::core::config::app_config::AppConfig;

pub async fn status(config: &AppConfig, started_at: DateTime<Utc>, sessions: usize) -> Result<Value> {
    let uptime = Utc::now() - started_at;
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": started_at.to_rfc3339(),
        "uptime_seconds": uptime.num_seconds(),
        "treeherder_url": config.treeherder_url,
        "default_domain_days": config.default_domain_days,
        "timerange_policy": config.timerange_policy,
        "session_ttl_secs": config.session_ttl_secs,
        "graph_sessions": sessions,
    }))
}

pub async fn health() -> Result<Value> {
    Ok(json!({ "status": "ok" }))
}
