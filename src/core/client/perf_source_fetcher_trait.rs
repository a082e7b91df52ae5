use anyhow::Result;
use async_trait::async_trait;

use crate::domain::perf::model::{SeriesConfig, Source};

/// Resolves a series query into the raw data streams behind it.
#[async_trait]
pub trait PerfSourceFetcher: Send + Sync {
    async fn fetch_sources(&self, config: &SeriesConfig) -> Result<Vec<Source>>;
}
