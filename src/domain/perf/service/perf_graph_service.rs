use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{debug, error};

use crate::api::dto::graph_dto::GraphRequest;
use crate::core::client::perf_source_fetcher_trait::PerfSourceFetcher;
use crate::core::util::time_util::TimeUtil;
use crate::domain::perf::dto::chart_payload_dto::ChartPayload;
use crate::domain::perf::model::{Series, SeriesDescriptor, TimeDomain};
use crate::domain::perf::service::chart_payload_builder::{build_chart_payload, PayloadContext};
use crate::domain::perf::service::range_bucket::TimerangePolicy;
use crate::domain::perf::service::time_window::filter_series;

/// Fetches, windows and merges the series of one chart.
pub struct PerfGraphService {
    fetcher: Arc<dyn PerfSourceFetcher>,
    base_url: String,
    policy: TimerangePolicy,
    default_domain_days: i64,
}

impl PerfGraphService {
    pub fn new(
        fetcher: Arc<dyn PerfSourceFetcher>,
        base_url: impl Into<String>,
        policy: TimerangePolicy,
        default_domain_days: i64,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            policy,
            default_domain_days,
        }
    }

    pub fn default_time_domain(&self) -> TimeDomain {
        TimeDomain::past_days(TimeUtil::today(), self.default_domain_days)
    }

    /// Fetch every series at once and drop points outside `domain`.
    ///
    /// One failed fetch fails the whole batch.
    pub async fn fetch_series(
        &self,
        descriptors: Vec<SeriesDescriptor>,
        domain: &TimeDomain,
    ) -> Result<Vec<Series>> {
        let fetches = descriptors.into_iter().map(|descriptor| async move {
            let sources = self.fetcher.fetch_sources(&descriptor.series_config).await?;
            debug!(label = %descriptor.label, sources = sources.len(), "fetched series");
            let series = Series::from_descriptor(descriptor, sources);
            Ok::<_, anyhow::Error>(filter_series(series, domain))
        });

        try_join_all(fetches).await
    }

    pub async fn load(&self, request: &GraphRequest) -> Result<ChartPayload> {
        self.load_at(request, TimeUtil::today()).await
    }

    /// `load` with an explicit "today", used to pick the Perfherder timerange.
    pub async fn load_at(&self, request: &GraphRequest, now: DateTime<Utc>) -> Result<ChartPayload> {
        let domain = request
            .time_domain
            .unwrap_or_else(|| self.default_time_domain());

        let series = self.fetch_series(request.descriptors(), &domain).await?;

        if !series.iter().any(Series::has_data) {
            let query = request
                .series
                .first()
                .and_then(|s| serde_json::to_string(&s.series_config).ok())
                .unwrap_or_default();
            error!(%query, "can not get data");
        }

        let ctx = PayloadContext {
            base_url: &self.base_url,
            now,
            policy: self.policy,
        };
        build_chart_payload(&series, &domain, request.reference.as_ref(), &ctx)
    }
}
