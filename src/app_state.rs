use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::core::client::perf_source_fetcher_trait::PerfSourceFetcher;
use crate::core::client::treeherder_client::TreeherderClient;
use crate::core::config::app_config::AppConfig;
use crate::core::state::runtime::graph::graph_runtime_state_repository::GraphRuntimeStateRepository;
use crate::domain::perf::service::graph_session_service::{GraphSessionService, GraphStateManager};
use crate::domain::perf::service::perf_graph_service::PerfGraphService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub system_service: Arc<SystemService>,
    pub perf_graph_service: Arc<PerfGraphService>,
    pub graph_session_service: Arc<GraphSessionService>,
}

/// Wire the services against the real Treeherder client.
pub fn build_app_state(config: AppConfig) -> Result<AppState> {
    let fetcher = TreeherderClient::new(
        &config.treeherder_url,
        config.http_timeout(),
        config.fetch_interval_seconds(),
    )?;
    Ok(build_app_state_with_fetcher(config, Arc::new(fetcher)))
}

pub fn build_app_state_with_fetcher(config: AppConfig, fetcher: Arc<dyn PerfSourceFetcher>) -> AppState {
    let config = Arc::new(config);

    let perf_graph_service = Arc::new(PerfGraphService::new(
        fetcher,
        config.treeherder_url.clone(),
        config.timerange_policy,
        config.default_domain_days,
    ));
    let manager = Arc::new(GraphStateManager::new(GraphRuntimeStateRepository::new().shared()));

    AppState {
        system_service: Arc::new(SystemService::new(config.clone(), manager.clone())),
        graph_session_service: Arc::new(GraphSessionService::new(perf_graph_service.clone(), manager)),
        perf_graph_service,
        config,
    }
}

pub struct SystemService {
    config: Arc<AppConfig>,
    manager: Arc<GraphStateManager>,
    started_at: DateTime<Utc>,
}

impl SystemService {
    pub fn new(config: Arc<AppConfig>, manager: Arc<GraphStateManager>) -> Self {
        Self {
            config,
            manager,
            started_at: Utc::now(),
        }
    }

    pub async fn status(&self) -> Result<Value> {
        let sessions = self.manager.count().await;
        crate::domain::system::service::status_service::status(&self.config, self.started_at, sessions).await
    }

    pub async fn health(&self) -> Result<Value> {
        crate::domain::system::service::status_service::health().await
    }
}
