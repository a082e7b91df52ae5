use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::graph_dto::{GraphRequest, TooltipHoverRequest};
use crate::core::state::runtime::graph::graph_runtime_state::{
    GraphSession, GraphSessionSummary, TooltipState,
};
use crate::core::state::runtime::graph::graph_runtime_state_manager::GraphRuntimeStateManager;
use crate::core::state::runtime::graph::graph_runtime_state_repository::GraphRuntimeStateRepository;
use crate::domain::perf::error::PerfGraphError;
use crate::domain::perf::service::perf_graph_service::PerfGraphService;

pub type GraphStateManager = GraphRuntimeStateManager<GraphRuntimeStateRepository>;

/// Server-held chart instances: load in the background, track tooltip state.
pub struct GraphSessionService {
    graph: Arc<PerfGraphService>,
    manager: Arc<GraphStateManager>,
}

impl GraphSessionService {
    pub fn new(graph: Arc<PerfGraphService>, manager: Arc<GraphStateManager>) -> Self {
        Self { graph, manager }
    }

    pub async fn create(&self, request: GraphRequest) -> Result<GraphSession> {
        request.validate()?;
        let (session, generation) = self.manager.create(request).await;
        self.spawn_load(session.id, generation, session.request.clone());
        Ok(session)
    }

    /// Refetch a session. A session already loading is returned unchanged.
    pub async fn reload(&self, id: Uuid) -> Result<GraphSession> {
        match self.manager.begin_reload(id).await {
            None => Err(PerfGraphError::SessionNotFound(id).into()),
            Some(Some((session, generation))) => {
                self.spawn_load(id, generation, session.request.clone());
                Ok(session)
            }
            Some(None) => self.get(id).await,
        }
    }

    fn spawn_load(&self, id: Uuid, generation: u64, request: GraphRequest) {
        let graph = self.graph.clone();
        let manager = self.manager.clone();

        tokio::spawn(async move {
            let result = graph.load(&request).await.map_err(|e| {
                warn!(%id, error = %format!("{:#}", e), "graph load failed");
                format!("{:#}", e)
            });
            if manager.finish_load(id, generation, result).await {
                info!(%id, generation, "graph load finished");
            }
        });
    }

    pub async fn get(&self, id: Uuid) -> Result<GraphSession> {
        self.manager
            .get(id)
            .await
            .ok_or_else(|| PerfGraphError::SessionNotFound(id).into())
    }

    pub async fn list(&self) -> Result<Vec<GraphSessionSummary>> {
        Ok(self.manager.list().await)
    }

    pub async fn click(&self, id: Uuid) -> Result<TooltipState> {
        self.manager
            .toggle_tooltip_lock(id)
            .await
            .ok_or_else(|| PerfGraphError::SessionNotFound(id).into())
    }

    pub async fn hover(&self, id: Uuid, hover: TooltipHoverRequest) -> Result<TooltipState> {
        self.manager
            .hover(id, hover)
            .await
            .ok_or_else(|| PerfGraphError::SessionNotFound(id).into())
    }

    pub async fn remove(&self, id: Uuid) -> Result<GraphSessionSummary> {
        self.manager
            .remove(id)
            .await
            .ok_or_else(|| PerfGraphError::SessionNotFound(id).into())
    }

    /// Every `every`, drop sessions no client has touched for `ttl`.
    pub fn spawn_idle_sweep(&self, ttl: Duration, every: Duration) -> JoinHandle<()> {
        let manager = self.manager.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = manager.evict_idle(ttl).await;
                if !evicted.is_empty() {
                    info!(count = evicted.len(), ttl_secs = ttl.as_secs(), "evicted idle graph sessions");
                }
            }
        })
    }
}
