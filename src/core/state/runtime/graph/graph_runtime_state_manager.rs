use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::api::dto::graph_dto::{GraphRequest, TooltipHoverRequest};
use crate::core::state::runtime::graph::graph_runtime_state::{
    GraphSession, GraphSessionSummary, TooltipState,
};
use crate::core::state::runtime::graph::graph_runtime_state_repository_trait::GraphRuntimeStateRepositoryTrait;
use crate::domain::perf::dto::chart_payload_dto::ChartPayload;

pub struct GraphRuntimeStateManager<R: GraphRuntimeStateRepositoryTrait> {
    pub(crate) repo: Arc<R>,
}

impl<R: GraphRuntimeStateRepositoryTrait> GraphRuntimeStateManager<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Register a new session in `Loading` and return it with its load generation.
    pub async fn create(&self, request: GraphRequest) -> (GraphSession, u64) {
        let mut session = GraphSession::new(request);
        let generation = session.start_loading().unwrap_or_default();

        let snapshot = session.clone();
        self.repo.insert(session).await;

        debug!(id = %snapshot.id, "graph session created");
        (snapshot, generation)
    }

    /// `None` when the session is unknown; `Some(None)` when it is already loading.
    pub async fn begin_reload(&self, id: Uuid) -> Option<Option<(GraphSession, u64)>> {
        self.repo
            .update_session(id, |session| {
                session.touch();
                session
                    .start_loading()
                    .map(|generation| (session.clone(), generation))
            })
            .await
    }

    pub async fn finish_load(&self, id: Uuid, generation: u64, result: Result<ChartPayload, String>) -> bool {
        self.repo
            .update_session(id, move |session| session.finish_loading(generation, result))
            .await
            .unwrap_or(false)
    }

    pub async fn toggle_tooltip_lock(&self, id: Uuid) -> Option<TooltipState> {
        self.repo
            .update_session(id, |session| {
                session.touch();
                session.toggle_tooltip_lock();
                session.tooltip.clone()
            })
            .await
    }

    pub async fn hover(&self, id: Uuid, hover: TooltipHoverRequest) -> Option<TooltipState> {
        self.repo
            .update_session(id, move |session| {
                session.touch();
                session.hover(&hover);
                session.tooltip.clone()
            })
            .await
    }

    pub async fn get(&self, id: Uuid) -> Option<GraphSession> {
        self.repo
            .update_session(id, |session| {
                session.touch();
                session.clone()
            })
            .await
    }

    pub async fn list(&self) -> Vec<GraphSessionSummary> {
        let mut list = Vec::new();
        for session in self.repo.sessions().await {
            list.push(GraphSessionSummary::from(&*session.read().await));
        }
        list.sort_by_key(|s| s.updated_at);
        list
    }

    pub async fn count(&self) -> usize {
        self.repo.count().await
    }

    pub async fn remove(&self, id: Uuid) -> Option<GraphSessionSummary> {
        let session = self.repo.remove(id).await?;
        let summary = GraphSessionSummary::from(&*session.read().await);
        Some(summary)
    }

    /// Drop sessions with no client interaction for `ttl`.
    pub async fn evict_idle(&self, ttl: Duration) -> Vec<Uuid> {
        let Some(cutoff) = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
        else {
            return Vec::new();
        };

        let evicted = self.repo.evict_idle(cutoff).await;
        for id in &evicted {
            debug!(%id, "graph session evicted");
        }
        evicted
    }
}
