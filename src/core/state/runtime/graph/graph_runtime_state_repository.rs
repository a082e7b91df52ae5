use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::state::runtime::graph::graph_runtime_state::{
    GraphRuntimeState, GraphSession, SharedGraphSession,
};
use crate::core::state::runtime::graph::graph_runtime_state_repository_trait::GraphRuntimeStateRepositoryTrait;

pub struct GraphRuntimeStateRepository {
    state: Arc<RwLock<GraphRuntimeState>>,
}

impl Default for GraphRuntimeStateRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRuntimeStateRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(GraphRuntimeState::default())),
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl GraphRuntimeStateRepositoryTrait for GraphRuntimeStateRepository {
    async fn insert(&self, session: GraphSession) {
        let mut guard = self.state.write().await;
        guard.sessions.insert(session.id, Arc::new(RwLock::new(session)));
    }

    /// The map lock is only held long enough to clone the session handle.
    async fn update_session<F, T>(&self, id: Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut GraphSession) -> T + Send,
        T: Send,
    {
        let session = self.state.read().await.sessions.get(&id).cloned()?;
        let mut guard = session.write().await;
        Some(f(&mut guard))
    }

    async fn sessions(&self) -> Vec<SharedGraphSession> {
        self.state.read().await.sessions.values().cloned().collect()
    }

    async fn remove(&self, id: Uuid) -> Option<SharedGraphSession> {
        self.state.write().await.sessions.remove(&id)
    }

    async fn count(&self) -> usize {
        self.state.read().await.sessions.len()
    }

    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Vec<Uuid> {
        let mut guard = self.state.write().await;
        let mut evicted = Vec::new();

        guard.sessions.retain(|id, session| match session.try_read() {
            Ok(s) if s.last_seen_at <= cutoff => {
                evicted.push(*id);
                false
            }
            _ => true,
        });

        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::graph_dto::GraphRequest;
    use chrono::Duration;
    use serde_json::json;

    fn session() -> GraphSession {
        let request: GraphRequest = serde_json::from_value(json!({
            "series": [{
                "label": "linux",
                "series_config": { "framework": 1, "suite": "tp5o", "platforms": ["linux64"] }
            }]
        }))
        .unwrap();
        GraphSession::new(request)
    }

    #[tokio::test]
    async fn update_mutates_in_place_and_leaves_others_alone() {
        let repo = GraphRuntimeStateRepository::new();
        let (a, b) = (session(), session());
        let (a_id, b_id) = (a.id, b.id);
        repo.insert(a).await;
        repo.insert(b).await;

        let before = repo.state.read().await.sessions.get(&b_id).cloned().unwrap();
        let locked = repo.update_session(a_id, |s| s.toggle_tooltip_lock()).await;
        assert_eq!(locked, Some(true));

        let after = repo.state.read().await.sessions.get(&b_id).cloned().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(!after.read().await.tooltip.locked);
        assert_eq!(repo.count().await, 2);
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let repo = GraphRuntimeStateRepository::new();
        assert!(repo.update_session(Uuid::new_v4(), |s| s.id).await.is_none());
        assert!(repo.remove(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn evicts_only_sessions_idle_past_cutoff() {
        let repo = GraphRuntimeStateRepository::new();
        let mut stale = session();
        stale.last_seen_at = Utc::now() - Duration::hours(2);
        let fresh = session();
        let (stale_id, fresh_id) = (stale.id, fresh.id);
        repo.insert(stale).await;
        repo.insert(fresh).await;

        let evicted = repo.evict_idle(Utc::now() - Duration::hours(1)).await;
        assert_eq!(evicted, vec![stale_id]);
        assert_eq!(repo.count().await, 1);
        assert!(repo.update_session(fresh_id, |_| ()).await.is_some());
    }

    #[tokio::test]
    async fn busy_session_survives_eviction() {
        let repo = GraphRuntimeStateRepository::new();
        let s = session();
        let id = s.id;
        repo.insert(s).await;

        let handle = repo.sessions().await.pop().unwrap();
        let held = handle.write().await;
        assert!(repo.evict_idle(Utc::now()).await.is_empty());
        drop(held);

        assert_eq!(repo.evict_idle(Utc::now()).await, vec![id]);
    }
}
