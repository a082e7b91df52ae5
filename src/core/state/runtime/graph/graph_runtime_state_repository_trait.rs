use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::state::runtime::graph::graph_runtime_state::{GraphSession, SharedGraphSession};

#[async_trait]
pub trait GraphRuntimeStateRepositoryTrait: Send + Sync {

    async fn insert(&self, session: GraphSession);

    /// Mutate one session under its own write lock and hand back the closure's result.
    /// `None` when the id is unknown.
    async fn update_session<F, T>(&self, id: Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut GraphSession) -> T + Send,
        T: Send;

    /// Handles to every live session.
    async fn sessions(&self) -> Vec<SharedGraphSession>;

    async fn remove(&self, id: Uuid) -> Option<SharedGraphSession>;

    async fn count(&self) -> usize;

    /// Drop sessions last seen at or before `cutoff`. Sessions whose lock is
    /// held at that moment are in use and stay.
    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Vec<Uuid>;
}
