pub mod graph_runtime_state;
pub mod graph_runtime_state_manager;
pub mod graph_runtime_state_repository;
pub mod graph_runtime_state_repository_trait;
