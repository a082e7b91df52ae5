// Perfherder data sources
pub mod perf_source_fetcher_trait;
pub mod treeherder_client;
pub mod treeherder_dto;
