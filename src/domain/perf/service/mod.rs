//! Perf graph pipeline: window, merge, bucket, link, payload, orchestration.

pub mod chart_payload_builder;
pub mod graph_session_service;
pub mod joint_url;
pub mod perf_graph_service;
pub mod range_bucket;
pub mod source_merger;
pub mod time_window;
