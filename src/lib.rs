//! Perfherder graph backend: fetches performance series from Treeherder,
//! merges and windows them, and serves chart payloads plus per-chart
//! interactive state over HTTP.

pub mod api;
pub mod app_state;
pub mod core;
pub mod debug;
pub mod domain;
pub mod errors;
pub mod routes;
