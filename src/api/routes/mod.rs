//! API route declarations (e.g., /api/v1/*)

pub mod graph_routes;
pub mod system_routes;
