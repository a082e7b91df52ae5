pub mod graph;
pub mod system;
