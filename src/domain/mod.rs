//! Business logic, independent of the HTTP layer

pub mod perf;
pub mod system;
