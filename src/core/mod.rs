//! Infrastructure: configuration, outbound clients, runtime state, utils

pub mod client;
pub mod config;
pub mod state;
pub mod util;
