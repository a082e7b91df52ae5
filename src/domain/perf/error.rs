use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PerfGraphError {
    #[error("series mix lower-is-better and higher-is-better sources: {lower:?} vs {higher:?}")]
    MixedPolarity { lower: Vec<String>, higher: Vec<String> },

    #[error("Treeherder returned {status} for {url}")]
    Upstream { status: u16, url: String },

    #[error("no option collection named {0:?}")]
    UnknownOption(String),

    #[error("graph session {0} not found")]
    SessionNotFound(Uuid),
}
