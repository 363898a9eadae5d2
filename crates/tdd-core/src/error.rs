use thiserror::Error;

#[derive(Debug, Error)]
pub enum TddError {
    #[error("no checklist found in .mcp/: run 'tdd ensure' first")]
    ChecklistNotFound,

    #[error("progress document not found: run 'tdd scaffold' first")]
    ProgressNotFound,

    #[error("aggregator module not found: run 'tdd scaffold' first")]
    AggregatorNotFound,

    #[error("no python interpreter found on PATH")]
    NoInterpreter,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TddError>;
