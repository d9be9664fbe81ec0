use std::path::PathBuf;

use thiserror::Error;

/// Errors that may occur while configuring or booting the agent.
///
/// Nothing here can surface after installation: once the hooks are
/// registered, every failure inside the capture pipeline degrades to
/// dropping the affected telemetry event.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("collection endpoint must not be empty")]
    EmptyEndpoint,
    #[error("collection endpoint `{endpoint}` is not an http(s) URL")]
    InvalidEndpoint { endpoint: String },
    #[error("failed to read config file `{path}`: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {source}")]
    ConfigDecode {
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown shutdown policy `{value}` (expected `fatal_class_only` or `report_any`)")]
    InvalidShutdownPolicy { value: String },
    #[error("fault agent must be created inside a tokio runtime or given an explicit handle")]
    NoRuntime,
    #[error("failed to build delivery HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
