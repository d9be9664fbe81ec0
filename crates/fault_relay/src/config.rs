use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use tracing::warn;

use crate::category::SeverityMask;
use crate::error::AgentError;

const ENDPOINT_ENV: &str = "FAULT_RELAY_ENDPOINT";
const TIMEOUT_MS_ENV: &str = "FAULT_RELAY_TIMEOUT_MS";
const SHUTDOWN_POLICY_ENV: &str = "FAULT_RELAY_SHUTDOWN_POLICY";

/// Bounds both connecting to and writing toward the collection endpoint.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_millis(100);
/// Dispatch tasks allowed in flight at once; events beyond it are dropped.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Which last-error records the shutdown hook reports.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Only records whose raw code is in the fatal class (uncaught fatal,
    /// parse, core-init, compile).
    #[default]
    FatalClassOnly,
    /// Any non-empty last-error record, regardless of severity.
    ReportAny,
}

impl FromStr for ShutdownPolicy {
    type Err = AgentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fatal_class_only" => Ok(ShutdownPolicy::FatalClassOnly),
            "report_any" => Ok(ShutdownPolicy::ReportAny),
            other => Err(AgentError::InvalidShutdownPolicy {
                value: other.to_string(),
            }),
        }
    }
}

/// Immutable agent configuration, constructed once at boot and injected
/// into every component.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Base URL of the collection endpoint.
    pub endpoint: String,
    /// Severities the runtime-error hook reports; disabled severities are
    /// left entirely to the host's default handling.
    pub severity_mask: SeverityMask,
    pub shutdown_policy: ShutdownPolicy,
    pub dispatch_timeout: Duration,
    pub max_in_flight: usize,
}

impl AgentConfig {
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::new()
    }

    /// Parses a TOML document. Only `endpoint` is required; everything else
    /// falls back to the defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, AgentError> {
        let file: ConfigFile =
            toml::from_str(input).map_err(|source| AgentError::ConfigDecode { source })?;
        let mut builder = AgentConfigBuilder::new().endpoint(file.endpoint);
        if let Some(bits) = file.severity_mask {
            builder = builder.severity_mask(SeverityMask::new(bits));
        }
        if let Some(policy) = file.shutdown_policy {
            builder = builder.shutdown_policy(policy);
        }
        if let Some(ms) = file.dispatch_timeout_ms {
            builder = builder.dispatch_timeout(Duration::from_millis(ms));
        }
        if let Some(limit) = file.max_in_flight {
            builder = builder.max_in_flight(limit);
        }
        builder.build()
    }

    pub fn load_toml_file(path: &Path) -> Result<Self, AgentError> {
        let input = fs::read_to_string(path).map_err(|source| AgentError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    endpoint: String,
    #[serde(default)]
    severity_mask: Option<u32>,
    #[serde(default)]
    shutdown_policy: Option<ShutdownPolicy>,
    #[serde(default)]
    dispatch_timeout_ms: Option<u64>,
    #[serde(default)]
    max_in_flight: Option<usize>,
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    endpoint: Option<String>,
    severity_mask: SeverityMask,
    shutdown_policy: ShutdownPolicy,
    dispatch_timeout: Option<Duration>,
    max_in_flight: Option<usize>,
}

impl AgentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a builder from the process environment. Unparsable values are
    /// skipped with a warning rather than failing boot.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        if let Ok(endpoint) = env::var(ENDPOINT_ENV) {
            builder = builder.endpoint(endpoint);
        }
        if let Ok(raw) = env::var(TIMEOUT_MS_ENV) {
            match raw.parse::<u64>() {
                Ok(ms) => builder = builder.dispatch_timeout(Duration::from_millis(ms)),
                Err(_) => warn!(value = %raw, "ignoring unparsable {TIMEOUT_MS_ENV}"),
            }
        }
        if let Ok(raw) = env::var(SHUTDOWN_POLICY_ENV) {
            match raw.parse::<ShutdownPolicy>() {
                Ok(policy) => builder = builder.shutdown_policy(policy),
                Err(_) => warn!(value = %raw, "ignoring unknown {SHUTDOWN_POLICY_ENV}"),
            }
        }
        builder
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn severity_mask(mut self, mask: SeverityMask) -> Self {
        self.severity_mask = mask;
        self
    }

    pub fn shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = policy;
        self
    }

    pub fn dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = Some(timeout);
        self
    }

    pub fn max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = Some(limit);
        self
    }

    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let endpoint = self.endpoint.unwrap_or_default();
        if endpoint.trim().is_empty() {
            return Err(AgentError::EmptyEndpoint);
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(AgentError::InvalidEndpoint { endpoint });
        }
        Ok(AgentConfig {
            endpoint,
            severity_mask: self.severity_mask,
            shutdown_policy: self.shutdown_policy,
            dispatch_timeout: self.dispatch_timeout.unwrap_or(DEFAULT_DISPATCH_TIMEOUT),
            max_in_flight: self.max_in_flight.unwrap_or(DEFAULT_MAX_IN_FLIGHT),
        })
    }
}
