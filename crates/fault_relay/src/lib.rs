#![forbid(unsafe_code)]
//! In-process fault capture for host applications.
//!
//! Intercepts the host's runtime errors, uncaught exceptions, and fatal
//! termination events, normalizes each into a [`FaultEvent`], tags it with a
//! deterministic [`fingerprint`] for downstream deduplication, enriches it
//! with environment context, and relays it to a collection endpoint with a
//! bounded, fire-and-forget POST.
//!
//! The agent is deliberately lossy: there is no retry, no queue, and no
//! failure mode visible to the host. A telemetry path that can crash or slow
//! the very application it watches is worse than dropped telemetry.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fault_relay::{AgentConfig, FaultAgent, HostContext};
//!
//! # async fn boot(registrar: &mut dyn fault_relay::HookRegistrar) -> Result<(), fault_relay::AgentError> {
//! let config = AgentConfig::builder()
//!     .endpoint("http://127.0.0.1:3000/api/faults")
//!     .build()?;
//! let agent = Arc::new(FaultAgent::new(config, Arc::new(HostContext::default()))?);
//! agent.install(registrar);
//! # Ok(()) }
//! ```
//!
//! The host collaborators stay outside this crate: a [`HookRegistrar`] wires
//! the three hooks into the host's error handling, and a [`ContextProvider`]
//! supplies site/runtime/component metadata at enrichment time.

mod category;
mod config;
mod context;
mod delivery;
mod error;
mod event;
mod fingerprint;
mod hooks;

pub use category::{classify, codes, FaultCategory, SeverityMask};
pub use config::{
    AgentConfig, AgentConfigBuilder, ShutdownPolicy, DEFAULT_DISPATCH_TIMEOUT,
    DEFAULT_MAX_IN_FLIGHT,
};
pub use context::{ContextProvider, HostContext, ThemeDescriptor};
pub use delivery::DeliveryClient;
pub use error::AgentError;
pub use event::{ExceptionFault, FaultEvent, LastError, RuntimeFault, StackFrame};
pub use fingerprint::fingerprint;
pub use hooks::{ErrorHook, ExceptionHook, FaultAgent, HookRegistrar, ShutdownHook};
