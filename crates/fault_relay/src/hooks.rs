use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::debug;

use crate::category::{codes, SeverityMask};
use crate::config::{AgentConfig, ShutdownPolicy};
use crate::context::{ContextProvider, HostContext};
use crate::delivery::DeliveryClient;
use crate::error::AgentError;
use crate::event::{ExceptionFault, FaultEvent, LastError, RuntimeFault};

pub type ErrorHook = Box<dyn Fn(&RuntimeFault) -> bool + Send + Sync>;
pub type ExceptionHook = Box<dyn Fn(&ExceptionFault) + Send + Sync>;
pub type ShutdownHook = Box<dyn Fn(Option<&LastError>) + Send + Sync>;

/// Host-side registration surface for the three capture hooks.
///
/// The host invokes the registered hooks at the matching moments: the error
/// hook from its runtime error handler, the exception hook for uncaught
/// throws, the shutdown hook during process termination.
pub trait HookRegistrar {
    /// Marks the given severities as reportable in the host's own
    /// configuration, so the error hook actually sees them.
    fn enable_reporting(&mut self, mask: SeverityMask);
    fn register_error_hook(&mut self, hook: ErrorHook);
    fn register_exception_hook(&mut self, hook: ExceptionHook);
    fn register_shutdown_hook(&mut self, hook: ShutdownHook);
}

/// The assembled capture pipeline.
///
/// Each hook runs the whole pipeline synchronously inside the host's
/// failing thread, except the network send, which is queued on the runtime
/// handle captured at boot and never awaited. Nothing a hook does can raise
/// back into the host.
pub struct FaultAgent {
    config: AgentConfig,
    provider: Arc<dyn ContextProvider>,
    delivery: DeliveryClient,
    installed: AtomicBool,
}

impl FaultAgent {
    /// Builds the agent on the ambient tokio runtime.
    pub fn new(
        config: AgentConfig,
        provider: Arc<dyn ContextProvider>,
    ) -> Result<Self, AgentError> {
        let runtime = Handle::try_current().map_err(|_| AgentError::NoRuntime)?;
        Self::with_runtime(config, provider, runtime)
    }

    /// Builds the agent on an explicit runtime handle. Use this when the
    /// host installs hooks from a thread the runtime does not own.
    pub fn with_runtime(
        config: AgentConfig,
        provider: Arc<dyn ContextProvider>,
        runtime: Handle,
    ) -> Result<Self, AgentError> {
        let delivery = DeliveryClient::new(&config, runtime)?;
        Ok(Self {
            config,
            provider,
            delivery,
            installed: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Registers the three capture hooks and enables reporting for the
    /// configured severities. Idempotent: a second install is a no-op.
    pub fn install(self: Arc<Self>, registrar: &mut dyn HookRegistrar) {
        if self.installed.swap(true, Ordering::SeqCst) {
            debug!("capture hooks already installed");
            return;
        }
        registrar.enable_reporting(self.config.severity_mask);

        let agent = Arc::clone(&self);
        registrar.register_error_hook(Box::new(move |fault| agent.on_runtime_error(fault)));
        let agent = Arc::clone(&self);
        registrar
            .register_exception_hook(Box::new(move |fault| agent.on_uncaught_exception(fault)));
        registrar.register_shutdown_hook(Box::new(move |last| self.on_shutdown(last)));
    }

    /// Runtime-error hook. Returns the "handled" flag for the host, which
    /// is always `false`: the host's default error display and logging
    /// proceed whether or not an event was captured.
    pub fn on_runtime_error(&self, fault: &RuntimeFault) -> bool {
        if !self.config.severity_mask.contains(fault.raw_code) {
            return false;
        }
        self.report(FaultEvent::from_runtime(fault));
        false
    }

    /// Uncaught-exception hook. Exceptions are always reported; there is no
    /// severity gate.
    pub fn on_uncaught_exception(&self, fault: &ExceptionFault) {
        self.report(FaultEvent::from_exception(fault));
    }

    /// Shutdown hook. Reports the host's last-recorded error when the
    /// configured [`ShutdownPolicy`] admits it.
    pub fn on_shutdown(&self, last_error: Option<&LastError>) {
        let Some(last) = last_error else {
            return;
        };
        if !self.shutdown_reportable(last) {
            debug!(
                raw_code = last.raw_code,
                "last error outside shutdown reporting policy"
            );
            return;
        }
        self.report(FaultEvent::from_shutdown(last));
    }

    fn shutdown_reportable(&self, last: &LastError) -> bool {
        match self.config.shutdown_policy {
            ShutdownPolicy::ReportAny => !last.message.is_empty() || last.raw_code != 0,
            ShutdownPolicy::FatalClassOnly => codes::FATAL_CLASS.contains(&last.raw_code),
        }
    }

    // Fingerprint first, context second: the dedup key is derived from the
    // identity fields alone and stays fixed through enrichment.
    fn report(&self, event: FaultEvent) {
        let event = event
            .with_fingerprint()
            .with_context(HostContext::collect(self.provider.as_ref()));
        self.delivery.dispatch(event);
    }
}
