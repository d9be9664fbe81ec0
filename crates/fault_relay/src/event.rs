use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::category::{classify, FaultCategory};
use crate::context::HostContext;
use crate::fingerprint::fingerprint;

/// One entry of a captured backtrace.
///
/// Frames carry location only; argument values are structurally excluded so
/// sensitive data from the host cannot ride along in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackFrame {
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// A runtime error signal as raised by the host's error handler.
#[derive(Debug, Clone)]
pub struct RuntimeFault {
    pub raw_code: u32,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub trace: Vec<StackFrame>,
}

/// An uncaught-throw signal as handed to the host's exception handler.
#[derive(Debug, Clone)]
pub struct ExceptionFault {
    pub message: String,
    pub file: String,
    pub line: u32,
    pub trace: Vec<StackFrame>,
}

/// The last error the host recorded before process termination. No trace is
/// available at this stage.
#[derive(Debug, Clone, Default)]
pub struct LastError {
    pub raw_code: u32,
    pub message: String,
    pub file: String,
    pub line: u32,
}

/// Normalized record of a single captured fault.
///
/// Built synchronously inside a capture hook, fingerprinted, enriched, then
/// handed to delivery and discarded. The identity fields never change after
/// [`FaultEvent::with_fingerprint`]; enrichment only attaches `context`.
#[derive(Debug, Clone, Serialize)]
pub struct FaultEvent {
    pub category: FaultCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_code: Option<u32>,
    pub message: String,
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<StackFrame>>,
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<HostContext>,
    pub fingerprint: String,
}

impl FaultEvent {
    /// Normalizes a runtime error signal. The severity gate belongs to the
    /// hook and has already passed by the time this runs.
    pub fn from_runtime(fault: &RuntimeFault) -> Self {
        Self {
            category: classify(fault.raw_code),
            raw_code: Some(fault.raw_code),
            message: fault.message.clone(),
            file: fault.file.clone(),
            line: fault.line,
            trace: Some(fault.trace.clone()),
            timestamp: capture_timestamp(),
            context: None,
            fingerprint: String::new(),
        }
    }

    /// Normalizes an uncaught-throw signal. Exceptions carry no raw code and
    /// are never severity-gated.
    pub fn from_exception(fault: &ExceptionFault) -> Self {
        Self {
            category: FaultCategory::Exception,
            raw_code: None,
            message: fault.message.clone(),
            file: fault.file.clone(),
            line: fault.line,
            trace: Some(fault.trace.clone()),
            timestamp: capture_timestamp(),
            context: None,
            fingerprint: String::new(),
        }
    }

    /// Normalizes the host's last-recorded error at process termination.
    pub fn from_shutdown(last: &LastError) -> Self {
        Self {
            category: FaultCategory::ShutdownFatal,
            raw_code: Some(last.raw_code),
            message: last.message.clone(),
            file: last.file.clone(),
            line: last.line,
            trace: None,
            timestamp: capture_timestamp(),
            context: None,
            fingerprint: String::new(),
        }
    }

    /// Tags the event with its dedup key, derived from the identity fields.
    pub fn with_fingerprint(mut self) -> Self {
        self.fingerprint = fingerprint(self.category, &self.message, &self.file, self.line);
        self
    }

    /// Attaches environment context. Called once, after fingerprinting.
    pub fn with_context(mut self, context: HostContext) -> Self {
        self.context = Some(context);
        self
    }
}

// Capture time, not delivery time. A pre-epoch clock degrades to zero
// rather than failing the capture.
fn capture_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
