use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::event::FaultEvent;

/// Fire-and-forget JSON POST toward the collection endpoint.
///
/// `dispatch` returns before any network exchange begins; the send runs on
/// a detached task whose outcome nobody awaits. A failed send is dropped,
/// never retried. At most `max_in_flight` sends run at once; events beyond
/// the budget are dropped too.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    http: reqwest::Client,
    endpoint: String,
    runtime: Handle,
    in_flight: Arc<Semaphore>,
}

impl DeliveryClient {
    pub(crate) fn new(config: &AgentConfig, runtime: Handle) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.dispatch_timeout)
            .timeout(config.dispatch_timeout)
            .build()
            .map_err(AgentError::HttpClient)?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            runtime,
            in_flight: Arc::new(Semaphore::new(config.max_in_flight)),
        })
    }

    /// Queues one POST of the event. No status code is inspected and no
    /// response body is read; success and failure look the same to the
    /// caller by design.
    pub fn dispatch(&self, event: FaultEvent) {
        let Ok(permit) = Arc::clone(&self.in_flight).try_acquire_owned() else {
            debug!(
                fingerprint = %event.fingerprint,
                "dispatch budget exhausted, dropping fault event"
            );
            return;
        };
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        self.runtime.spawn(async move {
            let _permit = permit;
            if let Err(error) = http.post(&endpoint).json(&event).send().await {
                debug!(?error, fingerprint = %event.fingerprint, "fault delivery dropped");
            }
        });
    }
}
