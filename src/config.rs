//! Configuration options for the shelfsync client

use shelfsync_state::CleanPolicy;
use std::time::Duration;

/// Configuration options for the shelfsync client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout, or `None` to wait indefinitely
    pub request_timeout: Option<Duration>,

    /// How values are prepared before they are sent to the server
    pub clean_policy: CleanPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            clean_policy: CleanPolicy::default(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the cleaning policy applied to outgoing state
    pub fn with_clean_policy(mut self, value: CleanPolicy) -> Self {
        self.clean_policy = value;
        self
    }
}
