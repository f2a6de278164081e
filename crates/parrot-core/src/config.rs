use std::time::Duration;

use crate::constants::DEFAULT_REPLY_DELAY_MS;

#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Simulated latency between a submission and its echoed reply
    pub reply_delay: Duration,
}

impl CoreConfig {
    pub fn new(reply_delay: Duration) -> Self {
        Self { reply_delay }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_REPLY_DELAY_MS))
    }
}
