use std::time::Duration;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct IdentityConfig {
    account: Option<String>,
    #[serde(
        default = "default_poll_interval",
        deserialize_with = "duration_str::deserialize_duration"
    )]
    poll_interval: Duration,
}

impl IdentityConfig {
    /// Fixed account that overrides whatever the node reports.
    pub fn account(&self) -> &Option<String> {
        &self.account
    }

    pub fn poll_interval(&self) -> &Duration {
        &self.poll_interval
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            account: None,
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}
