use std::time::Duration;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct SyncConfig {
    #[serde(
        default = "default_interval",
        deserialize_with = "duration_str::deserialize_duration"
    )]
    interval: Duration,
    #[serde(default = "default_concurrency")]
    concurrency: usize,
    #[serde(default)]
    fetch_error: FetchErrorPolicy,
}

impl SyncConfig {
    pub fn interval(&self) -> &Duration {
        &self.interval
    }

    pub fn concurrency(&self) -> &usize {
        &self.concurrency
    }

    pub fn fetch_error(&self) -> &FetchErrorPolicy {
        &self.fetch_error
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            concurrency: default_concurrency(),
            fetch_error: FetchErrorPolicy::default(),
        }
    }
}

fn default_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_concurrency() -> usize {
    8
}

/// What a sync pass publishes for a record whose fetch failed.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorPolicy {
    #[default]
    Placeholder,
    Skip,
}
