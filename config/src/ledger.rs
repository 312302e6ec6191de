use std::time::Duration;

use serde::Deserialize;

/// Exactly one backend is expected; `json_rpc` wins when both are present.
#[derive(Deserialize, Debug)]
pub struct LedgerConfig {
    json_rpc: Option<JsonRpcLedgerConfig>,
    fixture: Option<FixtureLedgerConfig>,
}

impl LedgerConfig {
    pub fn json_rpc(&self) -> &Option<JsonRpcLedgerConfig> {
        &self.json_rpc
    }

    pub fn fixture(&self) -> &Option<FixtureLedgerConfig> {
        &self.fixture
    }
}

#[derive(Deserialize, Debug)]
pub struct JsonRpcLedgerConfig {
    url: String,
    contract_address: String,
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "duration_str::deserialize_duration"
    )]
    request_timeout: Duration,
}

impl JsonRpcLedgerConfig {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    pub fn request_timeout(&self) -> &Duration {
        &self.request_timeout
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

#[derive(Deserialize, Debug)]
pub struct FixtureLedgerConfig {
    path: String,
}

impl FixtureLedgerConfig {
    pub fn path(&self) -> &str {
        &self.path
    }
}
