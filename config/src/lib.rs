use std::fs::File;

use anyhow::{Context, Error, Result};
use serde::Deserialize;

use crate::{identity::IdentityConfig, ledger::LedgerConfig, log::LogConfig, sync::SyncConfig};

pub mod identity;
pub mod ledger;
pub mod log;
pub mod sync;

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default)]
    log: LogConfig,
    ledger: LedgerConfig,
    #[serde(default)]
    identity: IdentityConfig,
    #[serde(default)]
    sync: SyncConfig,
}

impl Config {
    pub fn log(&self) -> &LogConfig {
        &self.log
    }

    pub fn ledger(&self) -> &LedgerConfig {
        &self.ledger
    }

    pub fn identity(&self) -> &IdentityConfig {
        &self.identity
    }

    pub fn sync(&self) -> &SyncConfig {
        &self.sync
    }

    fn validate(self) -> Result<Self> {
        if self.sync.interval().is_zero() {
            return Err(Error::msg("sync.interval must be greater than zero"));
        }
        if self.identity.poll_interval().is_zero() {
            return Err(Error::msg("identity.poll_interval must be greater than zero"));
        }
        Ok(self)
    }
}

pub fn from_path(path: &str) -> Result<Config> {
    let file = File::open(path).with_context(|| format!("Failed to open config file {path}"))?;
    serde_yaml::from_reader::<_, Config>(file)
        .with_context(|| format!("Failed to parse config file {path}"))?
        .validate()
        .with_context(|| format!("Invalid config file {path}"))
}

pub fn from_str(yaml: &str) -> Result<Config> {
    serde_yaml::from_str::<Config>(yaml)?.validate()
}
