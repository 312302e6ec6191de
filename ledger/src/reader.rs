use anyhow::Result;
use async_trait::async_trait;
use num_bigint::BigUint;

use crate::record::ProjectRecord;

/// Read channel into the funding contract's append-only project list.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn record_count(&self) -> Result<u64>;

    async fn record_at(&self, index: u64) -> Result<ProjectRecord>;

    /// Amount `donor` has given to the project at `index`, in wei.
    async fn donation(&self, index: u64, donor: &str) -> Result<BigUint>;
}

/// Source of the active account and network.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn identity(&self) -> Result<Identity>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    account: Option<String>,
    chain_id: u64,
}

impl Identity {
    pub fn new(account: Option<&str>, chain_id: &u64) -> Self {
        Self {
            account: account.map(|account| account.to_lowercase()),
            chain_id: *chain_id,
        }
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn chain_id(&self) -> &u64 {
        &self.chain_id
    }
}
