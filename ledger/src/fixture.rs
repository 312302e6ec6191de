use std::path::{Path, PathBuf};

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use num_bigint::BigUint;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use tokio::sync::RwLock;

use crate::{
    reader::{Identity, IdentityProvider, LedgerReader},
    record::ProjectRecord,
};

/// Ledger backed by a JSON file, for running without a node.
///
/// The file is re-read whenever the record count is requested, so edits show
/// up on the next sync pass.
pub struct FixtureLedger {
    path: PathBuf,
    fixture: RwLock<Fixture>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    #[serde(default)]
    chain_id: u64,
    account: Option<String>,
    #[serde(default)]
    projects: Vec<ProjectRecord>,
    #[serde(default)]
    donations: Vec<FixtureDonation>,
}

#[serde_as]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureDonation {
    project_id: u64,
    donor: String,
    #[serde_as(as = "DisplayFromStr")]
    amount: BigUint,
}

impl FixtureLedger {
    pub async fn from_path(path: &str) -> Result<Self> {
        let path = PathBuf::from(path);
        let fixture = Self::load(&path).await?;

        cf_log::info(
            Some("⚡"),
            format!(
                "[FixtureLedger] Loaded {} projects from {}",
                fixture.projects.len(),
                path.display()
            ),
        );

        Ok(Self {
            path,
            fixture: RwLock::new(fixture),
        })
    }

    async fn load(path: &Path) -> Result<Fixture> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixture {}", path.display()))
    }
}

#[async_trait]
impl LedgerReader for FixtureLedger {
    async fn record_count(&self) -> Result<u64> {
        let fixture = Self::load(&self.path).await?;
        let count = fixture.projects.len() as u64;
        *self.fixture.write().await = fixture;
        Ok(count)
    }

    async fn record_at(&self, index: u64) -> Result<ProjectRecord> {
        let fixture = self.fixture.read().await;
        usize::try_from(index)
            .ok()
            .and_then(|index| fixture.projects.get(index))
            .cloned()
            .ok_or_else(|| Error::msg(format!("Project index {index} is out of range")))
    }

    async fn donation(&self, index: u64, donor: &str) -> Result<BigUint> {
        let fixture = self.fixture.read().await;
        Ok(fixture
            .donations
            .iter()
            .filter(|donation| {
                donation.project_id == index && donation.donor.eq_ignore_ascii_case(donor)
            })
            .map(|donation| &donation.amount)
            .sum())
    }
}

#[async_trait]
impl IdentityProvider for FixtureLedger {
    async fn identity(&self) -> Result<Identity> {
        let fixture = self.fixture.read().await;
        Ok(Identity::new(fixture.account.as_deref(), &fixture.chain_id))
    }
}
