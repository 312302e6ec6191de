use std::sync::Arc;

use cf_config::sync::{FetchErrorPolicy, SyncConfig};
use cf_error::SyncError;
use cf_ledger::LedgerReader;
use futures::{future, stream, StreamExt};
use num_traits::Zero;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::{
    decode,
    model::{Donation, ProjectSnapshot, ProjectViewModel},
    store::SyncStore,
    trigger::Trigger,
};

#[derive(Clone, Copy, Debug)]
pub struct SyncOptions {
    concurrency: usize,
    fetch_error: FetchErrorPolicy,
}

impl SyncOptions {
    pub fn new(concurrency: &usize, fetch_error: &FetchErrorPolicy) -> Self {
        Self {
            concurrency: (*concurrency).max(1),
            fetch_error: *fetch_error,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.concurrency(), config.fetch_error())
    }

    pub fn concurrency(&self) -> &usize {
        &self.concurrency
    }

    pub fn fetch_error(&self) -> &FetchErrorPolicy {
        &self.fetch_error
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

/// Mirrors the ledger's project list into a [`SyncStore`].
///
/// Each pass publishes its whole batch in one replace, so when passes
/// overlap the one that finishes last is what readers see.
pub struct ProjectSync {
    ledger: RwLock<Option<Arc<dyn LedgerReader>>>,
    store: Arc<SyncStore>,
    options: SyncOptions,
    cancel_token: CancellationToken,
}

impl ProjectSync {
    pub fn new(store: Arc<SyncStore>, options: SyncOptions, cancel_token: CancellationToken) -> Self {
        Self {
            ledger: RwLock::new(None),
            store,
            options,
            cancel_token,
        }
    }

    pub fn store(&self) -> &Arc<SyncStore> {
        &self.store
    }

    pub async fn connect(&self, ledger: Arc<dyn LedgerReader>) {
        *self.ledger.write().await = Some(ledger);
        cf_log::info(Some("🔌"), "[ProjectSync] Ledger read channel connected");
    }

    pub async fn disconnect(&self) {
        *self.ledger.write().await = None;
        cf_log::info(Some("🔌"), "[ProjectSync] Ledger read channel disconnected");
    }

    async fn ledger(&self) -> Result<Arc<dyn LedgerReader>, SyncError> {
        match self.ledger.read().await.as_ref() {
            Some(ledger) => Ok(ledger.clone()),
            None => Err(SyncError::Unavailable),
        }
    }

    pub async fn refresh(&self, trigger: Trigger) -> Result<Arc<ProjectSnapshot>, SyncError> {
        let ledger = match self.ledger().await {
            Ok(ledger) => ledger,
            Err(err) => {
                cf_log::warn(None, format!("[ProjectSync] Skipping refresh ({trigger}): {err}"));
                return Err(err);
            }
        };

        cf_log::debug(None, format!("[ProjectSync] Refreshing projects ({trigger})"));

        let projects = tokio::select! {
            _ = self.cancel_token.cancelled() => return Err(SyncError::Cancelled),
            projects = Self::collect(ledger, self.options) => projects,
        };

        let projects = match projects {
            Ok(projects) => projects,
            Err(err) => {
                cf_log::error(None, format!("[ProjectSync] Refresh ({trigger}) failed: {err}"));
                return Err(err);
            }
        };

        if self.cancel_token.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let snapshot = self.store.publish_projects(&trigger, projects);
        cf_log::info(
            None,
            format!(
                "[ProjectSync] Published {} projects (generation {}, {trigger})",
                snapshot.len(),
                snapshot.generation()
            ),
        );
        Ok(snapshot)
    }

    async fn collect(
        ledger: Arc<dyn LedgerReader>,
        options: SyncOptions,
    ) -> Result<Vec<ProjectViewModel>, SyncError> {
        let count = ledger.record_count().await?;

        Ok(stream::iter(0..count)
            .map(|id| Self::load_entry(ledger.clone(), id, options.fetch_error))
            .buffered(options.concurrency)
            .filter_map(future::ready)
            .collect::<Vec<_>>()
            .await)
    }

    async fn load_entry(
        ledger: Arc<dyn LedgerReader>,
        id: u64,
        fetch_error: FetchErrorPolicy,
    ) -> Option<ProjectViewModel> {
        let record = match ledger.record_at(id).await {
            Ok(record) => record,
            Err(err) => {
                cf_log::warn(None, format!("[ProjectSync] Fetching project #{id} failed: {err}"));
                return match fetch_error {
                    FetchErrorPolicy::Placeholder => Some(decode::placeholder(&id, None)),
                    FetchErrorPolicy::Skip => None,
                };
            }
        };

        let Some(owner) = record.owner() else {
            cf_log::debug(None, format!("[ProjectSync] Skipping project #{id} without owner"));
            return None;
        };

        match decode::decode(&id, &record) {
            Ok(project) => Some(project),
            Err(err) => {
                cf_log::warn(None, format!("[ProjectSync] Decoding project #{id} failed: {err}"));
                Some(decode::placeholder(&id, Some(owner)))
            }
        }
    }

    /// Fetches and decodes one project. Unlike [`Self::refresh`], a failed
    /// fetch is returned to the caller.
    pub async fn get_one(&self, id: u64) -> Result<ProjectViewModel, SyncError> {
        let ledger = self.ledger().await?;

        let count = ledger.record_count().await?;
        if id >= count {
            return Err(SyncError::NotFound { id });
        }

        let record = ledger.record_at(id).await?;
        let owner = record.owner().ok_or(SyncError::NotFound { id })?;

        match decode::decode(&id, &record) {
            Ok(project) => Ok(project),
            Err(err) => {
                cf_log::warn(None, format!("[ProjectSync] Decoding project #{id} failed: {err}"));
                Ok(decode::placeholder(&id, Some(owner)))
            }
        }
    }

    pub async fn donations_by(&self, donor: &str) -> Result<Vec<Donation>, SyncError> {
        let ledger = self.ledger().await?;
        let snapshot = self.store.snapshot();

        let donations = stream::iter(
            snapshot
                .projects()
                .iter()
                .filter(|project| !project.is_placeholder()),
        )
        .map(|project| {
            let ledger = ledger.clone();
            async move {
                match ledger.donation(*project.id(), donor).await {
                    Ok(amount) if !amount.is_zero() => {
                        Some(Donation::new(project.id(), project.title(), &amount))
                    }
                    Ok(_) => None,
                    Err(err) => {
                        cf_log::warn(
                            None,
                            format!(
                                "[ProjectSync] Reading donation to project #{} failed: {err}",
                                project.id()
                            ),
                        );
                        None
                    }
                }
            }
        })
        .buffered(self.options.concurrency)
        .filter_map(future::ready)
        .collect::<Vec<_>>()
        .await;

        Ok(donations)
    }
}
