use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use cf_ledger::Identity;
use chrono::Utc;
use tokio::sync::watch;

use crate::{
    model::{ProjectSnapshot, ProjectViewModel},
    query::{self, DashboardStats},
    trigger::Trigger,
};

/// Application state shared with views. The sync service and the identity
/// watcher are its only writers; views read through [`StoreReader`].
pub struct SyncStore {
    projects_tx: watch::Sender<Arc<ProjectSnapshot>>,
    identity_tx: watch::Sender<Option<Identity>>,
    generation: AtomicU64,
}

impl SyncStore {
    pub fn new() -> Self {
        let (projects_tx, _) = watch::channel(Arc::new(ProjectSnapshot::default()));
        let (identity_tx, _) = watch::channel(None);
        Self {
            projects_tx,
            identity_tx,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> StoreReader {
        StoreReader {
            projects_rx: self.projects_tx.subscribe(),
            identity_rx: self.identity_tx.subscribe(),
        }
    }

    pub fn snapshot(&self) -> Arc<ProjectSnapshot> {
        self.projects_tx.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity_tx.borrow().clone()
    }

    pub(crate) fn publish_projects(
        &self,
        trigger: &Trigger,
        projects: Vec<ProjectViewModel>,
    ) -> Arc<ProjectSnapshot> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(ProjectSnapshot::new(
            &generation,
            &Utc::now(),
            trigger,
            projects,
        ));
        self.projects_tx.send_replace(snapshot.clone());
        snapshot
    }

    /// Returns the identity that was replaced.
    pub(crate) fn publish_identity(&self, identity: Identity) -> Option<Identity> {
        self.identity_tx.send_replace(Some(identity))
    }
}

impl Default for SyncStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct StoreReader {
    projects_rx: watch::Receiver<Arc<ProjectSnapshot>>,
    identity_rx: watch::Receiver<Option<Identity>>,
}

impl StoreReader {
    pub fn snapshot(&self) -> Arc<ProjectSnapshot> {
        self.projects_rx.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity_rx.borrow().clone()
    }

    /// Waits for the next published snapshot. Fails once the store is dropped.
    pub async fn changed(&mut self) -> Result<Arc<ProjectSnapshot>, watch::error::RecvError> {
        self.projects_rx.changed().await?;
        Ok(self.projects_rx.borrow_and_update().clone())
    }

    pub fn my_projects(&self) -> Vec<ProjectViewModel> {
        let identity = self.identity();
        let snapshot = self.snapshot();
        match identity.as_ref().and_then(|identity| identity.account()) {
            Some(account) => query::owned_by(snapshot.projects(), account)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn my_stats(&self) -> DashboardStats {
        DashboardStats::compute(self.my_projects().iter())
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;

    fn project(id: u64, owner: &str) -> ProjectViewModel {
        ProjectViewModel::new(
            &id,
            owner,
            "Title",
            "",
            &BigUint::from(10u8),
            &BigUint::from(5u8),
            &false,
        )
    }

    #[tokio::test]
    async fn readers_see_whole_snapshots_in_order() {
        let store = SyncStore::new();
        let mut reader = store.subscribe();
        assert_eq!(reader.snapshot().generation(), &0);
        assert!(reader.snapshot().synced_at().is_none());

        store.publish_projects(&Trigger::Mount, vec![project(0, "0xa"), project(1, "0xb")]);
        let snapshot = reader.changed().await.unwrap();
        assert_eq!(snapshot.generation(), &1);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.trigger(), &Some(Trigger::Mount));

        store.publish_projects(&Trigger::Interval, vec![project(0, "0xa")]);
        assert_eq!(reader.changed().await.unwrap().generation(), &2);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn publishing_without_readers_still_updates() {
        let store = SyncStore::new();
        store.publish_projects(&Trigger::Manual, vec![project(0, "0xa")]);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn my_projects_follow_identity() {
        let store = SyncStore::new();
        let reader = store.subscribe();
        store.publish_projects(
            &Trigger::Mount,
            vec![project(0, "0xaa"), project(1, "0xbb"), project(2, "0xaa")],
        );
        assert!(reader.my_projects().is_empty());

        let previous = store.publish_identity(Identity::new(Some("0xAA"), &1));
        assert!(previous.is_none());

        let mine = reader.my_projects();
        assert_eq!(mine.iter().map(|project| *project.id()).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(reader.my_stats().total_projects(), &2);
    }
}
