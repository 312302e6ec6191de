use std::sync::Arc;

use cf_sync::{
    format::{format_ether, shorten_address},
    query::{self, SortOrder},
    ProjectSnapshot, StoreReader,
};
use tokio::{select, task::JoinHandle};
use tokio_util::sync::CancellationToken;

/// Logs every snapshot the store publishes, the way a project list view
/// would render it.
pub struct SnapshotReporter {
    reader: StoreReader,
}

impl SnapshotReporter {
    pub fn new(reader: StoreReader) -> Self {
        cf_log::info(Some("⚡"), "[SnapshotReporter] Initializing component");

        Self { reader }
    }

    pub fn run(mut self, cancel_token: CancellationToken) -> JoinHandle<()> {
        cf_log::info(Some("💫"), "[SnapshotReporter] Running component");

        tokio::spawn((|| async move {
            loop {
                select! {
                    _ = cancel_token.cancelled() => break,
                    snapshot = self.reader.changed() => match snapshot {
                        Ok(snapshot) => self.report(&snapshot),
                        Err(_) => {
                            cf_log::warn(None, "[SnapshotReporter] Store closed");
                            break;
                        }
                    },
                }
            }

            cf_log::info(None, "[SnapshotReporter] Shutting down component");
        })())
    }

    fn report(&self, snapshot: &Arc<ProjectSnapshot>) {
        let placeholders = snapshot
            .projects()
            .iter()
            .filter(|project| project.is_placeholder())
            .count();

        cf_log::info(
            Some("📦"),
            format!(
                "[SnapshotReporter] Snapshot #{} ({}) at {}: {} projects, {placeholders} unreadable",
                snapshot.generation(),
                snapshot
                    .trigger()
                    .as_ref()
                    .map(|trigger| trigger.to_string())
                    .unwrap_or_else(|| "initial".to_owned()),
                snapshot
                    .synced_at()
                    .as_ref()
                    .map(|synced_at| synced_at.to_rfc3339())
                    .unwrap_or_else(|| "never".to_owned()),
                snapshot.len(),
            ),
        );

        let mut projects = query::search(snapshot.projects(), "");
        query::sort(&mut projects, SortOrder::Newest);
        for project in projects {
            cf_log::debug(
                None,
                format!(
                    "[SnapshotReporter] #{} {} by {}: {} / {} ETH ({:.2}%){}",
                    project.id(),
                    project.title(),
                    shorten_address(project.creator()),
                    format_ether(project.amount_raised()),
                    format_ether(project.funding_goal()),
                    project.progress_percent(),
                    if *project.withdrawn() { ", withdrawn" } else { "" },
                ),
            );
        }

        if let Some(account) = self
            .reader
            .identity()
            .and_then(|identity| identity.account().map(str::to_owned))
        {
            let stats = self.reader.my_stats();
            cf_log::info(
                None,
                format!(
                    "[SnapshotReporter] {} owns {} projects, raised {} ETH (avg {} ETH), {} completed",
                    shorten_address(&account),
                    stats.total_projects(),
                    format_ether(stats.total_raised()),
                    format_ether(stats.average_raised()),
                    stats.completed_projects(),
                ),
            );
        }
    }
}
