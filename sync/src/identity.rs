use std::{sync::Arc, time::Duration};

use cf_ledger::{Identity, IdentityProvider};
use tokio::{select, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::{
    store::SyncStore,
    trigger::{Trigger, TriggerSender},
};

pub struct IdentityWatcher {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<SyncStore>,
    triggers: TriggerSender,
    poll_interval: Duration,
}

impl IdentityWatcher {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<SyncStore>,
        triggers: TriggerSender,
        poll_interval: &Duration,
    ) -> Self {
        cf_log::info(Some("⚡"), "[IdentityWatcher] Initializing component");

        Self {
            provider,
            store,
            triggers,
            poll_interval: *poll_interval,
        }
    }

    pub fn run(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        cf_log::info(Some("💫"), "[IdentityWatcher] Running component");

        tokio::spawn((|| async move {
            loop {
                self.poll().await;

                select! {
                    _ = cancel_token.cancelled() => break,
                    _ = time::sleep(self.poll_interval) => (),
                }
            }

            cf_log::info(None, "[IdentityWatcher] Shutting down component");
        })())
    }

    async fn poll(&self) {
        match self.provider.identity().await {
            Ok(identity) => {
                self.observe(identity);
            }
            Err(err) => cf_log::warn(
                None,
                format!("[IdentityWatcher] Reading wallet identity failed: {err}"),
            ),
        }
    }

    pub fn observe(&self, identity: Identity) -> Vec<Trigger> {
        let previous = self.store.publish_identity(identity.clone());
        let changes = changes(previous.as_ref(), &identity);

        for trigger in &changes {
            cf_log::info(
                None,
                format!(
                    "[IdentityWatcher] Detected {trigger} (account: {}, chain: {})",
                    identity.account().unwrap_or("none"),
                    identity.chain_id()
                ),
            );
            if let Err(err) = self.triggers.send(*trigger) {
                cf_log::warn(
                    None,
                    format!("[IdentityWatcher] Requesting refresh failed: {err}"),
                );
            }
        }

        changes
    }
}

fn changes(previous: Option<&Identity>, next: &Identity) -> Vec<Trigger> {
    let mut changes = Vec::new();
    let previous_account = previous.and_then(|identity| identity.account());

    match (previous_account, next.account()) {
        (None, Some(_)) => changes.push(Trigger::WalletConnected),
        (Some(before), Some(after)) if before != after => changes.push(Trigger::AccountChanged),
        (Some(_), None) => changes.push(Trigger::AccountChanged),
        _ => (),
    }

    if previous.is_some_and(|previous| previous.chain_id() != next.chain_id()) {
        changes.push(Trigger::NetworkChanged);
    }

    changes
}
