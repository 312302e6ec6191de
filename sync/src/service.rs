use std::{sync::Arc, time::Duration};

use tokio::{
    select,
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    sync::ProjectSync,
    trigger::{Trigger, TriggerSender},
};

pub struct SyncService {
    sync: Arc<ProjectSync>,
    interval: Duration,
    trigger_rx: mpsc::UnboundedReceiver<Trigger>,
}

impl SyncService {
    pub fn new(sync: Arc<ProjectSync>, interval: &Duration) -> (Self, TriggerSender) {
        cf_log::info(Some("⚡"), "[SyncService] Initializing component");

        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        (
            Self {
                sync,
                interval: *interval,
                trigger_rx,
            },
            TriggerSender::new(trigger_tx),
        )
    }

    pub fn run(mut self, cancel_token: CancellationToken) -> JoinHandle<()> {
        cf_log::info(Some("💫"), "[SyncService] Running component");

        tokio::spawn((|| async move {
            let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            self.refresh(Trigger::Mount).await;

            let mut triggers_closed = false;
            loop {
                select! {
                    _ = cancel_token.cancelled() => break,
                    _ = ticker.tick() => self.refresh(Trigger::Interval).await,
                    trigger = self.trigger_rx.recv(), if !triggers_closed => match trigger {
                        Some(trigger) => {
                            let trigger = self.coalesce(trigger);
                            self.refresh(trigger).await;
                            ticker.reset();
                        }
                        None => {
                            cf_log::warn(
                                None,
                                "[SyncService] All trigger senders dropped, refreshing on interval only",
                            );
                            triggers_closed = true;
                        }
                    },
                }
            }

            cf_log::info(None, "[SyncService] Shutting down component");
        })())
    }

    /// Folds triggers that queued up while the last pass ran into one; the
    /// most recent names the pass.
    fn coalesce(&mut self, mut trigger: Trigger) -> Trigger {
        let mut folded = 0;
        while let Ok(next) = self.trigger_rx.try_recv() {
            trigger = next;
            folded += 1;
        }
        if folded > 0 {
            cf_log::debug(
                None,
                format!("[SyncService] Coalesced {folded} queued triggers into one refresh"),
            );
        }
        trigger
    }

    async fn refresh(&self, trigger: Trigger) {
        // Failures are logged by ProjectSync; the next trigger or tick retries.
        let _ = self.sync.refresh(trigger).await;
    }
}
