use std::sync::Arc;

use cf_ledger::{FixtureLedger, IdentityProvider, JsonRpcLedger, LedgerReader};
use cf_sync::{IdentityWatcher, ProjectSync, SyncOptions, SyncService, SyncStore};
use report::SnapshotReporter;
use tokio::signal;
use tokio_util::sync::CancellationToken;

mod config_path;
mod report;

#[tokio::main]
async fn main() {
    let config_path = config_path::get();
    let config = match cf_config::from_path(&config_path) {
        Ok(config) => config,
        Err(err) => cf_log::panic(None, format!("[CommunityFunding] {err:#}")),
    };

    if let Err(err) = cf_log::init(config.log().display_level(), config.log().level_filter()) {
        cf_log::panic(None, format!("[CommunityFunding] Initializing log failed: {err}"));
    }

    cf_log::info(Some("🚀"), "[CommunityFunding] Starting");

    let (ledger, identity): (Arc<dyn LedgerReader>, Arc<dyn IdentityProvider>) =
        if let Some(json_rpc) = config.ledger().json_rpc() {
            match JsonRpcLedger::new(
                json_rpc.url(),
                json_rpc.contract_address(),
                json_rpc.request_timeout(),
                config.identity().account().as_deref(),
            ) {
                Ok(ledger) => {
                    let ledger = Arc::new(ledger);
                    (ledger.clone(), ledger)
                }
                Err(err) => cf_log::panic(
                    None,
                    format!("[CommunityFunding] Creating JSON-RPC ledger failed: {err}"),
                ),
            }
        } else if let Some(fixture) = config.ledger().fixture() {
            match FixtureLedger::from_path(fixture.path()).await {
                Ok(ledger) => {
                    let ledger = Arc::new(ledger);
                    (ledger.clone(), ledger)
                }
                Err(err) => cf_log::panic(
                    None,
                    format!("[CommunityFunding] Loading fixture ledger failed: {err:#}"),
                ),
            }
        } else {
            cf_log::panic(None, "[CommunityFunding] No ledger configuration is specified");
        };

    let cancel_token = CancellationToken::new();

    let store = Arc::new(SyncStore::new());
    let project_sync = Arc::new(ProjectSync::new(
        store.clone(),
        SyncOptions::from_config(config.sync()),
        cancel_token.clone(),
    ));
    project_sync.connect(ledger).await;

    let reporter = SnapshotReporter::new(store.subscribe());
    let (sync_service, triggers) = SyncService::new(project_sync, config.sync().interval());
    let identity_watcher = IdentityWatcher::new(
        identity,
        store,
        triggers,
        config.identity().poll_interval(),
    );

    match tokio::try_join!(
        tokio::spawn(wait_for_shutdown(cancel_token.clone())),
        sync_service.run(cancel_token.clone()),
        identity_watcher.run(cancel_token.clone()),
        reporter.run(cancel_token.clone())
    ) {
        Ok(_) => cf_log::info(Some("👋"), "[CommunityFunding] Turned off"),
        Err(err) => {
            cf_log::warn(None, "[CommunityFunding] Shutting down all running components");
            cancel_token.cancel();
            cf_log::warn(
                Some("👋"),
                format!("[CommunityFunding] Turned off with error: {err}"),
            );
        }
    }
}

async fn wait_for_shutdown(cancel_token: CancellationToken) {
    tokio::select! {
        _ = cancel_token.cancelled() => (),
        result = signal::ctrl_c() => {
            match result {
                Ok(_) => cf_log::info(None, "[CommunityFunding] Received shutdown signal"),
                Err(err) => cf_log::error(
                    None,
                    format!("[CommunityFunding] Listening for shutdown signal failed: {err}"),
                ),
            }
            cancel_token.cancel();
        }
    }
}
