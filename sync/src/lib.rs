pub mod decode;
pub mod format;
pub mod identity;
pub mod model;
pub mod query;
pub mod service;
pub mod store;
pub mod sync;
pub mod trigger;

#[cfg(test)]
mod testing;

pub use identity::IdentityWatcher;
pub use model::{Donation, ProjectSnapshot, ProjectViewModel};
pub use service::SyncService;
pub use store::{StoreReader, SyncStore};
pub use sync::{ProjectSync, SyncOptions};
pub use trigger::{TransactionKind, Trigger, TriggerSender};
