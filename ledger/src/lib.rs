pub mod abi;
pub mod fixture;
pub mod json_rpc;
pub mod reader;
pub mod record;

pub use fixture::FixtureLedger;
pub use json_rpc::JsonRpcLedger;
pub use reader::{Identity, IdentityProvider, LedgerReader};
pub use record::ProjectRecord;
