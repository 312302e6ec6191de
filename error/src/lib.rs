use std::fmt::{self, Display};

/// Failure of a sync operation as seen by its caller.
#[derive(Debug)]
pub enum SyncError {
    /// No ledger read channel is connected.
    Unavailable,
    /// The ledger call itself failed (transport, node or payload error).
    Ledger(anyhow::Error),
    /// A single-record lookup hit an index the ledger does not hold.
    NotFound { id: u64 },
    /// The owning view was torn down before the pass finished.
    Cancelled,
}

impl SyncError {
    /// Human readable failure reason handed to views.
    pub fn reason(&self) -> String {
        match self {
            Self::Unavailable => "Ledger is not available, connect a wallet first".to_owned(),
            Self::Ledger(err) => format!("Ledger request failed: {err}"),
            Self::NotFound { id } => format!("Project #{id} does not exist"),
            Self::Cancelled => "Sync was cancelled".to_owned(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ledger(err) => {
                let source: &(dyn std::error::Error + 'static) = err.as_ref();
                Some(source)
            }
            _ => None,
        }
    }
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        Self::Ledger(err)
    }
}

/// Failure to turn one raw record into a view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    MissingOwner,
    MalformedOwner(String),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOwner => f.write_str("record has no owner"),
            Self::MalformedOwner(owner) => write!(f, "owner '{owner}' is not a 20-byte hex address"),
        }
    }
}

impl std::error::Error for DecodeError {}
