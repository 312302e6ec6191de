use std::fmt::{self, Display};

use anyhow::{Error, Result};
use tokio::sync::mpsc;

/// Why a sync pass was started. Every refresh source funnels through this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Mount,
    WalletConnected,
    AccountChanged,
    NetworkChanged,
    TransactionSettled {
        kind: TransactionKind,
        succeeded: bool,
    },
    Interval,
    Manual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    Create,
    Donate,
    Withdraw,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Donate => "donate",
            Self::Withdraw => "withdraw",
        })
    }
}

impl Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mount => f.write_str("mount"),
            Self::WalletConnected => f.write_str("wallet connected"),
            Self::AccountChanged => f.write_str("account changed"),
            Self::NetworkChanged => f.write_str("network changed"),
            Self::TransactionSettled { kind, succeeded } => write!(
                f,
                "{kind} transaction {}",
                if *succeeded { "confirmed" } else { "failed" }
            ),
            Self::Interval => f.write_str("interval"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

#[derive(Clone)]
pub struct TriggerSender {
    trigger_tx: mpsc::UnboundedSender<Trigger>,
}

impl TriggerSender {
    pub fn new(trigger_tx: mpsc::UnboundedSender<Trigger>) -> Self {
        Self { trigger_tx }
    }

    pub fn send(&self, trigger: Trigger) -> Result<()> {
        self.trigger_tx.send(trigger).map_err(Error::from)?;
        Ok(())
    }

    pub fn transaction_settled(&self, kind: TransactionKind, succeeded: bool) -> Result<()> {
        self.send(Trigger::TransactionSettled { kind, succeeded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_transaction_outcomes() {
        let trigger = Trigger::TransactionSettled {
            kind: TransactionKind::Donate,
            succeeded: false,
        };
        assert_eq!(trigger.to_string(), "donate transaction failed");
        assert_eq!(Trigger::NetworkChanged.to_string(), "network changed");
    }

    #[test]
    fn send_fails_once_the_service_is_gone() {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let triggers = TriggerSender::new(trigger_tx);
        assert!(triggers.send(Trigger::Manual).is_ok());

        drop(trigger_rx);
        assert!(triggers
            .transaction_settled(TransactionKind::Create, true)
            .is_err());
    }
}
