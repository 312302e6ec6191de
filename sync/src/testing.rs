use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use anyhow::{Error, Result};
use async_trait::async_trait;
use cf_ledger::{Identity, IdentityProvider, LedgerReader, ProjectRecord};
use num_bigint::BigUint;
use tokio::sync::oneshot;

pub const ALICE: &str = "0x00000000000000000000000000000000000000aa";
pub const BOB: &str = "0x00000000000000000000000000000000000000bb";

pub fn record(owner: Option<&str>, description: &str, goal: u64, raised: u64) -> ProjectRecord {
    ProjectRecord::new(
        owner,
        description,
        &BigUint::from(goal),
        &BigUint::from(raised),
        &false,
    )
}

struct CountStep {
    count: u64,
    gate: Option<oneshot::Receiver<()>>,
}

pub struct MockLedger {
    records: Vec<Option<ProjectRecord>>,
    count_steps: Mutex<VecDeque<CountStep>>,
    count_calls: AtomicUsize,
    fail_count: bool,
    donations: Vec<(u64, String, BigUint)>,
}

impl MockLedger {
    /// `None` entries fail when fetched.
    pub fn new(records: Vec<Option<ProjectRecord>>) -> Self {
        Self {
            records,
            count_steps: Mutex::new(VecDeque::new()),
            count_calls: AtomicUsize::new(0),
            fail_count: false,
            donations: Vec::new(),
        }
    }

    pub fn failing_count() -> Self {
        Self {
            fail_count: true,
            ..Self::new(Vec::new())
        }
    }

    /// The next unconsumed `record_count` call reports `count`, after `gate`
    /// fires when one is given.
    pub fn with_count_step(self, count: u64, gate: Option<oneshot::Receiver<()>>) -> Self {
        self.count_steps
            .lock()
            .unwrap()
            .push_back(CountStep { count, gate });
        self
    }

    pub fn with_donation(mut self, index: u64, donor: &str, amount: u64) -> Self {
        self.donations
            .push((index, donor.to_owned(), BigUint::from(amount)));
        self
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerReader for MockLedger {
    async fn record_count(&self) -> Result<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_count {
            return Err(Error::msg("node unreachable"));
        }
        let step = self.count_steps.lock().unwrap().pop_front();
        match step {
            Some(CountStep { count, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                Ok(count)
            }
            None => Ok(self.records.len() as u64),
        }
    }

    async fn record_at(&self, index: u64) -> Result<ProjectRecord> {
        match self.records.get(index as usize) {
            Some(Some(record)) => Ok(record.clone()),
            Some(None) => Err(Error::msg(format!("call for project {index} reverted"))),
            None => Err(Error::msg(format!("project {index} out of range"))),
        }
    }

    async fn donation(&self, index: u64, donor: &str) -> Result<BigUint> {
        if self.records.get(index as usize).is_some_and(|record| record.is_none()) {
            return Err(Error::msg(format!("call for project {index} reverted")));
        }
        Ok(self
            .donations
            .iter()
            .filter(|(id, from, _)| *id == index && from.eq_ignore_ascii_case(donor))
            .map(|(_, _, amount)| amount)
            .sum())
    }
}

pub struct MockIdentity {
    script: Mutex<VecDeque<Option<Identity>>>,
    last: Mutex<Option<Identity>>,
}

impl MockIdentity {
    /// `None` entries fail.
    pub fn new(script: Vec<Option<Identity>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn identity(&self) -> Result<Identity> {
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Some(identity)) => {
                *self.last.lock().unwrap() = Some(identity.clone());
                Ok(identity)
            }
            Some(None) => Err(Error::msg("wallet locked")),
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| Error::msg("no identity scripted")),
        }
    }
}
