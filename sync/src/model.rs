use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};

use crate::trigger::Trigger;

#[serde_as]
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectViewModel {
    id: u64,
    owner: String,
    title: String,
    description: String,
    #[serde_as(as = "DisplayFromStr")]
    funding_goal: BigUint,
    #[serde_as(as = "DisplayFromStr")]
    amount_raised: BigUint,
    withdrawn: bool,
    placeholder: bool,
}

impl ProjectViewModel {
    pub fn new(
        id: &u64,
        owner: &str,
        title: &str,
        description: &str,
        funding_goal: &BigUint,
        amount_raised: &BigUint,
        withdrawn: &bool,
    ) -> Self {
        Self {
            id: *id,
            owner: owner.to_owned(),
            title: title.to_owned(),
            description: description.to_owned(),
            funding_goal: funding_goal.clone(),
            amount_raised: amount_raised.clone(),
            withdrawn: *withdrawn,
            placeholder: false,
        }
    }

    pub(crate) fn new_placeholder(id: &u64, owner: &str, title: &str, description: &str) -> Self {
        Self {
            id: *id,
            owner: owner.to_owned(),
            title: title.to_owned(),
            description: description.to_owned(),
            funding_goal: BigUint::zero(),
            amount_raised: BigUint::zero(),
            withdrawn: false,
            placeholder: true,
        }
    }

    pub fn id(&self) -> &u64 {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn creator(&self) -> &str {
        &self.owner
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn funding_goal(&self) -> &BigUint {
        &self.funding_goal
    }

    pub fn amount_raised(&self) -> &BigUint {
        &self.amount_raised
    }

    pub fn withdrawn(&self) -> &bool {
        &self.withdrawn
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn is_owned_by(&self, account: &str) -> bool {
        self.owner.eq_ignore_ascii_case(account.trim())
    }

    pub fn is_funded(&self) -> bool {
        !self.placeholder && self.amount_raised >= self.funding_goal
    }

    pub fn progress_percent(&self) -> f64 {
        if self.funding_goal.is_zero() {
            return 0.0;
        }
        let basis_points = (&self.amount_raised * 10_000u32 / &self.funding_goal)
            .to_u64()
            .unwrap_or(u64::MAX)
            .min(10_000);
        basis_points as f64 / 100.0
    }

    pub fn can_withdraw(&self, account: &str) -> bool {
        self.is_owned_by(account) && self.is_funded() && !self.withdrawn
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProjectSnapshot {
    generation: u64,
    synced_at: Option<DateTime<Utc>>,
    trigger: Option<Trigger>,
    projects: Vec<ProjectViewModel>,
}

impl ProjectSnapshot {
    pub(crate) fn new(
        generation: &u64,
        synced_at: &DateTime<Utc>,
        trigger: &Trigger,
        projects: Vec<ProjectViewModel>,
    ) -> Self {
        Self {
            generation: *generation,
            synced_at: Some(*synced_at),
            trigger: Some(*trigger),
            projects,
        }
    }

    /// Zero until the first pass is published.
    pub fn generation(&self) -> &u64 {
        &self.generation
    }

    pub fn synced_at(&self) -> &Option<DateTime<Utc>> {
        &self.synced_at
    }

    pub fn trigger(&self) -> &Option<Trigger> {
        &self.trigger
    }

    /// Ordered by ascending id.
    pub fn projects(&self) -> &[ProjectViewModel] {
        &self.projects
    }

    pub fn get(&self, id: &u64) -> Option<&ProjectViewModel> {
        self.projects
            .binary_search_by_key(id, |project| *project.id())
            .ok()
            .map(|index| &self.projects[index])
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[serde_as]
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    project_id: u64,
    project_title: String,
    #[serde_as(as = "DisplayFromStr")]
    amount: BigUint,
}

impl Donation {
    pub fn new(project_id: &u64, project_title: &str, amount: &BigUint) -> Self {
        Self {
            project_id: *project_id,
            project_title: project_title.to_owned(),
            amount: amount.clone(),
        }
    }

    pub fn project_id(&self) -> &u64 {
        &self.project_id
    }

    pub fn project_title(&self) -> &str {
        &self.project_title
    }

    pub fn amount(&self) -> &BigUint {
        &self.amount
    }
}
