use num_bigint::BigUint;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};

/// One project entry exactly as the contract stores it.
///
/// JSON sources may also use `creator`, `goal` and `raised`; they are folded
/// into the canonical names here and nowhere else.
#[serde_as]
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(default, alias = "creator")]
    owner: Option<String>,
    #[serde(default)]
    description: String,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default, alias = "goal")]
    funding_goal: BigUint,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default, alias = "raised")]
    amount_raised: BigUint,
    #[serde(default)]
    withdrawn: bool,
}

impl ProjectRecord {
    pub fn new(
        owner: Option<&str>,
        description: &str,
        funding_goal: &BigUint,
        amount_raised: &BigUint,
        withdrawn: &bool,
    ) -> Self {
        Self {
            owner: owner.map(|owner| owner.to_owned()),
            description: description.to_owned(),
            funding_goal: funding_goal.clone(),
            amount_raised: amount_raised.clone(),
            withdrawn: *withdrawn,
        }
    }

    /// Owner address, `None` when missing or blank.
    pub fn owner(&self) -> Option<&str> {
        self.owner
            .as_deref()
            .filter(|owner| !owner.trim().is_empty())
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_alternate_field_names() {
        let record: ProjectRecord = serde_json::from_str(
            r#"{
                "creator": "0x00000000000000000000000000000000000000aa",
                "description": "Garden\nBuild raised beds",
                "goal": "1000000000000000000",
                "raised": "250000000000000000"
            }"#,
        )
        .unwrap();

        assert_eq!(record.owner(), Some("0x00000000000000000000000000000000000000aa"));
        assert_eq!(record.funding_goal(), &BigUint::from(1_000_000_000_000_000_000u64));
        assert_eq!(record.amount_raised(), &BigUint::from(250_000_000_000_000_000u64));
        assert!(!record.withdrawn());
    }

    #[test]
    fn canonical_names_and_blank_owner() {
        let record: ProjectRecord = serde_json::from_str(
            r#"{ "owner": "  ", "fundingGoal": "5", "amountRaised": "5", "withdrawn": true }"#,
        )
        .unwrap();

        assert_eq!(record.owner(), None);
        assert_eq!(record.description(), "");
        assert_eq!(record.funding_goal(), &BigUint::from(5u8));
        assert!(*record.withdrawn());
    }
}
