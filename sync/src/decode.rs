use cf_error::DecodeError;
use cf_ledger::{abi, ProjectRecord};

use crate::model::ProjectViewModel;

pub const UNTITLED_TITLE: &str = "Untitled Project";
pub const UNKNOWN_OWNER: &str = "Unknown";
pub const PLACEHOLDER_TITLE: &str = "Error Processing Project";
pub const PLACEHOLDER_DESCRIPTION: &str = "There was an error processing this project's data.";

/// Splits the packed `title\n\nbody` blob. Blank lines are dropped, the
/// first remaining line is the title and the rest, in order, the body.
pub fn split_description(packed: &str) -> (String, String) {
    let mut lines = packed.lines().filter(|line| !line.trim().is_empty());
    match lines.next() {
        Some(title) => (title.to_owned(), lines.collect::<Vec<_>>().join("\n")),
        None => (UNTITLED_TITLE.to_owned(), String::new()),
    }
}

pub fn normalize_owner(owner: &str) -> Result<String, DecodeError> {
    abi::parse_address(owner)
        .map(|bytes| abi::format_address(&bytes))
        .map_err(|_| DecodeError::MalformedOwner(owner.to_owned()))
}

pub fn decode(id: &u64, record: &ProjectRecord) -> Result<ProjectViewModel, DecodeError> {
    let owner = normalize_owner(record.owner().ok_or(DecodeError::MissingOwner)?)?;
    let (title, description) = split_description(record.description());
    Ok(ProjectViewModel::new(
        id,
        &owner,
        &title,
        &description,
        record.funding_goal(),
        record.amount_raised(),
        record.withdrawn(),
    ))
}

pub fn placeholder(id: &u64, owner: Option<&str>) -> ProjectViewModel {
    ProjectViewModel::new_placeholder(
        id,
        owner.unwrap_or(UNKNOWN_OWNER),
        PLACEHOLDER_TITLE,
        PLACEHOLDER_DESCRIPTION,
    )
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;

    const OWNER: &str = "0x00000000000000000000000000000000000000Aa";

    fn record(description: &str) -> ProjectRecord {
        ProjectRecord::new(
            Some(OWNER),
            description,
            &BigUint::from(1_000u32),
            &BigUint::from(10u32),
            &false,
        )
    }

    #[test]
    fn empty_description_is_untitled() {
        let project = decode(&0, &record("")).unwrap();
        assert_eq!(project.title(), "Untitled Project");
        assert_eq!(project.description(), "");
    }

    #[test]
    fn blank_only_description_is_untitled() {
        assert_eq!(
            split_description("\n  \n\t\n"),
            ("Untitled Project".to_owned(), String::new())
        );
    }

    #[test]
    fn single_line_becomes_title() {
        let project = decode(&0, &record("Only Title")).unwrap();
        assert_eq!(project.title(), "Only Title");
        assert_eq!(project.description(), "");
    }

    #[test]
    fn remaining_lines_become_description() {
        let project = decode(&4, &record("Title\n\nLine1\nLine2")).unwrap();
        assert_eq!(project.id(), &4);
        assert_eq!(project.title(), "Title");
        assert_eq!(project.description(), "Line1\nLine2");
    }

    #[test]
    fn title_is_first_non_blank_line() {
        assert_eq!(
            split_description("\n\n  \nCommunity Fridge\nStocked weekly\n\nOpen to all\n"),
            (
                "Community Fridge".to_owned(),
                "Stocked weekly\nOpen to all".to_owned()
            )
        );
    }

    #[test]
    fn decode_is_deterministic_and_passes_amounts_through() {
        let raw = record("Bike repair\nTools for the shed");
        let first = decode(&2, &raw).unwrap();
        let second = decode(&2, &raw).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.owner(), "0x00000000000000000000000000000000000000aa");
        assert_eq!(first.creator(), first.owner());
        assert_eq!(first.funding_goal(), &BigUint::from(1_000u32));
        assert_eq!(first.amount_raised(), &BigUint::from(10u32));
        assert!(!first.withdrawn());
        assert!(!first.is_placeholder());
    }

    #[test]
    fn missing_or_malformed_owner_fails() {
        let orphan = ProjectRecord::new(None, "x", &BigUint::from(1u8), &BigUint::from(0u8), &false);
        assert_eq!(decode(&0, &orphan), Err(DecodeError::MissingOwner));

        let garbled =
            ProjectRecord::new(Some("alice"), "x", &BigUint::from(1u8), &BigUint::from(0u8), &false);
        assert_eq!(
            decode(&0, &garbled),
            Err(DecodeError::MalformedOwner("alice".to_owned()))
        );
    }

    #[test]
    fn placeholder_keeps_id_and_owner() {
        let project = placeholder(&3, None);
        assert_eq!(project.id(), &3);
        assert_eq!(project.owner(), "Unknown");
        assert_eq!(project.title(), "Error Processing Project");
        assert!(project.funding_goal() == &BigUint::from(0u8));
        assert!(!project.withdrawn());
        assert!(project.is_placeholder());
    }
}
