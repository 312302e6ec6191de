use num_bigint::BigUint;
use num_traits::Zero;

use crate::model::ProjectViewModel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    Oldest,
    GoalHighest,
    GoalLowest,
    MostRaised,
    MostProgress,
}

pub fn owned_by<'a>(projects: &'a [ProjectViewModel], account: &str) -> Vec<&'a ProjectViewModel> {
    projects
        .iter()
        .filter(|project| !project.is_placeholder() && project.is_owned_by(account))
        .collect()
}

/// Case-insensitive match on title or description. A blank term matches all.
pub fn search<'a>(projects: &'a [ProjectViewModel], term: &str) -> Vec<&'a ProjectViewModel> {
    let term = term.trim().to_lowercase();
    projects
        .iter()
        .filter(|project| {
            term.is_empty()
                || project.title().to_lowercase().contains(&term)
                || project.description().to_lowercase().contains(&term)
        })
        .collect()
}

pub fn sort(projects: &mut [&ProjectViewModel], order: SortOrder) {
    match order {
        SortOrder::Newest => projects.sort_by(|a, b| b.id().cmp(a.id())),
        SortOrder::Oldest => projects.sort_by(|a, b| a.id().cmp(b.id())),
        SortOrder::GoalHighest => projects.sort_by(|a, b| b.funding_goal().cmp(a.funding_goal())),
        SortOrder::GoalLowest => projects.sort_by(|a, b| a.funding_goal().cmp(b.funding_goal())),
        SortOrder::MostRaised => projects.sort_by(|a, b| b.amount_raised().cmp(a.amount_raised())),
        SortOrder::MostProgress => {
            projects.sort_by(|a, b| b.progress_percent().total_cmp(&a.progress_percent()))
        }
    }
}

/// Placeholders are not counted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    total_projects: usize,
    total_raised: BigUint,
    average_raised: BigUint,
    completed_projects: usize,
}

impl DashboardStats {
    pub fn compute<'a>(projects: impl IntoIterator<Item = &'a ProjectViewModel>) -> Self {
        let mut stats = Self::default();
        for project in projects.into_iter().filter(|project| !project.is_placeholder()) {
            stats.total_projects += 1;
            stats.total_raised += project.amount_raised();
            if project.is_funded() {
                stats.completed_projects += 1;
            }
        }
        if stats.total_projects > 0 {
            stats.average_raised = &stats.total_raised / BigUint::from(stats.total_projects);
        }
        stats
    }

    pub fn total_projects(&self) -> &usize {
        &self.total_projects
    }

    pub fn total_raised(&self) -> &BigUint {
        &self.total_raised
    }

    /// Integer wei, rounded down.
    pub fn average_raised(&self) -> &BigUint {
        &self.average_raised
    }

    pub fn completed_projects(&self) -> &usize {
        &self.completed_projects
    }

    pub fn is_empty(&self) -> bool {
        self.total_projects == 0 && self.total_raised.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    fn project(id: u64, owner: &str, title: &str, goal: u64, raised: u64) -> ProjectViewModel {
        ProjectViewModel::new(
            &id,
            owner,
            title,
            "Neighbourhood effort",
            &BigUint::from(goal),
            &BigUint::from(raised),
            &false,
        )
    }

    fn sample() -> Vec<ProjectViewModel> {
        vec![
            project(0, "0xaa", "Playground", 100, 100),
            project(1, "0xbb", "Food bank", 300, 30),
            decode::placeholder(&2, Some("0xaa")),
            project(3, "0xAA", "Repair cafe", 50, 10),
        ]
    }

    fn ids(projects: &[&ProjectViewModel]) -> Vec<u64> {
        projects.iter().map(|project| *project.id()).collect()
    }

    #[test]
    fn owner_filter_is_case_insensitive_and_skips_placeholders() {
        let projects = sample();
        assert_eq!(ids(&owned_by(&projects, "0xAa")), vec![0, 3]);
    }

    #[test]
    fn search_matches_title_or_description() {
        let projects = sample();
        assert_eq!(ids(&search(&projects, "food")), vec![1]);
        assert_eq!(ids(&search(&projects, "NEIGHBOURHOOD")), vec![0, 1, 3]);
        assert_eq!(search(&projects, "  ").len(), 4);
    }

    #[test]
    fn sorts_by_requested_order() {
        let projects = sample();
        let mut view: Vec<&ProjectViewModel> = projects.iter().filter(|p| !p.is_placeholder()).collect();

        sort(&mut view, SortOrder::Newest);
        assert_eq!(ids(&view), vec![3, 1, 0]);
        sort(&mut view, SortOrder::GoalHighest);
        assert_eq!(ids(&view), vec![1, 0, 3]);
        sort(&mut view, SortOrder::GoalLowest);
        assert_eq!(ids(&view), vec![3, 0, 1]);
        sort(&mut view, SortOrder::MostRaised);
        assert_eq!(ids(&view), vec![0, 1, 3]);
        sort(&mut view, SortOrder::MostProgress);
        assert_eq!(ids(&view), vec![0, 3, 1]);
        sort(&mut view, SortOrder::Oldest);
        assert_eq!(ids(&view), vec![0, 1, 3]);
    }

    #[test]
    fn dashboard_stats_ignore_placeholders() {
        let projects = sample();
        let stats = DashboardStats::compute(owned_by(&projects, "0xaa"));

        assert_eq!(stats.total_projects(), &2);
        assert_eq!(stats.total_raised(), &BigUint::from(110u32));
        assert_eq!(stats.average_raised(), &BigUint::from(55u32));
        assert_eq!(stats.completed_projects(), &1);

        let everything = DashboardStats::compute(projects.iter());
        assert_eq!(everything.total_projects(), &3);
        assert!(DashboardStats::compute(Vec::<&ProjectViewModel>::new()).is_empty());
    }
}
