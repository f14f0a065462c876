//! Divination targets (seer only).

use std::collections::BTreeSet;

use lupine_types::AgentId;

use crate::classifier::TeamBuckets;

/// Undecided agents that have never been inspected.
pub fn divine_pool(buckets: &TeamBuckets, judged: &BTreeSet<AgentId>) -> Vec<AgentId> {
    buckets
        .team_uncertain
        .iter()
        .copied()
        .filter(|a| !judged.contains(a))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judged_agents_are_excluded() {
        let buckets = TeamBuckets {
            team_uncertain: vec![AgentId(2), AgentId(3), AgentId(4)],
            ..TeamBuckets::default()
        };
        let judged = BTreeSet::from([AgentId(3)]);
        assert_eq!(divine_pool(&buckets, &judged), vec![AgentId(2), AgentId(4)]);
        let all = BTreeSet::from([AgentId(2), AgentId(3), AgentId(4)]);
        assert!(divine_pool(&buckets, &all).is_empty());
    }
}
