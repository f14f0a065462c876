//! Night guard tiers (bodyguard only).

use lupine_types::{AgentId, Role};

use crate::belief::BeliefStore;
use crate::classifier::TeamBuckets;
use crate::policy::{claiming, holding};

/// Seers on our side first, then mediums, then undecided seer and medium
/// claimants, then any villager, then anyone undecided.
pub fn guard_tiers(buckets: &TeamBuckets, beliefs: &BeliefStore) -> Vec<Vec<AgentId>> {
    let on_side = |role: Role| -> Vec<AgentId> {
        let known = holding(&buckets.team_villager, beliefs, &[role]);
        let claimed = claiming(&buckets.team_villager, beliefs, &[role]);
        buckets
            .team_villager
            .iter()
            .copied()
            .filter(|a| known.contains(a) || claimed.contains(a))
            .collect()
    };
    vec![
        on_side(Role::Seer),
        on_side(Role::Medium),
        claiming(&buckets.team_uncertain, beliefs, &[Role::Seer]),
        claiming(&buckets.team_uncertain, beliefs, &[Role::Medium]),
        buckets.team_villager.clone(),
        buckets.team_uncertain.clone(),
    ]
}
