//! Execution vote tiers.

use lupine_types::{AgentId, Role};

use crate::belief::BeliefStore;
use crate::classifier::TeamBuckets;
use crate::policy::claiming;

/// Villager-aligned roles vote enemies first, then the undecided, then
/// anyone left.
pub fn villager_tiers(buckets: &TeamBuckets) -> Vec<Vec<AgentId>> {
    vec![
        buckets.team_werewolf.clone(),
        buckets.team_uncertain.clone(),
        buckets.team_villager.clone(),
    ]
}

/// The werewolf votes claimed seers, claimed mediums, then any villager,
/// and repeats the cascade over the undecided. The agent it plans to attack
/// tonight is left out of every tier.
pub fn werewolf_tiers(
    buckets: &TeamBuckets,
    beliefs: &BeliefStore,
    attack_candidate: Option<AgentId>,
) -> Vec<Vec<AgentId>> {
    let keep = |pool: &[AgentId]| -> Vec<AgentId> {
        pool.iter()
            .copied()
            .filter(|&a| Some(a) != attack_candidate)
            .collect()
    };
    cascade(
        &keep(&buckets.team_villager),
        &keep(&buckets.team_uncertain),
        beliefs,
        true,
        true,
    )
}

/// The possessed runs the werewolf cascade, but only targets rival seers
/// after claiming seer and rival mediums after claiming medium.
pub fn possessed_tiers(
    buckets: &TeamBuckets,
    beliefs: &BeliefStore,
    fake_role: Option<Role>,
) -> Vec<Vec<AgentId>> {
    cascade(
        &buckets.team_villager,
        &buckets.team_uncertain,
        beliefs,
        fake_role == Some(Role::Seer),
        fake_role == Some(Role::Medium),
    )
}

fn cascade(
    villagers: &[AgentId],
    uncertains: &[AgentId],
    beliefs: &BeliefStore,
    seers: bool,
    mediums: bool,
) -> Vec<Vec<AgentId>> {
    let mut tiers = Vec::with_capacity(6);
    for pool in [villagers, uncertains] {
        if seers {
            tiers.push(claiming(pool, beliefs, &[Role::Seer]));
        }
        if mediums {
            tiers.push(claiming(pool, beliefs, &[Role::Medium]));
        }
        tiers.push(pool.to_vec());
    }
    tiers
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn store(my_role: Role) -> BeliefStore {
        let ids: Vec<AgentId> = (1..=6).map(AgentId).collect();
        BeliefStore::new(&ids, AgentId(1), my_role, &BTreeMap::new(), None).unwrap()
    }

    fn buckets(villager: &[u32], uncertain: &[u32], werewolf: &[u32]) -> TeamBuckets {
        let ids = |v: &[u32]| v.iter().copied().map(AgentId).collect();
        TeamBuckets {
            team_villager: ids(villager),
            team_uncertain: ids(uncertain),
            team_werewolf: ids(werewolf),
            ..TeamBuckets::default()
        }
    }

    #[test]
    fn villager_side_prefers_enemies() {
        let tiers = villager_tiers(&buckets(&[2], &[3, 4], &[5]));
        assert_eq!(tiers.first().unwrap(), &vec![AgentId(5)]);
        assert_eq!(tiers.len(), 3);
    }

    #[test]
    fn werewolf_targets_claimed_seer_but_spares_the_attack_candidate() {
        let mut s = store(Role::Werewolf);
        s.set_claim(AgentId(2), Role::Seer).unwrap();
        s.set_claim(AgentId(3), Role::Seer).unwrap();
        let b = buckets(&[2, 3, 4], &[5, 6], &[]);
        let tiers = werewolf_tiers(&b, &s, Some(AgentId(2)));
        assert_eq!(tiers.len(), 6);
        assert_eq!(tiers.first().unwrap(), &vec![AgentId(3)]);
        assert!(tiers.iter().all(|t| !t.contains(&AgentId(2))));
    }

    #[test]
    fn possessed_claim_tiers_follow_the_fake_role() {
        let mut s = store(Role::Possessed);
        s.set_claim(AgentId(2), Role::Medium).unwrap();
        let b = buckets(&[2, 3], &[4], &[]);
        assert_eq!(possessed_tiers(&b, &s, None).len(), 2);
        let medium = possessed_tiers(&b, &s, Some(Role::Medium));
        assert_eq!(medium.first().unwrap(), &vec![AgentId(2)]);
        let seer = possessed_tiers(&b, &s, Some(Role::Seer));
        assert!(seer.first().unwrap().is_empty());
    }
}
