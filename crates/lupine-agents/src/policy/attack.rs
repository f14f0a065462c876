//! Night attack tiers and whisper reconciliation (werewolf only).

use lupine_types::{AgentId, Role, Species, TalkRef, Team};

use crate::belief::BeliefStore;
use crate::classifier::TeamBuckets;
use crate::policy::{claiming, holding};

/// Known seers and mediums first, then agents claiming those roles, then
/// any living agent outside the werewolf team.
pub fn attack_tiers(buckets: &TeamBuckets, beliefs: &BeliefStore) -> Vec<Vec<AgentId>> {
    let seer_or_medium = [Role::Seer, Role::Medium];
    let rest = beliefs
        .alive_others()
        .into_iter()
        .filter(|a| !buckets.team_werewolf.contains(a))
        .collect();
    vec![
        holding(&buckets.team_villager, beliefs, &seer_or_medium),
        claiming(&buckets.team_uncertain, beliefs, &seer_or_medium),
        rest,
    ]
}

/// A teammate's whispered attack intent worth following.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adoption {
    /// Teammate that declared the intent.
    pub teammate: AgentId,
    /// Agent it wants to attack.
    pub target: AgentId,
    /// Whisper the intent was declared in.
    pub reference: TalkRef,
}

/// Whether `target` is a living agent outside the werewolf team.
pub fn is_edible(beliefs: &BeliefStore, target: AgentId) -> bool {
    target != beliefs.me()
        && beliefs.get(target).is_some_and(|victim| {
            victim.alive
                && victim.species != Some(Species::Werewolf)
                && victim.team != Team::Werewolf
        })
}

/// Earliest-declared attack intent of a fellow werewolf aimed at a living
/// non-werewolf.
pub fn earliest_teammate_intent(beliefs: &BeliefStore) -> Option<Adoption> {
    let me = beliefs.me();
    beliefs
        .iter()
        .filter(|b| b.agent != me && b.alive && b.species == Some(Species::Werewolf))
        .filter_map(|b| {
            let target = b.attack_target?;
            let reference = b.latest_whisper?;
            is_edible(beliefs, target).then_some(Adoption {
                teammate: b.agent,
                target,
                reference,
            })
        })
        .min_by_key(|adoption| (adoption.reference.day, adoption.reference.idx))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use lupine_types::TalkKind;

    use super::*;

    fn pack() -> BeliefStore {
        let ids: Vec<AgentId> = (1..=6).map(AgentId).collect();
        let known = BTreeMap::from([(AgentId(2), Role::Werewolf), (AgentId(3), Role::Werewolf)]);
        BeliefStore::new(&ids, AgentId(1), Role::Werewolf, &known, None).unwrap()
    }

    fn whisper(idx: u32) -> TalkRef {
        TalkRef {
            kind: TalkKind::Whisper,
            day: 1,
            idx,
        }
    }

    #[test]
    fn fresh_game_attacks_anyone_but_the_pack() {
        let s = pack();
        let b = TeamBuckets::classify(&s);
        let tiers = attack_tiers(&b, &s);
        assert!(tiers.first().unwrap().is_empty());
        assert!(tiers.get(1).unwrap().is_empty());
        assert_eq!(tiers.get(2).unwrap(), &vec![AgentId(4), AgentId(5), AgentId(6)]);
    }

    #[test]
    fn claimed_seer_is_preferred_over_plain_villagers() {
        let mut s = pack();
        s.set_claim(AgentId(5), Role::Seer).unwrap();
        let b = TeamBuckets::classify(&s);
        assert_eq!(attack_tiers(&b, &s).get(1).unwrap(), &vec![AgentId(5)]);
    }

    #[test]
    fn earliest_declared_intent_wins() {
        let mut s = pack();
        s.record_attack_intent(AgentId(3), AgentId(6), whisper(4)).unwrap();
        s.record_attack_intent(AgentId(2), AgentId(5), whisper(1)).unwrap();
        let adoption = earliest_teammate_intent(&s).unwrap();
        assert_eq!(adoption.teammate, AgentId(2));
        assert_eq!(adoption.target, AgentId(5));
    }

    #[test]
    fn intents_against_the_pack_are_ignored() {
        let mut s = pack();
        s.record_attack_intent(AgentId(2), AgentId(3), whisper(0)).unwrap();
        s.record_attack_intent(AgentId(3), AgentId(1), whisper(1)).unwrap();
        assert_eq!(earliest_teammate_intent(&s), None);
    }

    #[test]
    fn dead_and_pack_members_are_not_edible() {
        let mut s = pack();
        assert!(is_edible(&s, AgentId(4)));
        assert!(!is_edible(&s, AgentId(1)));
        assert!(!is_edible(&s, AgentId(2)));
        assert!(!is_edible(&s, AgentId(9)));
        s.mark_executed(AgentId(4)).unwrap();
        assert!(!is_edible(&s, AgentId(4)));
    }
}
