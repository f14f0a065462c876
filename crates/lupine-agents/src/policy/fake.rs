//! Role fabrication for the possessed.
//!
//! The possessed picks a fake seer or medium role when it comes out, then
//! fabricates favorable results: real werewolves and villagers alike are
//! reported human. A target is never fabricated twice.

use std::collections::BTreeSet;

use lupine_types::{AgentId, Judge, Role, Species};
use rand::Rng;

use crate::belief::BeliefStore;
use crate::candidate::pick;
use crate::classifier::TeamBuckets;

/// Fake role to come out with, steering away from roles already claimed by
/// `saturation` or more other agents. `Villager` means "claim nothing".
pub fn choose_fake_role<R: Rng + ?Sized>(
    beliefs: &BeliefStore,
    saturation: usize,
    rng: &mut R,
) -> Role {
    let me = beliefs.me();
    let seer_open = beliefs.claim_count(Role::Seer, me) < saturation;
    let medium_open = beliefs.claim_count(Role::Medium, me) < saturation;
    match (seer_open, medium_open) {
        (true, true) => {
            if rng.random_bool(0.5) {
                Role::Seer
            } else {
                Role::Medium
            }
        }
        (true, false) => Role::Seer,
        (false, true) => Role::Medium,
        (false, false) => Role::Villager,
    }
}

/// Fabricate tonight's divination: a werewolf reported human if one is
/// left unjudged, otherwise a villager reported human.
pub fn fabricate_divination<R: Rng + ?Sized>(
    day: u32,
    me: AgentId,
    buckets: &TeamBuckets,
    judged: &mut BTreeSet<AgentId>,
    rng: &mut R,
) -> Option<Judge> {
    let fresh = |pool: &[AgentId]| -> Vec<AgentId> {
        pool.iter()
            .copied()
            .filter(|a| *a != me && !judged.contains(a))
            .collect()
    };
    let werewolves = fresh(&buckets.werewolves);
    let villagers = fresh(&buckets.team_villager);
    let target = pick(&werewolves, rng).or_else(|| pick(&villagers, rng))?;
    judged.insert(target);
    Some(Judge {
        day,
        agent: me,
        target,
        result: Species::Human,
    })
}

/// Fabricate an inquest: yesterday's executed agent is always human.
pub fn fabricate_inquest(
    day: u32,
    me: AgentId,
    executed: Option<AgentId>,
    judged: &mut BTreeSet<AgentId>,
) -> Option<Judge> {
    let target = executed?;
    if !judged.insert(target) {
        return None;
    }
    Some(Judge {
        day,
        agent: me,
        target,
        result: Species::Human,
    })
}
