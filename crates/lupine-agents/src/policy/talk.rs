//! Estimate narration.
//!
//! Villager-aligned speakers narrate what they believe. Enemy-aligned
//! speakers only speak up for their allies and never reveal the true
//! alignment they know of.

use lupine_types::{AgentId, Role, Species, Team, Utterance};

use crate::belief::BeliefStore;
use crate::classifier::TeamBuckets;

/// Honest estimate for `agent` as told by a villager-aligned `my_role`.
///
/// Enemies are named possessed when human and werewolf otherwise. Allies
/// are named by their claim; a claim of my own exclusive role can only be
/// the possessed lying.
pub fn villager_side_estimate(
    agent: AgentId,
    buckets: &TeamBuckets,
    beliefs: &BeliefStore,
    my_role: Role,
) -> Option<Utterance> {
    let belief = beliefs.get(agent)?;
    let role = match buckets.team_of(agent)? {
        Team::Werewolf if belief.species == Some(Species::Human) => Role::Possessed,
        Team::Werewolf => Role::Werewolf,
        Team::Villager => match belief.claim {
            Some(claim) if claim == my_role && my_role.is_exclusive() => Role::Possessed,
            Some(claim) => claim,
            None => Role::Villager,
        },
        Team::Uncertain => return None,
    };
    Some(Utterance::Estimate {
        target: agent,
        role,
    })
}

/// Supportive estimate for an ally of an enemy-aligned speaker.
///
/// Allies are vouched for with the seer or medium role they claimed, or as
/// plain villagers. Nothing is said about anyone else.
pub fn enemy_side_estimate(
    agent: AgentId,
    buckets: &TeamBuckets,
    beliefs: &BeliefStore,
) -> Option<Utterance> {
    if buckets.team_of(agent)? != Team::Werewolf {
        return None;
    }
    let role = match beliefs.get(agent)?.claim {
        Some(claim @ (Role::Seer | Role::Medium)) => claim,
        _ => Role::Villager,
    };
    Some(Utterance::Estimate {
        target: agent,
        role,
    })
}
