//! Team buckets and the estimate queue.
//!
//! Buckets partition the living agents other than this one by derived team,
//! and separately by derived species. Agents that newly join the villager
//! or werewolf bucket are queued once, in first-arrival order, for the talk
//! policy to narrate.

use std::collections::{BTreeSet, VecDeque};

use lupine_types::{AgentId, Species, Team};
use tracing::debug;

use crate::belief::BeliefStore;

// ---------------------------------------------------------------------------
// TeamBuckets
// ---------------------------------------------------------------------------

/// Living non-self agents grouped by derived species and team.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamBuckets {
    /// Derived human species.
    pub humans: Vec<AgentId>,
    /// Derived werewolf species.
    pub werewolves: Vec<AgentId>,
    /// Derived villager team.
    pub team_villager: Vec<AgentId>,
    /// Team not yet derived.
    pub team_uncertain: Vec<AgentId>,
    /// Derived werewolf team.
    pub team_werewolf: Vec<AgentId>,
}

impl TeamBuckets {
    /// Bucket the living agents of `beliefs`, in agent-list order.
    pub fn classify(beliefs: &BeliefStore) -> Self {
        let mut buckets = Self::default();
        for b in beliefs.iter().filter(|b| b.alive && b.agent != beliefs.me()) {
            match b.species {
                Some(Species::Human) => buckets.humans.push(b.agent),
                Some(Species::Werewolf) => buckets.werewolves.push(b.agent),
                None => {}
            }
            match b.team {
                Team::Villager => buckets.team_villager.push(b.agent),
                Team::Werewolf => buckets.team_werewolf.push(b.agent),
                Team::Uncertain => buckets.team_uncertain.push(b.agent),
            }
        }
        buckets
    }

    /// Team bucket `agent` currently sits in, if it is alive and not me.
    pub fn team_of(&self, agent: AgentId) -> Option<Team> {
        if self.team_villager.contains(&agent) {
            Some(Team::Villager)
        } else if self.team_werewolf.contains(&agent) {
            Some(Team::Werewolf)
        } else if self.team_uncertain.contains(&agent) {
            Some(Team::Uncertain)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// EstimateQueue
// ---------------------------------------------------------------------------

/// FIFO of agents whose team has been derived and not yet narrated.
///
/// An agent enters the queue at most once per game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstimateQueue {
    queue: VecDeque<AgentId>,
    seen: BTreeSet<AgentId>,
}

impl EstimateQueue {
    /// Queue `agent` unless it was ever queued or retired before.
    pub fn offer(&mut self, agent: AgentId) -> bool {
        if self.seen.insert(agent) {
            self.queue.push_back(agent);
            true
        } else {
            false
        }
    }

    /// Take the oldest queued agent.
    pub fn pop(&mut self) -> Option<AgentId> {
        self.queue.pop_front()
    }

    /// Drop `agent` from the queue and never queue it again.
    pub fn retire(&mut self, agent: AgentId) {
        self.seen.insert(agent);
        self.queue.retain(|&a| a != agent);
    }

    /// Queued agents, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.queue.iter().copied()
    }

    /// Number of queued agents.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TeamClassifier
// ---------------------------------------------------------------------------

/// Current buckets plus the estimate queue fed by bucket changes.
#[derive(Debug, Clone, Default)]
pub struct TeamClassifier {
    buckets: TeamBuckets,
    estimates: EstimateQueue,
}

impl TeamClassifier {
    /// Recompute buckets and queue newcomers to the decided teams.
    pub fn refresh(&mut self, beliefs: &BeliefStore) {
        let previous = core::mem::replace(&mut self.buckets, TeamBuckets::classify(beliefs));
        for &a in &self.buckets.team_villager {
            if !previous.team_villager.contains(&a) {
                self.estimates.offer(a);
            }
        }
        for &a in &self.buckets.team_werewolf {
            if !previous.team_werewolf.contains(&a) {
                self.estimates.offer(a);
            }
        }
        debug!(
            villager = self.buckets.team_villager.len(),
            uncertain = self.buckets.team_uncertain.len(),
            werewolf = self.buckets.team_werewolf.len(),
            queued = self.estimates.len(),
            "Team buckets refreshed"
        );
    }

    /// Current buckets.
    pub const fn buckets(&self) -> &TeamBuckets {
        &self.buckets
    }

    /// The estimate queue.
    pub const fn estimates(&self) -> &EstimateQueue {
        &self.estimates
    }

    /// The estimate queue, for narration.
    pub const fn estimates_mut(&mut self) -> &mut EstimateQueue {
        &mut self.estimates
    }
}
