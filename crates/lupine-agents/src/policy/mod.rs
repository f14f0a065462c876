//! Candidate tiers for every decision.
//!
//! Each submodule turns the current [`TeamBuckets`] and [`BeliefStore`] into
//! an ordered list of tiers for [`Candidate::select`], or into talk content.
//! Tiers are built in agent-list order so that a fixed seed reproduces the
//! same choices.
//!
//! [`TeamBuckets`]: crate::classifier::TeamBuckets
//! [`BeliefStore`]: crate::belief::BeliefStore
//! [`Candidate::select`]: crate::candidate::Candidate::select

pub mod attack;
pub mod divine;
pub mod fake;
pub mod guard;
pub mod talk;
pub mod vote;

use lupine_types::{AgentId, Role};

use crate::belief::BeliefStore;

/// Members of `pool` currently claiming one of `roles`.
pub(crate) fn claiming(pool: &[AgentId], beliefs: &BeliefStore, roles: &[Role]) -> Vec<AgentId> {
    pool.iter()
        .copied()
        .filter(|&a| {
            beliefs
                .get(a)
                .and_then(|b| b.claim)
                .is_some_and(|c| roles.contains(&c))
        })
        .collect()
}

/// Members of `pool` whose role is known or derived to be one of `roles`.
pub(crate) fn holding(pool: &[AgentId], beliefs: &BeliefStore, roles: &[Role]) -> Vec<AgentId> {
    pool.iter()
        .copied()
        .filter(|&a| {
            beliefs
                .get(a)
                .and_then(|b| b.role)
                .is_some_and(|r| roles.contains(&r))
        })
        .collect()
}
