//! Per-agent belief records.
//!
//! The [`BeliefStore`] is an arena of [`AgentBelief`] records indexed by a
//! dense slot derived from the agent handle. Role, species, team and claim
//! are owned by the inference engine: every mutator that touches them
//! asserts a fact, propagates, and copies the derived values back into the
//! records. Vote tallies, attack intents and roster flags are plain state.

use std::collections::BTreeMap;

use lupine_infer::{InferenceEngine, Var};
use lupine_types::{AgentId, Judge, Role, Species, TalkRef, Team, Topic};
use tracing::debug;

use crate::error::AgentError;

// ---------------------------------------------------------------------------
// AgentBelief
// ---------------------------------------------------------------------------

/// Everything this agent believes about one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentBelief {
    /// The player described.
    pub agent: AgentId,
    /// Derived or known role.
    pub role: Option<Role>,
    /// Publicly claimed role.
    pub claim: Option<Role>,
    /// Derived or known species.
    pub species: Option<Species>,
    /// Derived or known team.
    pub team: Team,
    /// Killed by a night attack.
    pub attacked: bool,
    /// Still in the game.
    pub alive: bool,
    /// Topic of the player's latest talk today.
    pub latest_topic: Option<Topic>,
    /// The player's latest attack whisper today.
    pub latest_whisper: Option<TalkRef>,
    /// Agent the player announced a vote for today.
    pub vote_target: Option<AgentId>,
    /// Announced votes against this player today.
    pub vote_count: u32,
    /// Agent the player whispered an attack intent for today.
    pub attack_target: Option<AgentId>,
    /// Holds the strictly highest announced vote count today.
    pub may_be_executed: bool,
    /// Divinations this player has claimed, in announcement order.
    pub divinations: Vec<Judge>,
    /// Inquests this player has claimed, in announcement order.
    pub inquests: Vec<Judge>,
}

impl AgentBelief {
    fn new(agent: AgentId) -> Self {
        Self {
            agent,
            role: None,
            claim: None,
            species: None,
            team: Team::Uncertain,
            attacked: false,
            alive: true,
            latest_topic: None,
            latest_whisper: None,
            vote_target: None,
            vote_count: 0,
            attack_target: None,
            may_be_executed: false,
            divinations: Vec::new(),
            inquests: Vec::new(),
        }
    }

    /// Clear the state that only lives for one day.
    fn reset_daily(&mut self) {
        self.latest_topic = None;
        self.latest_whisper = None;
        self.vote_target = None;
        self.vote_count = 0;
        self.attack_target = None;
        self.may_be_executed = false;
    }
}

// ---------------------------------------------------------------------------
// BeliefStore
// ---------------------------------------------------------------------------

/// Arena of belief records for one game, plus the engine deriving them.
#[derive(Debug, Clone)]
pub struct BeliefStore {
    me: AgentId,
    my_role: Role,
    slots: BTreeMap<AgentId, usize>,
    beliefs: Vec<AgentBelief>,
    engine: InferenceEngine,
    attacked: Vec<AgentId>,
    executed: Vec<AgentId>,
}

impl BeliefStore {
    /// Create records for every agent and assert the roles already known.
    ///
    /// `known_roles` must include this agent's own role; roles of fellow
    /// werewolves arrive the same way.
    pub fn new(
        agents: &[AgentId],
        me: AgentId,
        my_role: Role,
        known_roles: &BTreeMap<AgentId, Role>,
        max_passes: Option<usize>,
    ) -> Result<Self, AgentError> {
        let mut engine = InferenceEngine::new(agents, me, my_role);
        if let Some(max) = max_passes {
            engine = engine.with_max_passes(max);
        }
        let mut slots = BTreeMap::new();
        let mut beliefs = Vec::with_capacity(agents.len());
        for &agent in agents {
            if slots.insert(agent, beliefs.len()).is_none() {
                beliefs.push(AgentBelief::new(agent));
            }
        }
        let mut store = Self {
            me,
            my_role,
            slots,
            beliefs,
            engine,
            attacked: Vec::new(),
            executed: Vec::new(),
        };
        store.require(me)?;

        let mine = core::iter::once((me, my_role));
        for (agent, role) in mine.chain(known_roles.iter().map(|(&a, &r)| (a, r))) {
            store.engine.assert(Var::Role(agent), role)?;
            store.engine.assert(Var::Species(agent), role.species())?;
            store.engine.assert(Var::Team(agent), role.team())?;
        }
        store.settle()?;
        Ok(store)
    }

    /// This agent.
    pub const fn me(&self) -> AgentId {
        self.me
    }

    /// This agent's role.
    pub const fn my_role(&self) -> Role {
        self.my_role
    }

    /// Whether the agent takes part in this game.
    pub fn contains(&self, agent: AgentId) -> bool {
        self.slots.contains_key(&agent)
    }

    /// Belief about `agent`, if it takes part in this game.
    pub fn get(&self, agent: AgentId) -> Option<&AgentBelief> {
        self.slots.get(&agent).and_then(|&slot| self.beliefs.get(slot))
    }

    /// Belief about `agent`, failing for agents outside the game.
    pub fn require(&self, agent: AgentId) -> Result<&AgentBelief, AgentError> {
        self.get(agent).ok_or(AgentError::UnknownAgent(agent))
    }

    fn require_mut(&mut self, agent: AgentId) -> Result<&mut AgentBelief, AgentError> {
        let slot = *self.slots.get(&agent).ok_or(AgentError::UnknownAgent(agent))?;
        self.beliefs
            .get_mut(slot)
            .ok_or(AgentError::UnknownAgent(agent))
    }

    /// Every record, in agent-list order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentBelief> {
        self.beliefs.iter()
    }

    /// Living agents other than this one, in agent-list order.
    pub fn alive_others(&self) -> Vec<AgentId> {
        self.beliefs
            .iter()
            .filter(|b| b.alive && b.agent != self.me)
            .map(|b| b.agent)
            .collect()
    }

    /// Agents killed by night attacks, in order of death.
    pub fn attacked_agents(&self) -> &[AgentId] {
        &self.attacked
    }

    /// Agents executed by vote, in order of execution.
    pub fn executed_agents(&self) -> &[AgentId] {
        &self.executed
    }

    /// Number of agents other than `except` currently claiming `role`.
    pub fn claim_count(&self, role: Role, except: AgentId) -> usize {
        self.beliefs
            .iter()
            .filter(|b| b.agent != except && b.claim == Some(role))
            .count()
    }

    /// The inference engine behind the records.
    pub const fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    // -----------------------------------------------------------------------
    // Inferred attributes
    // -----------------------------------------------------------------------

    /// Record ground truth about an agent's species (own divination or
    /// inquest result).
    pub fn assert_species(&mut self, agent: AgentId, species: Species) -> Result<(), AgentError> {
        self.require(agent)?;
        self.engine.assert(Var::Species(agent), species)?;
        self.settle()
    }

    /// Record that `agent` publicly claimed `role`.
    pub fn set_claim(&mut self, agent: AgentId, role: Role) -> Result<(), AgentError> {
        self.require(agent)?;
        self.engine.assert(Var::Claim(agent), role)?;
        self.settle()
    }

    /// Record a claimed divination. Divinations of oneself are kept in the
    /// history but carry no fact.
    pub fn add_divination(&mut self, judge: Judge) -> Result<(), AgentError> {
        self.require(judge.target)?;
        self.require_mut(judge.agent)?.divinations.push(judge);
        if judge.agent == judge.target {
            return Ok(());
        }
        self.engine.assert(
            Var::Divined {
                by: judge.agent,
                target: judge.target,
            },
            judge.result,
        )?;
        self.settle()
    }

    /// Record a claimed inquest.
    pub fn add_inquest(&mut self, judge: Judge) -> Result<(), AgentError> {
        self.require(judge.target)?;
        self.require_mut(judge.agent)?.inquests.push(judge);
        if judge.agent == judge.target {
            return Ok(());
        }
        self.engine.assert(
            Var::Inquested {
                by: judge.agent,
                target: judge.target,
            },
            judge.result,
        )?;
        self.settle()
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Record that `agent` died in a night attack.
    pub fn mark_attacked(&mut self, agent: AgentId) -> Result<(), AgentError> {
        let belief = self.require_mut(agent)?;
        belief.alive = false;
        belief.attacked = true;
        if !self.attacked.contains(&agent) {
            self.attacked.push(agent);
        }
        self.engine.assert(Var::Attacked(agent), true)?;
        self.settle()
    }

    /// Record that `agent` was executed by vote.
    pub fn mark_executed(&mut self, agent: AgentId) -> Result<(), AgentError> {
        self.require_mut(agent)?.alive = false;
        if !self.executed.contains(&agent) {
            self.executed.push(agent);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Daily state
    // -----------------------------------------------------------------------

    /// Remember the topic of `agent`'s latest talk.
    pub fn set_latest_topic(&mut self, agent: AgentId, topic: Topic) -> Result<(), AgentError> {
        self.require_mut(agent)?.latest_topic = Some(topic);
        Ok(())
    }

    /// Move `speaker`'s announced vote to `target`, keeping tallies in step.
    pub fn record_vote(&mut self, speaker: AgentId, target: AgentId) -> Result<(), AgentError> {
        self.require(target)?;
        let previous = self.require_mut(speaker)?.vote_target.replace(target);
        if let Some(prev) = previous {
            let count = &mut self.require_mut(prev)?.vote_count;
            *count = count.saturating_sub(1);
        }
        let count = &mut self.require_mut(target)?.vote_count;
        *count = count.saturating_add(1);
        Ok(())
    }

    /// Remember `speaker`'s whispered attack intent.
    pub fn record_attack_intent(
        &mut self,
        speaker: AgentId,
        target: AgentId,
        reference: TalkRef,
    ) -> Result<(), AgentError> {
        self.require(target)?;
        let belief = self.require_mut(speaker)?;
        belief.latest_whisper = Some(reference);
        belief.attack_target = Some(target);
        Ok(())
    }

    /// Forget `agent`'s attack intent once it has been answered.
    pub fn clear_attack_target(&mut self, agent: AgentId) -> Result<(), AgentError> {
        self.require_mut(agent)?.attack_target = None;
        Ok(())
    }

    /// Clear per-day state for every agent.
    pub fn reset_daily(&mut self) {
        for belief in &mut self.beliefs {
            belief.reset_daily();
        }
    }

    /// Flag the living agent holding the strictly highest non-zero vote
    /// count. Ties flag nobody.
    pub fn refresh_may_be_executed(&mut self) {
        let mut top: Option<(usize, u32)> = None;
        let mut tied = false;
        for (slot, belief) in self.beliefs.iter_mut().enumerate() {
            belief.may_be_executed = false;
            if !belief.alive || belief.vote_count == 0 {
                continue;
            }
            match top {
                Some((_, best)) if belief.vote_count < best => {}
                Some((_, best)) if belief.vote_count == best => tied = true,
                _ => {
                    top = Some((slot, belief.vote_count));
                    tied = false;
                }
            }
        }
        if let (Some((slot, _)), false) = (top, tied)
            && let Some(belief) = self.beliefs.get_mut(slot)
        {
            belief.may_be_executed = true;
        }
    }

    // -----------------------------------------------------------------------
    // Engine sync
    // -----------------------------------------------------------------------

    /// Propagate and copy derived attributes back into the records.
    fn settle(&mut self) -> Result<(), AgentError> {
        let report = self.engine.propagate()?;
        debug!(passes = report.passes, writes = report.writes, "Beliefs settled");
        for belief in &mut self.beliefs {
            let a = belief.agent;
            belief.role = self.engine.read(Var::Role(a))?.as_role();
            belief.species = self.engine.read(Var::Species(a))?.as_species();
            belief.team = self.engine.read(Var::Team(a))?.as_team();
            belief.claim = self.engine.read(Var::Claim(a))?.as_role();
        }
        Ok(())
    }
}
