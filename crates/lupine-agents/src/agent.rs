//! The per-game decision core.
//!
//! An [`Agent`] is created once per game and driven by the session through
//! its lifecycle hooks: observations feed the [`BeliefStore`], every
//! decision reads a freshly classified [`TeamBuckets`] snapshot, and
//! role-specific steps are delegated to the [`RoleBehavior`].

use std::collections::BTreeMap;

use lupine_types::{AgentId, Judge, Role, TalkRef, Utterance};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::belief::BeliefStore;
use crate::candidate::{Candidate, pick};
use crate::classifier::{EstimateQueue, TeamBuckets, TeamClassifier};
use crate::config::PolicyConfig;
use crate::error::AgentError;
use crate::role::RoleBehavior;

// ---------------------------------------------------------------------------
// DayEvents
// ---------------------------------------------------------------------------

/// What the game reported at the start of a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayEvents {
    /// Agent killed by last night's attack.
    pub attacked: Option<AgentId>,
    /// Agent executed by yesterday's vote.
    pub executed: Option<AgentId>,
    /// Last night's divination, delivered to the seer only.
    pub divine_result: Option<Judge>,
    /// Inquest on yesterday's executed agent, delivered to the medium only.
    pub medium_result: Option<Judge>,
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// State shared by every role.
#[derive(Debug)]
pub(crate) struct Context {
    pub(crate) day: u32,
    pub(crate) beliefs: BeliefStore,
    pub(crate) classifier: TeamClassifier,
    pub(crate) vote: Candidate,
    pub(crate) rng: SmallRng,
    pub(crate) config: PolicyConfig,
}

impl Context {
    /// Whether this agent currently tops the announced votes.
    pub(crate) fn may_be_executed(&self) -> bool {
        self.beliefs
            .get(self.beliefs.me())
            .is_some_and(|b| b.may_be_executed)
    }

    pub(crate) const fn mismatch(&self, operation: &'static str) -> AgentError {
        AgentError::RoleMismatch {
            operation,
            role: self.beliefs.my_role(),
        }
    }

    fn refresh(&mut self) {
        self.beliefs.refresh_may_be_executed();
        self.classifier.refresh(&self.beliefs);
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// One player's decision core for one game.
#[derive(Debug)]
pub struct Agent {
    ctx: Context,
    behavior: RoleBehavior,
}

impl Agent {
    /// Set up beliefs and role state for a new game.
    ///
    /// `known_roles` carries roles revealed by the game (fellow werewolves
    /// for a werewolf). The random stream is seeded from `seed` and the
    /// agent's own handle so two agents in one game never share a stream.
    pub fn new(
        agents: &[AgentId],
        me: AgentId,
        role: Role,
        known_roles: &BTreeMap<AgentId, Role>,
        seed: u64,
        config: PolicyConfig,
    ) -> Result<Self, AgentError> {
        let mut rng = SmallRng::seed_from_u64(seed ^ u64::from(me.into_inner()));
        let beliefs = BeliefStore::new(agents, me, role, known_roles, config.max_passes)?;
        let behavior = RoleBehavior::for_role(role, &config, &mut rng);

        let mut vote = Candidate::default();
        vote.set(pick(&beliefs.alive_others(), &mut rng));

        let mut ctx = Context {
            day: 0,
            beliefs,
            classifier: TeamClassifier::default(),
            vote,
            rng,
            config,
        };
        ctx.refresh();
        info!(agent = %me, %role, players = agents.len(), "Agent initialized");
        Ok(Self { ctx, behavior })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// This agent's handle.
    pub const fn me(&self) -> AgentId {
        self.ctx.beliefs.me()
    }

    /// This agent's role.
    pub const fn role(&self) -> Role {
        self.ctx.beliefs.my_role()
    }

    /// Current day.
    pub const fn day(&self) -> u32 {
        self.ctx.day
    }

    /// The belief store.
    pub const fn beliefs(&self) -> &BeliefStore {
        &self.ctx.beliefs
    }

    /// The latest team classification.
    pub const fn buckets(&self) -> &TeamBuckets {
        self.ctx.classifier.buckets()
    }

    /// Agents still waiting for an estimate.
    pub const fn estimates(&self) -> &EstimateQueue {
        self.ctx.classifier.estimates()
    }

    /// Role-specific state.
    pub const fn behavior(&self) -> &RoleBehavior {
        &self.behavior
    }

    /// Currently held vote candidate.
    pub const fn vote_candidate(&self) -> Option<AgentId> {
        self.ctx.vote.current()
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// Move to `day` and raise the daily declare flags.
    pub fn begin_day(&mut self, day: u32) {
        self.ctx.day = day;
        self.ctx.vote.redeclare();
        self.behavior.begin_day();
    }

    /// Fold one public utterance by `speaker` into the beliefs.
    pub fn observe_talk(
        &mut self,
        speaker: AgentId,
        utterance: Utterance,
    ) -> Result<(), AgentError> {
        let beliefs = &mut self.ctx.beliefs;
        beliefs.set_latest_topic(speaker, utterance.topic())?;
        match utterance {
            Utterance::Comingout { agent, role } if agent == speaker => {
                debug!(day = self.ctx.day, %speaker, %role, "Claim observed");
                beliefs.set_claim(speaker, role)?;
            }
            Utterance::Divined { target, result } => {
                beliefs.add_divination(Judge {
                    day: self.ctx.day,
                    agent: speaker,
                    target,
                    result,
                })?;
            }
            Utterance::Inquested { target, result } => {
                beliefs.add_inquest(Judge {
                    day: self.ctx.day,
                    agent: speaker,
                    target,
                    result,
                })?;
            }
            Utterance::Vote { target } => beliefs.record_vote(speaker, target)?,
            _ => {}
        }
        Ok(())
    }

    /// Fold one whisper by `speaker` into the beliefs.
    pub fn observe_whisper(
        &mut self,
        speaker: AgentId,
        reference: TalkRef,
        utterance: Utterance,
    ) -> Result<(), AgentError> {
        if let Utterance::Attack { target } = utterance {
            self.ctx
                .beliefs
                .record_attack_intent(speaker, target, reference)?;
        }
        Ok(())
    }

    /// Recompute the may-be-executed flags and the team buckets.
    pub fn refresh(&mut self) {
        self.ctx.refresh();
    }

    /// Take in the day's deaths and role results.
    ///
    /// Day 0 carries nothing worth reading and is skipped.
    pub fn day_start(&mut self, events: &DayEvents) -> Result<(), AgentError> {
        if self.ctx.day == 0 {
            return Ok(());
        }
        self.ctx.beliefs.reset_daily();
        if let Some(victim) = events.attacked {
            self.ctx.beliefs.mark_attacked(victim)?;
        }
        if let Some(executed) = events.executed {
            self.ctx.beliefs.mark_executed(executed)?;
        }
        self.ctx.refresh();
        self.behavior.day_start(&mut self.ctx, events)?;
        self.ctx.refresh();

        let buckets = self.ctx.classifier.buckets();
        info!(
            day = self.ctx.day,
            attacked = ?events.attacked,
            executed = ?events.executed,
            werewolves = buckets.team_werewolf.len(),
            villagers = buckets.team_villager.len(),
            uncertain = buckets.team_uncertain.len(),
            "Day started"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Decisions
    // -----------------------------------------------------------------------

    /// Next public utterance.
    ///
    /// The first step that has something to say wins: role reveal, result
    /// narration, one estimate, the vote declaration, then `Over`.
    pub fn talk(&mut self) -> Utterance {
        if self.ctx.day == 0 {
            return Utterance::Over;
        }
        if let Some(reveal) = self.behavior.coming_out(&mut self.ctx) {
            info!(day = self.ctx.day, utterance = ?reveal, "Coming out");
            return reveal;
        }
        if let Some(report) = self.behavior.narrate_judge(&mut self.ctx) {
            return report;
        }
        self.refresh_vote();
        while let Some(agent) = self.ctx.classifier.estimates_mut().pop() {
            if let Some(estimate) = self.behavior.estimate(&self.ctx, agent) {
                return estimate;
            }
        }
        if let Some(target) = self.ctx.vote.take_declaration() {
            return Utterance::Vote { target };
        }
        Utterance::Over
    }

    /// Next whisper. Werewolves only.
    pub fn whisper(&mut self) -> Result<Utterance, AgentError> {
        self.behavior.whisper(&mut self.ctx)
    }

    /// Today's vote.
    pub fn vote(&mut self) -> Option<AgentId> {
        self.refresh_vote()
    }

    /// Tonight's attack. Werewolves only.
    pub fn attack(&mut self) -> Result<Option<AgentId>, AgentError> {
        self.behavior.attack(&mut self.ctx)
    }

    /// Tonight's guard. Bodyguards only.
    pub fn guard(&mut self) -> Result<Option<AgentId>, AgentError> {
        self.behavior.guard(&mut self.ctx)
    }

    /// Tonight's divination. Seers only.
    pub fn divine(&mut self) -> Result<Option<AgentId>, AgentError> {
        self.behavior.divine(&mut self.ctx)
    }

    fn refresh_vote(&mut self) -> Option<AgentId> {
        let tiers = self.behavior.vote_tiers(&self.ctx);
        let before = self.ctx.vote.current();
        let after = self.ctx.vote.select(tiers, &mut self.ctx.rng);
        if before != after {
            info!(day = self.ctx.day, ?after, "Vote candidate changed");
        }
        after
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lupine_types::{Species, TalkKind, Team};

    use super::*;

    fn ids(n: u32) -> Vec<AgentId> {
        (1..=n).map(AgentId).collect()
    }

    fn config(co_day: u32) -> PolicyConfig {
        let window = crate::config::CoDayWindow::new(co_day, co_day);
        PolicyConfig {
            seer_co_days: window,
            medium_co_days: window,
            possessed_co_days: window,
            ..PolicyConfig::default()
        }
    }

    fn agent(role: Role, co_day: u32) -> Agent {
        let known = BTreeMap::new();
        Agent::new(&ids(5), AgentId(1), role, &known, 42, config(co_day)).unwrap()
    }

    fn start_day(agent: &mut Agent, day: u32, events: &DayEvents) {
        agent.begin_day(day);
        agent.day_start(events).unwrap();
    }

    fn whisper_ref(day: u32, idx: u32) -> TalkRef {
        TalkRef {
            kind: TalkKind::Whisper,
            day,
            idx,
        }
    }

    #[test]
    fn day_zero_is_silent() {
        let mut a = agent(Role::Seer, 0);
        assert_eq!(a.talk(), Utterance::Over);
        assert!(!a.behavior().has_come_out());
    }

    #[test]
    fn initial_vote_candidate_is_another_living_agent() {
        let a = agent(Role::Villager, 1);
        let vote = a.vote_candidate().unwrap();
        assert_ne!(vote, a.me());
    }

    #[test]
    fn seer_comes_out_then_narrates_then_votes() {
        let mut a = agent(Role::Seer, 5);
        let wolf = AgentId(3);
        let events = DayEvents {
            divine_result: Some(Judge {
                day: 0,
                agent: AgentId(1),
                target: wolf,
                result: Species::Werewolf,
            }),
            ..DayEvents::default()
        };
        start_day(&mut a, 1, &events);

        assert_eq!(
            a.talk(),
            Utterance::Comingout {
                agent: AgentId(1),
                role: Role::Seer
            }
        );
        assert_eq!(
            a.talk(),
            Utterance::Divined {
                target: wolf,
                result: Species::Werewolf
            }
        );
        assert_eq!(a.talk(), Utterance::Vote { target: wolf });
        assert_eq!(a.talk(), Utterance::Over);
        assert_eq!(a.vote(), Some(wolf));
    }

    #[test]
    fn seer_comes_out_on_rival_claim() {
        let mut a = agent(Role::Seer, 5);
        start_day(&mut a, 1, &DayEvents::default());
        a.observe_talk(
            AgentId(2),
            Utterance::Comingout {
                agent: AgentId(2),
                role: Role::Seer,
            },
        )
        .unwrap();
        a.refresh();
        assert_eq!(
            a.talk(),
            Utterance::Comingout {
                agent: AgentId(1),
                role: Role::Seer
            }
        );
        // My own claim makes the rival a possessed or werewolf.
        assert_eq!(a.buckets().team_of(AgentId(2)), Some(Team::Werewolf));
    }

    #[test]
    fn claims_of_someone_else_are_ignored() {
        let mut a = agent(Role::Villager, 1);
        start_day(&mut a, 1, &DayEvents::default());
        a.observe_talk(
            AgentId(2),
            Utterance::Comingout {
                agent: AgentId(3),
                role: Role::Seer,
            },
        )
        .unwrap();
        assert_eq!(a.beliefs().get(AgentId(3)).unwrap().claim, None);
        assert_eq!(a.beliefs().get(AgentId(2)).unwrap().claim, None);
    }

    #[test]
    fn threatened_villager_claims_villager_once() {
        let mut a = agent(Role::Villager, 1);
        start_day(&mut a, 1, &DayEvents::default());
        a.observe_talk(AgentId(2), Utterance::Vote { target: AgentId(1) })
            .unwrap();
        a.refresh();
        assert_eq!(
            a.talk(),
            Utterance::Comingout {
                agent: AgentId(1),
                role: Role::Villager
            }
        );
        assert!(a.behavior().has_come_out());
        assert!(!matches!(a.talk(), Utterance::Comingout { .. }));
    }

    #[test]
    fn vote_declared_once_per_day() {
        let mut a = agent(Role::Villager, 1);
        start_day(&mut a, 1, &DayEvents::default());
        let vote = a.talk();
        assert!(matches!(vote, Utterance::Vote { .. }));
        assert_eq!(a.talk(), Utterance::Over);

        start_day(&mut a, 2, &DayEvents::default());
        assert!(matches!(a.talk(), Utterance::Vote { .. }));
    }

    #[test]
    fn attacked_agent_is_human_and_dead() {
        let mut a = agent(Role::Villager, 1);
        let events = DayEvents {
            attacked: Some(AgentId(4)),
            ..DayEvents::default()
        };
        start_day(&mut a, 1, &events);
        let victim = a.beliefs().get(AgentId(4)).unwrap();
        assert_eq!(victim.species, Some(Species::Human));
        assert!(!victim.alive);
        assert!(!a.buckets().humans.contains(&AgentId(4)));
    }

    #[test]
    fn role_operations_check_the_role() {
        let mut a = agent(Role::Villager, 1);
        assert!(matches!(
            a.divine(),
            Err(AgentError::RoleMismatch {
                operation: "divine",
                ..
            })
        ));
        assert!(a.attack().is_err());
        assert!(a.guard().is_err());
        assert!(a.whisper().is_err());
    }

    #[test]
    fn seer_never_divines_twice() {
        let mut a = agent(Role::Seer, 5);
        let mut seen = Vec::new();
        for day in 1..=4 {
            start_day(&mut a, day, &DayEvents::default());
            if let Some(t) = a.divine().unwrap() {
                assert!(!seen.contains(&t));
                assert_ne!(t, a.me());
                seen.push(t);
            }
        }
        assert_eq!(seen.len(), 4);
        start_day(&mut a, 5, &DayEvents::default());
        assert_eq!(a.divine().unwrap(), None);
    }

    #[test]
    fn werewolf_adopts_earliest_teammate_intent() {
        let mut known = BTreeMap::new();
        known.insert(AgentId(2), Role::Werewolf);
        let mut a = Agent::new(
            &ids(5),
            AgentId(1),
            Role::Werewolf,
            &known,
            42,
            config(3),
        )
        .unwrap();
        start_day(&mut a, 1, &DayEvents::default());
        a.observe_whisper(
            AgentId(2),
            whisper_ref(1, 0),
            Utterance::Attack { target: AgentId(4) },
        )
        .unwrap();

        assert_eq!(
            a.whisper().unwrap(),
            Utterance::Agree {
                reference: whisper_ref(1, 0)
            }
        );
        assert_eq!(a.whisper().unwrap(), Utterance::Attack { target: AgentId(4) });
        assert_eq!(a.whisper().unwrap(), Utterance::Over);
        assert_eq!(a.attack().unwrap(), Some(AgentId(4)));
        assert_eq!(a.beliefs().get(AgentId(2)).unwrap().attack_target, None);
    }

    #[test]
    fn adopted_target_outlasts_a_claimed_seer() {
        let known = BTreeMap::from([(AgentId(2), Role::Werewolf)]);
        for seed in 0..20 {
            let mut a =
                Agent::new(&ids(5), AgentId(1), Role::Werewolf, &known, seed, config(3)).unwrap();
            start_day(&mut a, 1, &DayEvents::default());
            a.observe_talk(
                AgentId(3),
                Utterance::Comingout {
                    agent: AgentId(3),
                    role: Role::Seer,
                },
            )
            .unwrap();
            a.refresh();
            a.observe_whisper(
                AgentId(2),
                whisper_ref(1, 0),
                Utterance::Attack { target: AgentId(5) },
            )
            .unwrap();
            a.refresh();

            let whispers: Vec<_> = (0..3).map(|_| a.whisper().unwrap()).collect();
            assert_eq!(
                whispers,
                [
                    Utterance::Agree {
                        reference: whisper_ref(1, 0)
                    },
                    Utterance::Attack { target: AgentId(5) },
                    Utterance::Over,
                ],
                "seed {seed}"
            );
            assert_eq!(a.attack().unwrap(), Some(AgentId(5)), "seed {seed}");
        }
    }

    #[test]
    fn werewolf_never_attacks_a_teammate() {
        let mut known = BTreeMap::new();
        known.insert(AgentId(2), Role::Werewolf);
        let mut a = Agent::new(
            &ids(5),
            AgentId(1),
            Role::Werewolf,
            &known,
            7,
            config(3),
        )
        .unwrap();
        for day in 1..=3 {
            start_day(&mut a, day, &DayEvents::default());
            let target = a.attack().unwrap().unwrap();
            assert_ne!(target, AgentId(1));
            assert_ne!(target, AgentId(2));
        }
    }

    #[test]
    fn werewolf_day_zero_whisper_is_over() {
        let mut a = agent(Role::Werewolf, 3);
        assert_eq!(a.whisper().unwrap(), Utterance::Over);
    }

    #[test]
    fn bodyguard_guards_someone_else() {
        let mut a = agent(Role::Bodyguard, 1);
        start_day(&mut a, 1, &DayEvents::default());
        let target = a.guard().unwrap().unwrap();
        assert_ne!(target, a.me());
    }

    #[test]
    fn possessed_takes_the_open_fake_role_and_fabricates() {
        let mut a = agent(Role::Possessed, 1);
        start_day(&mut a, 1, &DayEvents::default());
        for seer in [AgentId(2), AgentId(3)] {
            a.observe_talk(
                seer,
                Utterance::Comingout {
                    agent: seer,
                    role: Role::Seer,
                },
            )
            .unwrap();
        }
        a.refresh();
        assert_eq!(
            a.talk(),
            Utterance::Comingout {
                agent: AgentId(1),
                role: Role::Medium
            }
        );
        let RoleBehavior::Possessed(state) = a.behavior() else {
            panic!("expected possessed state");
        };
        assert_eq!(state.fake_role(), Some(Role::Medium));

        let events = DayEvents {
            executed: Some(AgentId(5)),
            ..DayEvents::default()
        };
        start_day(&mut a, 2, &events);
        let RoleBehavior::Possessed(state) = a.behavior() else {
            panic!("expected possessed state");
        };
        let fabricated: Vec<_> = state.pending().copied().collect();
        assert_eq!(fabricated.len(), 1);
        assert_eq!(fabricated.first().unwrap().target, AgentId(5));
        assert_eq!(fabricated.first().unwrap().result, Species::Human);
        assert_eq!(
            a.talk(),
            Utterance::Inquested {
                target: AgentId(5),
                result: Species::Human
            }
        );
    }

    #[test]
    fn fake_divination_of_a_dead_agent_is_not_narrated() {
        let mut a = agent(Role::Possessed, 1);
        start_day(&mut a, 1, &DayEvents::default());
        for medium in [AgentId(3), AgentId(4)] {
            a.observe_talk(
                medium,
                Utterance::Comingout {
                    agent: medium,
                    role: Role::Medium,
                },
            )
            .unwrap();
        }
        // A seer claim that got my species right puts Agent 2 on the
        // villager team, the only fabrication target.
        a.observe_talk(
            AgentId(2),
            Utterance::Comingout {
                agent: AgentId(2),
                role: Role::Seer,
            },
        )
        .unwrap();
        a.observe_talk(
            AgentId(2),
            Utterance::Divined {
                target: AgentId(1),
                result: Species::Human,
            },
        )
        .unwrap();
        a.refresh();
        assert_eq!(a.beliefs().get(AgentId(2)).unwrap().team, Team::Villager);
        assert_eq!(
            a.talk(),
            Utterance::Comingout {
                agent: AgentId(1),
                role: Role::Seer
            }
        );

        start_day(&mut a, 2, &DayEvents::default());
        let RoleBehavior::Possessed(state) = a.behavior() else {
            panic!("expected possessed state");
        };
        let fabricated: Vec<_> = state.pending().map(|j| j.target).collect();
        assert_eq!(fabricated, [AgentId(2)]);

        let events = DayEvents {
            executed: Some(AgentId(2)),
            ..DayEvents::default()
        };
        start_day(&mut a, 3, &events);
        for _ in 0..8 {
            let said = a.talk();
            assert!(
                !matches!(said, Utterance::Divined { target, .. } if target == AgentId(2)),
                "narrated a dead agent: {said:?}"
            );
        }
    }
}
