//! Role-specific state and dispatch.
//!
//! [`RoleBehavior`] is a closed union over the six behaviors. Each variant
//! carries the transient state its role needs (reveal day, result queues,
//! fake role, attack and guard candidates). The shared talk ladder lives in
//! [`Agent`](crate::agent::Agent) and asks the behavior for each step.

use std::collections::{BTreeSet, VecDeque};

use lupine_types::{AgentId, Judge, Role, Species, Utterance};
use rand::Rng;
use tracing::info;

use crate::agent::{Context, DayEvents};
use crate::candidate::{Candidate, pick};
use crate::config::PolicyConfig;
use crate::error::AgentError;
use crate::policy::{attack, divine, fake, guard, talk, vote};

// ---------------------------------------------------------------------------
// Per-role state
// ---------------------------------------------------------------------------

/// Villager and freemason: reveal only to escape execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainState {
    claim: Role,
    came_out: bool,
}

/// Seer: scheduled reveal, divination queue, judged set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeerState {
    co_day: u32,
    came_out: bool,
    pending: VecDeque<Judge>,
    judged: BTreeSet<AgentId>,
    latest: Option<Judge>,
}

/// Medium: scheduled reveal and inquest queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumState {
    co_day: u32,
    came_out: bool,
    pending: VecDeque<Judge>,
    latest: Option<Judge>,
}

/// Bodyguard: guard candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyguardState {
    guard: Candidate,
    came_out: bool,
}

/// Werewolf: attack candidate, today's adopted target, queued whispers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WerewolfState {
    attack: Candidate,
    adopted: Option<AgentId>,
    whispers: VecDeque<Utterance>,
    came_out: bool,
}

/// Possessed: scheduled fake reveal, fake role, fabricated results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PossessedState {
    co_day: u32,
    came_out: bool,
    fake_role: Option<Role>,
    divinations: VecDeque<Judge>,
    inquests: VecDeque<Judge>,
    judged: BTreeSet<AgentId>,
}

impl SeerState {
    const fn new(co_day: u32) -> Self {
        Self {
            co_day,
            came_out: false,
            pending: VecDeque::new(),
            judged: BTreeSet::new(),
            latest: None,
        }
    }

    /// Day of the scheduled reveal.
    pub const fn co_day(&self) -> u32 {
        self.co_day
    }

    /// Divinations not yet narrated, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Judge> {
        self.pending.iter()
    }

    /// Agents already divined or chosen for divination.
    pub const fn judged(&self) -> &BTreeSet<AgentId> {
        &self.judged
    }
}

impl MediumState {
    const fn new(co_day: u32) -> Self {
        Self {
            co_day,
            came_out: false,
            pending: VecDeque::new(),
            latest: None,
        }
    }

    /// Day of the scheduled reveal.
    pub const fn co_day(&self) -> u32 {
        self.co_day
    }

    /// Inquests not yet narrated, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Judge> {
        self.pending.iter()
    }
}

impl PossessedState {
    const fn new(co_day: u32) -> Self {
        Self {
            co_day,
            came_out: false,
            fake_role: None,
            divinations: VecDeque::new(),
            inquests: VecDeque::new(),
            judged: BTreeSet::new(),
        }
    }

    /// Day of the scheduled reveal.
    pub const fn co_day(&self) -> u32 {
        self.co_day
    }

    /// Fake role chosen at reveal time. `Villager` means nothing was claimed.
    pub const fn fake_role(&self) -> Option<Role> {
        self.fake_role
    }

    /// Fabricated results not yet narrated, divinations then inquests.
    pub fn pending(&self) -> impl Iterator<Item = &Judge> {
        self.divinations.iter().chain(self.inquests.iter())
    }
}

impl WerewolfState {
    /// Currently planned attack target.
    pub const fn attack_candidate(&self) -> Option<AgentId> {
        self.attack.current()
    }

    /// Target adopted from a teammate today, while it is still edible.
    fn adopted(&self, ctx: &Context) -> Option<AgentId> {
        self.adopted.filter(|&t| attack::is_edible(&ctx.beliefs, t))
    }

    /// Keep today's adoption while it holds, otherwise rerun the tiers.
    fn settle_attack(&mut self, ctx: &mut Context) -> Option<AgentId> {
        if let Some(target) = self.adopted(ctx) {
            return Some(target);
        }
        self.adopted = None;
        self.refresh_attack(ctx)
    }

    fn refresh_attack(&mut self, ctx: &mut Context) -> Option<AgentId> {
        let tiers = attack::attack_tiers(ctx.classifier.buckets(), &ctx.beliefs);
        let before = self.attack.current();
        let after = self.attack.select(tiers, &mut ctx.rng);
        if before != after {
            info!(day = ctx.day, ?after, "Attack candidate changed");
        }
        after
    }
}

// ---------------------------------------------------------------------------
// RoleBehavior
// ---------------------------------------------------------------------------

/// Behavior of this agent's role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleBehavior {
    /// Villager or freemason.
    Villager(PlainState),
    /// Seer.
    Seer(SeerState),
    /// Medium.
    Medium(MediumState),
    /// Bodyguard.
    Bodyguard(BodyguardState),
    /// Werewolf.
    Werewolf(WerewolfState),
    /// Possessed.
    Possessed(PossessedState),
}

impl RoleBehavior {
    /// Fresh behavior for `role`, drawing reveal days from `rng`.
    pub fn for_role<R: Rng + ?Sized>(role: Role, config: &PolicyConfig, rng: &mut R) -> Self {
        match role {
            Role::Villager | Role::Freemason => Self::Villager(PlainState {
                claim: role,
                came_out: false,
            }),
            Role::Seer => Self::Seer(SeerState::new(config.seer_co_days.draw(rng))),
            Role::Medium => Self::Medium(MediumState::new(config.medium_co_days.draw(rng))),
            Role::Bodyguard => Self::Bodyguard(BodyguardState::default()),
            Role::Werewolf => Self::Werewolf(WerewolfState::default()),
            Role::Possessed => {
                Self::Possessed(PossessedState::new(config.possessed_co_days.draw(rng)))
            }
        }
    }

    /// Whether this agent has already revealed (or decided not to fake) a
    /// role.
    pub const fn has_come_out(&self) -> bool {
        match self {
            Self::Villager(s) => s.came_out,
            Self::Seer(s) => s.came_out,
            Self::Medium(s) => s.came_out,
            Self::Bodyguard(s) => s.came_out,
            Self::Werewolf(s) => s.came_out,
            Self::Possessed(s) => s.came_out,
        }
    }

    /// Raise the daily declare flags of role-owned candidates.
    pub(crate) const fn begin_day(&mut self) {
        if let Self::Werewolf(s) = self {
            s.adopted = None;
            s.attack.redeclare();
        }
    }

    /// Take in the results delivered at the start of a day.
    pub(crate) fn day_start(
        &mut self,
        ctx: &mut Context,
        events: &DayEvents,
    ) -> Result<(), AgentError> {
        let me = ctx.beliefs.me();
        match self {
            Self::Seer(s) => {
                s.latest = events.divine_result;
                if let Some(judge) = events.divine_result {
                    s.judged.insert(judge.target);
                    ctx.beliefs.assert_species(judge.target, judge.result)?;
                    s.pending.push_back(judge);
                    info!(day = ctx.day, target = %judge.target, result = %judge.result, "Divination received");
                }
            }
            Self::Medium(s) => {
                s.latest = events.medium_result;
                if let Some(judge) = events.medium_result {
                    ctx.beliefs.assert_species(judge.target, judge.result)?;
                    s.pending.push_back(judge);
                    info!(day = ctx.day, target = %judge.target, result = %judge.result, "Inquest received");
                }
            }
            Self::Possessed(s) => {
                let fabricated = match s.fake_role {
                    Some(Role::Seer) => fake::fabricate_divination(
                        ctx.day,
                        me,
                        ctx.classifier.buckets(),
                        &mut s.judged,
                        &mut ctx.rng,
                    ),
                    Some(Role::Medium) => {
                        fake::fabricate_inquest(ctx.day, me, events.executed, &mut s.judged)
                    }
                    _ => None,
                };
                if let Some(judge) = fabricated {
                    if s.fake_role == Some(Role::Seer) {
                        s.divinations.push_back(judge);
                    } else {
                        s.inquests.push_back(judge);
                    }
                }
            }
            Self::Villager(_) | Self::Bodyguard(_) | Self::Werewolf(_) => {}
        }
        Ok(())
    }

    /// Talk ladder steps 1 and 2: the role reveal, at most once per game.
    pub(crate) fn coming_out(&mut self, ctx: &mut Context) -> Option<Utterance> {
        let me = ctx.beliefs.me();
        let threatened = ctx.may_be_executed();
        let day = ctx.day;
        let claim = match self {
            Self::Villager(s) if !s.came_out && threatened => {
                s.came_out = true;
                s.claim
            }
            Self::Bodyguard(s) if !s.came_out && threatened => {
                s.came_out = true;
                Role::Bodyguard
            }
            Self::Werewolf(s) if !s.came_out && threatened => {
                s.came_out = true;
                Role::Villager
            }
            Self::Seer(s) if !s.came_out => {
                let rival = ctx.beliefs.claim_count(Role::Seer, me) > 0;
                let found = s.latest.is_some_and(|j| j.result == Species::Werewolf);
                if !(threatened || day >= s.co_day || rival || found) {
                    return None;
                }
                s.came_out = true;
                Role::Seer
            }
            Self::Medium(s) if !s.came_out => {
                let found = s.latest.is_some_and(|j| j.result == Species::Werewolf);
                if !(threatened || day >= s.co_day || found) {
                    return None;
                }
                s.came_out = true;
                Role::Medium
            }
            Self::Possessed(s) if !s.came_out => {
                if !(threatened || day >= s.co_day) {
                    return None;
                }
                s.came_out = true;
                let chosen =
                    fake::choose_fake_role(&ctx.beliefs, ctx.config.claim_saturation, &mut ctx.rng);
                s.fake_role = Some(chosen);
                if chosen == Role::Villager {
                    info!(day, "Every fake role is taken, staying silent");
                    return None;
                }
                chosen
            }
            _ => return None,
        };
        Some(Utterance::Comingout { agent: me, role: claim })
    }

    /// Talk ladder step 3: one queued result per turn once revealed.
    pub(crate) fn narrate_judge(&mut self, ctx: &mut Context) -> Option<Utterance> {
        let report = match self {
            Self::Seer(s) if s.came_out => {
                let j = s.pending.pop_front()?;
                Utterance::Divined {
                    target: j.target,
                    result: j.result,
                }
            }
            Self::Medium(s) if s.came_out => {
                let j = s.pending.pop_front()?;
                Utterance::Inquested {
                    target: j.target,
                    result: j.result,
                }
            }
            Self::Possessed(s) if s.came_out => match s.fake_role {
                Some(Role::Seer) => {
                    let j = s.divinations.pop_front()?;
                    if !ctx.beliefs.get(j.target).is_some_and(|b| b.alive) {
                        return None;
                    }
                    Utterance::Divined {
                        target: j.target,
                        result: j.result,
                    }
                }
                Some(Role::Medium) => {
                    let j = s.inquests.pop_front()?;
                    Utterance::Inquested {
                        target: j.target,
                        result: j.result,
                    }
                }
                _ => return None,
            },
            _ => return None,
        };
        if let Some(target) = report.target() {
            ctx.classifier.estimates_mut().retire(target);
        }
        Some(report)
    }

    /// Vote tiers for this role.
    pub(crate) fn vote_tiers(&self, ctx: &Context) -> Vec<Vec<AgentId>> {
        let buckets = ctx.classifier.buckets();
        match self {
            Self::Werewolf(s) => vote::werewolf_tiers(buckets, &ctx.beliefs, s.attack.current()),
            Self::Possessed(s) => {
                let fake_role = if s.came_out { s.fake_role } else { None };
                vote::possessed_tiers(buckets, &ctx.beliefs, fake_role)
            }
            Self::Villager(_) | Self::Seer(_) | Self::Medium(_) | Self::Bodyguard(_) => {
                vote::villager_tiers(buckets)
            }
        }
    }

    /// Talk ladder step 4: estimate about one dequeued agent.
    pub(crate) fn estimate(&self, ctx: &Context, agent: AgentId) -> Option<Utterance> {
        let buckets = ctx.classifier.buckets();
        match self {
            Self::Werewolf(_) | Self::Possessed(_) => {
                talk::enemy_side_estimate(agent, buckets, &ctx.beliefs)
            }
            Self::Villager(_) | Self::Seer(_) | Self::Medium(_) | Self::Bodyguard(_) => {
                talk::villager_side_estimate(agent, buckets, &ctx.beliefs, ctx.beliefs.my_role())
            }
        }
    }

    /// Next whisper of the werewolf.
    pub(crate) fn whisper(&mut self, ctx: &mut Context) -> Result<Utterance, AgentError> {
        let Self::Werewolf(s) = self else {
            return Err(ctx.mismatch("whisper"));
        };
        if ctx.day == 0 {
            return Ok(Utterance::Over);
        }
        s.settle_attack(ctx);
        if s.attack.needs_declaring() {
            if let Some(adoption) = attack::earliest_teammate_intent(&ctx.beliefs) {
                s.adopted = Some(adoption.target);
                s.attack.set(Some(adoption.target));
                s.whispers.push_back(Utterance::Agree {
                    reference: adoption.reference,
                });
                ctx.beliefs.clear_attack_target(adoption.teammate)?;
                info!(
                    day = ctx.day,
                    teammate = %adoption.teammate,
                    target = %adoption.target,
                    "Following teammate's attack"
                );
            }
            if let Some(target) = s.attack.take_declaration() {
                s.whispers.push_back(Utterance::Attack { target });
            }
        }
        Ok(s.whispers.pop_front().unwrap_or(Utterance::Over))
    }

    /// Tonight's attack target.
    pub(crate) fn attack(&mut self, ctx: &mut Context) -> Result<Option<AgentId>, AgentError> {
        let Self::Werewolf(s) = self else {
            return Err(ctx.mismatch("attack"));
        };
        Ok(s.settle_attack(ctx))
    }

    /// Tonight's guard target.
    pub(crate) fn guard(&mut self, ctx: &mut Context) -> Result<Option<AgentId>, AgentError> {
        let Self::Bodyguard(s) = self else {
            return Err(ctx.mismatch("guard"));
        };
        let tiers = guard::guard_tiers(ctx.classifier.buckets(), &ctx.beliefs);
        Ok(s.guard.select(tiers, &mut ctx.rng))
    }

    /// Tonight's divination target. Never repeats a target.
    pub(crate) fn divine(&mut self, ctx: &mut Context) -> Result<Option<AgentId>, AgentError> {
        let Self::Seer(s) = self else {
            return Err(ctx.mismatch("divine"));
        };
        let pool = divine::divine_pool(ctx.classifier.buckets(), &s.judged);
        let target = pick(&pool, &mut ctx.rng);
        if let Some(t) = target {
            s.judged.insert(t);
        }
        Ok(target)
    }
}
