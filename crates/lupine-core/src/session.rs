//! The game session controller.
//!
//! The [`Player`] trait is the lifecycle contract the game-server transport
//! drives: one `initialize`, then per day an `update` carrying the new
//! snapshot, a `day_start`, and any number of `update`/request pairs, and a
//! final `finish`. [`GameSession`] implements it on top of one
//! [`Agent`].
//!
//! Snapshots repeat earlier talk records; the session folds each record in
//! exactly once, keyed by its kind, day and index. Records arriving with the
//! first snapshot of a new day are held until `day_start` has cleared the
//! previous day's tallies.

use std::collections::BTreeSet;

use lupine_agents::{Agent, BeliefStore, DayEvents};
use lupine_types::{
    AgentId, GameSetting, GameSnapshot, TalkKind, TalkRecord, TalkRef, Utterance,
};
use tracing::{debug, info, warn};

use crate::codec::{ProtocolCodec, UtteranceCodec};
use crate::config::SessionConfig;
use crate::error::SessionError;

/// Lifecycle calls issued by the game server, in order.
///
/// Every request runs to completion before the next one is issued.
pub trait Player {
    /// Start a new game from the first snapshot.
    fn initialize(
        &mut self,
        snapshot: &GameSnapshot,
        setting: &GameSetting,
    ) -> Result<(), SessionError>;

    /// Fold a fresh snapshot into the beliefs.
    fn update(&mut self, snapshot: &GameSnapshot) -> Result<(), SessionError>;

    /// The day's deaths and role results are final.
    fn day_start(&mut self) -> Result<(), SessionError>;

    /// Next public utterance.
    fn talk(&mut self) -> Result<Utterance, SessionError>;

    /// Next whisper among werewolves.
    fn whisper(&mut self) -> Result<Utterance, SessionError>;

    /// Today's vote. `None` abstains.
    fn vote(&mut self) -> Result<Option<AgentId>, SessionError>;

    /// Tonight's attack.
    fn attack(&mut self) -> Result<Option<AgentId>, SessionError>;

    /// Tonight's divination.
    fn divine(&mut self) -> Result<Option<AgentId>, SessionError>;

    /// Tonight's guard.
    fn guard(&mut self) -> Result<Option<AgentId>, SessionError>;

    /// The game is over; drop per-game state.
    fn finish(&mut self);
}

/// [`Player`] backed by the Lupine decision core.
#[derive(Debug)]
pub struct GameSession<C = ProtocolCodec> {
    codec: C,
    config: SessionConfig,
    agent: Option<Agent>,
    events: DayEvents,
    seen: BTreeSet<TalkRef>,
    held: Option<Held>,
}

/// Records of a new day waiting for `day_start`.
#[derive(Debug, Default)]
struct Held {
    talks: Vec<TalkRecord>,
    whispers: Vec<TalkRecord>,
}

impl GameSession<ProtocolCodec> {
    /// Session speaking the text protocol.
    pub const fn new(config: SessionConfig) -> Self {
        Self::with_codec(ProtocolCodec::new(), config)
    }
}

impl<C: UtteranceCodec> GameSession<C> {
    /// Session using a custom utterance codec.
    pub const fn with_codec(codec: C, config: SessionConfig) -> Self {
        Self {
            codec,
            config,
            agent: None,
            events: DayEvents {
                attacked: None,
                executed: None,
                divine_result: None,
                medium_result: None,
            },
            seen: BTreeSet::new(),
            held: None,
        }
    }

    /// The decision core of the running game, if any.
    pub const fn agent(&self) -> Option<&Agent> {
        self.agent.as_ref()
    }

    /// The utterance codec.
    pub const fn codec(&self) -> &C {
        &self.codec
    }

    /// The session configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn agent_mut(&mut self) -> Result<&mut Agent, SessionError> {
        self.agent.as_mut().ok_or(SessionError::NotInitialized)
    }

    /// Decode and observe every record not folded in before.
    fn absorb(&mut self, records: &[TalkRecord], kind: TalkKind) -> Result<usize, SessionError> {
        let agent = self.agent.as_mut().ok_or(SessionError::NotInitialized)?;
        let mut observed = 0_usize;
        for record in records {
            let reference = TalkRef {
                kind,
                day: record.day,
                idx: record.idx,
            };
            if !self.seen.insert(reference) {
                continue;
            }
            let utterance = self.codec.decode(&record.content);
            if !refers_to_players(agent.beliefs(), record.agent, &utterance) {
                warn!(
                    %reference,
                    speaker = %record.agent,
                    content = %record.content,
                    "utterance names an agent outside this game, ignoring"
                );
                continue;
            }
            match kind {
                TalkKind::Talk => agent.observe_talk(record.agent, utterance)?,
                TalkKind::Whisper => agent.observe_whisper(record.agent, reference, utterance)?,
            }
            observed = observed.saturating_add(1);
        }
        Ok(observed)
    }
}

/// Whether the speaker and every agent the utterance names are players.
fn refers_to_players(beliefs: &BeliefStore, speaker: AgentId, utterance: &Utterance) -> bool {
    beliefs.contains(speaker) && utterance.target().is_none_or(|t| beliefs.contains(t))
}

impl<C: UtteranceCodec> Player for GameSession<C> {
    fn initialize(
        &mut self,
        snapshot: &GameSnapshot,
        setting: &GameSetting,
    ) -> Result<(), SessionError> {
        let role = snapshot.my_role.ok_or(SessionError::MissingRole)?;
        let seed = self.config.effective_seed(setting.random_seed);
        let agent = Agent::new(
            &snapshot.agents,
            snapshot.me,
            role,
            &snapshot.role_map,
            seed,
            self.config.policy,
        )?;
        self.agent = Some(agent);
        self.seen.clear();
        self.held = None;
        self.events = DayEvents::default();
        info!(agent = %snapshot.me, %role, seed, "Session initialized");
        Ok(())
    }

    fn update(&mut self, snapshot: &GameSnapshot) -> Result<(), SessionError> {
        let agent = self.agent_mut()?;
        if snapshot.day != agent.day() {
            agent.begin_day(snapshot.day);
            self.seen.retain(|r| r.day >= snapshot.day);
            if snapshot.day > 0 {
                self.held = Some(Held::default());
            }
        }
        self.events = DayEvents {
            attacked: snapshot.attacked_agent,
            executed: snapshot.executed_agent,
            divine_result: snapshot.divine_result,
            medium_result: snapshot.medium_result,
        };

        if let Some(held) = &mut self.held {
            held.talks.clone_from(&snapshot.talks);
            held.whispers.clone_from(&snapshot.whispers);
            debug!(
                day = snapshot.day,
                talks = held.talks.len(),
                whispers = held.whispers.len(),
                "Records held until day start"
            );
            return Ok(());
        }

        let talks = self.absorb(&snapshot.talks, TalkKind::Talk)?;
        let whispers = self.absorb(&snapshot.whispers, TalkKind::Whisper)?;
        self.agent_mut()?.refresh();
        debug!(day = snapshot.day, talks, whispers, "Snapshot folded in");
        Ok(())
    }

    fn day_start(&mut self) -> Result<(), SessionError> {
        let events = self.events;
        self.agent_mut()?.day_start(&events)?;
        if let Some(held) = self.held.take() {
            self.absorb(&held.talks, TalkKind::Talk)?;
            self.absorb(&held.whispers, TalkKind::Whisper)?;
            self.agent_mut()?.refresh();
        }
        Ok(())
    }

    fn talk(&mut self) -> Result<Utterance, SessionError> {
        Ok(self.agent_mut()?.talk())
    }

    fn whisper(&mut self) -> Result<Utterance, SessionError> {
        self.agent_mut()?.whisper().map_err(SessionError::from)
    }

    fn vote(&mut self) -> Result<Option<AgentId>, SessionError> {
        Ok(self.agent_mut()?.vote())
    }

    fn attack(&mut self) -> Result<Option<AgentId>, SessionError> {
        self.agent_mut()?.attack().map_err(SessionError::from)
    }

    fn divine(&mut self) -> Result<Option<AgentId>, SessionError> {
        self.agent_mut()?.divine().map_err(SessionError::from)
    }

    fn guard(&mut self) -> Result<Option<AgentId>, SessionError> {
        self.agent_mut()?.guard().map_err(SessionError::from)
    }

    fn finish(&mut self) {
        if let Some(agent) = self.agent.take() {
            info!(agent = %agent.me(), day = agent.day(), "Game finished");
        }
        self.seen.clear();
        self.held = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lupine_agents::AgentError;
    use lupine_types::Role;

    use super::*;

    fn snapshot(day: u32, my_role: Role) -> GameSnapshot {
        GameSnapshot {
            day,
            me: AgentId(1),
            my_role: Some(my_role),
            agents: (1..=5).map(AgentId).collect(),
            ..GameSnapshot::default()
        }
    }

    fn talk(agent: u32, day: u32, idx: u32, content: &str) -> TalkRecord {
        TalkRecord {
            agent: AgentId(agent),
            day,
            idx,
            content: content.to_owned(),
        }
    }

    fn votes_for(session: &GameSession, agent: u32) -> u32 {
        let beliefs = session.agent().unwrap().beliefs();
        beliefs.get(AgentId(agent)).unwrap().vote_count
    }

    fn started(role: Role) -> GameSession {
        let mut session = GameSession::new(SessionConfig::default());
        session
            .initialize(&snapshot(0, role), &GameSetting { random_seed: 42 })
            .unwrap();
        session
    }

    #[test]
    fn calls_before_initialize_fail() {
        let mut session = GameSession::new(SessionConfig::default());
        assert!(matches!(session.talk(), Err(SessionError::NotInitialized)));
        assert!(matches!(
            session.update(&snapshot(0, Role::Villager)),
            Err(SessionError::NotInitialized)
        ));
    }

    #[test]
    fn initialize_requires_a_role() {
        let mut session = GameSession::new(SessionConfig::default());
        let mut first = snapshot(0, Role::Villager);
        first.my_role = None;
        let result = session.initialize(&first, &GameSetting::default());
        assert!(matches!(result, Err(SessionError::MissingRole)));
    }

    #[test]
    fn repeated_records_are_counted_once() {
        let mut session = started(Role::Villager);
        let mut day1 = snapshot(1, Role::Villager);
        day1.talks = vec![talk(2, 1, 0, "VOTE Agent[03]")];
        session.update(&day1).unwrap();
        session.day_start().unwrap();
        day1.talks.push(talk(4, 1, 1, "VOTE Agent[03]"));
        session.update(&day1).unwrap();

        let beliefs = session.agent().unwrap().beliefs();
        assert_eq!(beliefs.get(AgentId(3)).unwrap().vote_count, 2);
        assert!(beliefs.get(AgentId(3)).unwrap().may_be_executed);
    }

    #[test]
    fn utterances_about_strangers_are_skipped() {
        let mut session = started(Role::Villager);
        let mut day1 = snapshot(1, Role::Villager);
        day1.talks = vec![
            talk(2, 1, 0, "VOTE Agent[09]"),
            talk(9, 1, 1, "VOTE Agent[03]"),
            talk(2, 1, 2, "gibberish"),
        ];
        session.update(&day1).unwrap();
        session.day_start().unwrap();
        let beliefs = session.agent().unwrap().beliefs();
        assert!(beliefs.iter().all(|b| b.vote_count == 0));
    }

    #[test]
    fn new_day_clears_daily_tallies() {
        let mut session = started(Role::Villager);
        let mut day1 = snapshot(1, Role::Villager);
        session.update(&day1).unwrap();
        session.day_start().unwrap();
        day1.talks = vec![talk(2, 1, 0, "VOTE Agent[03]")];
        session.update(&day1).unwrap();
        assert_eq!(votes_for(&session, 3), 1);

        session.update(&snapshot(2, Role::Villager)).unwrap();
        session.day_start().unwrap();
        assert_eq!(session.agent().unwrap().day(), 2);
        assert_eq!(votes_for(&session, 3), 0);
    }

    #[test]
    fn talks_in_the_first_snapshot_of_a_day_outlive_day_start() {
        let mut session = started(Role::Villager);
        let mut day1 = snapshot(1, Role::Villager);
        day1.talks = vec![talk(2, 1, 0, "VOTE Agent[03]")];
        session.update(&day1).unwrap();
        assert_eq!(votes_for(&session, 3), 0);

        session.day_start().unwrap();
        assert_eq!(votes_for(&session, 3), 1);
        let voter = session.agent().unwrap().beliefs().get(AgentId(2)).unwrap();
        assert_eq!(voter.vote_target, Some(AgentId(3)));

        session.update(&day1).unwrap();
        assert_eq!(votes_for(&session, 3), 1);
    }

    #[test]
    fn role_mismatch_surfaces_as_agent_error() {
        let mut session = started(Role::Villager);
        let result = session.divine();
        assert!(matches!(
            result,
            Err(SessionError::Agent {
                source: AgentError::RoleMismatch { .. }
            })
        ));
    }

    #[test]
    fn finish_drops_the_game() {
        let mut session = started(Role::Seer);
        session.finish();
        assert!(session.agent().is_none());
        assert!(matches!(session.vote(), Err(SessionError::NotInitialized)));
    }
}
