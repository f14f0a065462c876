//! Transcript replay.
//!
//! A [`Transcript`] is a JSON list of lifecycle [`Step`]s as the game server
//! would issue them. [`replay`] feeds the steps to a [`Player`] in order and
//! collects one [`DecisionRecord`] per request step, which makes whole games
//! reproducible from a file.
//!
//! ```json
//! { "steps": [
//!     { "step": "initialize", "snapshot": { "day": 0, "me": 1, "my_role": "SEER", "agents": [1, 2, 3] } },
//!     { "step": "day_start" },
//!     { "step": "talk" }
//! ] }
//! ```

use lupine_types::{Decision, GameSetting, GameSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::codec::UtteranceCodec;
use crate::error::SessionError;
use crate::session::Player;

/// One lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Start the game.
    Initialize {
        /// First snapshot of the game.
        snapshot: Box<GameSnapshot>,
        /// Static game settings.
        #[serde(default)]
        setting: GameSetting,
    },
    /// Deliver a fresh snapshot.
    Update {
        /// The snapshot.
        snapshot: Box<GameSnapshot>,
    },
    /// The day has started.
    DayStart,
    /// Request a talk.
    Talk,
    /// Request a whisper.
    Whisper,
    /// Request a vote.
    Vote,
    /// Request an attack.
    Attack,
    /// Request a divination.
    Divine,
    /// Request a guard.
    Guard,
    /// The game is over.
    Finish,
}

impl Step {
    /// Name of the step as written in transcripts.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Initialize { .. } => "initialize",
            Self::Update { .. } => "update",
            Self::DayStart => "day_start",
            Self::Talk => "talk",
            Self::Whisper => "whisper",
            Self::Vote => "vote",
            Self::Attack => "attack",
            Self::Divine => "divine",
            Self::Guard => "guard",
            Self::Finish => "finish",
        }
    }
}

/// A sequence of lifecycle calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Steps in issue order.
    pub steps: Vec<Step>,
}

impl Transcript {
    /// Parse a transcript from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transcript`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Answer to one request step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Position of the step in the transcript.
    pub index: usize,
    /// Day of the latest snapshot.
    pub day: u32,
    /// Step name.
    pub request: String,
    /// The decision.
    pub decision: Decision,
    /// Protocol text of talk and whisper decisions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Replay `transcript` against `player`.
///
/// # Errors
///
/// Stops at the first step the player rejects and returns its
/// [`SessionError`].
pub fn replay(
    player: &mut dyn Player,
    codec: &dyn UtteranceCodec,
    transcript: &Transcript,
) -> Result<Vec<DecisionRecord>, SessionError> {
    let mut day = 0_u32;
    let mut records = Vec::new();
    info!(steps = transcript.steps.len(), "Replay starting");

    for (index, step) in transcript.steps.iter().enumerate() {
        let decision = match step {
            Step::Initialize { snapshot, setting } => {
                day = snapshot.day;
                player.initialize(snapshot, setting)?;
                None
            }
            Step::Update { snapshot } => {
                day = snapshot.day;
                player.update(snapshot)?;
                None
            }
            Step::DayStart => {
                player.day_start()?;
                None
            }
            Step::Talk => Some(Decision::Speech(player.talk()?)),
            Step::Whisper => Some(Decision::Speech(player.whisper()?)),
            Step::Vote => Some(Decision::Target(player.vote()?)),
            Step::Attack => Some(Decision::Target(player.attack()?)),
            Step::Divine => Some(Decision::Target(player.divine()?)),
            Step::Guard => Some(Decision::Target(player.guard()?)),
            Step::Finish => {
                player.finish();
                None
            }
        };

        if let Some(decision) = decision {
            let text = match decision {
                Decision::Speech(utterance) => Some(codec.encode(&utterance)),
                Decision::Target(_) => None,
            };
            debug!(index, day, request = step.name(), ?decision, "Decision");
            records.push(DecisionRecord {
                index,
                day,
                request: step.name().to_owned(),
                decision,
                text,
            });
        }
    }

    info!(decisions = records.len(), "Replay finished");
    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lupine_types::{AgentId, Role, Utterance};

    use super::*;
    use crate::codec::ProtocolCodec;
    use crate::config::SessionConfig;
    use crate::session::GameSession;

    #[test]
    fn steps_parse_from_snake_case_tags() {
        let json = r#"{"steps":[
            {"step":"initialize","snapshot":{"day":0,"me":1,"my_role":"VILLAGER","agents":[1,2,3]},"setting":{"random_seed":3}},
            {"step":"day_start"},
            {"step":"vote"},
            {"step":"finish"}
        ]}"#;
        let transcript = Transcript::from_json(json).unwrap();
        assert_eq!(transcript.steps.len(), 4);
        assert_eq!(transcript.steps.get(1), Some(&Step::DayStart));
        assert_eq!(transcript.steps.get(3).map(Step::name), Some("finish"));
    }

    #[test]
    fn werewolf_transcript_with_role_map_parses() {
        let json = r#"{"steps":[
            {"step":"initialize","snapshot":{"day":0,"me":1,"my_role":"WEREWOLF","agents":[1,2,3,4,5],
             "role_map":{"1":"WEREWOLF","2":"WEREWOLF"}}},
            {"step":"update","snapshot":{"day":1,"me":1,"my_role":"WEREWOLF","agents":[1,2,3,4,5],
             "role_map":{"1":"WEREWOLF","2":"WEREWOLF"},"attacked_agent":3}}
        ]}"#;
        let transcript = Transcript::from_json(json).unwrap();
        let Some(Step::Update { snapshot }) = transcript.steps.get(1) else {
            panic!("expected an update step, got {:?}", transcript.steps.get(1));
        };
        assert_eq!(snapshot.role_map.get(&AgentId(2)), Some(&Role::Werewolf));
        assert_eq!(snapshot.attacked_agent, Some(AgentId(3)));

        let mut session = GameSession::new(SessionConfig::default());
        replay(&mut session, &ProtocolCodec::new(), &transcript).unwrap();
        let fellow = session.agent().unwrap().beliefs().get(AgentId(2)).unwrap();
        assert_eq!(fellow.role, Some(Role::Werewolf));
    }

    #[test]
    fn malformed_transcript_is_rejected() {
        let result = Transcript::from_json(r#"{"steps":[{"step":"dance"}]}"#);
        assert!(matches!(result, Err(SessionError::Transcript { .. })));
    }

    #[test]
    fn only_requests_produce_records() {
        let json = r#"{"steps":[
            {"step":"initialize","snapshot":{"day":0,"me":1,"my_role":"VILLAGER","agents":[1,2,3]}},
            {"step":"day_start"},
            {"step":"talk"},
            {"step":"vote"}
        ]}"#;
        let transcript = Transcript::from_json(json).unwrap();
        let codec = ProtocolCodec::new();
        let mut session = GameSession::new(SessionConfig::default());
        let records = replay(&mut session, &codec, &transcript).unwrap();

        assert_eq!(records.len(), 2);
        let talk = records.first().unwrap();
        assert_eq!(talk.index, 2);
        assert_eq!(talk.decision, Decision::Speech(Utterance::Over));
        assert_eq!(talk.text.as_deref(), Some("Over"));

        let vote = records.get(1).unwrap();
        let Decision::Target(Some(target)) = vote.decision else {
            panic!("expected a vote target, got {:?}", vote.decision);
        };
        assert!([AgentId(2), AgentId(3)].contains(&target));
        assert_eq!(vote.text, None);
    }
}
