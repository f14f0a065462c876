//! Protocol text to structured utterances and back.
//!
//! The game server speaks a line-oriented text protocol (`VOTE Agent[03]`,
//! `DIVINED Agent[02] WEREWOLF`). Decoding is total: content that does not
//! match a known shape is logged and becomes [`Utterance::Other`], which no
//! belief or decision rule reacts to.

use lupine_types::{AgentId, Role, Species, TalkKind, TalkRef, Utterance};
use tracing::warn;

use crate::error::SessionError;

/// Converts between protocol text and [`Utterance`].
pub trait UtteranceCodec {
    /// Decode one record's content. Never fails: unknown content is
    /// [`Utterance::Other`].
    fn decode(&self, raw: &str) -> Utterance;

    /// Render an utterance as protocol text.
    fn encode(&self, utterance: &Utterance) -> String;
}

/// Codec for the whitespace-separated text protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolCodec;

impl ProtocolCodec {
    /// Create a new protocol codec.
    pub const fn new() -> Self {
        Self
    }
}

impl UtteranceCodec for ProtocolCodec {
    fn decode(&self, raw: &str) -> Utterance {
        match parse_utterance(raw) {
            Ok(utterance) => utterance,
            Err(e) => {
                warn!(error = %e, raw, "unrecognised utterance, treating as Other");
                Utterance::Other
            }
        }
    }

    fn encode(&self, utterance: &Utterance) -> String {
        match *utterance {
            Utterance::Comingout { agent, role } => format!("COMINGOUT {agent} {role}"),
            Utterance::Divined { target, result } => format!("DIVINED {target} {result}"),
            Utterance::Inquested { target, result } => format!("INQUESTED {target} {result}"),
            Utterance::Estimate { target, role } => format!("ESTIMATE {target} {role}"),
            Utterance::Vote { target } => format!("VOTE {target}"),
            Utterance::Attack { target } => format!("ATTACK {target}"),
            Utterance::Agree { reference } => format!("AGREE {reference}"),
            Utterance::Over => "Over".to_owned(),
            // Other has no protocol text of its own.
            Utterance::Skip | Utterance::Other => "Skip".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn parse_utterance(raw: &str) -> Result<Utterance, SessionError> {
    let mut words = raw.split_whitespace();
    let head = words
        .next()
        .ok_or_else(|| SessionError::Parse("empty utterance".to_owned()))?;

    let utterance = match head {
        "Over" => Utterance::Over,
        "Skip" => Utterance::Skip,
        "COMINGOUT" => Utterance::Comingout {
            agent: parse_agent(words.next())?,
            role: parse_role(words.next())?,
        },
        "DIVINED" => Utterance::Divined {
            target: parse_agent(words.next())?,
            result: parse_species(words.next())?,
        },
        "INQUESTED" => Utterance::Inquested {
            target: parse_agent(words.next())?,
            result: parse_species(words.next())?,
        },
        "ESTIMATE" => Utterance::Estimate {
            target: parse_agent(words.next())?,
            role: parse_role(words.next())?,
        },
        "VOTE" => Utterance::Vote {
            target: parse_agent(words.next())?,
        },
        "ATTACK" => Utterance::Attack {
            target: parse_agent(words.next())?,
        },
        "AGREE" => Utterance::Agree {
            reference: parse_talk_ref(&mut words)?,
        },
        other => return Err(SessionError::Parse(format!("unknown topic: {other}"))),
    };

    if let Some(extra) = words.next() {
        return Err(SessionError::Parse(format!("trailing token: {extra}")));
    }
    Ok(utterance)
}

fn missing(what: &str) -> SessionError {
    SessionError::Parse(format!("missing {what}"))
}

/// Parse `Agent[NN]`.
fn parse_agent(word: Option<&str>) -> Result<AgentId, SessionError> {
    let word = word.ok_or_else(|| missing("agent"))?;
    word.strip_prefix("Agent[")
        .and_then(|rest| rest.strip_suffix(']'))
        .and_then(|digits| digits.parse::<u32>().ok())
        .map(AgentId)
        .ok_or_else(|| SessionError::Parse(format!("invalid agent: {word}")))
}

fn parse_role(word: Option<&str>) -> Result<Role, SessionError> {
    let word = word.ok_or_else(|| missing("role"))?;
    Role::from_name(word).ok_or_else(|| SessionError::Parse(format!("invalid role: {word}")))
}

fn parse_species(word: Option<&str>) -> Result<Species, SessionError> {
    let word = word.ok_or_else(|| missing("species"))?;
    Species::from_name(word)
        .ok_or_else(|| SessionError::Parse(format!("invalid species: {word}")))
}

/// Parse `TALK|WHISPER day D ID I`.
fn parse_talk_ref<'a, I>(words: &mut I) -> Result<TalkRef, SessionError>
where
    I: Iterator<Item = &'a str>,
{
    let kind = match words.next() {
        Some("TALK") => TalkKind::Talk,
        Some("WHISPER") => TalkKind::Whisper,
        Some(other) => return Err(SessionError::Parse(format!("invalid talk kind: {other}"))),
        None => return Err(missing("talk kind")),
    };
    let day = parse_labelled(words, "day")?;
    let idx = parse_labelled(words, "ID")?;
    Ok(TalkRef { kind, day, idx })
}

fn parse_labelled<'a, I>(words: &mut I, label: &str) -> Result<u32, SessionError>
where
    I: Iterator<Item = &'a str>,
{
    if words.next() != Some(label) {
        return Err(missing(label));
    }
    words
        .next()
        .and_then(|n| n.parse::<u32>().ok())
        .ok_or_else(|| SessionError::Parse(format!("invalid {label} number")))
}
