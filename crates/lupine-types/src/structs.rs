//! Core record structs: inspection results and raw talk records.

use serde::{Deserialize, Serialize};

use crate::enums::Species;
use crate::ids::AgentId;

/// An inspection or divination outcome.
///
/// Immutable once created. Judges are accumulated per source agent as
/// history and feed the `divined`/`inquested` fact variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judge {
    /// Day the judge was made or announced.
    pub day: u32,
    /// Agent that performed (or claims to have performed) the inspection.
    pub agent: AgentId,
    /// Inspected agent.
    pub target: AgentId,
    /// Species revealed.
    pub result: Species,
}

/// One raw talk or whisper record as delivered by the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkRecord {
    /// Speaker.
    pub agent: AgentId,
    /// Day of utterance.
    pub day: u32,
    /// Sequence index within the day.
    pub idx: u32,
    /// Protocol text, decoded by the utterance codec.
    pub content: String,
}
