//! Agent handles and talk references.
//!
//! Agents are identified by a small dense integer assigned by the game
//! server. The handle carries no ownership semantics beyond identity
//! equality and is stable for the duration of one game.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::TalkKind;

/// Opaque identity of one player in the game.
///
/// Serialized transparently as its integer number. Deserialization also
/// accepts the number as a decimal string, which is how JSON object keys
/// arrive (`"role_map": {"2": "WEREWOLF"}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Return the raw agent number.
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Agent[{:02}]", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

impl<'de> Deserialize<'de> for AgentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AgentIdVisitor)
    }
}

struct AgentIdVisitor;

impl Visitor<'_> for AgentIdVisitor {
    type Value = AgentId;

    fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("an agent number")
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<AgentId, E> {
        u32::try_from(n)
            .map(AgentId)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(n), &self))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<AgentId, E> {
        u32::try_from(n)
            .map(AgentId)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(n), &self))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<AgentId, E> {
        s.parse::<u32>()
            .map(AgentId)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(s), &self))
    }
}

/// Reference to one talk or whisper record, used by `AGREE` utterances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TalkRef {
    /// Whether the referenced record was a public talk or a whisper.
    pub kind: TalkKind,
    /// Day the record was uttered on.
    pub day: u32,
    /// Sequence index of the record within that day.
    pub idx: u32,
}

impl core::fmt::Display for TalkRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} day {} ID {}", self.kind, self.day, self.idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_display_is_zero_padded() {
        assert_eq!(AgentId(3).to_string(), "Agent[03]");
        assert_eq!(AgentId(12).to_string(), "Agent[12]");
    }

    #[test]
    fn agent_serializes_as_bare_number() {
        let json = serde_json::to_string(&AgentId(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
    }

    #[test]
    fn agent_parses_from_number_or_numeric_string() {
        assert_eq!(serde_json::from_str::<AgentId>("4").ok(), Some(AgentId(4)));
        assert_eq!(serde_json::from_str::<AgentId>("\"4\"").ok(), Some(AgentId(4)));
        assert!(serde_json::from_str::<AgentId>("\"Agent[04]\"").is_err());
        assert!(serde_json::from_str::<AgentId>("-1").is_err());
    }

    #[test]
    fn talk_ref_orders_by_kind_then_day_then_idx() {
        let a = TalkRef { kind: TalkKind::Whisper, day: 1, idx: 4 };
        let b = TalkRef { kind: TalkKind::Whisper, day: 2, idx: 0 };
        assert!(a < b);
        assert_eq!(a.to_string(), "WHISPER day 1 ID 4");
    }
}
