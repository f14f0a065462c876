//! Game snapshot delivered to the agent on every update.
//!
//! The snapshot is the **only** information the agent receives about the
//! game. Roles appear in [`GameSnapshot::role_map`] only when they are
//! globally known to this agent (its own role, fellow werewolves).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{Phase, Role};
use crate::ids::AgentId;
use crate::structs::{Judge, TalkRecord};

/// State of the game as seen by one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Current day, starting at 0.
    pub day: u32,
    /// Current phase.
    #[serde(default)]
    pub phase: Phase,
    /// This agent.
    pub me: AgentId,
    /// This agent's role.
    pub my_role: Option<Role>,
    /// Every agent in the game, including this one.
    pub agents: Vec<AgentId>,
    /// Roles known to this agent.
    #[serde(default)]
    pub role_map: BTreeMap<AgentId, Role>,
    /// Agent killed by last night's attack, if any.
    #[serde(default)]
    pub attacked_agent: Option<AgentId>,
    /// Agent executed by yesterday's vote, if any.
    #[serde(default)]
    pub executed_agent: Option<AgentId>,
    /// Result of last night's divination (seer only).
    #[serde(default)]
    pub divine_result: Option<Judge>,
    /// Species of yesterday's executed agent (medium only).
    #[serde(default)]
    pub medium_result: Option<Judge>,
    /// Talk records of the current day, in utterance order.
    #[serde(default)]
    pub talks: Vec<TalkRecord>,
    /// Whisper records of the current day, in utterance order.
    #[serde(default)]
    pub whispers: Vec<TalkRecord>,
}

/// Static settings of one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetting {
    /// Seed all tie-break randomness derives from.
    pub random_seed: u64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn snapshot_parses_with_missing_optional_fields() {
        let json = r#"{"day":1,"me":2,"my_role":"SEER","agents":[1,2,3],"role_map":{"2":"SEER"}}"#;
        let snapshot: GameSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.me, AgentId(2));
        assert_eq!(snapshot.role_map.get(&AgentId(2)), Some(&Role::Seer));
        assert_eq!(snapshot.phase, Phase::Day);
        assert!(snapshot.talks.is_empty());
        assert!(snapshot.divine_result.is_none());
    }
}
