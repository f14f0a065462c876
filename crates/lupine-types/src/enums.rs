//! Enumeration types for the hidden-role game.
//!
//! [`Species`] and [`Team`] are coarse projections of [`Role`]; both
//! projections are pure `const fn` tables so that the inference rule book
//! and the decision policies agree on them by construction.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// An agent's true hidden game role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Plain villager with no night ability.
    Villager,
    /// Divines one agent's species each night.
    Seer,
    /// Learns the species of the agent executed the previous day.
    Medium,
    /// Guards one agent from the night attack.
    Bodyguard,
    /// Attacks one villager each night together with the other werewolves.
    Werewolf,
    /// Human that wins with the werewolves.
    Possessed,
    /// Villager that knows the other freemasons. Excluded from inference.
    Freemason,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Villager,
        Self::Seer,
        Self::Medium,
        Self::Bodyguard,
        Self::Werewolf,
        Self::Possessed,
        Self::Freemason,
    ];

    /// Species revealed by a seer or medium for an agent holding this role.
    pub const fn species(self) -> Species {
        match self {
            Self::Werewolf => Species::Werewolf,
            Self::Villager
            | Self::Seer
            | Self::Medium
            | Self::Bodyguard
            | Self::Possessed
            | Self::Freemason => Species::Human,
        }
    }

    /// Win-condition alignment of this role.
    pub const fn team(self) -> Team {
        match self {
            Self::Werewolf | Self::Possessed => Team::Werewolf,
            Self::Villager | Self::Seer | Self::Medium | Self::Bodyguard | Self::Freemason => {
                Team::Villager
            }
        }
    }

    /// Whether the rule book carries projection rules for this role.
    pub const fn is_inferable(self) -> bool {
        !matches!(self, Self::Freemason)
    }

    /// Roles that exactly one agent can truthfully claim.
    pub const fn is_exclusive(self) -> bool {
        matches!(self, Self::Seer | Self::Medium | Self::Bodyguard)
    }

    /// Protocol spelling of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Villager => "VILLAGER",
            Self::Seer => "SEER",
            Self::Medium => "MEDIUM",
            Self::Bodyguard => "BODYGUARD",
            Self::Werewolf => "WEREWOLF",
            Self::Possessed => "POSSESSED",
            Self::Freemason => "FREEMASON",
        }
    }

    /// Parse the protocol spelling of a role.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// Coarse human/werewolf projection of a role, the quantity that seer and
/// medium abilities reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Species {
    /// Anything that is not a werewolf.
    Human,
    /// A werewolf.
    Werewolf,
}

impl Species {
    /// Both species.
    pub const ALL: [Self; 2] = [Self::Human, Self::Werewolf];

    /// Protocol spelling of the species.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "HUMAN",
            Self::Werewolf => "WEREWOLF",
        }
    }

    /// Parse the protocol spelling of a species.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl core::fmt::Display for Species {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// Three-valued win-condition alignment as believed by the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    /// Wins when every werewolf is eliminated.
    Villager,
    /// Wins when werewolves are as many as the humans.
    Werewolf,
    /// Not yet determined.
    #[default]
    Uncertain,
}

impl core::fmt::Display for Team {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Villager => "VILLAGER",
            Self::Werewolf => "WEREWOLF",
            Self::Uncertain => "UNCERTAIN",
        })
    }
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// Topic of a structured utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topic {
    /// Public role claim.
    Comingout,
    /// Claimed divination result.
    Divined,
    /// Claimed inquest result.
    Inquested,
    /// Announced role estimate about another agent.
    Estimate,
    /// Announced vote intent.
    Vote,
    /// Announced attack intent (whisper only).
    Attack,
    /// Agreement with an earlier record.
    Agree,
    /// Nothing more to say today.
    Over,
    /// Pass this turn.
    Skip,
    /// Anything the codec does not recognise.
    Other,
}

// ---------------------------------------------------------------------------
// Phase / TalkKind
// ---------------------------------------------------------------------------

/// Phase of the current day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Public talk and the execution vote.
    #[default]
    Day,
    /// Whispers, attack, guard and divination.
    Night,
}

/// Channel a talk record was uttered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TalkKind {
    /// Public talk, heard by everyone.
    Talk,
    /// Private whisper among werewolves.
    Whisper,
}

impl TalkKind {
    /// Protocol spelling of the channel.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Talk => "TALK",
            Self::Whisper => "WHISPER",
        }
    }
}

impl core::fmt::Display for TalkKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_werewolf_role_has_werewolf_species() {
        for role in Role::ALL {
            let expected = if role == Role::Werewolf {
                Species::Werewolf
            } else {
                Species::Human
            };
            assert_eq!(role.species(), expected, "{role}");
        }
    }

    #[test]
    fn werewolf_and_possessed_share_the_werewolf_team() {
        for role in Role::ALL {
            let expected = if matches!(role, Role::Werewolf | Role::Possessed) {
                Team::Werewolf
            } else {
                Team::Villager
            };
            assert_eq!(role.team(), expected, "{role}");
        }
    }

    #[test]
    fn role_names_parse_back() {
        for role in Role::ALL {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_name("seer"), None);
    }

    #[test]
    fn freemason_is_not_inferred() {
        assert!(!Role::Freemason.is_inferable());
        assert_eq!(Role::ALL.iter().filter(|r| r.is_inferable()).count(), 6);
    }

    #[test]
    fn team_defaults_to_uncertain() {
        assert_eq!(Team::default(), Team::Uncertain);
    }

    #[test]
    fn roles_serialize_in_protocol_spelling() {
        let json = serde_json::to_string(&Role::Bodyguard).ok();
        assert_eq!(json.as_deref(), Some("\"BODYGUARD\""));
    }
}
