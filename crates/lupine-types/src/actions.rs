//! Structured utterances and decision outcomes.
//!
//! [`Utterance`] is the protocol-agnostic form of talk and whisper content.
//! The utterance codec produces it from inbound records and renders it for
//! outbound talk; the belief store and the decision policies only ever see
//! this structured form.

use serde::{Deserialize, Serialize};

use crate::enums::{Role, Species, Topic};
use crate::ids::{AgentId, TalkRef};

// ---------------------------------------------------------------------------
// Utterance
// ---------------------------------------------------------------------------

/// Structured content of one talk or whisper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Utterance {
    /// `agent` claims to hold `role`.
    Comingout {
        /// Subject of the claim.
        agent: AgentId,
        /// Claimed role.
        role: Role,
    },
    /// The speaker claims to have divined `target` as `result`.
    Divined {
        /// Divined agent.
        target: AgentId,
        /// Claimed species.
        result: Species,
    },
    /// The speaker claims the executed `target` was `result`.
    Inquested {
        /// Inquested agent.
        target: AgentId,
        /// Claimed species.
        result: Species,
    },
    /// The speaker estimates that `target` holds `role`.
    Estimate {
        /// Estimated agent.
        target: AgentId,
        /// Estimated role.
        role: Role,
    },
    /// The speaker intends to vote for `target`.
    Vote {
        /// Vote target.
        target: AgentId,
    },
    /// The speaker intends to attack `target`.
    Attack {
        /// Attack target.
        target: AgentId,
    },
    /// The speaker agrees with an earlier record.
    Agree {
        /// Record agreed with.
        reference: TalkRef,
    },
    /// Nothing more to say.
    Over,
    /// Pass this turn.
    Skip,
    /// Unrecognised content.
    Other,
}

impl Utterance {
    /// Topic of this utterance.
    pub const fn topic(&self) -> Topic {
        match self {
            Self::Comingout { .. } => Topic::Comingout,
            Self::Divined { .. } => Topic::Divined,
            Self::Inquested { .. } => Topic::Inquested,
            Self::Estimate { .. } => Topic::Estimate,
            Self::Vote { .. } => Topic::Vote,
            Self::Attack { .. } => Topic::Attack,
            Self::Agree { .. } => Topic::Agree,
            Self::Over => Topic::Over,
            Self::Skip => Topic::Skip,
            Self::Other => Topic::Other,
        }
    }

    /// Agent the utterance is about, if any.
    pub const fn target(&self) -> Option<AgentId> {
        match self {
            Self::Comingout { agent, .. } => Some(*agent),
            Self::Divined { target, .. }
            | Self::Inquested { target, .. }
            | Self::Estimate { target, .. }
            | Self::Vote { target }
            | Self::Attack { target } => Some(*target),
            Self::Agree { .. } | Self::Over | Self::Skip | Self::Other => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Outcome of one lifecycle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Decision {
    /// Vote, attack, guard or divine target. `None` abstains.
    Target(Option<AgentId>),
    /// Talk or whisper content.
    Speech(Utterance),
}
