//! Error types for the lupine-infer crate.
//!
//! Every error here is a contract violation: the caller referenced an agent
//! that is not in the game, stored a value of the wrong kind, or the rule
//! book failed to settle within the pass bound.

use lupine_types::AgentId;

use crate::fact::{Value, Var};

/// Errors raised by the fact base and the inference engine.
#[derive(Debug, thiserror::Error)]
pub enum InferError {
    /// The agent is not part of this game.
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// The variable does not exist in the fact base (e.g. an agent
    /// inspecting itself).
    #[error("unknown fact variable: {0}")]
    UnknownVariable(Var),

    /// A value of the wrong kind was stored in a variable.
    #[error("value {value:?} does not fit variable {var}")]
    ValueMismatch {
        /// Variable written to.
        var: Var,
        /// Rejected value.
        value: Value,
    },

    /// Propagation kept changing facts after the maximum pass count.
    #[error("propagation did not reach a fixed point within {passes} passes")]
    NoFixedPoint {
        /// Pass bound that was exceeded.
        passes: usize,
    },
}
