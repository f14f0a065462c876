//! Error types for the lupine-agents crate.
//!
//! Missing data (no eligible candidate, no pending result) is never an
//! error: those operations return `None` or [`Utterance::Over`]. The
//! variants here are contract violations by the caller.
//!
//! [`Utterance::Over`]: lupine_types::Utterance::Over

use lupine_infer::InferError;
use lupine_types::{AgentId, Role};

/// Errors that can occur during belief updates and decisions.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The inference engine rejected an assertion or failed to settle.
    #[error("inference failed: {source}")]
    Infer {
        /// The underlying inference error.
        #[from]
        source: InferError,
    },

    /// The agent is not part of this game.
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// A role-specific operation was requested from a role that does not
    /// own it.
    #[error("{operation} is not available to the {role} role")]
    RoleMismatch {
        /// Requested operation.
        operation: &'static str,
        /// Role of this agent.
        role: Role,
    },
}
