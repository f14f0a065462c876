//! Error types for the lupine-core crate.

use lupine_agents::AgentError;

/// Errors that can occur while driving a game session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The decision core rejected an observation or request.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A lifecycle call arrived before `initialize`.
    #[error("session is not initialized")]
    NotInitialized,

    /// The initializing snapshot did not carry this agent's role.
    #[error("initial snapshot has no role for this agent")]
    MissingRole,

    /// Protocol text could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// A transcript could not be read.
    #[error("transcript error: {source}")]
    Transcript {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
