//! Game session controller for the Lupine agent.
//!
//! This crate sits between the game-server transport and the decision core
//! in `lupine-agents`. It decodes protocol text into structured utterances,
//! owns the per-game [`Agent`](lupine_agents::Agent), and drives it through
//! the server's lifecycle calls.
//!
//! # Modules
//!
//! - [`codec`] -- [`UtteranceCodec`] trait and the text [`ProtocolCodec`].
//! - [`config`] -- Session configuration loaded from YAML.
//! - [`error`] -- Error types for session operations.
//! - [`replay`] -- JSON transcripts of lifecycle steps and their replay.
//! - [`session`] -- [`Player`] lifecycle trait and [`GameSession`].
//!
//! [`UtteranceCodec`]: codec::UtteranceCodec
//! [`ProtocolCodec`]: codec::ProtocolCodec
//! [`Player`]: session::Player
//! [`GameSession`]: session::GameSession

pub mod codec;
pub mod config;
pub mod error;
pub mod replay;
pub mod session;

pub use codec::{ProtocolCodec, UtteranceCodec};
pub use config::{ConfigError, LoggingConfig, SessionConfig};
pub use error::SessionError;
pub use replay::{DecisionRecord, Step, Transcript, replay};
pub use session::{GameSession, Player};
