//! Shared type definitions for the Lupine hidden-role game agent.
//!
//! This crate is the single source of truth for the data model used across
//! the Lupine workspace: agent handles, roles and their coarse projections,
//! inspection results, talk records, the inbound game snapshot, and the
//! structured utterances exchanged with the utterance codec.
//!
//! # Modules
//!
//! - [`ids`] -- Agent handles and talk references
//! - [`enums`] -- Roles, species, teams, topics, phases
//! - [`structs`] -- Judges and raw talk records
//! - [`snapshot`] -- Game snapshot delivered to the agent each update
//! - [`actions`] -- Structured utterances and decision outcomes

pub mod actions;
pub mod enums;
pub mod ids;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{Decision, Utterance};
pub use enums::{Phase, Role, Species, TalkKind, Team, Topic};
pub use ids::{AgentId, TalkRef};
pub use snapshot::{GameSetting, GameSnapshot};
pub use structs::{Judge, TalkRecord};
