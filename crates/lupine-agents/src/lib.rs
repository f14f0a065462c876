//! Belief maintenance and decision policies for one agent in one game.
//!
//! The [`Agent`] owns a [`BeliefStore`] (which in turn owns the inference
//! engine), a [`TeamClassifier`] refreshed once per update cycle, the vote
//! [`Candidate`], and a closed [`RoleBehavior`] union carrying the
//! role-specific state of the six role variants.
//!
//! # Modules
//!
//! - [`agent`] -- The per-game decision core and its lifecycle hooks
//! - [`belief`] -- Per-agent belief records kept in sync with inference
//! - [`classifier`] -- Team buckets and the estimate queue
//! - [`candidate`] -- Tiered candidate selection with stability
//! - [`policy`] -- Vote, attack, guard, divine, talk and fabrication tiers
//! - [`role`] -- Role-specific state and dispatch
//! - [`config`] -- Tunable policy parameters
//! - [`error`] -- Error types for agent operations

pub mod agent;
pub mod belief;
pub mod candidate;
pub mod classifier;
pub mod config;
pub mod error;
pub mod policy;
pub mod role;

pub use agent::{Agent, DayEvents};
pub use belief::{AgentBelief, BeliefStore};
pub use candidate::Candidate;
pub use classifier::{EstimateQueue, TeamBuckets, TeamClassifier};
pub use config::{CoDayWindow, PolicyConfig};
pub use error::AgentError;
pub use role::RoleBehavior;
