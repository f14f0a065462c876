//! Forward-chaining inference over the agent's beliefs.
//!
//! A [`FactBase`] holds one cell per (agent, attribute) pair plus one per
//! (agent pair, inspection kind). A [`RuleBook`] is built once per game from
//! the agent list and the agent's own role, and the [`InferenceEngine`]
//! applies it to the fact base until nothing changes.
//!
//! # Modules
//!
//! - [`fact`] -- Fact variables, values, and the fact base
//! - [`rule`] -- Rule representation (premise clauses and consequents)
//! - [`book`] -- The fixed rule book for one game
//! - [`engine`] -- Assertion, bounded propagation, and reads
//! - [`error`] -- Inference error types

pub mod book;
pub mod engine;
pub mod error;
pub mod fact;
pub mod rule;

pub use book::RuleBook;
pub use engine::{InferenceEngine, Propagation};
pub use error::InferError;
pub use fact::{FactBase, Value, Var};
pub use rule::{Clause, Consequent, Rule, RuleKind};
