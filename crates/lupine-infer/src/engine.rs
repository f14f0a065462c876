//! Assertion, bounded forward chaining, and reads.
//!
//! Asserted facts are ground truth: they are pinned and no later inference
//! pass overwrites them. Propagation evaluates the rule book in order,
//! pass after pass, until the fact base at the end of a pass equals the
//! fact base at its start. Exceeding the pass bound means the rule book is
//! cyclic for the current facts and is reported as an error.

use std::collections::BTreeMap;

use lupine_types::{AgentId, Role};
use tracing::{debug, trace};

use crate::book::RuleBook;
use crate::error::InferError;
use crate::fact::{FactBase, Value, Var};

/// Outcome of one successful [`InferenceEngine::propagate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Propagation {
    /// Passes run, including the final pass that changed nothing.
    pub passes: usize,
    /// Rule firings that changed a value.
    pub writes: usize,
}

/// Fact base plus the rule book that derives new facts from it.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    facts: FactBase,
    book: RuleBook,
    max_passes: usize,
}

impl InferenceEngine {
    /// Build the engine for agent `me` holding `my_role`.
    ///
    /// The pass bound defaults to the number of fact variables.
    pub fn new(agents: &[AgentId], me: AgentId, my_role: Role) -> Self {
        let facts = FactBase::new(agents);
        let max_passes = facts.len().max(1);
        Self {
            book: RuleBook::build(agents, me, my_role),
            facts,
            max_passes,
        }
    }

    /// Override the pass bound.
    #[must_use]
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Current pass bound.
    pub const fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Assert a ground-truth fact. Returns whether the stored value changed.
    ///
    /// Asserting the same value twice is a no-op.
    pub fn assert(&mut self, var: Var, value: impl Into<Value>) -> Result<bool, InferError> {
        let value = value.into();
        let changed = self.facts.set(var, value)?;
        self.facts.pin(var);
        if changed {
            trace!(%var, ?value, "Fact asserted");
        }
        Ok(changed)
    }

    /// Forward-chain to a fixed point.
    pub fn propagate(&mut self) -> Result<Propagation, InferError> {
        let mut writes: usize = 0;
        for pass in 1..=self.max_passes {
            let before: BTreeMap<Var, Value> = self.facts.values().clone();
            for rule in self.book.iter() {
                let target = rule.target();
                if self.facts.is_pinned(target) || !rule.holds(&self.facts)? {
                    continue;
                }
                let value = rule.output(&self.facts)?;
                if value.is_uncertain() {
                    continue;
                }
                if self.facts.set(target, value)? {
                    trace!(rule = ?rule.kind, %target, ?value, "Rule fired");
                    writes = writes.saturating_add(1);
                }
            }
            if *self.facts.values() == before {
                debug!(passes = pass, writes, "Propagation reached fixed point");
                return Ok(Propagation {
                    passes: pass,
                    writes,
                });
            }
        }
        Err(InferError::NoFixedPoint {
            passes: self.max_passes,
        })
    }

    /// Read a variable.
    pub fn read(&self, var: Var) -> Result<Value, InferError> {
        self.facts.get(var)
    }

    /// The underlying fact base.
    pub const fn facts(&self) -> &FactBase {
        &self.facts
    }

    /// The rule book in use.
    pub const fn rules(&self) -> &RuleBook {
        &self.book
    }
}
