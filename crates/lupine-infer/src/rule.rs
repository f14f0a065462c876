//! Rule representation.
//!
//! A rule is a tagged structure: an ordered list of premise clauses, each an
//! expected value for one variable, and one consequent. The consequent
//! either assigns a constant or copies the current value of another
//! variable.

use crate::error::InferError;
use crate::fact::{FactBase, Value, Var};

/// Family a rule belongs to. Used for tracing and rule counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleKind {
    /// Role determines species.
    RoleSpecies,
    /// Role determines team.
    RoleTeam,
    /// Villager team implies human species.
    VillagerIsHuman,
    /// Werewolf species implies werewolf role.
    WerewolfSpecies,
    /// An attacked agent is human.
    AttackedIsHuman,
    /// A human on the werewolf team is the possessed.
    HumanEnemyIsPossessed,
    /// A villager-team agent holds the role it claimed.
    TrustClaim,
    /// Another agent claiming my exclusive role is an enemy.
    CounterClaim,
    /// Werewolves never attack the possessed, so an attacked agent is a
    /// villager from the possessed's point of view.
    AttackedIsVillager,
    /// A claimed seer's divination agrees or clashes with a known species.
    SeerConsistency,
    /// A claimed medium's inquest agrees or clashes with a known species.
    MediumConsistency,
    /// A villager-team agent's divination gives the target's species.
    TrustDivination,
    /// A villager-team agent's inquest gives the target's species.
    TrustInquest,
}

/// One premise: `var` must currently hold `expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    /// Variable tested.
    pub var: Var,
    /// Value required.
    pub expected: Value,
}

impl Clause {
    /// Build a clause from anything convertible to a value.
    pub fn new(var: Var, expected: impl Into<Value>) -> Self {
        Self {
            var,
            expected: expected.into(),
        }
    }
}

/// What a rule writes when its premises hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consequent {
    /// Write a constant.
    Assign {
        /// Target variable.
        var: Var,
        /// Value written.
        value: Value,
    },
    /// Write the current value of `source`. Skipped while `source` is
    /// uncertain.
    Copy {
        /// Target variable.
        var: Var,
        /// Variable read.
        source: Var,
    },
}

/// A premise list and its consequent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Rule family.
    pub kind: RuleKind,
    /// Clauses that must all hold.
    pub premises: Vec<Clause>,
    /// Effect when they do.
    pub consequent: Consequent,
}

impl Rule {
    /// Rule assigning a constant.
    pub fn assign(kind: RuleKind, premises: Vec<Clause>, var: Var, value: impl Into<Value>) -> Self {
        Self {
            kind,
            premises,
            consequent: Consequent::Assign {
                var,
                value: value.into(),
            },
        }
    }

    /// Rule copying one variable into another.
    pub const fn copy(kind: RuleKind, premises: Vec<Clause>, var: Var, source: Var) -> Self {
        Self {
            kind,
            premises,
            consequent: Consequent::Copy { var, source },
        }
    }

    /// Variable the rule writes.
    pub const fn target(&self) -> Var {
        match self.consequent {
            Consequent::Assign { var, .. } | Consequent::Copy { var, .. } => var,
        }
    }

    /// Whether every premise holds in `facts`.
    pub fn holds(&self, facts: &FactBase) -> Result<bool, InferError> {
        for clause in &self.premises {
            if facts.get(clause.var)? != clause.expected {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Value the rule would write, or uncertain when a copy source is unset.
    pub fn output(&self, facts: &FactBase) -> Result<Value, InferError> {
        match self.consequent {
            Consequent::Assign { value, .. } => Ok(value),
            Consequent::Copy { source, .. } => facts.get(source),
        }
    }
}
