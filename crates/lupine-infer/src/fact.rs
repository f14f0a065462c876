//! Fact variables, values, and the fact base.
//!
//! The set of variables is fixed when the fact base is built: every agent
//! gets a role, species, team, claim and attacked cell, and every ordered
//! pair of distinct agents gets a divined and an inquested cell. Every cell
//! holds a concrete value or [`Value::Uncertain`].

use std::collections::{BTreeMap, BTreeSet};

use lupine_types::{AgentId, Role, Species, Team};

use crate::error::InferError;

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

/// A named cell in the fact base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Var {
    /// True role of the agent.
    Role(AgentId),
    /// Species of the agent.
    Species(AgentId),
    /// Team alignment of the agent.
    Team(AgentId),
    /// Role the agent has publicly claimed.
    Claim(AgentId),
    /// Whether the agent was attacked during a night.
    Attacked(AgentId),
    /// Species `by` claims to have divined for `target`.
    Divined {
        /// Claiming agent.
        by: AgentId,
        /// Divined agent.
        target: AgentId,
    },
    /// Species `by` claims to have inquested for `target`.
    Inquested {
        /// Claiming agent.
        by: AgentId,
        /// Inquested agent.
        target: AgentId,
    },
}

impl Var {
    /// Agent the variable describes (the claimant for inspection cells).
    pub const fn subject(&self) -> AgentId {
        match *self {
            Self::Role(a) | Self::Species(a) | Self::Team(a) | Self::Claim(a) | Self::Attacked(a) => a,
            Self::Divined { by, .. } | Self::Inquested { by, .. } => by,
        }
    }

    /// Inspected agent of a divined or inquested cell.
    pub const fn target(&self) -> Option<AgentId> {
        match *self {
            Self::Divined { target, .. } | Self::Inquested { target, .. } => Some(target),
            Self::Role(_) | Self::Species(_) | Self::Team(_) | Self::Claim(_) | Self::Attacked(_) => {
                None
            }
        }
    }

    /// Whether `value` is of the kind this variable stores.
    pub const fn accepts(&self, value: Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Uncertain)
                | (Self::Role(_) | Self::Claim(_), Value::Role(_))
                | (
                    Self::Species(_) | Self::Divined { .. } | Self::Inquested { .. },
                    Value::Species(_)
                )
                | (Self::Team(_), Value::Team(_))
                | (Self::Attacked(_), Value::Bool(_))
        )
    }
}

impl core::fmt::Display for Var {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Role(a) => write!(f, "role({a})"),
            Self::Species(a) => write!(f, "species({a})"),
            Self::Team(a) => write!(f, "team({a})"),
            Self::Claim(a) => write!(f, "claim({a})"),
            Self::Attacked(a) => write!(f, "attacked({a})"),
            Self::Divined { by, target } => write!(f, "divined({by} -> {target})"),
            Self::Inquested { by, target } => write!(f, "inquested({by} -> {target})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Content of a fact variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// Not yet determined.
    #[default]
    Uncertain,
    /// A role.
    Role(Role),
    /// A species.
    Species(Species),
    /// A concrete team. Never `Team::Uncertain`.
    Team(Team),
    /// A truth value.
    Bool(bool),
}

impl Value {
    /// Whether the value is the uncertain sentinel.
    pub const fn is_uncertain(self) -> bool {
        matches!(self, Self::Uncertain)
    }

    /// The role held, if any.
    pub const fn as_role(self) -> Option<Role> {
        match self {
            Self::Role(r) => Some(r),
            _ => None,
        }
    }

    /// The species held, if any.
    pub const fn as_species(self) -> Option<Species> {
        match self {
            Self::Species(s) => Some(s),
            _ => None,
        }
    }

    /// The team held, mapping anything else to [`Team::Uncertain`].
    pub const fn as_team(self) -> Team {
        match self {
            Self::Team(t) => t,
            _ => Team::Uncertain,
        }
    }

    /// The truth value held, treating uncertainty as false.
    pub const fn is_true(self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

impl From<Role> for Value {
    fn from(r: Role) -> Self {
        Self::Role(r)
    }
}

impl From<Species> for Value {
    fn from(s: Species) -> Self {
        Self::Species(s)
    }
}

impl From<Team> for Value {
    fn from(t: Team) -> Self {
        match t {
            Team::Uncertain => Self::Uncertain,
            Team::Villager | Team::Werewolf => Self::Team(t),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// Fact base
// ---------------------------------------------------------------------------

/// All fact variables of one game and the set pinned by ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactBase {
    agents: BTreeSet<AgentId>,
    values: BTreeMap<Var, Value>,
    pinned: BTreeSet<Var>,
}

impl FactBase {
    /// Build a fact base with every variable uncertain.
    pub fn new(agents: &[AgentId]) -> Self {
        let agents: BTreeSet<AgentId> = agents.iter().copied().collect();
        let mut values = BTreeMap::new();
        for &a in &agents {
            for var in [
                Var::Role(a),
                Var::Species(a),
                Var::Team(a),
                Var::Claim(a),
                Var::Attacked(a),
            ] {
                values.insert(var, Value::Uncertain);
            }
            for &b in agents.iter().filter(|&&b| b != a) {
                values.insert(Var::Divined { by: a, target: b }, Value::Uncertain);
                values.insert(Var::Inquested { by: a, target: b }, Value::Uncertain);
            }
        }
        Self {
            agents,
            values,
            pinned: BTreeSet::new(),
        }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the fact base has no variables (a game with no agents).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Agents known to the fact base.
    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.iter().copied()
    }

    /// Read a variable.
    pub fn get(&self, var: Var) -> Result<Value, InferError> {
        self.values.get(&var).copied().ok_or_else(|| self.missing(var))
    }

    /// Whether ground truth has pinned the variable.
    pub fn is_pinned(&self, var: Var) -> bool {
        self.pinned.contains(&var)
    }

    /// Write a variable, returning whether its value changed.
    pub(crate) fn set(&mut self, var: Var, value: Value) -> Result<bool, InferError> {
        if !var.accepts(value) {
            return Err(InferError::ValueMismatch { var, value });
        }
        let missing = self.missing(var);
        let slot = self.values.get_mut(&var).ok_or(missing)?;
        let changed = *slot != value;
        *slot = value;
        Ok(changed)
    }

    /// Mark a variable as ground truth.
    pub(crate) fn pin(&mut self, var: Var) {
        self.pinned.insert(var);
    }

    /// Snapshot of every value, used to detect a fixed point.
    pub(crate) fn values(&self) -> &BTreeMap<Var, Value> {
        &self.values
    }

    fn missing(&self, var: Var) -> InferError {
        let stranger = core::iter::once(var.subject())
            .chain(var.target())
            .find(|a| !self.agents.contains(a));
        stranger.map_or(InferError::UnknownVariable(var), InferError::UnknownAgent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u32) -> Vec<AgentId> {
        (1..=n).map(AgentId).collect()
    }

    #[test]
    fn fact_base_has_per_agent_and_per_pair_cells() {
        let facts = FactBase::new(&ids(5));
        // 5 attributes * 5 agents + 2 kinds * 5 * 4 ordered pairs
        assert_eq!(facts.len(), 25 + 40);
    }

    #[test]
    fn every_cell_starts_uncertain() {
        let facts = FactBase::new(&ids(3));
        assert!(facts.values().values().all(|v| v.is_uncertain()));
    }

    #[test]
    fn unknown_agent_is_reported_by_subject() {
        let facts = FactBase::new(&ids(3));
        assert!(matches!(
            facts.get(Var::Role(AgentId(9))),
            Err(InferError::UnknownAgent(AgentId(9)))
        ));
    }

    #[test]
    fn unknown_inspected_agent_is_reported() {
        let facts = FactBase::new(&ids(3));
        let var = Var::Inquested {
            by: AgentId(2),
            target: AgentId(8),
        };
        assert!(matches!(
            facts.get(var),
            Err(InferError::UnknownAgent(AgentId(8)))
        ));
    }

    #[test]
    fn self_inspection_is_not_a_variable() {
        let facts = FactBase::new(&ids(3));
        let var = Var::Divined {
            by: AgentId(1),
            target: AgentId(1),
        };
        assert!(matches!(facts.get(var), Err(InferError::UnknownVariable(_))));
    }

    #[test]
    fn set_rejects_values_of_the_wrong_kind() {
        let mut facts = FactBase::new(&ids(3));
        let result = facts.set(Var::Team(AgentId(1)), Value::Species(Species::Human));
        assert!(matches!(result, Err(InferError::ValueMismatch { .. })));
    }

    #[test]
    fn uncertain_team_maps_to_uncertain_value() {
        assert_eq!(Value::from(Team::Uncertain), Value::Uncertain);
        assert_eq!(Value::Uncertain.as_team(), Team::Uncertain);
    }
}
