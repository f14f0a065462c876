//! The fixed rule book for one game.
//!
//! Rules are enumerated explicitly from the role, species and team tables
//! once at game start, parameterized by the agent list and the agent's own
//! role. The order of the list is the order rules are evaluated in a pass.

use lupine_types::{AgentId, Role, Species, Team};

use crate::fact::Var;
use crate::rule::{Clause, Rule, RuleKind};

/// Ordered list of rules applied by the inference engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBook {
    rules: Vec<Rule>,
}

impl RuleBook {
    /// Build the rule book seen by agent `me` holding `my_role`.
    ///
    /// Rules are generated for every other agent. `me` only ever appears as
    /// the inspected side of a consistency rule.
    pub fn build(agents: &[AgentId], me: AgentId, my_role: Role) -> Self {
        let mut rules = Vec::new();
        let others: Vec<AgentId> = agents.iter().copied().filter(|&a| a != me).collect();

        for &a1 in &others {
            projection_rules(&mut rules, a1);
            own_role_rules(&mut rules, a1, my_role);

            for &a2 in agents.iter().filter(|&&a2| a2 != a1) {
                consistency_rules(&mut rules, a1, a2);
            }
            for &a2 in others.iter().filter(|&&a2| a2 != a1) {
                rules.push(Rule::copy(
                    RuleKind::TrustDivination,
                    vec![Clause::new(Var::Team(a1), Team::Villager)],
                    Var::Species(a2),
                    Var::Divined { by: a1, target: a2 },
                ));
                rules.push(Rule::copy(
                    RuleKind::TrustInquest,
                    vec![Clause::new(Var::Team(a1), Team::Villager)],
                    Var::Species(a2),
                    Var::Inquested { by: a1, target: a2 },
                ));
            }
        }

        Self { rules }
    }

    /// Rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the book is empty (a game with a single agent).
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules of the given family.
    pub fn count(&self, kind: RuleKind) -> usize {
        self.rules.iter().filter(|r| r.kind == kind).count()
    }
}

/// Role projections and the single-agent deductions.
fn projection_rules(rules: &mut Vec<Rule>, a: AgentId) {
    for role in Role::ALL.into_iter().filter(|r| r.is_inferable()) {
        rules.push(Rule::assign(
            RuleKind::RoleSpecies,
            vec![Clause::new(Var::Role(a), role)],
            Var::Species(a),
            role.species(),
        ));
        rules.push(Rule::assign(
            RuleKind::RoleTeam,
            vec![Clause::new(Var::Role(a), role)],
            Var::Team(a),
            role.team(),
        ));
    }
    rules.push(Rule::assign(
        RuleKind::VillagerIsHuman,
        vec![Clause::new(Var::Team(a), Team::Villager)],
        Var::Species(a),
        Species::Human,
    ));
    rules.push(Rule::assign(
        RuleKind::WerewolfSpecies,
        vec![Clause::new(Var::Species(a), Species::Werewolf)],
        Var::Role(a),
        Role::Werewolf,
    ));
    rules.push(Rule::assign(
        RuleKind::AttackedIsHuman,
        vec![Clause::new(Var::Attacked(a), true)],
        Var::Species(a),
        Species::Human,
    ));
    rules.push(Rule::assign(
        RuleKind::HumanEnemyIsPossessed,
        vec![
            Clause::new(Var::Team(a), Team::Werewolf),
            Clause::new(Var::Species(a), Species::Human),
        ],
        Var::Role(a),
        Role::Possessed,
    ));
    rules.push(Rule::copy(
        RuleKind::TrustClaim,
        vec![Clause::new(Var::Team(a), Team::Villager)],
        Var::Role(a),
        Var::Claim(a),
    ));
}

/// Deductions that only hold from the viewpoint of `my_role`.
fn own_role_rules(rules: &mut Vec<Rule>, a: AgentId, my_role: Role) {
    match my_role {
        Role::Seer | Role::Medium | Role::Bodyguard => rules.push(Rule::assign(
            RuleKind::CounterClaim,
            vec![Clause::new(Var::Claim(a), my_role)],
            Var::Team(a),
            Team::Werewolf,
        )),
        Role::Possessed => rules.push(Rule::assign(
            RuleKind::AttackedIsVillager,
            vec![Clause::new(Var::Attacked(a), true)],
            Var::Team(a),
            Team::Villager,
        )),
        Role::Villager | Role::Werewolf | Role::Freemason => {}
    }
}

/// Claimed seer and medium results checked against known species.
///
/// A claim that matches the target's species makes the claimant a villager,
/// a mismatching one an enemy.
fn consistency_rules(rules: &mut Vec<Rule>, a1: AgentId, a2: AgentId) {
    let kinds = [
        (
            Role::Seer,
            RuleKind::SeerConsistency,
            Var::Divined { by: a1, target: a2 },
        ),
        (
            Role::Medium,
            RuleKind::MediumConsistency,
            Var::Inquested { by: a1, target: a2 },
        ),
    ];
    for (claim, kind, judged) in kinds {
        for said in Species::ALL {
            for known in Species::ALL {
                let team = if said == known {
                    Team::Villager
                } else {
                    Team::Werewolf
                };
                rules.push(Rule::assign(
                    kind,
                    vec![
                        Clause::new(Var::Claim(a1), claim),
                        Clause::new(judged, said),
                        Clause::new(Var::Species(a2), known),
                    ],
                    Var::Team(a1),
                    team,
                ));
            }
        }
    }
}
