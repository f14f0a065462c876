//! Tiered candidate selection.
//!
//! Policies describe their choice as an ordered list of tiers, most
//! preferred first. The first non-empty tier wins. A held candidate that is
//! already a member of the winning tier is kept; otherwise a member is drawn
//! uniformly at random with the session's seeded generator.

use lupine_types::AgentId;
use rand::Rng;

/// Draw one member of `pool` uniformly at random.
pub fn pick<R: Rng + ?Sized>(pool: &[AgentId], rng: &mut R) -> Option<AgentId> {
    if pool.is_empty() {
        return None;
    }
    pool.get(rng.random_range(0..pool.len())).copied()
}

/// A held target plus the one-shot flag asking for it to be announced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Candidate {
    current: Option<AgentId>,
    to_declare: bool,
}

impl Candidate {
    /// Currently held target.
    pub const fn current(&self) -> Option<AgentId> {
        self.current
    }

    /// Whether the held target still has to be announced.
    pub const fn needs_declaring(&self) -> bool {
        self.to_declare && self.current.is_some()
    }

    /// Replace the held target. A change raises the declare flag.
    pub fn set(&mut self, target: Option<AgentId>) {
        if self.current != target {
            self.current = target;
            self.to_declare = target.is_some();
        }
    }

    /// Ask for the held target to be announced again (new day).
    pub const fn redeclare(&mut self) {
        self.to_declare = self.current.is_some();
    }

    /// Take the held target for announcement, lowering the flag.
    pub const fn take_declaration(&mut self) -> Option<AgentId> {
        if self.to_declare {
            self.to_declare = false;
            self.current
        } else {
            None
        }
    }

    /// Apply the tiered choice. Returns the held target afterwards.
    ///
    /// When every tier is empty the held target is left untouched.
    pub fn select<R, I>(&mut self, tiers: I, rng: &mut R) -> Option<AgentId>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = Vec<AgentId>>,
    {
        let Some(tier) = tiers.into_iter().find(|t| !t.is_empty()) else {
            return self.current;
        };
        if self.current.is_some_and(|c| tier.contains(&c)) {
            return self.current;
        }
        let chosen = pick(&tier, rng);
        self.set(chosen);
        self.current
    }
}
