//! Tunable parameters for the decision policies.
//!
//! [`PolicyConfig`] bundles every tunable so that callers (the session,
//! tests) can override defaults. It deserializes from the `policy` section
//! of the session YAML; missing keys keep their defaults.

use rand::Rng;
use serde::Deserialize;

/// Inclusive range of days a role may pick its scheduled reveal from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CoDayWindow {
    /// First eligible day.
    pub earliest: u32,
    /// Last eligible day.
    pub latest: u32,
}

impl CoDayWindow {
    /// Window covering `earliest..=latest`.
    pub const fn new(earliest: u32, latest: u32) -> Self {
        Self { earliest, latest }
    }

    /// Draw the reveal day uniformly from the window.
    pub fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> u32 {
        if self.latest <= self.earliest {
            self.earliest
        } else {
            rng.random_range(self.earliest..=self.latest)
        }
    }
}

/// Configuration for the per-role decision policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Days the seer may schedule its reveal on (default: 1--3).
    pub seer_co_days: CoDayWindow,

    /// Days the medium may schedule its reveal on (default: 1--3).
    pub medium_co_days: CoDayWindow,

    /// Days the possessed may schedule its fake reveal on (default: 1--3).
    pub possessed_co_days: CoDayWindow,

    /// Number of rival claims after which the possessed stops considering
    /// a fake role (default: 2).
    pub claim_saturation: usize,

    /// Propagation pass bound. `None` uses the number of fact variables.
    pub max_passes: Option<usize>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            seer_co_days: CoDayWindow::new(1, 3),
            medium_co_days: CoDayWindow::new(1, 3),
            possessed_co_days: CoDayWindow::new(1, 3),
            claim_saturation: 2,
            max_passes: None,
        }
    }
}
