//! Runtime simulation parameters.

use serde::{Deserialize, Serialize};

use super::{InteractionConfig, SimulationConfig};

/// Parameters read by the integrator every step.
///
/// Feed and kill are mutable at runtime through explore mode; the remaining
/// values are fixed for the lifetime of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Feed rate `f`.
    pub feed: f32,
    /// Kill rate `k`.
    pub kill: f32,
    /// Diffusion rate of A.
    pub diffusion_a: f32,
    /// Diffusion rate of B.
    pub diffusion_b: f32,
    /// Time step.
    pub dt: f32,
    /// Integration steps per rendered frame.
    pub steps_per_frame: usize,
    default_feed: f32,
    default_kill: f32,
    exploring: bool,
}

impl SimulationParams {
    /// Create parameters with explicit defaults for feed and kill.
    pub fn new(
        feed: f32,
        kill: f32,
        diffusion_a: f32,
        diffusion_b: f32,
        dt: f32,
        steps_per_frame: usize,
    ) -> Self {
        Self {
            feed,
            kill,
            diffusion_a,
            diffusion_b,
            dt,
            steps_per_frame,
            default_feed: feed,
            default_kill: kill,
            exploring: false,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.feed,
            config.kill,
            config.diffusion_a,
            config.diffusion_b,
            config.dt,
            config.steps_per_frame,
        )
    }

    /// The `(feed, kill)` pair restored when explore mode ends.
    #[inline]
    pub fn defaults(&self) -> (f32, f32) {
        (self.default_feed, self.default_kill)
    }

    #[inline]
    pub fn is_exploring(&self) -> bool {
        self.exploring
    }

    /// Map a normalized cursor position onto the explore ranges.
    ///
    /// `nx` sweeps feed and `ny` sweeps kill, each linearly and independently.
    /// Positions outside `[0, 1]²` leave the parameters untouched.
    pub fn explore(&mut self, nx: f32, ny: f32, ranges: &InteractionConfig) {
        if !(0.0..=1.0).contains(&nx) || !(0.0..=1.0).contains(&ny) {
            return;
        }
        let (f0, f1) = ranges.explore_feed;
        let (k0, k1) = ranges.explore_kill;
        self.feed = f0 + nx * (f1 - f0);
        self.kill = k0 + ny * (k1 - k0);
        self.exploring = true;
    }

    /// Revert feed and kill to their defaults and leave explore mode.
    pub fn restore_defaults(&mut self) {
        self.feed = self.default_feed;
        self.kill = self.default_kill;
        self.exploring = false;
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}
