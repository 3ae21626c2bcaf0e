//! Tunables for the simulation.
//!
//! Everything here is a plain value; nothing is validated. Friction outside
//! `(0, 1]`, restitution outside `[0, 1]` or a non-positive radius range give
//! odd trajectories but are the caller's responsibility.

use std::ops::Range;

/// Parameters for bodies created by a secondary-button press
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnConfig {
    /// Per-axis speed magnitude, units/second
    pub speed: Range<f64>,
    /// Radius, half-open
    pub radius: Range<f64>,
    pub friction: f64,
    pub restitution: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig {
            speed: 100.0..300.0,
            radius: 10.0..70.0,
            friction: 0.99,
            restitution: 0.9,
        }
    }
}

/// Simulation-wide configuration, fixed at construction
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Viewport width; the right wall sits here
    pub width: f64,
    /// Viewport height; the floor sits here
    pub height: f64,
    /// Added to every body's vertical velocity once per frame, after damping
    pub gravity: f64,
    /// Seed for the spawn RNG. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub spawn: SpawnConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            width: 800.0,
            height: 600.0,
            gravity: 50.0,
            seed: None,
            spawn: SpawnConfig::default(),
        }
    }
}

/// The slice of [`SimConfig`] a body needs to integrate one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct World {
    pub width: f64,
    pub height: f64,
    pub gravity: f64,
}

impl From<&SimConfig> for World {
    fn from(config: &SimConfig) -> Self {
        World {
            width: config.width,
            height: config.height,
            gravity: config.gravity,
        }
    }
}
