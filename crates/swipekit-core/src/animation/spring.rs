#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) trajectory for settle animations.
//!
//! Based on the classical damped spring equation:
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force strength. Higher = faster response.
//! - **damping** (c): velocity drag.
//!   - Underdamped (c < 2√k): oscillates past the target before settling
//!   - Critically damped (c ≈ 2√k): fastest convergence without overshoot
//!   - Overdamped (c > 2√k): slow convergence, no overshoot
//!
//! Positions here are raw pixel-scale offsets, not normalized progress; the
//! rest thresholds are sized accordingly.
//!
//! # Integration
//!
//! Semi-implicit Euler. Large `dt` values are subdivided into steps of at
//! most [`MAX_STEP_SECS`] for numerical stability with high stiffness.
//!
//! # Invariants
//!
//! 1. A spring at rest stays at rest; `advance` is a no-op until
//!    `set_target` moves the goalposts.
//! 2. On reaching rest, position snaps exactly to the target and velocity
//!    zeroes.
//! 3. Stiffness is always positive (clamped on construction); zero damping
//!    is admitted and simply never settles.

use std::time::Duration;

/// Maximum dt per integration step (4ms). Larger deltas are subdivided.
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta below which the spring may come to rest.
const DEFAULT_REST_THRESHOLD: f64 = 0.05;

/// Velocity magnitude below which (combined with the position threshold)
/// the spring is considered at rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.5;

/// Minimum stiffness to prevent degenerate springs.
const MIN_STIFFNESS: f64 = 0.1;

/// Default stiffness used by the bounciness mapping.
pub const DEFAULT_STIFFNESS: f64 = 170.0;

// ---------------------------------------------------------------------------
// SpringParams
// ---------------------------------------------------------------------------

/// Spring physics parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringParams {
    /// Restoring force strength.
    pub stiffness: f64,
    /// Velocity drag.
    pub damping: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::from_bounciness(0.3)
    }
}

impl SpringParams {
    /// Exact physics parameters. Stiffness is clamped to a positive
    /// minimum; damping to non-negative.
    #[must_use]
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness: stiffness.max(MIN_STIFFNESS),
            damping: damping.max(0.0),
        }
    }

    /// Map a bounciness factor onto spring parameters.
    ///
    /// Keeps [`DEFAULT_STIFFNESS`] and scales damping down from critical as
    /// `c = 2√k / (1 + b)`: bounciness 0 is critically damped (no
    /// overshoot), larger values oscillate progressively more. Negative
    /// input is treated as 0.
    #[must_use]
    pub fn from_bounciness(bounciness: f64) -> Self {
        let k = DEFAULT_STIFFNESS;
        let critical = 2.0 * k.sqrt();
        Self::new(k, critical / (1.0 + bounciness.max(0.0)))
    }

    /// The critical damping coefficient for this stiffness.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.sqrt()
    }
}

// ---------------------------------------------------------------------------
// Spring
// ---------------------------------------------------------------------------

/// A damped harmonic oscillator moving a raw offset toward a target.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    params: SpringParams,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial`, at rest when created on its
    /// target.
    #[must_use]
    pub fn new(initial: f64, target: f64, params: SpringParams) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            params,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: false,
        }
    }

    /// Current position (may transiently overshoot the target).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Change the target. Wakes the spring if the target actually moved.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Add to the velocity (e.g., carry a release fling into the settle).
    /// Wakes the spring.
    pub fn impulse(&mut self, velocity_delta: f64) {
        self.velocity += velocity_delta;
        self.at_rest = false;
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// One integration step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let spring_force = -self.params.stiffness * displacement;
        let damping_force = -self.params.damping * self.velocity;
        let acceleration = spring_force + damping_force;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        let pos_delta = (self.position - self.target).abs();
        if pos_delta < self.rest_threshold && self.velocity.abs() < self.velocity_threshold {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
