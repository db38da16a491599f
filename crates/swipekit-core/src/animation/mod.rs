#![forbid(unsafe_code)]

//! Settle animation: eased timing curves, spring physics, and the driver
//! that moves the offset to its committed target.
//!
//! Two interchangeable trajectory models sit behind one [`SettleMode`]
//! selector: a fixed-duration eased transition ([`Timing`]) and a damped
//! harmonic oscillator ([`Spring`](spring::Spring)). The model changes only
//! the trajectory — the driving contract ([`SettleDriver`](driver::SettleDriver))
//! is identical for both.

pub mod driver;
pub mod spring;

pub use driver::SettleDriver;
pub use spring::{Spring, SpringParams};

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Monotone easing curve for fixed-duration transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Cubic ease-in (accelerating).
    EaseIn,
    /// Cubic ease-out (decelerating).
    EaseOut,
    /// Cubic S-curve.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Apply the curve to a progress value; input and output are clamped
    /// to [0.0, 1.0].
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Fixed-duration transition progress, ticked by the host frame loop.
///
/// A zero duration completes on the first tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Timing {
    /// Create a transition of the given duration and easing.
    #[must_use]
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
            easing,
        }
    }

    /// Advance by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Raw progress in [0.0, 1.0].
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Eased progress in [0.0, 1.0].
    #[must_use]
    pub fn eased(&self) -> f64 {
        self.easing.apply(self.progress())
    }

    /// Whether the transition has run its full duration.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

// ---------------------------------------------------------------------------
// SettleMode
// ---------------------------------------------------------------------------

/// Trajectory selector for settle animations.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettleMode {
    /// Fixed-duration eased transition.
    Timing {
        /// Total transition time.
        duration: Duration,
        /// Easing curve.
        easing: Easing,
    },
    /// Physically-modeled spring transition.
    Spring(SpringParams),
}

impl SettleMode {
    /// The default timing transition (50ms, ease-in-out).
    #[must_use]
    pub fn timing(duration: Duration) -> Self {
        Self::Timing {
            duration,
            easing: Easing::EaseInOut,
        }
    }

    /// A spring transition from a bounciness factor (see
    /// [`SpringParams::from_bounciness`]).
    #[must_use]
    pub fn spring(bounciness: f64) -> Self {
        Self::Spring(SpringParams::from_bounciness(bounciness))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
