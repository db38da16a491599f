#![forbid(unsafe_code)]

//! Commit decision: does the panel settle open or closed at gesture end?
//!
//! The thresholds are deliberately asymmetric around the midpoint. Opening
//! requires dragging past 25% of the action-row width; an open panel stays
//! open only while more than 75% of the row remains revealed. The
//! hysteresis keeps the panel from flickering between states when a release
//! lands near either threshold.
//!
//! An optional fling override lets a fast release win over distance: a
//! quick leftward throw commits to revealed even from a short drag, and a
//! quick rightward throw dismisses even from a deep one. The override is
//! off by default, which preserves the distance-only behavior of the
//! historical implementations.
//!
//! # Invariants
//!
//! 1. `decide` is pure: same inputs, same answer.
//! 2. A non-positive row width always decides "closed".
//! 3. Callers pass an offset already re-clamped into `[-width, 0]`.

/// Fraction of the row width that must be revealed to commit open.
pub const DEFAULT_OPEN_FRACTION: f64 = 0.25;

/// Fraction of the row width that must remain revealed to stay open.
pub const DEFAULT_CLOSE_FRACTION: f64 = 0.75;

/// Converts a release offset (and optionally velocity) into the new
/// committed reveal state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommitDecider {
    /// Reveal fraction required to open from a closed rest state.
    pub open_fraction: f64,
    /// Reveal fraction below which an open panel snaps shut.
    pub close_fraction: f64,
    /// Release speed at which velocity direction overrides distance.
    pub fling_velocity_threshold: Option<f64>,
}

impl Default for CommitDecider {
    fn default() -> Self {
        Self {
            open_fraction: DEFAULT_OPEN_FRACTION,
            close_fraction: DEFAULT_CLOSE_FRACTION,
            fling_velocity_threshold: None,
        }
    }
}

impl CommitDecider {
    /// Create a decider with the default 25%/75% hysteresis and no fling
    /// override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the fling override at the given release speed.
    #[must_use]
    pub fn with_fling_threshold(mut self, threshold: f64) -> Self {
        self.fling_velocity_threshold = (threshold > 0.0).then_some(threshold);
        self
    }

    /// Decide from distance alone.
    ///
    /// `final_offset` is the release offset re-clamped into
    /// `[-total_width, 0]`; `was_revealed` is the previous committed state.
    #[must_use]
    pub fn decide(&self, final_offset: f64, was_revealed: bool, total_width: f64) -> bool {
        if total_width <= 0.0 {
            return false;
        }
        let fraction = if was_revealed {
            self.close_fraction
        } else {
            self.open_fraction
        };
        final_offset < -fraction * total_width
    }

    /// Decide from distance, with the fling override applied when a release
    /// velocity is available and fast enough.
    ///
    /// Negative `vx` is motion in the opening (leftward) direction.
    #[must_use]
    pub fn decide_with_velocity(
        &self,
        final_offset: f64,
        was_revealed: bool,
        total_width: f64,
        vx: Option<f64>,
    ) -> bool {
        if total_width <= 0.0 {
            return false;
        }
        if let (Some(threshold), Some(vx)) = (self.fling_velocity_threshold, vx)
            && vx.abs() >= threshold
        {
            return vx < 0.0;
        }
        self.decide(final_offset, was_revealed, total_width)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
