#![forbid(unsafe_code)]

//! Configuration for the swipe interaction engine.
//!
//! [`SwipeConfig`] gathers every tunable knob in one place: the gesture
//! claim thresholds, the default action-button width, the clamp policy for
//! the live offset, the settle animation mode, and the optional fling
//! override for commit decisions.
//!
//! The observed implementations of this component diverged in clamp timing
//! and animation model; those divergences are unified here as selectable
//! policies ([`ClampPolicy`], [`SettleMode`]) instead of forked components.

use std::time::Duration;

use crate::animation::{Easing, SettleMode};

/// Minimum horizontal displacement before a drag can claim the gesture.
pub const DEFAULT_START_SWIPE_THRESHOLD: f64 = 10.0;

/// Horizontal displacement must exceed vertical displacement times this
/// factor for the drag to count as a horizontal swipe.
pub const DEFAULT_HORIZONTAL_SWIPE_MULTIPLE: f64 = 4.0;

/// Width assigned to an action button that does not specify its own.
pub const DEFAULT_ACTION_BUTTON_WIDTH: f64 = 90.0;

/// Duration of the default fixed-duration settle transition.
pub const DEFAULT_SETTLE_DURATION: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// ClampPolicy
// ---------------------------------------------------------------------------

/// How the live offset behaves at the reveal boundaries.
///
/// Either policy guarantees the *committed* offset lies within
/// `[-total_actions_width, 0]`; they differ only in what the live value does
/// while a finger holds the panel past a boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClampPolicy {
    /// Pin the live offset exactly at the boundary.
    Hard,
    /// Admit overscroll past the boundary, scaled by `resistance`
    /// (0 = immovable, 1 = no resistance). The offset returns to the
    /// boundary on release.
    Elastic {
        /// Fraction of out-of-bounds displacement that survives, in (0, 1].
        resistance: f64,
    },
}

impl ClampPolicy {
    /// Elastic overscroll with the resistance clamped into (0, 1].
    #[must_use]
    pub fn elastic(resistance: f64) -> Self {
        Self::Elastic {
            resistance: resistance.clamp(f64::EPSILON, 1.0),
        }
    }

    /// Apply the policy: map `candidate` into (or near) `[-bound, 0]`.
    ///
    /// `bound` is the total action-row width and must be non-negative;
    /// callers pass 0 for an empty row, collapsing the range to `{0}`.
    #[must_use]
    pub fn apply(self, candidate: f64, bound: f64) -> f64 {
        let low = -bound.max(0.0);
        match self {
            Self::Hard => candidate.clamp(low, 0.0),
            Self::Elastic { resistance } => {
                if candidate > 0.0 {
                    candidate * resistance
                } else if candidate < low {
                    low + (candidate - low) * resistance
                } else {
                    candidate
                }
            }
        }
    }
}

impl Default for ClampPolicy {
    fn default() -> Self {
        Self::Hard
    }
}

// ---------------------------------------------------------------------------
// SwipeConfig
// ---------------------------------------------------------------------------

/// Thresholds and policies for swipe-to-reveal interaction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwipeConfig {
    /// Minimum `|dx|` before a drag may claim the gesture.
    pub start_swipe_threshold: f64,
    /// Required dominance of `|dx|` over `|dy|` (directional gate).
    pub horizontal_swipe_multiple: f64,
    /// Width for action buttons that do not specify their own.
    pub action_button_default_width: f64,
    /// Boundary behavior for the live offset.
    pub clamp: ClampPolicy,
    /// Trajectory used when settling to the committed state.
    pub settle: SettleMode,
    /// Release speed at or above which the commit decision follows the
    /// velocity direction instead of the distance thresholds.
    /// `None` disables the fling override.
    pub fling_velocity_threshold: Option<f64>,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            start_swipe_threshold: DEFAULT_START_SWIPE_THRESHOLD,
            horizontal_swipe_multiple: DEFAULT_HORIZONTAL_SWIPE_MULTIPLE,
            action_button_default_width: DEFAULT_ACTION_BUTTON_WIDTH,
            clamp: ClampPolicy::Hard,
            settle: SettleMode::Timing {
                duration: DEFAULT_SETTLE_DURATION,
                easing: Easing::EaseInOut,
            },
            fling_velocity_threshold: None,
        }
    }
}

impl SwipeConfig {
    /// Create a configuration with the default thresholds and policies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the claim displacement threshold. Clamped to a minimum of 0.
    #[must_use]
    pub fn start_swipe_threshold(mut self, threshold: f64) -> Self {
        self.start_swipe_threshold = threshold.max(0.0);
        self
    }

    /// Set the horizontal dominance factor. Clamped to a minimum of 1.
    #[must_use]
    pub fn horizontal_swipe_multiple(mut self, multiple: f64) -> Self {
        self.horizontal_swipe_multiple = multiple.max(1.0);
        self
    }

    /// Set the default action-button width. Non-positive values fall back
    /// to [`DEFAULT_ACTION_BUTTON_WIDTH`].
    #[must_use]
    pub fn action_button_default_width(mut self, width: f64) -> Self {
        self.action_button_default_width = if width > 0.0 {
            width
        } else {
            DEFAULT_ACTION_BUTTON_WIDTH
        };
        self
    }

    /// Set the clamp policy.
    #[must_use]
    pub fn clamp(mut self, policy: ClampPolicy) -> Self {
        self.clamp = policy;
        self
    }

    /// Set the settle animation mode.
    #[must_use]
    pub fn settle(mut self, mode: SettleMode) -> Self {
        self.settle = mode;
        self
    }

    /// Enable the fling override at the given release speed.
    #[must_use]
    pub fn fling_velocity_threshold(mut self, threshold: f64) -> Self {
        self.fling_velocity_threshold = (threshold > 0.0).then_some(threshold);
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = SwipeConfig::default();
        assert_eq!(config.start_swipe_threshold, 10.0);
        assert_eq!(config.horizontal_swipe_multiple, 4.0);
        assert_eq!(config.action_button_default_width, 90.0);
        assert_eq!(config.clamp, ClampPolicy::Hard);
        assert!(config.fling_velocity_threshold.is_none());
        let SettleMode::Timing { duration, easing } = config.settle else {
            panic!("default settle mode should be timing");
        };
        assert_eq!(duration, DEFAULT_SETTLE_DURATION);
        assert_eq!(easing, Easing::EaseInOut);
    }

    #[test]
    fn builder_methods() {
        let config = SwipeConfig::new()
            .start_swipe_threshold(5.0)
            .horizontal_swipe_multiple(2.0)
            .action_button_default_width(64.0)
            .clamp(ClampPolicy::elastic(0.5))
            .fling_velocity_threshold(800.0);

        assert_eq!(config.start_swipe_threshold, 5.0);
        assert_eq!(config.horizontal_swipe_multiple, 2.0);
        assert_eq!(config.action_button_default_width, 64.0);
        assert_eq!(config.clamp, ClampPolicy::Elastic { resistance: 0.5 });
        assert_eq!(config.fling_velocity_threshold, Some(800.0));
    }

    #[test]
    fn negative_threshold_clamped() {
        let config = SwipeConfig::new().start_swipe_threshold(-3.0);
        assert_eq!(config.start_swipe_threshold, 0.0);
    }

    #[test]
    fn dominance_clamped_to_one() {
        let config = SwipeConfig::new().horizontal_swipe_multiple(0.25);
        assert_eq!(config.horizontal_swipe_multiple, 1.0);
    }

    #[test]
    fn non_positive_default_width_falls_back() {
        let config = SwipeConfig::new().action_button_default_width(0.0);
        assert_eq!(
            config.action_button_default_width,
            DEFAULT_ACTION_BUTTON_WIDTH
        );
        let config = SwipeConfig::new().action_button_default_width(-10.0);
        assert_eq!(
            config.action_button_default_width,
            DEFAULT_ACTION_BUTTON_WIDTH
        );
    }

    #[test]
    fn non_positive_fling_threshold_disables_override() {
        let config = SwipeConfig::new().fling_velocity_threshold(0.0);
        assert!(config.fling_velocity_threshold.is_none());
    }

    // --- ClampPolicy tests ---

    #[test]
    fn hard_clamp_pins_at_boundaries() {
        let policy = ClampPolicy::Hard;
        assert_eq!(policy.apply(25.0, 200.0), 0.0);
        assert_eq!(policy.apply(-50.0, 200.0), -50.0);
        assert_eq!(policy.apply(-250.0, 200.0), -200.0);
    }

    #[test]
    fn elastic_clamp_scales_overscroll() {
        let policy = ClampPolicy::elastic(0.5);
        // In-bounds values pass through untouched.
        assert_eq!(policy.apply(-100.0, 200.0), -100.0);
        // Overscroll past the reveal boundary is halved.
        assert_eq!(policy.apply(-240.0, 200.0), -220.0);
        // Overscroll past the home boundary is halved too.
        assert_eq!(policy.apply(30.0, 200.0), 15.0);
    }

    #[test]
    fn elastic_resistance_clamped_into_unit_range() {
        assert_eq!(
            ClampPolicy::elastic(2.0),
            ClampPolicy::Elastic { resistance: 1.0 }
        );
        let ClampPolicy::Elastic { resistance } = ClampPolicy::elastic(-1.0) else {
            panic!("expected elastic policy");
        };
        assert!(resistance > 0.0);
    }

    #[test]
    fn zero_bound_collapses_range() {
        assert_eq!(ClampPolicy::Hard.apply(-80.0, 0.0), 0.0);
        assert_eq!(ClampPolicy::Hard.apply(80.0, 0.0), 0.0);
    }

    #[test]
    fn negative_bound_treated_as_zero() {
        assert_eq!(ClampPolicy::Hard.apply(-80.0, -10.0), 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_round_trips_through_serde() {
        let config = SwipeConfig::new().clamp(ClampPolicy::elastic(0.4));
        let json = serde_json::to_string(&config).unwrap();
        let back: SwipeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
