#![forbid(unsafe_code)]

//! Gesture classification: deciding when a drag becomes a horizontal swipe.
//!
//! [`SwipeClassifier`] is the claim half of the host's capture-negotiation
//! protocol. The host asks, per move sample, "do you want this gesture?"
//! via [`request_claim`](SwipeClassifier::request_claim); once the answer is
//! yes, the classifier latches and the panel becomes the exclusive recipient
//! of move/end events until the gesture finishes.
//!
//! # State Machine
//!
//! `Idle → Claimed → Idle`. The transition to `Claimed` fires when a sample
//! passes both gates:
//!
//! - displacement: `|dx| > start_swipe_threshold`
//! - directional dominance: `|dx| > |dy| * horizontal_swipe_multiple`
//!
//! The dominance gate keeps a diagonal or vertical scroll from being
//! misclassified as a swipe.
//!
//! # Invariants
//!
//! 1. Once claimed, samples are never re-evaluated; `request_claim` returns
//!    `true` unconditionally until [`end_gesture`](SwipeClassifier::end_gesture)
//!    or [`reset`](SwipeClassifier::reset).
//! 2. Termination requests from competing recognizers are refused for the
//!    lifetime of a claimed gesture: [`allows_termination`](SwipeClassifier::allows_termination)
//!    is `false` while claimed. A partial reveal must resolve through the
//!    commit path, never abort mid-flight.
//! 3. After `reset()`, the classifier is indistinguishable from a new one.

use crate::config::SwipeConfig;

// ---------------------------------------------------------------------------
// GestureSample
// ---------------------------------------------------------------------------

/// One move sample: cumulative displacement since the gesture started.
///
/// Samples are ephemeral; nothing here survives the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSample {
    /// Cumulative horizontal displacement (negative = leftward).
    pub dx: f64,
    /// Cumulative vertical displacement.
    pub dy: f64,
}

impl GestureSample {
    /// Create a sample from cumulative displacement.
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

// ---------------------------------------------------------------------------
// SwipeClassifier
// ---------------------------------------------------------------------------

/// Classifier phase within a single gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassifierPhase {
    Idle,
    Claimed,
}

/// Decides whether a drag claims the gesture for its panel.
#[derive(Debug, Clone)]
pub struct SwipeClassifier {
    start_swipe_threshold: f64,
    horizontal_swipe_multiple: f64,
    phase: ClassifierPhase,
}

impl SwipeClassifier {
    /// Create a classifier using the thresholds from `config`.
    #[must_use]
    pub fn new(config: &SwipeConfig) -> Self {
        Self {
            start_swipe_threshold: config.start_swipe_threshold,
            horizontal_swipe_multiple: config.horizontal_swipe_multiple,
            phase: ClassifierPhase::Idle,
        }
    }

    /// Evaluate a move sample, claiming the gesture if it qualifies.
    ///
    /// Returns `true` when this panel should own the gesture. Once true has
    /// been returned, every subsequent call returns `true` without
    /// re-evaluating until the gesture ends.
    pub fn request_claim(&mut self, sample: GestureSample) -> bool {
        if self.phase == ClassifierPhase::Claimed {
            return true;
        }

        let dominant = sample.dx.abs() > sample.dy.abs() * self.horizontal_swipe_multiple;
        if sample.dx.abs() > self.start_swipe_threshold && dominant {
            self.phase = ClassifierPhase::Claimed;
            #[cfg(feature = "tracing")]
            tracing::debug!(dx = sample.dx, dy = sample.dy, "swipe gesture claimed");
            true
        } else {
            false
        }
    }

    /// Whether this classifier currently owns a gesture.
    #[inline]
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.phase == ClassifierPhase::Claimed
    }

    /// Answer a termination/preemption request from a competing recognizer.
    ///
    /// `true` means the caller may take the gesture away. A claimed swipe is
    /// exclusive, so this is `false` for the remainder of the gesture.
    #[inline]
    #[must_use]
    pub fn allows_termination(&self) -> bool {
        self.phase == ClassifierPhase::Idle
    }

    /// Mark the gesture as finished, returning to idle.
    pub fn end_gesture(&mut self) {
        self.phase = ClassifierPhase::Idle;
    }

    /// Reset to the initial idle state.
    pub fn reset(&mut self) {
        self.phase = ClassifierPhase::Idle;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
