#![forbid(unsafe_code)]

//! The settle driver: moves an offset to its committed target over time.
//!
//! [`SettleDriver`] is pumped by the host frame loop via
//! [`tick`](SettleDriver::tick); each tick yields the current interpolated
//! value for the caller to write into its offset controller, so observers
//! fire every frame.
//!
//! # Interruption
//!
//! There is no queue. A new [`animate_to`](SettleDriver::animate_to) call
//! supersedes any in-flight settle (last-writer-wins on the target), and
//! [`cancel`](SettleDriver::cancel) stops the settle cleanly, handing back
//! the current interpolated value so a new gesture can re-base from it.
//! Interruption is normal control flow here, not an error.
//!
//! # Invariants
//!
//! 1. At most one settle is active at a time.
//! 2. The final value produced for a completed settle is exactly the target.
//! 3. After completion or cancellation, [`is_animating`](SettleDriver::is_animating)
//!    is `false` and `tick` returns `None`.

use std::time::Duration;

use super::spring::Spring;
use super::{SettleMode, Timing};

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The trajectory engine backing one settle.
#[derive(Debug, Clone)]
enum Engine {
    Timing {
        timing: Timing,
        from: f64,
        target: f64,
    },
    Spring(Spring),
}

impl Engine {
    fn new(from: f64, target: f64, mode: &SettleMode) -> Self {
        match *mode {
            SettleMode::Timing { duration, easing } => Self::Timing {
                timing: Timing::new(duration, easing),
                from,
                target,
            },
            SettleMode::Spring(params) => Self::Spring(Spring::new(from, target, params)),
        }
    }

    fn tick(&mut self, dt: Duration) {
        match self {
            Self::Timing { timing, .. } => timing.tick(dt),
            Self::Spring(spring) => spring.advance(dt),
        }
    }

    fn current(&self) -> f64 {
        match self {
            Self::Timing {
                timing,
                from,
                target,
            } => from + (target - from) * timing.eased(),
            Self::Spring(spring) => spring.position(),
        }
    }

    fn target(&self) -> f64 {
        match self {
            Self::Timing { target, .. } => *target,
            Self::Spring(spring) => spring.target(),
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            Self::Timing { timing, .. } => timing.is_complete(),
            Self::Spring(spring) => spring.is_at_rest(),
        }
    }
}

// ---------------------------------------------------------------------------
// SettleDriver
// ---------------------------------------------------------------------------

/// Tick-pumped, interruptible settle animation.
#[derive(Debug, Clone, Default)]
pub struct SettleDriver {
    active: Option<Engine>,
}

impl SettleDriver {
    /// Create an idle driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start settling from `from` to `target`, superseding any in-flight
    /// settle.
    pub fn animate_to(&mut self, from: f64, target: f64, mode: &SettleMode) {
        #[cfg(feature = "tracing")]
        tracing::debug!(from, target, superseded = self.active.is_some(), "settle started");
        self.active = Some(Engine::new(from, target, mode));
    }

    /// Whether a settle is in flight.
    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// The in-flight settle's target, if any.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.active.as_ref().map(Engine::target)
    }

    /// The current interpolated value, if a settle is in flight.
    #[must_use]
    pub fn current(&self) -> Option<f64> {
        self.active.as_ref().map(Engine::current)
    }

    /// Advance the settle by `dt`.
    ///
    /// Returns the value the offset should take this frame, or `None` when
    /// idle. When the settle completes during this tick, the returned value
    /// is exactly the target and the driver goes idle.
    pub fn tick(&mut self, dt: Duration) -> Option<f64> {
        let engine = self.active.as_mut()?;
        engine.tick(dt);
        if engine.is_complete() {
            let target = engine.target();
            self.active = None;
            #[cfg(feature = "tracing")]
            tracing::debug!(target, "settle complete");
            Some(target)
        } else {
            Some(engine.current())
        }
    }

    /// Stop the in-flight settle, returning the value it had reached.
    ///
    /// The caller re-bases a new gesture from this value. `None` if idle.
    pub fn cancel(&mut self) -> Option<f64> {
        let value = self.active.take().map(|engine| engine.current());
        #[cfg(feature = "tracing")]
        if let Some(value) = value {
            tracing::debug!(value, "settle cancelled");
        }
        value
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Easing, SpringParams};

    const MS_10: Duration = Duration::from_millis(10);
    const MS_50: Duration = Duration::from_millis(50);

    fn linear_50ms() -> SettleMode {
        SettleMode::Timing {
            duration: MS_50,
            easing: Easing::Linear,
        }
    }

    #[test]
    fn idle_driver_ticks_to_none() {
        let mut driver = SettleDriver::new();
        assert!(!driver.is_animating());
        assert_eq!(driver.tick(MS_10), None);
    }

    #[test]
    fn timing_interpolates_linearly() {
        let mut driver = SettleDriver::new();
        driver.animate_to(0.0, -200.0, &linear_50ms());

        let v = driver.tick(MS_10).unwrap();
        assert!((v - -40.0).abs() < 1e-9);
        let v = driver.tick(MS_10).unwrap();
        assert!((v - -80.0).abs() < 1e-9);
    }

    #[test]
    fn timing_completes_at_target() {
        let mut driver = SettleDriver::new();
        driver.animate_to(-120.0, 0.0, &linear_50ms());

        let mut last = f64::NAN;
        while let Some(v) = driver.tick(MS_10) {
            last = v;
        }
        assert_eq!(last, 0.0);
        assert!(!driver.is_animating());
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut driver = SettleDriver::new();
        driver.animate_to(
            -50.0,
            0.0,
            &SettleMode::Timing {
                duration: Duration::ZERO,
                easing: Easing::Linear,
            },
        );
        assert_eq!(driver.tick(MS_10), Some(0.0));
        assert!(!driver.is_animating());
    }

    #[test]
    fn spring_mode_settles_at_target() {
        let mut driver = SettleDriver::new();
        driver.animate_to(0.0, -200.0, &SettleMode::Spring(SpringParams::new(170.0, 26.0)));

        let mut last = f64::NAN;
        for _ in 0..1000 {
            match driver.tick(Duration::from_millis(16)) {
                Some(v) => last = v,
                None => break,
            }
        }
        assert_eq!(last, -200.0);
        assert!(!driver.is_animating());
    }

    #[test]
    fn new_animate_to_supersedes_in_flight() {
        let mut driver = SettleDriver::new();
        driver.animate_to(0.0, -200.0, &linear_50ms());
        driver.tick(MS_10);

        // Last writer wins; no queuing.
        driver.animate_to(driver.current().unwrap(), 0.0, &linear_50ms());
        assert_eq!(driver.target(), Some(0.0));

        let mut last = f64::NAN;
        while let Some(v) = driver.tick(MS_10) {
            last = v;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn cancel_returns_interpolated_value() {
        let mut driver = SettleDriver::new();
        driver.animate_to(0.0, -200.0, &linear_50ms());
        driver.tick(MS_10);

        let v = driver.cancel().unwrap();
        assert!((v - -40.0).abs() < 1e-9);
        assert!(!driver.is_animating());
        assert_eq!(driver.tick(MS_10), None);
    }

    #[test]
    fn cancel_when_idle_is_none() {
        let mut driver = SettleDriver::new();
        assert_eq!(driver.cancel(), None);
    }

    #[test]
    fn current_and_target_accessors() {
        let mut driver = SettleDriver::new();
        assert_eq!(driver.current(), None);
        assert_eq!(driver.target(), None);

        driver.animate_to(0.0, -90.0, &linear_50ms());
        assert_eq!(driver.current(), Some(0.0));
        assert_eq!(driver.target(), Some(-90.0));
    }

    #[test]
    fn eased_timing_still_ends_at_target() {
        let mut driver = SettleDriver::new();
        driver.animate_to(
            -33.0,
            -290.0,
            &SettleMode::Timing {
                duration: MS_50,
                easing: Easing::EaseInOut,
            },
        );
        let mut last = f64::NAN;
        while let Some(v) = driver.tick(Duration::from_millis(7)) {
            last = v;
        }
        assert_eq!(last, -290.0);
    }
}
