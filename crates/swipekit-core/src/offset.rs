#![forbid(unsafe_code)]

//! The live horizontal offset: single source of truth for panel position.
//!
//! [`OffsetController`] owns one continuously-varying scalar. An offset of
//! `0` is the fully-closed rest position; `-w` (where `w` is the total
//! action-row width) is fully revealed. The value is observable: subscribers
//! registered with [`subscribe`](OffsetController::subscribe) are notified on
//! every change, so derived transforms recompute per frame instead of
//! polling.
//!
//! # Base lock-in
//!
//! A gesture may start while the panel is mid-reveal. At gesture grant the
//! caller invokes [`lock_in`](OffsetController::lock_in), freezing the
//! current resting offset as the base; subsequent cumulative `dx` samples
//! compose additively (`candidate = dx + base`) instead of being measured
//! from an absolute touch origin. [`unlock`](OffsetController::unlock) ends
//! the composition when the gesture resolves.
//!
//! # Design
//!
//! Shared single-threaded storage (`Rc<RefCell<..>>`). Subscribers are held
//! as `Weak` callbacks, pruned lazily during notification; dropping the
//! [`OffsetSubscription`] guard unsubscribes. Notification iterates a
//! snapshot of the live callbacks so a subscriber unsubscribing mid-delivery
//! cannot skip or duplicate notifications.
//!
//! # Invariants
//!
//! 1. [`value`](OffsetController::value) always returns the latest written
//!    value; correctness-critical reads (commit decisions, clamping) never
//!    depend on listener ordering.
//! 2. Writing a value equal to the current one notifies nobody.
//! 3. The value observers see has already been through the clamp policy;
//!    raw out-of-policy candidates never leak.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::ClampPolicy;

type CallbackRc = Rc<dyn Fn(f64)>;
type CallbackWeak = Weak<dyn Fn(f64)>;

struct OffsetInner {
    raw: f64,
    base: f64,
    locked: bool,
    subscribers: Vec<CallbackWeak>,
}

/// Observable horizontal offset with gesture base lock-in.
///
/// Cloning an `OffsetController` creates a second handle to the **same**
/// value — both handles see the same offset and share subscribers.
pub struct OffsetController {
    inner: Rc<RefCell<OffsetInner>>,
}

impl Clone for OffsetController {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for OffsetController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("OffsetController")
            .field("raw", &inner.raw)
            .field("base", &inner.base)
            .field("locked", &inner.locked)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl Default for OffsetController {
    fn default() -> Self {
        Self::new()
    }
}

impl OffsetController {
    /// Create a controller at the closed rest position (offset 0).
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(OffsetInner {
                raw: 0.0,
                base: 0.0,
                locked: false,
                subscribers: Vec::new(),
            })),
        }
    }

    /// The current offset. Guaranteed current — not a listener-fed mirror.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.inner.borrow().raw
    }

    /// The base offset frozen by the last [`lock_in`](Self::lock_in).
    #[must_use]
    pub fn base(&self) -> f64 {
        self.inner.borrow().base
    }

    /// Whether a gesture base is currently locked in.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.inner.borrow().locked
    }

    /// Freeze the current offset as the zero-reference for relative deltas.
    pub fn lock_in(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.base = inner.raw;
        inner.locked = true;
    }

    /// End base composition. The base value is retained for inspection
    /// until the next lock-in.
    pub fn unlock(&self) {
        self.inner.borrow_mut().locked = false;
    }

    /// Write an absolute offset, notifying subscribers if it changed.
    pub fn set_absolute(&self, value: f64) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            if inner.raw == value {
                false
            } else {
                inner.raw = value;
                true
            }
        };
        if changed {
            self.notify(value);
        }
    }

    /// Compose a cumulative gesture delta with the locked base and apply
    /// the clamp policy. Returns the offset actually stored.
    ///
    /// `bound` is the total action-row width; an unmeasured or empty row
    /// passes 0, which pins the panel at home.
    pub fn apply_drag(&self, dx: f64, bound: f64, policy: ClampPolicy) -> f64 {
        let candidate = dx + self.base();
        let applied = policy.apply(candidate, bound);
        self.set_absolute(applied);
        applied
    }

    /// The current offset clamped exactly into `[-bound, 0]`.
    ///
    /// Elastic overscroll is admitted only while a finger holds it; commit
    /// decisions read this re-clamped value.
    #[must_use]
    pub fn clamped_value(&self, bound: f64) -> f64 {
        self.value().clamp(-bound.max(0.0), 0.0)
    }

    /// Subscribe to offset changes. The callback receives each new value.
    ///
    /// Returns a guard; dropping it unsubscribes the callback.
    pub fn subscribe(&self, callback: impl Fn(f64) + 'static) -> OffsetSubscription {
        let strong: CallbackRc = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        OffsetSubscription { _guard: strong }
    }

    /// Number of registered subscribers (dead entries included until the
    /// next notification prunes them).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Notify live subscribers with a snapshot; prune dead ones.
    fn notify(&self, value: f64) {
        let callbacks: Vec<CallbackRc> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner.subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for cb in &callbacks {
            cb(value);
        }
    }
}

/// RAII guard for an offset subscriber.
///
/// Dropping the guard drops the only strong reference to the callback; the
/// `Weak` entry in the controller fails to upgrade on the next notification
/// and is pruned.
pub struct OffsetSubscription {
    _guard: CallbackRc,
}

impl std::fmt::Debug for OffsetSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffsetSubscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn starts_closed() {
        let offset = OffsetController::new();
        assert_eq!(offset.value(), 0.0);
        assert_eq!(offset.base(), 0.0);
        assert!(!offset.is_locked());
    }

    #[test]
    fn set_absolute_updates_value() {
        let offset = OffsetController::new();
        offset.set_absolute(-42.0);
        assert_eq!(offset.value(), -42.0);
    }

    #[test]
    fn clone_shares_state() {
        let a = OffsetController::new();
        let b = a.clone();
        a.set_absolute(-10.0);
        assert_eq!(b.value(), -10.0);
    }

    // --- Lock-in composition ---

    #[test]
    fn lock_in_freezes_current_value() {
        let offset = OffsetController::new();
        offset.set_absolute(-180.0);
        offset.lock_in();
        assert_eq!(offset.base(), -180.0);
        assert!(offset.is_locked());
    }

    #[test]
    fn drag_composes_with_base() {
        // Gesture starting from a revealed panel: base = -180, a rightward
        // drag of +60 lands at -120.
        let offset = OffsetController::new();
        offset.set_absolute(-180.0);
        offset.lock_in();

        let applied = offset.apply_drag(60.0, 200.0, ClampPolicy::Hard);
        assert_eq!(applied, -120.0);
        assert_eq!(offset.value(), -120.0);
    }

    #[test]
    fn drag_from_closed_has_zero_base() {
        let offset = OffsetController::new();
        offset.lock_in();
        assert_eq!(offset.apply_drag(-75.0, 200.0, ClampPolicy::Hard), -75.0);
    }

    #[test]
    fn unlock_retains_base_for_inspection() {
        let offset = OffsetController::new();
        offset.set_absolute(-30.0);
        offset.lock_in();
        offset.unlock();
        assert!(!offset.is_locked());
        assert_eq!(offset.base(), -30.0);
    }

    // --- Clamping ---

    #[test]
    fn rightward_drag_past_home_is_pinned() {
        let offset = OffsetController::new();
        offset.lock_in();
        assert_eq!(offset.apply_drag(35.0, 200.0, ClampPolicy::Hard), 0.0);
    }

    #[test]
    fn leftward_drag_past_reveal_is_pinned() {
        let offset = OffsetController::new();
        offset.lock_in();
        assert_eq!(offset.apply_drag(-260.0, 200.0, ClampPolicy::Hard), -200.0);
    }

    #[test]
    fn elastic_drag_overshoots_with_resistance() {
        let offset = OffsetController::new();
        offset.lock_in();
        let applied = offset.apply_drag(-260.0, 200.0, ClampPolicy::elastic(0.5));
        assert_eq!(applied, -230.0);
        // The overshoot never reaches a commit decision un-clamped.
        assert_eq!(offset.clamped_value(200.0), -200.0);
    }

    #[test]
    fn clamped_value_with_zero_bound() {
        let offset = OffsetController::new();
        offset.set_absolute(-50.0);
        assert_eq!(offset.clamped_value(0.0), 0.0);
    }

    // --- Observation ---

    #[test]
    fn subscribers_see_each_change() {
        let offset = OffsetController::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = offset.subscribe(move |v| sink.borrow_mut().push(v));

        offset.set_absolute(-10.0);
        offset.set_absolute(-20.0);
        assert_eq!(*seen.borrow(), vec![-10.0, -20.0]);
    }

    #[test]
    fn unchanged_value_does_not_notify() {
        let offset = OffsetController::new();
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let _sub = offset.subscribe(move |_| sink.set(sink.get() + 1));

        offset.set_absolute(-10.0);
        offset.set_absolute(-10.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let offset = OffsetController::new();
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let sub = offset.subscribe(move |_| sink.set(sink.get() + 1));

        offset.set_absolute(-10.0);
        drop(sub);
        offset.set_absolute(-20.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn dead_subscribers_pruned_on_notify() {
        let offset = OffsetController::new();
        let sub = offset.subscribe(|_| {});
        assert_eq!(offset.subscriber_count(), 1);

        drop(sub);
        offset.set_absolute(-5.0);
        assert_eq!(offset.subscriber_count(), 0);
    }

    #[test]
    fn value_is_current_during_notification() {
        // Correctness-critical reads must not depend on listener ordering:
        // by the time any subscriber runs, value() already returns the new
        // offset.
        let offset = OffsetController::new();
        let observed = Rc::new(Cell::new(f64::NAN));
        let handle = offset.clone();
        let sink = Rc::clone(&observed);
        let _sub = offset.subscribe(move |_| sink.set(handle.value()));

        offset.set_absolute(-66.0);
        assert_eq!(observed.get(), -66.0);
    }

    #[test]
    fn multiple_subscribers_notified_in_order() {
        let offset = OffsetController::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&order);
        let _a = offset.subscribe(move |_| first.borrow_mut().push("a"));
        let second = Rc::clone(&order);
        let _b = offset.subscribe(move |_| second.borrow_mut().push("b"));

        offset.set_absolute(-1.0);
        assert_eq!(*order.borrow(), vec!["a", "b"]);
    }
}
