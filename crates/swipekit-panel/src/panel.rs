#![forbid(unsafe_code)]

//! The swipe panel: composition of classifier, offset, commit, settle, and
//! broadcast into one host-facing component.
//!
//! A [`SwipePanel`] owns one [`OffsetController`], one [`SwipeClassifier`],
//! one [`CommitDecider`], and one [`SettleDriver`], and optionally
//! subscribes to a [`SwipeChannel`] shared with its siblings. The host
//! wires its own event delivery into the negotiation surface:
//!
//! 1. per move sample, ask [`wants_gesture`](SwipePanel::wants_gesture);
//! 2. once claimed, feed samples to [`drag_to`](SwipePanel::drag_to);
//! 3. on touch-end, call [`release`](SwipePanel::release) (or
//!    [`gesture_cancelled`](SwipePanel::gesture_cancelled) if the host
//!    aborted delivery);
//! 4. every frame, pump [`tick`](SwipePanel::tick) and read
//!    [`translation`](SwipePanel::translation) /
//!    [`render_inputs`](SwipePanel::render_inputs).
//!
//! # State Machine
//!
//! `Idle → Dragging → Settling → Idle`. A new claim may arrive during
//! `Settling`; the in-flight settle is cancelled and the gesture re-bases
//! from the interpolated value. Claims are refused preemption for their
//! lifetime (see [`allows_termination`](SwipePanel::allows_termination)).
//!
//! # Invariants
//!
//! 1. At claim time the panel broadcasts "I am opening" exactly once, and
//!    the broadcast is fully processed (every sibling's force-close issued)
//!    before any of this panel's own move samples are.
//! 2. `is_revealed` changes only when a settle resolves — never mid-drag.
//! 3. The committed offset is always within `[-total_width, 0]`.
//! 4. [`close`](SwipePanel::close) on a closed panel at rest is a no-op:
//!    no animation starts and nothing is broadcast.
//! 5. Dropping the panel drops its channel subscription; a destroyed panel
//!    never acts on a broadcast.
//!
//! # Failure Modes
//!
//! - Gestures before the first layout measurement are rejected
//!   (`wants_gesture` is `false`) rather than producing geometry-less
//!   offsets.
//! - An empty action row is a zero-width reveal target: swipes claim but
//!   clamp to home, and every commit resolves to closed.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use swipekit_core::animation::SettleDriver;
use swipekit_core::commit::CommitDecider;
use swipekit_core::config::SwipeConfig;
use swipekit_core::gesture::{GestureSample, SwipeClassifier};
use swipekit_core::offset::{OffsetController, OffsetSubscription};

use crate::action::{ActionRender, ActionRow, ActionSpec};
use crate::broadcast::{ChannelSubscription, PanelId, SwipeChannel};
use crate::geometry::PanelGeometry;

// ---------------------------------------------------------------------------
// PanelPhase
// ---------------------------------------------------------------------------

/// Interaction phase of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPhase {
    /// At rest (closed or revealed), no gesture or animation in flight.
    #[default]
    Idle,
    /// A claimed gesture is moving the offset.
    Dragging,
    /// A settle animation is moving the offset to its committed target.
    Settling,
}

// ---------------------------------------------------------------------------
// Inner state
// ---------------------------------------------------------------------------

struct Inner<P> {
    config: SwipeConfig,
    row: ActionRow<P>,
    geometry: PanelGeometry,
    offset: OffsetController,
    classifier: SwipeClassifier,
    decider: CommitDecider,
    driver: SettleDriver,
    phase: PanelPhase,
    revealed: bool,
    pending_revealed: bool,
    channel: Option<(SwipeChannel, PanelId)>,
}

impl<P> Inner<P> {
    fn total_width(&self) -> f64 {
        self.row.total_width()
    }

    /// Begin settling toward the committed state.
    fn start_settle(&mut self, open: bool) {
        let bound = self.total_width();
        let target = if open { -bound } else { 0.0 };
        let from = self.offset.value();
        self.pending_revealed = open;

        if from == target {
            // Already there; commit without animating.
            self.finish_settle();
            return;
        }

        self.driver.animate_to(from, target, &self.config.settle);
        self.phase = PanelPhase::Settling;
    }

    /// A settle resolved (or was unnecessary): commit the pending state.
    fn finish_settle(&mut self) {
        self.revealed = self.pending_revealed;
        self.phase = PanelPhase::Idle;
        self.offset.unlock();
        #[cfg(feature = "tracing")]
        tracing::debug!(revealed = self.revealed, "panel settled");
    }

    /// Force the panel closed (broadcast receipt or programmatic close).
    ///
    /// Closes anything open-ish — committed-revealed, partially dragged, or
    /// settling toward open — so overlapping animations converge on the
    /// single-open invariant. Idempotent on a closed panel at rest.
    fn force_close(&mut self) {
        let at_rest_closed =
            !self.revealed && self.phase == PanelPhase::Idle && self.offset.value() == 0.0;
        if at_rest_closed {
            return;
        }
        self.classifier.reset();
        self.start_settle(false);
    }
}

// ---------------------------------------------------------------------------
// SwipePanel
// ---------------------------------------------------------------------------

/// A horizontally draggable panel revealing a row of action buttons.
pub struct SwipePanel<P = ()> {
    inner: Rc<RefCell<Inner<P>>>,
    /// Keeps the channel listener alive; dropped with the panel.
    subscription: Option<ChannelSubscription>,
}

impl<P> std::fmt::Debug for SwipePanel<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SwipePanel")
            .field("phase", &inner.phase)
            .field("revealed", &inner.revealed)
            .field("offset", &inner.offset.value())
            .field("actions", &inner.row.len())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

impl<P> SwipePanel<P> {
    /// Create a standalone panel (no sibling coordination).
    #[must_use]
    pub fn new(actions: Vec<ActionSpec<P>>, config: SwipeConfig) -> Self {
        let decider = match config.fling_velocity_threshold {
            Some(threshold) => CommitDecider::new().with_fling_threshold(threshold),
            None => CommitDecider::new(),
        };
        let inner = Inner {
            row: ActionRow::new(actions, config.action_button_default_width),
            classifier: SwipeClassifier::new(&config),
            decider,
            config,
            geometry: PanelGeometry::default(),
            offset: OffsetController::new(),
            driver: SettleDriver::new(),
            phase: PanelPhase::Idle,
            revealed: false,
            pending_revealed: false,
            channel: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
            subscription: None,
        }
    }

    // --- Host layout surface ---

    /// Consume a layout measurement. Fired by the host at least once before
    /// interaction becomes usable.
    pub fn set_geometry(&self, width: f64, height: f64) {
        self.inner.borrow_mut().geometry = PanelGeometry::new(width, height);
    }

    /// The current content geometry.
    #[must_use]
    pub fn geometry(&self) -> PanelGeometry {
        self.inner.borrow().geometry
    }

    /// Replace the action sequence for a new host render pass.
    pub fn set_actions(&self, actions: Vec<ActionSpec<P>>) {
        self.inner.borrow_mut().row.set_actions(actions);
    }

    /// Number of action buttons.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.inner.borrow().row.len()
    }

    // --- Capture negotiation ---

    /// Answer the host's "do you want this gesture?" for a move sample.
    ///
    /// Claiming cancels any in-flight settle (re-basing from the
    /// interpolated value), broadcasts "I am opening" to siblings, and locks
    /// in the base offset — in that order, exactly once per gesture. Before
    /// the first layout measurement every sample is declined.
    pub fn wants_gesture(&self, sample: GestureSample) -> bool {
        let granted = {
            let mut inner = self.inner.borrow_mut();
            if !inner.geometry.is_measured() {
                return false;
            }
            if inner.classifier.is_claimed() {
                return true;
            }
            if !inner.classifier.request_claim(sample) {
                return false;
            }
            let resumed = inner.driver.cancel();
            inner.phase = PanelPhase::Dragging;
            (resumed, inner.offset.clone(), inner.channel.clone())
        };

        // The panel borrow is released here: sibling force-closes run
        // against their own state, and offset observers may re-enter.
        let (resumed, offset, channel) = granted;
        if let Some(value) = resumed {
            offset.set_absolute(value);
        }
        if let Some((channel, id)) = channel {
            channel.notify_opening(id);
        }
        offset.lock_in();
        true
    }

    /// Answer a termination/preemption request from a competing recognizer.
    /// `false` for the lifetime of a claimed gesture.
    #[must_use]
    pub fn allows_termination(&self) -> bool {
        self.inner.borrow().classifier.allows_termination()
    }

    // --- Gesture stream ---

    /// Feed a move sample from a claimed gesture.
    pub fn drag_to(&self, sample: GestureSample) {
        let ctx = {
            let inner = self.inner.borrow();
            if !inner.classifier.is_claimed() {
                return;
            }
            (inner.offset.clone(), inner.total_width(), inner.config.clamp)
        };
        let (offset, bound, clamp) = ctx;
        offset.apply_drag(sample.dx, bound, clamp);
    }

    /// End the gesture, deciding and settling to the committed state.
    ///
    /// `vx` is the release velocity when the host can supply one; it only
    /// matters if the fling override is configured. The live offset is
    /// re-clamped into bounds before the decision is read.
    pub fn release(&self, vx: Option<f64>) {
        let mut inner = self.inner.borrow_mut();
        if !inner.classifier.is_claimed() {
            return;
        }
        inner.classifier.end_gesture();

        let bound = inner.total_width();
        let final_offset = inner.offset.clamped_value(bound);
        let open = inner
            .decider
            .decide_with_velocity(final_offset, inner.revealed, bound, vx);
        #[cfg(feature = "tracing")]
        tracing::debug!(final_offset, open, "gesture released");
        inner.start_settle(open);
    }

    /// The host aborted event delivery mid-gesture. Resolves through the
    /// same commit path as a release at the current offset.
    pub fn gesture_cancelled(&self) {
        self.release(None);
    }

    // --- Frame pump ---

    /// Advance any in-flight settle by `dt`, writing the interpolated value
    /// into the offset (observers fire every frame).
    pub fn tick(&self, dt: Duration) {
        let step = {
            let mut inner = self.inner.borrow_mut();
            match inner.driver.tick(dt) {
                Some(value) => {
                    let done = !inner.driver.is_animating();
                    Some((inner.offset.clone(), value, done))
                }
                None => None,
            }
        };
        let Some((offset, value, done)) = step else {
            return;
        };
        offset.set_absolute(value);
        if done {
            self.inner.borrow_mut().finish_settle();
        }
    }

    // --- Programmatic control ---

    /// Force the panel closed (host dismissal, e.g. "close all on scroll").
    ///
    /// Idempotent: a closed panel at rest starts no animation and sends no
    /// broadcast.
    pub fn close(&self) {
        self.inner.borrow_mut().force_close();
    }

    // --- State & render surface ---

    /// The last committed reveal state.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.inner.borrow().revealed
    }

    /// Whether a settle animation owns the offset right now.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.inner.borrow().phase == PanelPhase::Settling
    }

    /// Current interaction phase.
    #[must_use]
    pub fn phase(&self) -> PanelPhase {
        self.inner.borrow().phase
    }

    /// The raw live offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.inner.borrow().offset.value()
    }

    /// The live transform for the content view: the offset with extreme
    /// elastic overscroll mapped to a bounded extra translation (at most
    /// half the default button width past either boundary).
    #[must_use]
    pub fn translation(&self) -> f64 {
        let inner = self.inner.borrow();
        let bound = inner.total_width();
        let slack = inner.config.action_button_default_width / 2.0;
        inner.offset.value().clamp(-(bound + slack), slack)
    }

    /// Per-frame render inputs for the action buttons, in display order.
    /// Empty until the first layout measurement.
    #[must_use]
    pub fn render_inputs(&self) -> Vec<ActionRender> {
        let inner = self.inner.borrow();
        if !inner.geometry.is_measured() {
            return Vec::new();
        }
        inner.row.layout()
    }

    /// Map a tap coordinate (distance inward from the trailing edge) to an
    /// action index. Tap hit-testing itself is the host's responsibility;
    /// this supplies the geometry half.
    #[must_use]
    pub fn action_at(&self, x: f64) -> Option<usize> {
        self.inner.borrow().row.action_at(x)
    }

    /// Run the `on_invoke` callback of the action at `index`.
    ///
    /// The panel borrow is released before the callback runs, so an action
    /// may freely call back into its own panel (e.g. a dismiss action
    /// calling [`close`](SwipePanel::close)).
    pub fn invoke_action(&self, index: usize) -> bool {
        let callback = self.inner.borrow().row.callback(index);
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// This panel's identity on its coordination channel, if any.
    #[must_use]
    pub fn panel_id(&self) -> Option<PanelId> {
        self.inner.borrow().channel.as_ref().map(|(_, id)| *id)
    }

    /// Observe the live offset. The callback receives every new value;
    /// dropping the returned guard unsubscribes.
    pub fn subscribe_offset(&self, callback: impl Fn(f64) + 'static) -> OffsetSubscription {
        let offset = self.inner.borrow().offset.clone();
        offset.subscribe(callback)
    }
}

impl<P: 'static> SwipePanel<P> {
    /// Create a panel coordinated with siblings through `channel`.
    ///
    /// The subscription lives exactly as long as the panel: dropping the
    /// panel makes the listener unreachable before any later broadcast.
    #[must_use]
    pub fn with_channel(
        actions: Vec<ActionSpec<P>>,
        config: SwipeConfig,
        channel: &SwipeChannel,
    ) -> Self {
        let mut panel = Self::new(actions, config);
        let weak = Rc::downgrade(&panel.inner);
        let (id, subscription) = channel.subscribe(move |_origin| {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().force_close();
            }
        });
        panel.inner.borrow_mut().channel = Some((channel.clone(), id));
        panel.subscription = Some(subscription);
        panel
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
