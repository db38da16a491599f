#![forbid(unsafe_code)]

//! Cross-panel coordination: the "close others, I am opening" channel.
//!
//! [`SwipeChannel`] is an explicitly injected pub/sub channel — there is no
//! ambient global. Each panel subscribes at creation and receives a
//! [`PanelId`] plus an RAII [`ChannelSubscription`] guard; dropping the
//! guard (which the panel does on destruction) makes the listener
//! unreachable, so a destroyed panel can never receive or act on a
//! broadcast. Teardown safety is structural, not a liveness check at call
//! time.
//!
//! [`notify_opening`](SwipeChannel::notify_opening) delivers to every live
//! subscriber except the originator. Delivery iterates a snapshot of the
//! subscriber list taken before any listener runs, so a listener
//! unsubscribing (or a panel being torn down) mid-delivery cannot skip or
//! duplicate notifications.
//!
//! This channel is what enforces the system-wide invariant that at most one
//! panel is revealed at any quiescent moment.
//!
//! # Invariants
//!
//! 1. The originator never receives its own broadcast.
//! 2. Listener callbacks run in subscription order.
//! 3. Dead listeners (dropped guards) are pruned lazily during delivery.
//! 4. `PanelId`s are unique per channel and never reused.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type ListenerRc = Rc<dyn Fn(PanelId)>;
type ListenerWeak = Weak<dyn Fn(PanelId)>;

// ---------------------------------------------------------------------------
// PanelId
// ---------------------------------------------------------------------------

/// Stable identity of one panel on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(u64);

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "panel#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SwipeChannel
// ---------------------------------------------------------------------------

struct ChannelInner {
    next_id: u64,
    subscribers: Vec<(PanelId, ListenerWeak)>,
}

/// Shared coordination channel for a group of sibling panels.
///
/// Cloning a `SwipeChannel` creates a second handle to the **same** channel.
pub struct SwipeChannel {
    inner: Rc<RefCell<ChannelInner>>,
}

impl Clone for SwipeChannel {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for SwipeChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SwipeChannel")
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl Default for SwipeChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SwipeChannel {
    /// Create an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                next_id: 1,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Subscribe a listener, allocating a fresh [`PanelId`].
    ///
    /// The listener receives the originator's id for each broadcast it was
    /// not exempted from. Dropping the returned guard unsubscribes.
    pub fn subscribe(
        &self,
        listener: impl Fn(PanelId) + 'static,
    ) -> (PanelId, ChannelSubscription) {
        let strong: ListenerRc = Rc::new(listener);
        let weak = Rc::downgrade(&strong);

        let mut inner = self.inner.borrow_mut();
        let id = PanelId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, weak));

        (id, ChannelSubscription { _guard: strong })
    }

    /// Broadcast "I am opening" to every live subscriber except `self_id`.
    ///
    /// Listeners run synchronously, after the subscriber list has been
    /// snapshotted and released, so re-entrant subscription changes are
    /// safe.
    pub fn notify_opening(&self, self_id: PanelId) {
        let listeners: Vec<(PanelId, ListenerRc)> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|(_, w)| w.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter(|(id, _)| *id != self_id)
                .filter_map(|(id, w)| w.upgrade().map(|rc| (*id, rc)))
                .collect()
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(%self_id, siblings = listeners.len(), "broadcasting open");

        for (_, listener) in &listeners {
            listener(self_id);
        }
    }

    /// Number of registered subscribers (dead entries included until the
    /// next broadcast prunes them).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// RAII guard for a channel listener.
///
/// Dropping the guard drops the only strong reference to the listener; the
/// channel's `Weak` entry fails to upgrade on the next broadcast and is
/// pruned.
pub struct ChannelSubscription {
    _guard: ListenerRc,
}

impl std::fmt::Debug for ChannelSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSubscription").finish_non_exhaustive()
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
    fn ids_are_unique() {
        let channel = SwipeChannel::new();
        let (a, _ga) = channel.subscribe(|_| {});
        let (b, _gb) = channel.subscribe(|_| {});
        assert_ne!(a, b);
    }

    #[test]
    fn broadcast_reaches_siblings_not_self() {
        let channel = SwipeChannel::new();

        let a_hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&a_hits);
        let (a, _ga) = channel.subscribe(move |_| sink.set(sink.get() + 1));

        let b_hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&b_hits);
        let (_b, _gb) = channel.subscribe(move |_| sink.set(sink.get() + 1));

        channel.notify_opening(a);
        assert_eq!(a_hits.get(), 0);
        assert_eq!(b_hits.get(), 1);
    }

    #[test]
    fn listener_receives_originator_id() {
        let channel = SwipeChannel::new();
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let (_a, _ga) = channel.subscribe(move |origin| sink.set(Some(origin)));
        let (b, _gb) = channel.subscribe(|_| {});

        channel.notify_opening(b);
        assert_eq!(seen.get(), Some(b));
    }

    #[test]
    fn dropped_guard_stops_delivery() {
        let channel = SwipeChannel::new();
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        let (_a, guard) = channel.subscribe(move |_| sink.set(sink.get() + 1));
        let (b, _gb) = channel.subscribe(|_| {});

        channel.notify_opening(b);
        assert_eq!(hits.get(), 1);

        drop(guard);
        channel.notify_opening(b);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dead_listeners_pruned_on_broadcast() {
        let channel = SwipeChannel::new();
        let (_a, guard) = channel.subscribe(|_| {});
        let (b, _gb) = channel.subscribe(|_| {});
        assert_eq!(channel.subscriber_count(), 2);

        drop(guard);
        channel.notify_opening(b);
        assert_eq!(channel.subscriber_count(), 1);
    }

    #[test]
    fn unsubscribe_during_delivery_is_safe() {
        // A listener dropping another subscription guard mid-broadcast must
        // not skip or duplicate notifications: delivery uses a snapshot.
        let channel = SwipeChannel::new();

        let victim_guard: Rc<RefCell<Option<ChannelSubscription>>> = Rc::new(RefCell::new(None));

        let slot = Rc::clone(&victim_guard);
        let (_killer, _gk) = channel.subscribe(move |_| {
            slot.borrow_mut().take();
        });

        let victim_hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&victim_hits);
        let (_victim, gv) = channel.subscribe(move |_| sink.set(sink.get() + 1));
        *victim_guard.borrow_mut() = Some(gv);

        let (origin, _go) = channel.subscribe(|_| {});

        // The victim was live when the snapshot was taken, so it is still
        // notified this round.
        channel.notify_opening(origin);
        assert_eq!(victim_hits.get(), 1);

        // Next round it is gone.
        channel.notify_opening(origin);
        assert_eq!(victim_hits.get(), 1);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let channel = SwipeChannel::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&order);
        let (_a, _ga) = channel.subscribe(move |_| first.borrow_mut().push(1));
        let second = Rc::clone(&order);
        let (_b, _gb) = channel.subscribe(move |_| second.borrow_mut().push(2));
        let (c, _gc) = channel.subscribe(|_| {});

        channel.notify_opening(c);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn clone_shares_channel() {
        let channel = SwipeChannel::new();
        let alias = channel.clone();

        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        let (_a, _ga) = channel.subscribe(move |_| sink.set(sink.get() + 1));
        let (b, _gb) = alias.subscribe(|_| {});

        alias.notify_opening(b);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn display_format() {
        let channel = SwipeChannel::new();
        let (id, _g) = channel.subscribe(|_| {});
        assert_eq!(format!("{id}"), "panel#1");
    }
}
