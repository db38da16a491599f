#![forbid(unsafe_code)]

//! Swipe-to-reveal action panel built on `swipekit-core`.
//!
//! # Role in swipekit
//! `swipekit-panel` is the composition layer. It turns the core interaction
//! primitives into a host-facing component: [`SwipePanel`] owns one offset
//! controller, classifier, commit decider, and settle driver, holds the
//! ordered [`ActionSpec`] sequence, and coordinates with siblings through a
//! shared [`SwipeChannel`] so that at most one panel is revealed at a time.
//!
//! # Primary responsibilities
//! - **ActionSpec / ActionRow**: the button specifications and their
//!   derived row geometry (widths, screen offsets, hit testing).
//! - **SwipeChannel**: the "close others, I am opening" broadcast with
//!   RAII subscription lifetime.
//! - **SwipePanel**: gesture negotiation, drag tracking, commit, settle,
//!   and the per-frame render-input surface.
//!
//! The crate renders nothing and owns no event loop: the host feeds touch
//! samples, layout measurements, and frame deltas, and reads transforms and
//! button geometry back.

pub mod action;
pub mod broadcast;
pub mod geometry;
pub mod panel;

pub use action::{ActionRender, ActionRow, ActionSpec};
pub use broadcast::{ChannelSubscription, PanelId, SwipeChannel};
pub use geometry::PanelGeometry;
pub use panel::{PanelPhase, SwipePanel};

// Re-export the core types a host needs to drive a panel.
pub use swipekit_core::config::{ClampPolicy, SwipeConfig};
pub use swipekit_core::gesture::GestureSample;
