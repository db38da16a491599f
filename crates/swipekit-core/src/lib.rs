#![forbid(unsafe_code)]

//! Core: gesture classification, offset control, commit decisions, and
//! settle animation for swipe-to-reveal panels.
//!
//! # Role in swipekit
//! `swipekit-core` is the interaction primitive layer. It owns the claim
//! state machine, the observable horizontal offset with its clamp policies,
//! the hysteresis commit decision, and the interruptible settle driver.
//!
//! # Primary responsibilities
//! - **SwipeClassifier**: directional-dominance gesture claiming that
//!   refuses preemption.
//! - **OffsetController**: the single live offset, base lock-in for
//!   gestures starting mid-reveal, Hard/Elastic clamping, observation.
//! - **CommitDecider**: 25%/75% hysteresis with an optional fling override.
//! - **SettleDriver**: tick-pumped timing or spring trajectories,
//!   superseded rather than queued.
//!
//! # How it fits in the system
//! `swipekit-panel` composes these primitives into [`SwipePanel`] and adds
//! cross-panel coordination. Nothing in this crate knows about action
//! buttons, siblings, or rendering; the host feeds samples and frame deltas
//! and reads values back.
//!
//! [`SwipePanel`]: https://docs.rs/swipekit-panel

pub mod animation;
pub mod commit;
pub mod config;
pub mod gesture;
pub mod offset;

pub use animation::{Easing, SettleDriver, SettleMode, Spring, SpringParams, Timing};
pub use commit::CommitDecider;
pub use config::{ClampPolicy, SwipeConfig};
pub use gesture::{GestureSample, SwipeClassifier};
pub use offset::{OffsetController, OffsetSubscription};
