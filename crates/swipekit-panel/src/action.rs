#![forbid(unsafe_code)]

//! Action buttons: the row revealed behind the panel content.
//!
//! [`ActionSpec`] describes one button: its label, an opaque presentation
//! payload the engine never interprets, an optional width, and the callback
//! to run when the host reports a tap on it. A panel holds an ordered
//! sequence of specs; insertion order is display order, laid out inward
//! from the panel's trailing edge.
//!
//! [`ActionRow`] derives the geometry the host renders from: per-action
//! screen offsets (the cumulative sum of preceding widths), the total row
//! width that bounds the reveal, and a hit test for tap routing. Sums are
//! recomputed from the specs on demand — never cached across a live
//! gesture.

use std::rc::Rc;

use swipekit_core::config::DEFAULT_ACTION_BUTTON_WIDTH;

// ---------------------------------------------------------------------------
// ActionSpec
// ---------------------------------------------------------------------------

/// One action button behind the panel content.
///
/// The payload type `P` carries host presentation data (colors, icons,
/// styles); the engine stores and returns it untouched.
pub struct ActionSpec<P = ()> {
    /// Button label.
    pub text: String,
    /// Opaque presentation payload.
    pub payload: P,
    /// Button width; `None` (or non-positive) falls back to the row default.
    pub width: Option<f64>,
    on_invoke: Option<Rc<dyn Fn()>>,
}

impl ActionSpec {
    /// Create an action with no payload, default width, and no callback.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: (),
            width: None,
            on_invoke: None,
        }
    }
}

impl<P> ActionSpec<P> {
    /// Attach a presentation payload, replacing the payload type.
    #[must_use]
    pub fn with_payload<Q>(self, payload: Q) -> ActionSpec<Q> {
        ActionSpec {
            text: self.text,
            payload,
            width: self.width,
            on_invoke: self.on_invoke,
        }
    }

    /// Set an explicit width.
    #[must_use]
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the tap callback.
    #[must_use]
    pub fn on_invoke(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_invoke = Some(Rc::new(callback));
        self
    }

    /// The width this action renders at, given the row default.
    ///
    /// Non-positive explicit widths degrade to the default rather than
    /// producing inverted layout.
    #[must_use]
    pub fn resolved_width(&self, default: f64) -> f64 {
        match self.width {
            Some(w) if w > 0.0 => w,
            _ => default,
        }
    }

    /// Run the tap callback. Returns `false` if none was set.
    pub fn invoke(&self) -> bool {
        match &self.on_invoke {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// A shared handle to the tap callback, for callers that must release
    /// their own borrows before running it.
    #[must_use]
    pub fn callback(&self) -> Option<Rc<dyn Fn()>> {
        self.on_invoke.clone()
    }
}

impl<P: Clone> Clone for ActionSpec<P> {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            payload: self.payload.clone(),
            width: self.width,
            on_invoke: self.on_invoke.clone(),
        }
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for ActionSpec<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSpec")
            .field("text", &self.text)
            .field("payload", &self.payload)
            .field("width", &self.width)
            .field("has_on_invoke", &self.on_invoke.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ActionRender
// ---------------------------------------------------------------------------

/// Per-frame render input for one action button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionRender {
    /// Index into the panel's action sequence.
    pub index: usize,
    /// Distance of the button's near edge inward from the panel's trailing
    /// edge (cumulative sum of preceding widths).
    pub screen_offset: f64,
    /// Resolved button width.
    pub width: f64,
}

// ---------------------------------------------------------------------------
// ActionRow
// ---------------------------------------------------------------------------

/// The ordered action sequence plus its derived row geometry.
pub struct ActionRow<P = ()> {
    actions: Vec<ActionSpec<P>>,
    default_width: f64,
}

impl<P> ActionRow<P> {
    /// Create a row. A non-positive `default_width` falls back to
    /// [`DEFAULT_ACTION_BUTTON_WIDTH`].
    #[must_use]
    pub fn new(actions: Vec<ActionSpec<P>>, default_width: f64) -> Self {
        Self {
            actions,
            default_width: if default_width > 0.0 {
                default_width
            } else {
                DEFAULT_ACTION_BUTTON_WIDTH
            },
        }
    }

    /// Replace the action sequence (host render pass supplied a new one).
    pub fn set_actions(&mut self, actions: Vec<ActionSpec<P>>) {
        self.actions = actions;
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the row has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The action at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ActionSpec<P>> {
        self.actions.get(index)
    }

    /// Iterate the specs in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionSpec<P>> {
        self.actions.iter()
    }

    /// Total row width: the sum of resolved widths. Zero for an empty row.
    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.actions
            .iter()
            .map(|a| a.resolved_width(self.default_width))
            .sum()
    }

    /// Render inputs in display order; each screen offset is the cumulative
    /// sum of the preceding widths.
    #[must_use]
    pub fn layout(&self) -> Vec<ActionRender> {
        let mut offset = 0.0;
        self.actions
            .iter()
            .enumerate()
            .map(|(index, action)| {
                let width = action.resolved_width(self.default_width);
                let render = ActionRender {
                    index,
                    screen_offset: offset,
                    width,
                };
                offset += width;
                render
            })
            .collect()
    }

    /// Map a tap coordinate (distance inward from the trailing edge) to an
    /// action index.
    #[must_use]
    pub fn action_at(&self, x: f64) -> Option<usize> {
        if x < 0.0 {
            return None;
        }
        self.layout()
            .into_iter()
            .find(|r| x >= r.screen_offset && x < r.screen_offset + r.width)
            .map(|r| r.index)
    }

    /// Run the callback of the action at `index`. Returns `false` when the
    /// index is out of range or the action has no callback.
    pub fn invoke(&self, index: usize) -> bool {
        self.actions.get(index).is_some_and(ActionSpec::invoke)
    }

    /// The callback handle of the action at `index`, if both exist.
    #[must_use]
    pub fn callback(&self, index: usize) -> Option<Rc<dyn Fn()>> {
        self.actions.get(index).and_then(ActionSpec::callback)
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for ActionRow<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRow")
            .field("actions", &self.actions)
            .field("default_width", &self.default_width)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
