//! Viewport visibility gating
//!
//! Fetching an icon for every item in the launcher grid at once would flood
//! the backend, so fetches are gated on visibility: an item's request is
//! active only while its bounds intersect the scrollable viewport, widened by
//! a margin along the scroll axis so fetches begin slightly before the item
//! actually appears.
//!
//! [`Viewport`] is pure geometry; [`VisibilityGate`] turns successive
//! observations into the edge transitions the binding reacts to (cancel on
//! hide, re-request on show).

/// Default margin, in pixels, by which the viewport is widened along the
/// scroll axis. Items within this band start fetching before they scroll
/// into view.
pub const DEFAULT_VIEWPORT_MARGIN: f32 = 240.0;

/// Placement of one grid item, in the same coordinate space as the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds {
    /// Left edge
    pub x: f32,

    /// Top edge
    pub y: f32,

    /// Width in pixels
    pub width: f32,

    /// Height in pixels
    pub height: f32,
}

impl ItemBounds {
    /// Create new item bounds.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Visible region of the scrollable grid container.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Left edge of the visible region
    pub x: f32,

    /// Top edge of the visible region
    pub y: f32,

    /// Width of the visible region
    pub width: f32,

    /// Height of the visible region
    pub height: f32,

    /// Extra band above and below the visible region that still counts as
    /// visible, so fetches lead the scroll position.
    pub margin: f32,
}

impl Viewport {
    /// Create a viewport with the default prefetch margin.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            margin: DEFAULT_VIEWPORT_MARGIN,
        }
    }

    /// Set the prefetch margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Move the viewport origin, keeping its size and margin.
    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Check whether `bounds` intersects the margin-widened viewport.
    ///
    /// The margin widens the vertical extent only; the grid scrolls
    /// vertically, so horizontal overscan would never pay for itself.
    pub fn intersects(&self, bounds: &ItemBounds) -> bool {
        let top = self.y - self.margin;
        let bottom = self.y + self.height + self.margin;
        let left = self.x;
        let right = self.x + self.width;

        bounds.x + bounds.width > left
            && bounds.x < right
            && bounds.y + bounds.height > top
            && bounds.y < bottom
    }
}

/// Edge reported by a [`VisibilityGate`] when an item's visibility changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    /// The item entered the (margin-widened) viewport; a fetch should be
    /// (re-)issued if the icon is still wanted.
    BecameVisible,

    /// The item left the viewport; a pending fetch should be cancelled.
    BecameHidden,
}

/// Per-item visibility tracker.
///
/// Observation starts when the bound item is created and stops when it is
/// destroyed. Items start active so the first paint is never blocked waiting
/// for a scroll event to arm them.
#[derive(Debug)]
pub struct VisibilityGate {
    active: bool,
}

impl VisibilityGate {
    pub fn new() -> Self {
        Self { active: true }
    }

    /// Whether the item currently counts as visible.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Record a direct visibility observation, returning the transition edge
    /// if the level changed.
    pub fn observe(&mut self, visible: bool) -> Option<GateTransition> {
        if visible == self.active {
            return None;
        }
        self.active = visible;
        if visible {
            Some(GateTransition::BecameVisible)
        } else {
            Some(GateTransition::BecameHidden)
        }
    }

    /// Observe the item's intersection with the viewport.
    pub fn update(&mut self, viewport: &Viewport, bounds: &ItemBounds) -> Option<GateTransition> {
        self.observe(viewport.intersects(bounds))
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new()
    }
}
