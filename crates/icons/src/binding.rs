//! Per-item icon binding
//!
//! One binding per visible grid item. The binding resolves the icon through
//! the cheapest available path (supplied payload, cache, scheduled fetch),
//! exposes the result as a reactive [`IconState`], and reacts to visibility
//! changes: hiding cancels a pending fetch, re-showing re-issues it.
//!
//! Bindings must be released (or dropped) on item teardown; nothing of a
//! destroyed binding is retained by the subsystem.

use launcher_icon_cache::{IconKey, IconPayload};
use launcher_icon_scheduler::{
    CancellationToken, FetchScheduler, GateTransition, ItemBounds, Viewport, VisibilityGate,
};
use log::debug;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Priority used for icon fetches issued by bindings.
///
/// A single elevated band: icons are always urgent relative to anything else
/// this scheduler might be asked to do, and the scheduler supports finer
/// differentiation if a future caller needs it.
pub const ICON_FETCH_PRIORITY: i32 = 10;

/// What the rendering layer should draw for an item right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconState {
    /// No icon (yet); render the placeholder glyph.
    Placeholder,

    /// Icon resolved.
    Ready(IconPayload),
}

impl IconState {
    /// Whether an icon payload is available.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The resolved payload, if any.
    pub fn payload(&self) -> Option<&IconPayload> {
        match self {
            Self::Ready(payload) => Some(payload),
            Self::Placeholder => None,
        }
    }
}

/// An issued fetch the binding is currently listening to.
struct ActiveFetch {
    token: CancellationToken,
    listener: JoinHandle<()>,
}

struct BindingInner {
    gate: VisibilityGate,
    fetch: Option<ActiveFetch>,

    /// Set when no fetch will ever be needed (supplied payload, synthetic
    /// key) or after release.
    inert: bool,
}

/// Reactive icon handle for one launcher grid item.
///
/// Created once per visible item and released on teardown. Must be created
/// from within a Tokio runtime, since fetch listeners run as spawned tasks.
///
/// # Example
///
/// ```no_run
/// use launcher_icons::{IconBinding, IconKey, IconState};
/// # fn demo(scheduler: std::sync::Arc<launcher_icons::FetchScheduler>) {
/// let binding = IconBinding::bind(
///     scheduler,
///     IconKey::path("/Applications/Safari.app"),
///     None,
/// );
///
/// match binding.current() {
///     IconState::Ready(payload) => println!("draw {payload}"),
///     IconState::Placeholder => println!("draw the first-letter glyph"),
/// }
/// # }
/// ```
pub struct IconBinding {
    key: IconKey,
    scheduler: Arc<FetchScheduler>,
    state: Arc<watch::Sender<IconState>>,
    inner: Mutex<BindingInner>,
}

impl IconBinding {
    /// Bind an item to its icon.
    ///
    /// Short-circuits, in order: a non-empty `known_payload` is used directly
    /// and no fetch is ever issued; a synthetic key always yields the
    /// placeholder; a cached icon is returned with zero latency. Otherwise a
    /// fetch is requested immediately (items start visible) at
    /// [`ICON_FETCH_PRIORITY`].
    pub fn bind(
        scheduler: Arc<FetchScheduler>,
        key: IconKey,
        known_payload: Option<IconPayload>,
    ) -> Self {
        let known = known_payload.filter(|payload| !payload.is_empty());
        let initial = match &known {
            Some(payload) => IconState::Ready(payload.clone()),
            None => IconState::Placeholder,
        };
        let inert = known.is_some() || !key.is_fetchable();

        let binding = Self {
            key,
            scheduler,
            state: Arc::new(watch::channel(initial).0),
            inner: Mutex::new(BindingInner {
                gate: VisibilityGate::new(),
                fetch: None,
                inert,
            }),
        };

        if !inert {
            if let Some(payload) = binding.scheduler.cache().get(&binding.key) {
                binding.state.send_replace(IconState::Ready(payload));
            } else {
                let mut inner = binding.inner.lock().unwrap();
                if inner.gate.is_active() {
                    binding.ensure_fetch(&mut inner);
                }
            }
        }

        binding
    }

    /// The item this binding resolves an icon for.
    pub fn key(&self) -> &IconKey {
        &self.key
    }

    /// Current icon state.
    pub fn current(&self) -> IconState {
        self.state.borrow().clone()
    }

    /// Subscribe to icon state changes.
    pub fn subscribe(&self) -> watch::Receiver<IconState> {
        self.state.subscribe()
    }

    /// Whether the item currently counts as visible.
    pub fn is_visible(&self) -> bool {
        self.inner.lock().unwrap().gate.is_active()
    }

    /// Record a direct visibility observation (e.g. from the scroll
    /// container's own intersection tracking).
    pub fn set_visible(&self, visible: bool) {
        let mut inner = self.inner.lock().unwrap();
        let transition = inner.gate.observe(visible);
        self.apply_transition(&mut inner, transition);
    }

    /// Re-evaluate visibility from the item's geometry.
    pub fn update_visibility(&self, viewport: &Viewport, bounds: &ItemBounds) {
        let mut inner = self.inner.lock().unwrap();
        let transition = inner.gate.update(viewport, bounds);
        self.apply_transition(&mut inner, transition);
    }

    /// Release the binding on item teardown.
    ///
    /// Cancels a not-yet-dispatched fetch and stops listening to a
    /// dispatched one; the dispatched fetch still completes and still
    /// populates the shared cache for other interested callers.
    pub fn release(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.inert = true;
        self.cancel_fetch(&mut inner);
    }

    fn apply_transition(&self, inner: &mut BindingInner, transition: Option<GateTransition>) {
        match transition {
            Some(GateTransition::BecameHidden) => {
                debug!("icon binding for {} left view", self.key);
                self.cancel_fetch(inner);
            }
            Some(GateTransition::BecameVisible) => self.ensure_fetch(inner),
            None => {}
        }
    }

    /// Issue a fetch if one is still wanted and none is outstanding.
    fn ensure_fetch(&self, inner: &mut BindingInner) {
        if inner.inert || inner.fetch.is_some() || self.state.borrow().is_ready() {
            return;
        }

        let request = self.scheduler.request(self.key.clone(), ICON_FETCH_PRIORITY);
        let token = request.cancellation_token();
        let state = Arc::clone(&self.state);
        let listener = tokio::spawn(async move {
            // An absent outcome keeps the placeholder; a hide/show cycle
            // will retry it.
            if let Some(payload) = request.outcome().await {
                state.send_replace(IconState::Ready(payload));
            }
        });

        inner.fetch = Some(ActiveFetch { token, listener });
    }

    fn cancel_fetch(&self, inner: &mut BindingInner) {
        if let Some(fetch) = inner.fetch.take() {
            fetch.token.cancel();
            fetch.listener.abort();
        }
    }
}

impl Drop for IconBinding {
    fn drop(&mut self) {
        self.release();
    }
}
