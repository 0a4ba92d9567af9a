//! Preview runtime.
//!
//! Invariants:
//! - at most one request is pending; completions carrying any other token are ignored;
//! - the height loop has exactly one frame queued from construction until teardown;
//! - events are emitted only after the state borrow is released, so listeners may call
//!   back into the preview (including `destroy`).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::PreviewConfig;
use crate::core::emitter::{EventChannel, ListenerId};
use crate::core::endpoint::preview_url;
use crate::core::event::{EventKind, PreviewEvent, RequestTarget};
use crate::core::host::{AnchorId, HostDocument, PopupId};
use crate::core::scheduler::{FrameHandle, Scheduler, TimerHandle};
use crate::core::surface::{
    RenderSurface, SurfaceBody, SurfaceDocument, SurfaceWindow, BLANK_LOCATION,
    WARNING_MARKER_ID,
};
use crate::core::token::{CallbackRegistry, RequestToken};
use crate::render::overlay::trigger_rect;
use crate::widgets::warning::WarningOverlay;

static NEXT_PREVIEW_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Load,
    Timeout,
}

struct PendingRequest {
    token: RequestToken,
    target: RequestTarget,
    timer: TimerHandle,
}

struct PreviewState {
    surface: Box<dyn RenderSurface>,
    host: Box<dyn HostDocument>,
    height: u32,
    pending: Option<PendingRequest>,
    height_loop: Option<FrameHandle>,
    warning: WarningOverlay,
    destroyed: bool,
}

struct PreviewInner {
    id: u64,
    config: PreviewConfig,
    scheduler: Rc<dyn Scheduler>,
    registry: CallbackRegistry,
    events: EventChannel,
    state: RefCell<PreviewState>,
}

/// Live preview of embedded media inside an isolated render surface.
///
/// Cloning yields another handle to the same preview.
#[derive(Clone)]
pub struct Preview {
    inner: Rc<PreviewInner>,
}

impl Preview {
    /// Creates a preview that owns `surface` and starts its height loop.
    pub fn new(
        config: PreviewConfig,
        scheduler: Rc<dyn Scheduler>,
        registry: CallbackRegistry,
        surface: Box<dyn RenderSurface>,
        host: Box<dyn HostDocument>,
    ) -> Self {
        let inner = Rc::new(PreviewInner {
            id: NEXT_PREVIEW_ID.fetch_add(1, Ordering::Relaxed),
            config,
            scheduler,
            registry,
            events: EventChannel::new(),
            state: RefCell::new(PreviewState {
                surface,
                host,
                height: 0,
                pending: None,
                height_loop: None,
                warning: WarningOverlay::default(),
                destroyed: false,
            }),
        });

        {
            let mut state = inner.state.borrow_mut();
            inner.schedule_height_tick(&mut state);
        }
        tracing::debug!(preview = inner.id, "preview created");

        Self { inner }
    }

    /// Process-unique instance id, used in log fields.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn set_url(&self, url: impl Into<String>, timeout: Option<Duration>) {
        self.request(Some(RequestTarget::Url(url.into())), timeout);
    }

    pub fn set_asset_id(&self, asset_id: u64, timeout: Option<Duration>) {
        self.request(Some(RequestTarget::AssetId(asset_id)), timeout);
    }

    /// Requests a render of `target`, superseding any pending request.
    ///
    /// An absent or empty target navigates to a blank page without arming a timer.
    pub fn request(&self, target: Option<RequestTarget>, timeout: Option<Duration>) {
        self.inner.request(target, timeout);
    }

    /// Clears the preview.
    pub fn clear(&self) {
        self.request(None, None);
    }

    pub fn get_window(&self) -> Option<SurfaceWindow> {
        self.inner.read_surface(|surface| surface.window())
    }

    pub fn get_document(&self) -> Option<SurfaceDocument> {
        self.inner.read_surface(|surface| surface.document())
    }

    pub fn get_body(&self) -> Option<SurfaceBody> {
        self.inner.read_surface(|surface| surface.body())
    }

    /// Last content height observed by the height loop.
    pub fn get_height(&self) -> u32 {
        self.inner.state.borrow().height
    }

    /// Token of the in-flight request, if any.
    pub fn pending_token(&self) -> Option<RequestToken> {
        self.inner
            .state
            .borrow()
            .pending
            .as_ref()
            .map(|pending| pending.token.clone())
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.state.borrow().destroyed
    }

    /// Shows the trust-warning popup over the `#warning` marker. No-op without a marker.
    pub fn show_warning(&self) {
        self.inner.show_warning();
    }

    /// Hides the trust-warning popup and its anchor. Hosts call this when the user
    /// dismisses the popup on their side.
    pub fn dismiss_warning(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.destroyed {
            return;
        }
        let PreviewState { host, warning, .. } = &mut *state;
        warning.hide(host.as_mut());
    }

    pub fn warning_anchor(&self) -> Option<AnchorId> {
        self.inner.state.borrow().warning.anchor()
    }

    pub fn warning_popup(&self) -> Option<PopupId> {
        self.inner.state.borrow().warning.popup()
    }

    pub fn is_warning_visible(&self) -> bool {
        self.inner.state.borrow().warning.is_visible()
    }

    pub fn on(&self, kind: EventKind, listener: impl FnMut(&PreviewEvent) + 'static) -> ListenerId {
        self.inner.events.on(kind, listener)
    }

    pub fn on_any(&self, listener: impl FnMut(&PreviewEvent) + 'static) -> ListenerId {
        self.inner.events.on_any(listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.events.off(id)
    }

    /// Releases the surface, warning UI, frame loop and pending timer, then emits `destroy`.
    ///
    /// Listeners are dropped after the `destroy` event. Later calls are no-ops.
    pub fn destroy(&self) {
        self.inner.destroy();
    }
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Preview")
            .field("id", &self.inner.id)
            .field("height", &state.height)
            .field(
                "pending_token",
                &state.pending.as_ref().map(|pending| pending.token.as_str()),
            )
            .field("destroyed", &state.destroyed)
            .finish()
    }
}

impl PreviewInner {
    fn request(self: &Rc<Self>, target: Option<RequestTarget>, timeout: Option<Duration>) {
        let timeout = timeout
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(self.config.default_timeout);
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        if state.surface.window().is_none() {
            tracing::debug!(preview = self.id, "surface has no window; request skipped");
            return;
        }

        if let Some(previous) = state.pending.take() {
            self.scheduler.clear_timeout(previous.timer);
            self.registry.remove(&previous.token);
            tracing::debug!(
                preview = self.id,
                token = %previous.token,
                target = %previous.target,
                "pending request superseded"
            );
        }

        let Some(target) = target.filter(|target| !target.is_empty()) else {
            tracing::debug!(preview = self.id, "clearing preview");
            state.surface.navigate(BLANK_LOCATION);
            return;
        };

        let token = RequestToken::generate();
        let location = preview_url(
            &self.config.action_url,
            &target,
            &token,
            &self.config.parameters,
        );

        let weak = Rc::downgrade(self);
        let load_token = token.clone();
        self.registry.register(token.clone(), move || {
            if let Some(inner) = weak.upgrade() {
                inner.complete(&load_token, Completion::Load);
            }
        });

        let weak = Rc::downgrade(self);
        let timeout_token = token.clone();
        let timer = self.scheduler.set_timeout(
            timeout,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.complete(&timeout_token, Completion::Timeout);
                }
            }),
        );

        tracing::debug!(
            preview = self.id,
            token = %token,
            target = %target,
            timeout_ms = timeout.as_millis() as u64,
            "requesting preview render"
        );
        state.pending = Some(PendingRequest {
            token,
            target,
            timer,
        });
        state.surface.navigate(location.as_str());
    }

    fn complete(self: &Rc<Self>, token: &RequestToken, completion: Completion) {
        let event = {
            let mut state = self.state.borrow_mut();
            if state.destroyed {
                return;
            }

            let pending = match state.pending.take() {
                Some(pending) if &pending.token == token => pending,
                other => {
                    state.pending = other;
                    tracing::debug!(
                        preview = self.id,
                        %token,
                        ?completion,
                        "ignoring stale completion"
                    );
                    return;
                }
            };

            self.scheduler.clear_timeout(pending.timer);
            self.registry.remove(&pending.token);
            tracing::debug!(
                preview = self.id,
                %token,
                target = %pending.target,
                ?completion,
                "preview request completed"
            );

            match completion {
                Completion::Load => {
                    self.bind_warning_marker(&mut state);
                    PreviewEvent::Load {
                        target: pending.target,
                    }
                }
                Completion::Timeout => PreviewEvent::Timeout {
                    target: pending.target,
                },
            }
        };

        self.events.emit(&event);
    }

    fn bind_warning_marker(self: &Rc<Self>, state: &mut PreviewState) {
        if state.surface.find_element(WARNING_MARKER_ID).is_none() {
            return;
        }

        let weak = Rc::downgrade(self);
        let bound = state.surface.bind_click(
            WARNING_MARKER_ID,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.show_warning();
                }
            }),
        );
        tracing::debug!(preview = self.id, bound, "warning marker present");
    }

    fn schedule_height_tick(self: &Rc<Self>, state: &mut PreviewState) {
        let weak = Rc::downgrade(self);
        let handle = self.scheduler.request_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.tick_height();
            }
        }));
        state.height_loop = Some(handle);
    }

    fn tick_height(self: &Rc<Self>) {
        let event = {
            let mut state = self.state.borrow_mut();
            if state.destroyed {
                return;
            }

            let height = state.surface.body().map_or(0, |body| body.height);
            let event = if height != state.height {
                let prev_height = state.height;
                state.height = height;
                Some(PreviewEvent::Resize {
                    prev_height,
                    height,
                })
            } else {
                None
            };

            self.schedule_height_tick(&mut state);
            event
        };

        if let Some(event) = event {
            tracing::trace!(preview = self.id, ?event, "content height changed");
            self.events.emit(&event);
        }
    }

    fn show_warning(&self) {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        let Some(marker) = state.surface.find_element(WARNING_MARKER_ID) else {
            return;
        };

        let frame_offset = state.surface.frame_offset();
        let frame_scroll = state.surface.window().map_or(0.0, |window| window.scroll_top);
        let rect = trigger_rect(frame_offset, frame_scroll, marker);
        tracing::debug!(preview = self.id, ?rect, "showing trust warning");

        let PreviewState { host, warning, .. } = &mut *state;
        warning.show(host.as_mut(), rect, &self.config.warning_message);
    }

    fn read_surface<T>(&self, read: impl FnOnce(&dyn RenderSurface) -> Option<T>) -> Option<T> {
        let state = self.state.borrow();
        if state.destroyed {
            return None;
        }
        read(state.surface.as_ref())
    }

    fn destroy(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.destroyed = true;

            state.surface.remove();
            let PreviewState { host, warning, .. } = &mut *state;
            warning.teardown(host.as_mut());
            release_scheduled(self.scheduler.as_ref(), &self.registry, &mut state);
        }
        tracing::debug!(preview = self.id, "preview destroyed");

        self.events.emit(&PreviewEvent::Destroy);
        self.events.clear();
    }
}

impl Drop for PreviewInner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if !state.destroyed {
            release_scheduled(self.scheduler.as_ref(), &self.registry, state);
        }
    }
}

fn release_scheduled(
    scheduler: &dyn Scheduler,
    registry: &CallbackRegistry,
    state: &mut PreviewState,
) {
    if let Some(frame) = state.height_loop.take() {
        scheduler.cancel_frame(frame);
    }
    if let Some(pending) = state.pending.take() {
        scheduler.clear_timeout(pending.timer);
        registry.remove(&pending.token);
    }
}
