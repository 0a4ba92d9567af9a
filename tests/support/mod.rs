#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use embed_preview::{
    AnchorId, CallbackRegistry, ClickHandler, HostDocument, ManualScheduler, Point, PopupId,
    PopupOptions, Preview, PreviewConfig, PreviewEvent, Rect, RenderSurface, RequestToken,
    SurfaceBody, SurfaceDocument, SurfaceWindow, WarningMessage, BLANK_LOCATION,
};
use url::Url;

pub const FRAME: Duration = Duration::from_millis(16);

pub struct SurfaceTrace {
    pub navigations: Vec<String>,
    pub has_window: bool,
    pub body_height: Option<u32>,
    pub scroll_top: f64,
    pub frame_offset: Point,
    pub elements: HashMap<String, Rect>,
    pub click_handlers: HashMap<String, Rc<RefCell<ClickHandler>>>,
    pub bind_calls: usize,
    pub remove_calls: usize,
}

impl Default for SurfaceTrace {
    fn default() -> Self {
        Self {
            navigations: Vec::new(),
            has_window: true,
            body_height: None,
            scroll_top: 0.0,
            frame_offset: Point::default(),
            elements: HashMap::new(),
            click_handlers: HashMap::new(),
            bind_calls: 0,
            remove_calls: 0,
        }
    }
}

pub struct FakeSurface {
    state: Rc<RefCell<SurfaceTrace>>,
}

impl FakeSurface {
    pub fn new() -> (Self, Rc<RefCell<SurfaceTrace>>) {
        let state = Rc::new(RefCell::new(SurfaceTrace::default()));
        (
            Self {
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

impl RenderSurface for FakeSurface {
    fn navigate(&mut self, location: &str) {
        let mut state = self.state.borrow_mut();
        state.navigations.push(location.to_string());
        state.elements.clear();
        state.click_handlers.clear();
    }

    fn window(&self) -> Option<SurfaceWindow> {
        let state = self.state.borrow();
        state.has_window.then(|| SurfaceWindow {
            location: state
                .navigations
                .last()
                .cloned()
                .unwrap_or_else(|| BLANK_LOCATION.to_string()),
            scroll_top: state.scroll_top,
        })
    }

    fn document(&self) -> Option<SurfaceDocument> {
        let window = self.window()?;
        Some(SurfaceDocument {
            url: window.location,
            has_body: self.state.borrow().body_height.is_some(),
        })
    }

    fn body(&self) -> Option<SurfaceBody> {
        let state = self.state.borrow();
        if !state.has_window {
            return None;
        }
        state.body_height.map(|height| SurfaceBody { height })
    }

    fn frame_offset(&self) -> Point {
        self.state.borrow().frame_offset
    }

    fn find_element(&self, id: &str) -> Option<Rect> {
        self.state.borrow().elements.get(id).copied()
    }

    fn bind_click(&mut self, id: &str, handler: ClickHandler) -> bool {
        let mut state = self.state.borrow_mut();
        state.bind_calls += 1;
        if !state.elements.contains_key(id) {
            return false;
        }
        state
            .click_handlers
            .insert(id.to_string(), Rc::new(RefCell::new(handler)));
        true
    }

    fn remove(&mut self) {
        self.state.borrow_mut().remove_calls += 1;
    }
}

/// Simulates a user click inside the surface document.
pub fn click(surface: &Rc<RefCell<SurfaceTrace>>, id: &str) -> bool {
    let handler = surface.borrow().click_handlers.get(id).cloned();
    match handler {
        Some(handler) => {
            (&mut *handler.borrow_mut())();
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnchorState {
    pub rect: Option<Rect>,
    pub visible: bool,
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupState {
    pub anchor: AnchorId,
    pub message: WarningMessage,
    pub options: PopupOptions,
    pub visible: bool,
    pub removed: bool,
}

#[derive(Debug, Default)]
pub struct HostTrace {
    pub anchors: BTreeMap<u64, AnchorState>,
    pub popups: BTreeMap<u64, PopupState>,
    next_id: u64,
}

impl HostTrace {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn anchor(&self, id: AnchorId) -> &AnchorState {
        &self.anchors[&id.raw()]
    }

    pub fn popup(&self, id: PopupId) -> &PopupState {
        &self.popups[&id.raw()]
    }
}

pub struct FakeHost {
    state: Rc<RefCell<HostTrace>>,
}

impl FakeHost {
    pub fn new() -> (Self, Rc<RefCell<HostTrace>>) {
        let state = Rc::new(RefCell::new(HostTrace::default()));
        (
            Self {
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

impl HostDocument for FakeHost {
    fn create_anchor(&mut self) -> AnchorId {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.anchors.insert(
            id,
            AnchorState {
                rect: None,
                visible: false,
                removed: false,
            },
        );
        AnchorId::from_raw(id)
    }

    fn place_anchor(&mut self, anchor: AnchorId, rect: Rect) {
        if let Some(entry) = self.state.borrow_mut().anchors.get_mut(&anchor.raw()) {
            entry.rect = Some(rect);
            entry.visible = true;
        }
    }

    fn hide_anchor(&mut self, anchor: AnchorId) {
        if let Some(entry) = self.state.borrow_mut().anchors.get_mut(&anchor.raw()) {
            entry.visible = false;
        }
    }

    fn remove_anchor(&mut self, anchor: AnchorId) {
        if let Some(entry) = self.state.borrow_mut().anchors.get_mut(&anchor.raw()) {
            entry.visible = false;
            entry.removed = true;
        }
    }

    fn create_popup(
        &mut self,
        anchor: AnchorId,
        message: &WarningMessage,
        options: &PopupOptions,
    ) -> PopupId {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.popups.insert(
            id,
            PopupState {
                anchor,
                message: message.clone(),
                options: options.clone(),
                visible: true,
                removed: false,
            },
        );
        PopupId::from_raw(id)
    }

    fn show_popup(&mut self, popup: PopupId) {
        if let Some(entry) = self.state.borrow_mut().popups.get_mut(&popup.raw()) {
            entry.visible = true;
        }
    }

    fn hide_popup(&mut self, popup: PopupId) {
        if let Some(entry) = self.state.borrow_mut().popups.get_mut(&popup.raw()) {
            entry.visible = false;
        }
    }

    fn remove_popup(&mut self, popup: PopupId) {
        if let Some(entry) = self.state.borrow_mut().popups.get_mut(&popup.raw()) {
            entry.visible = false;
            entry.removed = true;
        }
    }
}

pub struct Harness {
    pub scheduler: Rc<ManualScheduler>,
    pub registry: CallbackRegistry,
    pub surface: Rc<RefCell<SurfaceTrace>>,
    pub host: Rc<RefCell<HostTrace>>,
    pub preview: Preview,
    events: Rc<RefCell<Vec<PreviewEvent>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(PreviewConfig::default())
    }

    pub fn with_config(config: PreviewConfig) -> Self {
        Self::with_registry(config, Rc::new(ManualScheduler::new()), CallbackRegistry::new())
    }

    /// Builds a preview that shares `scheduler` and `registry` with other harnesses.
    pub fn with_registry(
        config: PreviewConfig,
        scheduler: Rc<ManualScheduler>,
        registry: CallbackRegistry,
    ) -> Self {
        let (surface, surface_state) = FakeSurface::new();
        let (host, host_state) = FakeHost::new();
        let preview = Preview::new(
            config,
            scheduler.clone(),
            registry.clone(),
            Box::new(surface),
            Box::new(host),
        );

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        preview.on_any(move |event| sink.borrow_mut().push(event.clone()));

        Self {
            scheduler,
            registry,
            surface: surface_state,
            host: host_state,
            preview,
            events,
        }
    }

    pub fn events(&self) -> Vec<PreviewEvent> {
        self.events.borrow().clone()
    }

    pub fn take_events(&self) -> Vec<PreviewEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn last_location(&self) -> String {
        self.surface
            .borrow()
            .navigations
            .last()
            .cloned()
            .expect("surface was navigated")
    }

    /// Token carried by the most recent navigation.
    pub fn last_token(&self) -> RequestToken {
        token_of(&self.last_location()).expect("last navigation carries a callback token")
    }

    /// Acts as the rendered document calling back once it finished loading.
    pub fn signal_ready(&self, token: &RequestToken) -> bool {
        self.registry.invoke(token)
    }

    pub fn set_body_height(&self, height: Option<u32>) {
        self.surface.borrow_mut().body_height = height;
    }

    pub fn set_element(&self, id: &str, rect: Rect) {
        self.surface
            .borrow_mut()
            .elements
            .insert(id.to_string(), rect);
    }

    pub fn frame(&self) {
        self.scheduler.step_frames(1, FRAME);
    }

    pub fn advance(&self, by: Duration) {
        self.scheduler.advance(by);
    }
}

pub fn token_of(location: &str) -> Option<RequestToken> {
    let url = Url::parse(location).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "callback")
        .map(|(_, value)| RequestToken::from(value.as_ref()))
}
