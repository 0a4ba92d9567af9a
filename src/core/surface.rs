//! Render surface interface.
//!
//! A render surface is an isolated sub-document (typically an iframe) owned by a preview.
//! The preview navigates, measures and queries it but never renders into it.

use crate::render::overlay::{Point, Rect};

/// Location used to clear a surface.
pub const BLANK_LOCATION: &str = "about:blank";

/// Element id the preview endpoint uses to flag content from an untrusted source.
pub const WARNING_MARKER_ID: &str = "warning";

pub type ClickHandler = Box<dyn FnMut()>;

/// The surface's content window, when one is reachable.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceWindow {
    pub location: String,
    pub scroll_top: f64,
}

/// The surface's loaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDocument {
    pub url: String,
    pub has_body: bool,
}

/// The surface document's body element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceBody {
    pub height: u32,
}

/// Minimal isolated-document interface for a preview.
///
/// Accessors return `None` while the surface has nothing accessible (for example mid
/// navigation); callers treat that as an empty document rather than an error.
///
/// Implementations must not call back into the owning preview synchronously from any of
/// these methods. Marker clicks and completion signals are delivered later, from the host's
/// event loop.
pub trait RenderSurface {
    /// Replace the current location without adding a history entry.
    fn navigate(&mut self, location: &str);

    fn window(&self) -> Option<SurfaceWindow>;
    fn document(&self) -> Option<SurfaceDocument>;
    fn body(&self) -> Option<SurfaceBody>;

    /// Offset of the surface element within the host viewport.
    fn frame_offset(&self) -> Point;

    /// Offset and outer size of an element inside the surface document.
    fn find_element(&self, id: &str) -> Option<Rect>;

    /// Bind `handler` to clicks on an element, replacing any handler this preview bound
    /// earlier. Returns `false` when the element does not exist.
    fn bind_click(&mut self, id: &str, handler: ClickHandler) -> bool;

    /// Detach the surface's root element from its host container.
    fn remove(&mut self);
}
