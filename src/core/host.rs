//! Host document interface for overlay nodes and popups.

use crate::render::overlay::Rect;
use crate::widgets::warning::{PopupOptions, WarningMessage};

/// Stable identifier for an anchor node appended to the host body.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AnchorId(u64);

impl AnchorId {
    /// Returns the raw numeric identifier.
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Stable identifier for a popup widget owned by the host.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PopupId(u64);

impl PopupId {
    /// Returns the raw numeric identifier.
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Host-page operations a preview needs to anchor UI to content inside its surface.
///
/// Like [`crate::RenderSurface`], implementations must not call back into the preview
/// synchronously. A popup the user dismisses on the host side is reported through
/// [`crate::Preview::dismiss_warning`].
pub trait HostDocument {
    /// Append an absolutely positioned, initially hidden node to the host body.
    fn create_anchor(&mut self) -> AnchorId;

    /// Show the anchor and cover `rect` (host-viewport coordinates).
    fn place_anchor(&mut self, anchor: AnchorId, rect: Rect);

    fn hide_anchor(&mut self, anchor: AnchorId);
    fn remove_anchor(&mut self, anchor: AnchorId);

    /// Create a popup attached to `anchor` and show it.
    fn create_popup(
        &mut self,
        anchor: AnchorId,
        message: &WarningMessage,
        options: &PopupOptions,
    ) -> PopupId;

    fn show_popup(&mut self, popup: PopupId);
    fn hide_popup(&mut self, popup: PopupId);

    /// Remove the popup and its shade from the host document.
    fn remove_popup(&mut self, popup: PopupId);
}
