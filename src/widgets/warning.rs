//! Trust-warning popup anchored to a marker inside the render surface.

use crate::core::host::{AnchorId, HostDocument, PopupId};
use crate::render::overlay::Rect;

/// Two-paragraph message shown when embedded content comes from an untrusted source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningMessage {
    /// Rendered as the first, emphasized paragraph.
    pub untrusted_source: String,
    pub security_measure: String,
}

impl Default for WarningMessage {
    fn default() -> Self {
        Self {
            untrusted_source: "This information is coming from an untrusted source.".to_string(),
            security_measure: "As a security measure embed codes will not be shown.".to_string(),
        }
    }
}

impl WarningMessage {
    pub fn paragraphs(&self) -> [&str; 2] {
        [self.untrusted_source.as_str(), self.security_measure.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupOptions {
    pub class: String,
    /// Whether showing this popup closes other open popups on the host page.
    pub close_others: bool,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            class: "hud info-hud".to_string(),
            close_others: false,
        }
    }
}

/// Lazily allocated anchor node plus popup. Both are created on first show and reused.
#[derive(Debug, Default)]
pub struct WarningOverlay {
    anchor: Option<AnchorId>,
    popup: Option<PopupId>,
    visible: bool,
}

impl WarningOverlay {
    pub fn anchor(&self) -> Option<AnchorId> {
        self.anchor
    }

    pub fn popup(&self) -> Option<PopupId> {
        self.popup
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self, host: &mut dyn HostDocument, rect: Rect, message: &WarningMessage) {
        let anchor = match self.anchor {
            Some(anchor) => anchor,
            None => {
                let anchor = host.create_anchor();
                self.anchor = Some(anchor);
                anchor
            }
        };
        host.place_anchor(anchor, rect);

        match self.popup {
            Some(popup) => host.show_popup(popup),
            None => {
                self.popup = Some(host.create_popup(anchor, message, &PopupOptions::default()));
            }
        }
        self.visible = true;
    }

    /// Hides the popup; the anchor is hidden with it.
    pub fn hide(&mut self, host: &mut dyn HostDocument) {
        if let Some(popup) = self.popup {
            host.hide_popup(popup);
        }
        if let Some(anchor) = self.anchor {
            host.hide_anchor(anchor);
        }
        self.visible = false;
    }

    /// Releases the anchor and popup. Safe to call when nothing was allocated.
    pub fn teardown(&mut self, host: &mut dyn HostDocument) {
        if let Some(anchor) = self.anchor.take() {
            host.remove_anchor(anchor);
        }
        if let Some(popup) = self.popup.take() {
            host.hide_popup(popup);
            host.remove_popup(popup);
        }
        self.visible = false;
    }
}
