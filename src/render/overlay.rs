//! Host-viewport geometry for overlays anchored inside a render surface.

/// Offset in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub top: f64,
    pub left: f64,
}

impl Point {
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Box in CSS pixels: offset plus outer size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.top, self.left)
    }
}

/// Translates a box measured in the surface's document into host-viewport coordinates.
///
/// `marker` is relative to the surface document's layout, so the surface's own scroll is
/// subtracted on the vertical axis. Horizontal scroll inside the surface is not applied.
pub fn trigger_rect(frame_offset: Point, frame_scroll_top: f64, marker: Rect) -> Rect {
    Rect {
        top: frame_offset.top - frame_scroll_top + marker.top,
        left: frame_offset.left + marker.left,
        width: marker.width,
        height: marker.height,
    }
}
