//! Geometry for overlays that sit above the render surface.

pub mod overlay;

pub use overlay::{trigger_rect, Point, Rect};
