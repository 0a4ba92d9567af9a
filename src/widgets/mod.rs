//! Host-side widgets owned by a preview.

pub mod warning;

pub use warning::{PopupOptions, WarningMessage, WarningOverlay};
