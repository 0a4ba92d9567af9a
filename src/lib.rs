//! Cross-frame preview driver for embedded media.
//!
//! Invariant: a preview reacts only to its current request. A completion that arrives for a
//! superseded token is dropped, so each request yields at most one `load` or `timeout`.
//!
//! # Public API Overview
//! - Drive a render surface through [`Preview`]: `set_url`, `set_asset_id`, `show_warning`,
//!   `destroy`.
//! - Plug in the host through the [`RenderSurface`], [`HostDocument`] and [`Scheduler`] traits.
//! - Route completion signals from rendered documents through a shared [`CallbackRegistry`].
//! - Step time deterministically with [`ManualScheduler`], or run in real time on a tokio
//!   `LocalSet` with [`LocalScheduler`].

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod render;
pub mod runtime;
pub mod widgets;

/// Configuration and errors.
pub use crate::config::PreviewConfig;
pub use crate::error::PreviewError;

/// Event channel and payloads.
pub use crate::core::emitter::{EventChannel, ListenerId};
pub use crate::core::event::{EventKind, PreviewEvent, RequestTarget};

/// Host integration seams.
pub use crate::core::host::{AnchorId, HostDocument, PopupId};
pub use crate::core::scheduler::{FrameHandle, Scheduler, Task, TimerHandle};
pub use crate::core::surface::{
    ClickHandler, RenderSurface, SurfaceBody, SurfaceDocument, SurfaceWindow, BLANK_LOCATION,
    WARNING_MARKER_ID,
};

/// Cross-frame completion signalling.
pub use crate::core::endpoint::preview_url;
pub use crate::core::token::{CallbackRegistry, FrameMessage, RequestToken};

/// Overlay geometry.
pub use crate::render::overlay::{trigger_rect, Point, Rect};

/// Runtime.
pub use crate::runtime::local::LocalScheduler;
pub use crate::runtime::manual::ManualScheduler;
pub use crate::runtime::preview::Preview;

/// Trust-warning popup.
pub use crate::widgets::warning::{PopupOptions, WarningMessage, WarningOverlay};
