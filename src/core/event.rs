//! Lifecycle events a preview emits to its host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a render request asks the preview endpoint to resolve.
///
/// Serializes as `{"url": ...}` or `{"assetId": ...}`, matching the endpoint's query keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestTarget {
    Url(String),
    AssetId(u64),
}

impl RequestTarget {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn asset_id(id: u64) -> Self {
        Self::AssetId(id)
    }

    /// Blank urls clear the preview instead of requesting a render.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Url(url) => url.trim().is_empty(),
            Self::AssetId(_) => false,
        }
    }

    /// Query key and value sent to the preview endpoint.
    pub fn query_pair(&self) -> (&'static str, String) {
        match self {
            Self::Url(url) => ("url", url.clone()),
            Self::AssetId(id) => ("assetId", id.to_string()),
        }
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "url={url}"),
            Self::AssetId(id) => write!(f, "assetId={id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Load,
    Timeout,
    Resize,
    Destroy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreviewEvent {
    /// The rendered document signalled completion for the current request.
    Load {
        #[serde(flatten)]
        target: RequestTarget,
    },
    /// The current request did not complete within its timeout.
    Timeout {
        #[serde(flatten)]
        target: RequestTarget,
    },
    Resize {
        #[serde(rename = "prevHeight")]
        prev_height: u32,
        height: u32,
    },
    Destroy,
}

impl PreviewEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Load { .. } => EventKind::Load,
            Self::Timeout { .. } => EventKind::Timeout,
            Self::Resize { .. } => EventKind::Resize,
            Self::Destroy => EventKind::Destroy,
        }
    }

    pub fn target(&self) -> Option<&RequestTarget> {
        match self {
            Self::Load { target } | Self::Timeout { target } => Some(target),
            Self::Resize { .. } | Self::Destroy => None,
        }
    }
}
