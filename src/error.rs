use thiserror::Error;

/// Failures surfaced while configuring a preview or decoding cross-frame messages.
///
/// Runtime conditions (render timeouts, inaccessible surfaces, missing markers, stale
/// completions) are never errors; they degrade to events or silent no-ops.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("preview action URL '{url}' is not an absolute URL: {source}")]
    InvalidActionUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("preview action URL '{url}' cannot carry query parameters")]
    CannotBeABase { url: String },

    #[error("render timeout must be a positive number of milliseconds, got '{value}'")]
    InvalidTimeout { value: String },

    #[error("passthrough parameter '{entry}' must have the form key=value")]
    InvalidParameter { entry: String },

    #[error("passthrough parameter '{key}' is reserved for the preview request")]
    ReservedParameter { key: String },

    #[error("failed to decode frame message: {0}")]
    MessageDecode(#[source] serde_json::Error),
}

impl PreviewError {
    #[must_use]
    pub fn invalid_action_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidActionUrl {
            url: url.into(),
            source,
        }
    }

    #[must_use]
    pub fn invalid_timeout(value: impl Into<String>) -> Self {
        Self::InvalidTimeout {
            value: value.into(),
        }
    }
}
