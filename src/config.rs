//! Environment configuration.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::PreviewError;
use crate::widgets::warning::WarningMessage;

/// Action route that renders a preview document for a url or asset id.
pub const DEFAULT_ACTION_URL: &str =
    "http://localhost/admin/actions/embeddedassets/actions/preview";

/// Render timeout used when a request does not name one.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Query keys the preview request writes itself; passthrough parameters may not reuse them.
pub const RESERVED_PARAMETERS: [&str; 3] = ["callback", "url", "assetId"];

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub action_url: Url,
    pub default_timeout: Duration,
    pub parameters: Vec<(String, String)>,
    pub log_filter: Option<String>,
    pub warning_message: WarningMessage,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            action_url: Url::parse(DEFAULT_ACTION_URL).expect("default action url parses"),
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            parameters: Vec::new(),
            log_filter: None,
            warning_message: WarningMessage::default(),
        }
    }
}

impl PreviewConfig {
    pub fn from_env() -> Result<Self, PreviewError> {
        let mut config = Self::default();

        if let Some(raw) = env_string_opt("EMBED_PREVIEW_ACTION_URL") {
            config.action_url = parse_action_url(&raw)?;
        }
        if let Some(raw) = env_string_opt("EMBED_PREVIEW_TIMEOUT_MS") {
            config.default_timeout = parse_timeout_ms(&raw)?;
        }
        if let Some(raw) = env_string_opt("EMBED_PREVIEW_PARAMS") {
            config.parameters = parse_parameters(&raw)?;
        }
        config.log_filter = env_string_opt("EMBED_PREVIEW_LOG");

        Ok(config)
    }

    /// Replaces the action URL after validating it.
    pub fn with_action_url(mut self, raw: &str) -> Result<Self, PreviewError> {
        self.action_url = parse_action_url(raw)?;
        Ok(self)
    }

    /// Adds a passthrough parameter forwarded verbatim to the preview endpoint.
    pub fn with_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, PreviewError> {
        let key = key.into();
        if RESERVED_PARAMETERS.contains(&key.as_str()) {
            return Err(PreviewError::ReservedParameter { key });
        }
        self.parameters.push((key, value.into()));
        Ok(self)
    }
}

pub(crate) fn parse_action_url(raw: &str) -> Result<Url, PreviewError> {
    let url = Url::parse(raw.trim())
        .map_err(|source| PreviewError::invalid_action_url(raw.trim(), source))?;
    if url.cannot_be_a_base() {
        return Err(PreviewError::CannotBeABase {
            url: raw.trim().to_string(),
        });
    }
    Ok(url)
}

pub(crate) fn parse_timeout_ms(raw: &str) -> Result<Duration, PreviewError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(PreviewError::invalid_timeout(raw)),
    }
}

pub(crate) fn parse_parameters(raw: &str) -> Result<Vec<(String, String)>, PreviewError> {
    let mut parameters = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(PreviewError::InvalidParameter {
                entry: entry.to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(PreviewError::InvalidParameter {
                entry: entry.to_string(),
            });
        }
        if RESERVED_PARAMETERS.contains(&key) {
            return Err(PreviewError::ReservedParameter {
                key: key.to_string(),
            });
        }
        parameters.push((key.to_string(), value.trim().to_string()));
    }
    Ok(parameters)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
