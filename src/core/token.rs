//! Request tokens and the cross-frame completion slot.
//!
//! The rendered document has no call access back into the host. It signals completion
//! either by invoking the callback registered under its token, or by posting a
//! `{"type":"ready","token":...}` message that the host forwards here.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PreviewError;

const TOKEN_PREFIX: &str = "embeddedassets";

/// Correlates one navigation with its completion signal.
///
/// Tokens are UUID based, so they stay unique across every preview on the page, not just
/// across requests of one preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(String);

impl RequestToken {
    pub fn generate() -> Self {
        Self(format!("{TOKEN_PREFIX}{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Messages a rendered preview document posts to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FrameMessage {
    Ready { token: RequestToken },
}

impl FrameMessage {
    pub fn parse(raw: &str) -> Result<Self, PreviewError> {
        serde_json::from_str(raw).map_err(PreviewError::MessageDecode)
    }
}

type Completion = Box<dyn FnOnce()>;

/// Shared, token-keyed slot of one-shot completion callbacks.
///
/// One registry is shared by every preview on a host page. Clones share the same slots.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    slots: Rc<RefCell<HashMap<RequestToken, Completion>>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `completion` under `token`, replacing any previous entry.
    pub fn register(&self, token: RequestToken, completion: impl FnOnce() + 'static) {
        self.slots.borrow_mut().insert(token, Box::new(completion));
    }

    /// Deletes the entry for `token`. Returns `false` when nothing was registered.
    pub fn remove(&self, token: &RequestToken) -> bool {
        self.slots.borrow_mut().remove(token).is_some()
    }

    pub fn contains(&self, token: &RequestToken) -> bool {
        self.slots.borrow().contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Runs and removes the callback for `token`. Unknown tokens are ignored.
    pub fn invoke(&self, token: &RequestToken) -> bool {
        let completion = self.slots.borrow_mut().remove(token);
        match completion {
            Some(completion) => {
                completion();
                true
            }
            None => {
                tracing::debug!(%token, "no completion registered for token");
                false
            }
        }
    }

    /// Decodes a posted frame message and invokes the matching completion.
    pub fn dispatch_message(&self, raw: &str) -> Result<bool, PreviewError> {
        match FrameMessage::parse(raw)? {
            FrameMessage::Ready { token } => Ok(self.invoke(&token)),
        }
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("pending", &self.len())
            .finish()
    }
}
