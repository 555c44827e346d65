//! Core types for the Athen runtime
//!
//! This module defines the error types and the per-document state that
//! registered handlers read and write. Handlers never touch process-wide
//! globals: every call receives the state of the document it belongs to.

use crate::registry::Mode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use serde_json::Value;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, AthenError>;

/// Result type returned by a single handler invocation
pub type HandlerResult = std::result::Result<Value, HandlerError>;

/// Errors that can occur while mounting documents or dispatching handlers
#[derive(Debug, thiserror::Error)]
pub enum AthenError {
    #[error("Handler failed in document `{document}` ({mode} mode): {source}")]
    Handler {
        document: String,
        mode: Mode,
        #[source]
        source: HandlerError,
    },

    #[error("No {mode} handler registered in document `{document}`")]
    NoHandler { document: String, mode: Mode },

    #[error("Unknown catalog entry: {0}")]
    UnknownCatalogEntry(String),

    #[error("Document already mounted: {0}")]
    DuplicateDocument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure reported by a handler
///
/// Handlers are user code, so the runtime only carries their message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Mutable state shared by the handlers of one document
///
/// Init handlers populate it, run handlers read it. It lives exactly as long
/// as the document that owns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    values: BTreeMap<String, Value>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store a value, returning the previous one if the key was set
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
