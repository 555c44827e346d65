//! Request query arguments
//!
//! A query is a flat JSON object whose values are numbers or strings. It
//! arrives URL-encoded in the first query-string pair of a request
//! (conventionally `?q={...}`). Anything that does not parse is treated as an
//! empty query rather than an error.

use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A single query argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryItem {
    Number(serde_json::Number),
    String(String),
}

impl QueryItem {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryItem::String(s) => Some(s.as_str()),
            QueryItem::Number(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QueryItem::Number(n) => n.as_f64(),
            QueryItem::String(_) => None,
        }
    }
}

impl From<QueryItem> for Value {
    fn from(item: QueryItem) -> Self {
        match item {
            QueryItem::Number(n) => Value::Number(n),
            QueryItem::String(s) => Value::String(s),
        }
    }
}

/// Arguments passed to a run handler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    items: BTreeMap<String, QueryItem>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object, falling back to an empty query
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(query) => query,
            Err(err) => {
                log::debug!("Ignoring malformed query {:?}: {}", raw, err);
                Self::default()
            }
        }
    }

    /// Build a query from decoded query-string pairs
    ///
    /// Only the value of the first pair is read; its key is irrelevant.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
    {
        match pairs.into_iter().next() {
            Some((_key, value)) => Self::parse(&value),
            None => Self::default(),
        }
    }

    /// Builder method: add a string argument
    pub fn with_str(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), QueryItem::String(value.into()));
        self
    }

    /// Builder method: add a numeric argument
    pub fn with_number(mut self, key: impl Into<String>, value: impl Into<serde_json::Number>) -> Self {
        self.items.insert(key.into(), QueryItem::Number(value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&QueryItem> {
        self.items.get(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryItem)> {
        self.items.iter()
    }

    /// The query as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.items
                .iter()
                .map(|(key, item)| (key.clone(), Value::from(item.clone())))
                .collect(),
        )
    }
}
