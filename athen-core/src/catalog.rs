//! Catalog of document installers
//!
//! Configuration refers to documents by catalog key. An installer fills a
//! fresh registry with the handlers for that key; the host wraps it into a
//! [`Document`] mounted under the configured route name.

use crate::document::Document;
use crate::registry::{Handler, Mode, Registry};
use crate::types::{AthenError, Result, Value};
use std::collections::BTreeMap;
use std::fmt;

type Installer = dyn Fn(&mut Registry) + Send + Sync;

/// State key used by the `data` builtin
pub const DATA_KEY: &str = "data";

/// Value the `data` builtin reports before its init handler has run
pub const DATA_PLACEHOLDER: &str = "<Y DATA";

/// Named document installers
#[derive(Default)]
pub struct Catalog {
    entries: BTreeMap<String, Box<Installer>>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the documents shipped by the runtime
    ///
    /// - `hello`: run returns `"Hello World!"`
    /// - `echo`: run returns its query as a JSON object
    /// - `data`: init stores a value, run returns it
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.add("hello", install_hello);
        catalog.add("echo", install_echo);
        catalog.add("data", install_data);
        catalog
    }

    /// Add or replace an installer
    pub fn add<F>(&mut self, key: impl Into<String>, installer: F) -> &mut Self
    where
        F: Fn(&mut Registry) + Send + Sync + 'static,
    {
        let key = key.into();
        if self.entries.insert(key.clone(), Box::new(installer)).is_some() {
            log::debug!("Catalog entry `{}` replaced", key);
        }
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Sorted entry keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Build the document `name` from the installer registered as `key`
    pub fn install(&self, key: &str, name: impl Into<String>) -> Result<Document> {
        let installer = self
            .entries
            .get(key)
            .ok_or_else(|| AthenError::UnknownCatalogEntry(key.to_string()))?;

        let mut registry = Registry::new();
        installer(&mut registry);

        let document = Document::with_registry(name, registry);
        log::debug!(
            "Installed `{}` as document `{}` ({} handler(s))",
            key,
            document.name(),
            document.registry().len()
        );
        Ok(document)
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

fn install_hello(registry: &mut Registry) {
    registry.register(
        Handler::new("run", |_state, _query| Ok(Value::from("Hello World!"))),
        Mode::Run,
    );
}

fn install_echo(registry: &mut Registry) {
    registry.register(
        Handler::new("run", |_state, query| Ok(query.to_value())),
        Mode::Run,
    );
}

fn install_data(registry: &mut Registry) {
    registry.register(
        Handler::new("init", |state, _query| {
            state.set(DATA_KEY, "EWEWEEE");
            Ok(Value::Null)
        }),
        Mode::Init,
    );
    registry.register(
        Handler::new("run", |state, _query| {
            Ok(state
                .get(DATA_KEY)
                .cloned()
                .unwrap_or_else(|| Value::from(DATA_PLACEHOLDER)))
        }),
        Mode::Run,
    );
}
