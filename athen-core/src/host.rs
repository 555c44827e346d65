//! Host: mounted documents and request routing
//!
//! The host owns every mounted [`Document`]. Mounting runs the document's
//! init handlers once; afterwards requests are routed to its run handlers.
//! Routing is transport-agnostic: [`Host::handle`] takes a method and a
//! request target and produces a [`Reply`] the server layer writes out.

use crate::catalog::Catalog;
use crate::config::HostConfig;
use crate::document::Document;
use crate::query::Query;
use crate::types::{AthenError, Result, Value};
use std::collections::BTreeMap;
use url::Url;

/// Body served at `/`
pub const INDEX_BODY: &str = "Hello World";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Response produced by routing a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: TEXT_PLAIN,
            body: body.into(),
        }
    }

    /// Strings go out verbatim as text, everything else as JSON
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(body) => Self::text(200, body),
            other => Self {
                status: 200,
                content_type: APPLICATION_JSON,
                body: other.to_string(),
            },
        }
    }

    fn not_found() -> Self {
        Self::text(404, "Not Found")
    }
}

/// Mounted documents plus the configuration they were mounted from
#[derive(Debug)]
pub struct Host {
    config: HostConfig,
    documents: BTreeMap<String, Document>,
}

impl Host {
    /// Empty host; documents are added with [`Host::mount`]
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            documents: BTreeMap::new(),
        }
    }

    /// Install every configured document, then mount them in binding order
    ///
    /// No init handler runs unless every binding names a known catalog entry.
    pub fn from_config(config: HostConfig, catalog: &Catalog) -> Result<Self> {
        config.validate()?;

        let documents = config
            .documents
            .iter()
            .map(|binding| catalog.install(&binding.entry, binding.route.as_str()))
            .collect::<Result<Vec<_>>>()?;

        let mut host = Self::new(config);
        for document in documents {
            host.mount(document)?;
        }

        log::info!("Host ready with {} document(s)", host.documents.len());
        Ok(host)
    }

    /// Run the document's init handlers, then make it routable
    pub fn mount(&mut self, document: Document) -> Result<()> {
        let name = document.name().to_string();
        if self.documents.contains_key(&name) {
            return Err(AthenError::DuplicateDocument(name));
        }

        let ran = document.init()?;
        log::info!("Mounted `/{}` ({} init handler(s) ran)", name, ran);
        self.documents.insert(name, document);
        Ok(())
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    /// Sorted names of mounted documents
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Route one request
    ///
    /// `target` is the raw request target, e.g. `/hello/x?q=%7B%7D`.
    pub fn handle(&self, method: &str, target: &str) -> Reply {
        if !method.eq_ignore_ascii_case("GET") {
            return Reply::text(405, "Method Not Allowed");
        }

        let parsed = match Url::parse(&format!("http://localhost{}", target)) {
            Ok(url) => url,
            Err(err) => {
                log::debug!("Rejecting request target {:?}: {}", target, err);
                return Reply::text(400, "Bad Request");
            }
        };

        let segment = parsed
            .path_segments()
            .and_then(|mut segments| segments.find(|segment| !segment.is_empty()));

        let Some(segment) = segment else {
            return Reply::text(200, INDEX_BODY);
        };

        // Route names are stored decoded; the URL parser leaves segments encoded
        let document_name = match urlencoding::decode(segment) {
            Ok(name) => name,
            Err(err) => {
                log::debug!("Rejecting path segment {:?}: {}", segment, err);
                return Reply::text(400, "Bad Request");
            }
        };

        let Some(document) = self.documents.get(document_name.as_ref()) else {
            log::debug!("No document mounted at `/{}`", document_name);
            return Reply::not_found();
        };

        let query = Query::from_pairs(parsed.query_pairs());
        match document.run(&query) {
            Ok(value) => Reply::from_value(value),
            Err(AthenError::NoHandler { .. }) => Reply::not_found(),
            Err(err) => {
                log::error!("{}", err);
                Reply::text(500, err.to_string())
            }
        }
    }
}
