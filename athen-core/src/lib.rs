//! Athen runtime library
//!
//! A small runtime that stores mode-tagged handlers and dispatches them:
//! - Handlers are registered under a mode (`init`, `run`, or any caller tag)
//! - Registration hands the handler back unchanged
//! - Each document owns the state its handlers share
//! - A host mounts documents, runs their init handlers once, and routes
//!   requests to their run handlers
//!
//! Binding sockets, reading `Athen.toml` and the command line live in the
//! application layer (athen-cli).
//!
//! # Example Usage
//!
//! ```
//! use athen_core::{Document, Handler, Host, HostConfig, Mode, Value};
//!
//! let mut document = Document::new("data");
//! let registry = document.registry_mut();
//! registry.register(
//!     Handler::new("init", |state, _query| {
//!         state.set("data", "EWEWEEE");
//!         Ok(Value::Null)
//!     }),
//!     Mode::Init,
//! );
//! registry.register(
//!     Handler::new("run", |state, _query| {
//!         Ok(state.get("data").cloned().unwrap_or(Value::Null))
//!     }),
//!     Mode::Run,
//! );
//!
//! let mut host = Host::new(HostConfig::new());
//! host.mount(document).unwrap();
//!
//! let reply = host.handle("GET", "/data/anything");
//! assert_eq!(reply.body, "EWEWEEE");
//! ```

// Public modules
pub mod catalog;
pub mod config;
pub mod document;
pub mod host;
pub mod query;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use catalog::Catalog;
pub use config::{DocumentBinding, HostConfig, DEFAULT_PORT};
pub use document::Document;
pub use host::{Host, Reply};
pub use query::{Query, QueryItem};
pub use registry::{Handler, Mode, Registrar, Registration, Registry};
pub use types::{AthenError, HandlerError, HandlerResult, Result, State, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty host still serves the index
        let host = Host::new(HostConfig::new());
        assert_eq!(host.handle("GET", "/").status, 200);
        assert!(!VERSION.is_empty());
    }
}
