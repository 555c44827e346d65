//! Function registry
//!
//! Handlers are registered under a [`Mode`] and later dispatched by mode.
//! Registration never fails and never validates the mode: the registry is an
//! ordered list of `(mode, handler)` entries, and several entries may share
//! one mode.

use crate::query::Query;
use crate::types::{HandlerError, HandlerResult, State, Value};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Execution mode a handler is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Mode {
    /// Runs once when the owning document is mounted
    Init,
    /// Runs for every request to the owning document
    #[default]
    Run,
    /// Caller-defined tag, only dispatched on explicit request
    Custom(String),
}

impl Mode {
    /// Map a raw tag to a mode. Unknown tags (including "") are kept as-is.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "init" => Mode::Init,
            "run" => Mode::Run,
            other => Mode::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Mode::Init => "init",
            Mode::Run => "run",
            Mode::Custom(tag) => tag.as_str(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Mode::parse(s))
    }
}

impl From<&str> for Mode {
    fn from(raw: &str) -> Self {
        Mode::parse(raw)
    }
}

impl From<String> for Mode {
    fn from(raw: String) -> Self {
        Mode::parse(&raw)
    }
}

type HandlerFn = dyn Fn(&mut State, &Query) -> HandlerResult + Send + Sync;

/// Shared reference to a registered callable
///
/// Cloning a handler clones the reference, not the callable: two handlers
/// compare equal only when they point at the same allocation.
#[derive(Clone)]
pub struct Handler {
    name: Arc<str>,
    func: Arc<HandlerFn>,
}

impl Handler {
    /// Wrap a callable under a display name used in logs
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&mut State, &Query) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the callable directly, outside any dispatch
    pub fn call(&self, state: &mut State, query: &Query) -> HandlerResult {
        (self.func)(state, query)
    }

    /// True when both references point at the same callable
    pub fn ptr_eq(this: &Handler, other: &Handler) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&this.func), Arc::as_ptr(&other.func))
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Handler::ptr_eq(self, other)
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("name", &self.name).finish()
    }
}

/// One registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub mode: Mode,
    pub handler: Handler,
}

/// Ordered store of mode-tagged handlers
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `mode` and hand the same handler back
    ///
    /// # Example
    /// ```
    /// use athen_core::{Handler, Mode, Registry, Value};
    ///
    /// let mut registry = Registry::new();
    /// let run = Handler::new("run", |_state, _query| Ok(Value::from("Hello World!")));
    /// let returned = registry.register(run.clone(), "run");
    ///
    /// assert_eq!(returned, run);
    /// assert_eq!(registry.count(&Mode::Run), 1);
    /// ```
    pub fn register(&mut self, handler: Handler, mode: impl Into<Mode>) -> Handler {
        let mode = mode.into();
        log::debug!("Registering handler `{}` in {} mode", handler.name(), mode);
        self.entries.push(Registration {
            mode,
            handler: handler.clone(),
        });
        handler
    }

    /// Register `handler` under the default mode ([`Mode::Run`])
    pub fn register_default(&mut self, handler: Handler) -> Handler {
        self.register(handler, Mode::default())
    }

    /// Decorator-style registration: pick the mode once, wrap many handlers
    pub fn registrar(&mut self) -> Registrar<'_> {
        Registrar {
            registry: self,
            mode: Mode::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }

    /// Handlers registered under `mode`, in registration order
    pub fn handlers<'a>(&'a self, mode: &'a Mode) -> impl Iterator<Item = &'a Handler> + 'a {
        self.entries
            .iter()
            .filter(move |entry| &entry.mode == mode)
            .map(|entry| &entry.handler)
    }

    pub fn count(&self, mode: &Mode) -> usize {
        self.handlers(mode).count()
    }

    /// Distinct modes in first-registered order
    pub fn modes(&self) -> Vec<&Mode> {
        let mut modes: Vec<&Mode> = Vec::new();
        for entry in &self.entries {
            if !modes.contains(&&entry.mode) {
                modes.push(&entry.mode);
            }
        }
        modes
    }

    /// Invoke every handler of `mode` in order against `state`
    ///
    /// Returns the value of the last handler, or `None` if nothing is
    /// registered under `mode`. The first failing handler stops the dispatch.
    pub fn dispatch(
        &self,
        mode: &Mode,
        state: &mut State,
        query: &Query,
    ) -> std::result::Result<Option<Value>, HandlerError> {
        let mut last = None;
        for handler in self.handlers(mode) {
            log::trace!("Dispatching {} handler `{}`", mode, handler.name());
            match handler.call(state, query) {
                Ok(value) => last = Some(value),
                Err(err) => {
                    log::warn!("Handler `{}` failed: {}", handler.name(), err);
                    return Err(err);
                }
            }
        }
        Ok(last)
    }
}

/// Registration helper with a fixed mode, see [`Registry::registrar`]
pub struct Registrar<'a> {
    registry: &'a mut Registry,
    mode: Mode,
}

impl<'a> Registrar<'a> {
    /// Builder method: register subsequent handlers under `mode`
    pub fn mode(mut self, mode: impl Into<Mode>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Register `handler` under this registrar's mode and return it
    pub fn wrap(&mut self, handler: Handler) -> Handler {
        self.registry.register(handler, self.mode.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn constant(name: &str, value: &'static str) -> Handler {
        Handler::new(name, move |_state, _query| Ok(Value::from(value)))
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("init"), Mode::Init);
        assert_eq!(Mode::parse("run"), Mode::Run);
        assert_eq!(Mode::parse("cleanup"), Mode::Custom("cleanup".to_string()));
        assert_eq!(Mode::parse(""), Mode::Custom(String::new()));
        assert_eq!("INIT".parse::<Mode>().unwrap(), Mode::Custom("INIT".to_string()));
    }

    #[test]
    fn test_mode_display_round_trips_tag() {
        for tag in ["init", "run", "warmup"] {
            assert_eq!(Mode::parse(tag).to_string(), tag);
        }
    }

    #[test]
    fn test_register_returns_same_handler() {
        let mut registry = Registry::new();
        let handler = constant("run", "ok");

        let returned = registry.register(handler.clone(), Mode::Run);
        assert!(Handler::ptr_eq(&returned, &handler));

        let other = constant("run", "ok");
        assert_ne!(returned, other);
    }

    #[test]
    fn test_register_default_uses_run() {
        let mut registry = Registry::new();
        registry.register_default(constant("run", "ok"));
        assert_eq!(registry.count(&Mode::Run), 1);
        assert_eq!(registry.iter().next().unwrap().mode, Mode::Run);
    }

    #[test]
    fn test_registrar_mode() {
        let mut registry = Registry::new();
        {
            let mut init = registry.registrar().mode("init");
            init.wrap(constant("first", "a"));
            init.wrap(constant("second", "b"));
        }
        registry.registrar().wrap(constant("run", "c"));

        assert_eq!(registry.count(&Mode::Init), 2);
        assert_eq!(registry.count(&Mode::Run), 1);
    }

    #[test]
    fn test_modes_keep_first_seen_order() {
        let mut registry = Registry::new();
        registry.register(constant("a", "a"), "run");
        registry.register(constant("b", "b"), "init");
        registry.register(constant("c", "c"), "run");
        registry.register(constant("d", "d"), "custom");

        assert_eq!(
            registry.modes(),
            vec![&Mode::Run, &Mode::Init, &Mode::Custom("custom".to_string())]
        );
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_dispatch_runs_all_handlers_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::new();
        for name in ["first", "second"] {
            let calls = Arc::clone(&calls);
            registry.register(
                Handler::new(name, move |state, _query| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    state.set("last", name);
                    Ok(Value::from(name))
                }),
                Mode::Init,
            );
        }

        let mut state = State::new();
        let result = registry
            .dispatch(&Mode::Init, &mut state, &Query::default())
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(result, Some(Value::from("second")));
        assert_eq!(state.get("last"), Some(&Value::from("second")));
    }

    #[test]
    fn test_dispatch_without_handlers() {
        let registry = Registry::new();
        let mut state = State::new();
        let result = registry
            .dispatch(&Mode::Run, &mut state, &Query::default())
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_dispatch_stops_at_first_error() {
        let mut registry = Registry::new();
        registry.register(
            Handler::new("failing", |_state, _query| Err(HandlerError::new("nope"))),
            Mode::Run,
        );
        registry.register(
            Handler::new("unreached", |state, _query| {
                state.set("reached", true);
                Ok(Value::Null)
            }),
            Mode::Run,
        );

        let mut state = State::new();
        let err = registry
            .dispatch(&Mode::Run, &mut state, &Query::default())
            .unwrap_err();
        assert_eq!(err.message(), "nope");
        assert!(!state.contains_key("reached"));
    }
}
