//! Documents: a named registry plus the state its handlers share

use crate::query::Query;
use crate::registry::{Mode, Registry};
use crate::types::{AthenError, Result, State, Value};
use parking_lot::Mutex;

/// A mountable unit of handlers
///
/// The document owns its [`State`]. Dispatches lock it for their whole
/// duration, so handlers of one document never observe each other mid-call.
#[derive(Debug)]
pub struct Document {
    name: String,
    registry: Registry,
    state: Mutex<State>,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_registry(name, Registry::new())
    }

    pub fn with_registry(name: impl Into<String>, registry: Registry) -> Self {
        Self {
            name: name.into(),
            registry,
            state: Mutex::new(State::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Run every init handler with an empty query
    ///
    /// Returns the number of init handlers that ran.
    pub fn init(&self) -> Result<usize> {
        let count = self.registry.count(&Mode::Init);
        if count > 0 {
            log::debug!("Running {} init handler(s) for `{}`", count, self.name);
        }
        self.trigger(&Mode::Init, &Query::default())?;
        Ok(count)
    }

    /// Run the document's run handlers and return the last result
    pub fn run(&self, query: &Query) -> Result<Value> {
        self.trigger(&Mode::Run, query)?
            .ok_or_else(|| AthenError::NoHandler {
                document: self.name.clone(),
                mode: Mode::Run,
            })
    }

    /// Dispatch any mode, including caller-defined ones
    pub fn trigger(&self, mode: &Mode, query: &Query) -> Result<Option<Value>> {
        let mut state = self.state.lock();
        self.registry
            .dispatch(mode, &mut state, query)
            .map_err(|source| AthenError::Handler {
                document: self.name.clone(),
                mode: mode.clone(),
                source,
            })
    }

    /// Copy of the current state
    pub fn state_snapshot(&self) -> State {
        self.state.lock().clone()
    }
}
