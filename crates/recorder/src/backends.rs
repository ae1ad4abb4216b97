//! Input backends.
//!
//! A backend decides which events it understands and how they land in
//! the sample store. Exactly one backend is active per recorder.

use playstats_model::{Backend, EventKind, SampleSource};

use crate::store::SampleStore;

/// Trait for input recording backends.
pub trait InputBackend: Send + Sync {
    /// Which input mode this backend implements.
    fn backend(&self) -> Backend;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Record `event` into `store`. Returns `false` when the event is not
    /// one this backend records.
    fn feed(&self, event: &EventKind, store: &mut SampleStore) -> bool;
}

/// Records key presses and mouse button presses with click positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscreteBackend;

impl InputBackend for DiscreteBackend {
    fn backend(&self) -> Backend {
        Backend::Discrete
    }

    fn name(&self) -> &str {
        "discrete"
    }

    fn feed(&self, event: &EventKind, store: &mut SampleStore) -> bool {
        if event.is_release() {
            return false;
        }
        match event {
            EventKind::Key { code, .. } => {
                store.record_discrete(SampleSource::Key(code.clone()));
                true
            }
            EventKind::MouseButton { button, .. } => {
                let Some(point) = event.point() else {
                    return false;
                };
                store.record_positional(SampleSource::MouseButton(*button), point);
                true
            }
            EventKind::Action { .. } | EventKind::ActionVector { .. } => false,
        }
    }
}

/// Records named actions, with their 2D values when they carry one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionBackend;

impl InputBackend for ActionBackend {
    fn backend(&self) -> Backend {
        Backend::Action
    }

    fn name(&self) -> &str {
        "action"
    }

    fn feed(&self, event: &EventKind, store: &mut SampleStore) -> bool {
        match event {
            EventKind::Action { name } => {
                store.record_discrete(SampleSource::Action(name.clone()));
                true
            }
            EventKind::ActionVector { name, x, y } => {
                store.record_positional(SampleSource::Action(name.clone()), (*x, *y).into());
                true
            }
            EventKind::Key { .. } | EventKind::MouseButton { .. } => false,
        }
    }
}

/// Construct the backend for an input mode.
pub fn backend_for(kind: Backend) -> Box<dyn InputBackend> {
    match kind {
        Backend::Discrete => Box::new(DiscreteBackend),
        Backend::Action => Box::new(ActionBackend),
    }
}
