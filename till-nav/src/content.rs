//! The displayable unit and its optional controller capability.

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::HookError;
use crate::state::StateMap;

/// Handle to a view owned by the router.
///
/// The router holds the only long-lived handle; hosts may clone it for the
/// duration of the current display cycle (e.g. one render pass) but must not
/// retain it past the next navigation.
pub type SharedView<V> = Arc<Mutex<V>>;

/// Which lifecycle hook was running when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Initialize,
    PrepareForExit,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Initialize => write!(f, "initialize"),
            HookPhase::PrepareForExit => write!(f, "prepare-for-exit"),
        }
    }
}

/// Optional lifecycle behaviour attached to displayed content.
///
/// Every method is independently optional; the defaults are no-ops, so a
/// controller implements only what it needs. The router mediates all calls:
///
/// - `initialize` runs exactly once per display, after the view is attached
///   to the container and before the content-changed notification fires.
/// - `prepare_for_exit` runs exactly once before teardown, while the view is
///   still attached, and is awaited to completion.
/// - `state` is consulted only when the content is pushed to history; the
///   snapshot is handed back as the `initialize` parameters on back
///   navigation.
#[async_trait]
pub trait ContentController: Send {
    async fn initialize(&mut self, parameters: StateMap) -> Result<(), HookError> {
        let _ = parameters;
        Ok(())
    }

    async fn prepare_for_exit(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    fn state(&self) -> StateMap {
        StateMap::new()
    }
}

/// A produced content unit: the view instance plus its optional controller.
///
/// Factories return one of these per display. A view without a controller is
/// perfectly valid; it simply receives no lifecycle calls and saves no state.
pub struct Content<V> {
    pub(crate) view: V,
    pub(crate) controller: Option<Box<dyn ContentController>>,
}

impl<V> Content<V> {
    /// Content with no controller capability.
    pub fn new(view: V) -> Self {
        Self {
            view,
            controller: None,
        }
    }

    /// Attach a controller to this content.
    pub fn with_controller(mut self, controller: impl ContentController + 'static) -> Self {
        self.controller = Some(Box::new(controller));
        self
    }
}
