use snafu::prelude::*;

use crate::content::HookPhase;

/// Boxed error produced by a controller lifecycle hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("No content registered under id `{id}`"))]
    NotRegistered { id: String },

    #[snafu(display("Lifecycle hook `{phase}` failed for content `{id}`: {source}"))]
    LifecycleHook {
        id: String,
        phase: HookPhase,
        source: HookError,
    },

    #[snafu(display("Navigation rejected: another transition is in flight"))]
    ReentrantNavigation,

    #[snafu(display("Failed to lock router state: poisoned"))]
    LockPoisoned,
}

impl Error {
    /// True when the error came out of a controller hook rather than the
    /// router itself.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Error::LifecycleHook { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
