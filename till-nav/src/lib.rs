//! Engine-agnostic content navigation.
//!
//! A [`ContentRouter`] swaps views inside a host [`Container`], keeps a
//! back-navigation history with per-entry saved state, and mediates the
//! optional [`ContentController`] lifecycle of whatever is on display. The
//! router is generic over the view type, so hosts bring their own rendering.

pub mod content;
pub mod error;
pub mod events;
pub mod registry;
pub mod router;
pub mod state;
pub mod work;

pub use error::{Error, HookError, Result};

// Re-export common types for convenience
pub use content::{Content, ContentController, HookPhase, SharedView};
pub use events::RouterObserver;
pub use registry::{ContentFactory, ContentRegistration};
pub use router::{Container, ContentRouter, NavigationEntry, Navigator, RouterPhase};
pub use state::StateMap;
pub use work::WorkSet;
