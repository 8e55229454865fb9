//! Content registrations: id, factory, metadata.

use std::collections::HashMap;
use std::sync::Arc;

use crate::content::Content;
use crate::router::Navigator;
use crate::state::StateMap;

/// Produces a fresh, independent content instance for every display.
///
/// The factory receives a [`Navigator`] so views and controllers can be
/// handed the router explicitly at construction time instead of discovering
/// it through some ambient registry.
pub trait ContentFactory<V>: Send + Sync {
    fn create(&self, navigator: Navigator<V>) -> Content<V>;
}

impl<V, F> ContentFactory<V> for F
where
    F: Fn(Navigator<V>) -> Content<V> + Send + Sync,
{
    fn create(&self, navigator: Navigator<V>) -> Content<V> {
        self(navigator)
    }
}

/// A registered content entry. Immutable once stored; re-registration under
/// the same id replaces the whole entry.
pub struct ContentRegistration<V> {
    factory: Arc<dyn ContentFactory<V>>,
    metadata: StateMap,
}

impl<V> ContentRegistration<V> {
    pub(crate) fn new(factory: Arc<dyn ContentFactory<V>>, metadata: StateMap) -> Self {
        Self { factory, metadata }
    }

    pub(crate) fn factory(&self) -> Arc<dyn ContentFactory<V>> {
        Arc::clone(&self.factory)
    }

    pub fn metadata(&self) -> &StateMap {
        &self.metadata
    }
}

/// The id → registration table.
pub(crate) struct Registry<V> {
    entries: HashMap<String, ContentRegistration<V>>,
}

impl<V> Registry<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store or replace a registration. Replacement is allowed but noisy.
    pub(crate) fn insert(&mut self, id: String, registration: ContentRegistration<V>) {
        if self.entries.insert(id.clone(), registration).is_some() {
            tracing::warn!(content = %id, "replacing existing content registration");
        }
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&ContentRegistration<V>> {
        self.entries.get(id)
    }

    pub(crate) fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Register a table of content factories on a router in one statement.
///
/// # Example
/// ```ignore
/// register_contents! { router,
///     "dashboard" => |nav| Content::new(DashboardPanel::new(nav)),
///     "settings"  => |nav| Content::new(SettingsPanel::default()),
/// }
/// ```
#[macro_export]
macro_rules! register_contents {
    ($router:expr, $($id:literal => $factory:expr),* $(,)?) => {{
        $( $router.register($id, $factory); )*
    }};
}
