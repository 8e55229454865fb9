//! Back-navigation history.

use serde::{Deserialize, Serialize};

use crate::state::StateMap;

/// One step of back-navigation: where to return and what state to restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub id: String,
    pub saved_state: StateMap,
}

impl NavigationEntry {
    pub fn new(id: impl Into<String>, saved_state: StateMap) -> Self {
        Self {
            id: id.into(),
            saved_state,
        }
    }
}

/// LIFO stack of navigation entries. Unbounded; hosts that care can call
/// [`HistoryStack::clear`] at natural boundaries (e.g. logout).
#[derive(Debug, Default)]
pub(crate) struct HistoryStack {
    entries: Vec<NavigationEntry>,
}

impl HistoryStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: NavigationEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn pop(&mut self) -> Option<NavigationEntry> {
        self.entries.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
