//! Navigation event notifications.
//!
//! Observers are dispatched synchronously, in registration order, on the
//! task performing the navigation. They are notification sinks: an observer
//! must not call back into the router from inside a callback.

use crate::content::SharedView;
use crate::error::Error;

/// Receives router notifications. Every method is optional.
pub trait RouterObserver<V>: Send {
    /// A swap is starting. `from` is `None` when the router was idle.
    fn content_changing(&mut self, from: Option<&str>, to: &str) {
        let _ = (from, to);
    }

    /// A swap committed; `view` is the freshly attached instance.
    fn content_changed(&mut self, id: &str, view: &SharedView<V>) {
        let _ = (id, view);
    }

    /// A navigation failed. The router has already recovered.
    fn navigation_error(&mut self, error: &Error) {
        let _ = error;
    }
}

/// Registered observers, dispatched in order.
pub(crate) struct Observers<V> {
    list: Vec<Box<dyn RouterObserver<V>>>,
}

impl<V> Observers<V> {
    pub(crate) fn new() -> Self {
        Self { list: Vec::new() }
    }

    pub(crate) fn push(&mut self, observer: Box<dyn RouterObserver<V>>) {
        self.list.push(observer);
    }

    pub(crate) fn content_changing(&mut self, from: Option<&str>, to: &str) {
        for obs in &mut self.list {
            obs.content_changing(from, to);
        }
    }

    pub(crate) fn content_changed(&mut self, id: &str, view: &SharedView<V>) {
        for obs in &mut self.list {
            obs.content_changed(id, view);
        }
    }

    pub(crate) fn navigation_error(&mut self, error: &Error) {
        for obs in &mut self.list {
            obs.navigation_error(error);
        }
    }
}
