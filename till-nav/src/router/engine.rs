//! The navigation engine: content swaps, history, lifecycle mediation.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use snafu::prelude::*;

use crate::content::{Content, ContentController, HookPhase, SharedView};
use crate::error::{Error, NotRegisteredSnafu, ReentrantNavigationSnafu, Result};
use crate::events::{Observers, RouterObserver};
use crate::registry::{ContentFactory, ContentRegistration, Registry};
use crate::router::history::{HistoryStack, NavigationEntry};
use crate::state::StateMap;

/// Where the router is in its display lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterPhase {
    /// No content shown.
    Idle,
    /// A content instance is active.
    Displaying,
    /// An async swap is in flight; navigation requests are rejected.
    Transitioning,
}

/// The host's display surface.
///
/// The router notifies the container when a view becomes, or stops being,
/// the displayed child. Calls arrive while the router holds its own state
/// lock, so a container must not call back into the router.
pub trait Container<V>: Send {
    fn attach(&mut self, id: &str, view: &SharedView<V>);
    fn release(&mut self, id: &str, view: &SharedView<V>);
}

/// The currently displayed content.
struct Active<V> {
    id: String,
    view: SharedView<V>,
    controller: Option<Box<dyn ContentController>>,
}

struct RouterInner<V> {
    registry: Registry<V>,
    history: HistoryStack,
    phase: RouterPhase,
    current: Option<Active<V>>,
    observers: Observers<V>,
    container: Box<dyn Container<V>>,
}

/// A navigation manager that swaps content inside a fixed container, keeps a
/// back-navigation history, and mediates controller lifecycle calls.
///
/// `ContentRouter` is a cheap cloneable handle over shared state; clones all
/// address the same router. Hand views a [`Navigator`] (the weak
/// counterpart) instead of a clone so the displayed content never keeps its
/// own router alive.
///
/// # Example
/// ```ignore
/// let router: ContentRouter<MyView> = ContentRouter::new(surface);
/// router.register("menu", |nav| Content::new(MyView::menu(nav)));
/// router.show_content("menu", true, StateMap::new()).await;
/// ```
pub struct ContentRouter<V> {
    inner: Arc<Mutex<RouterInner<V>>>,
}

impl<V> Clone for ContentRouter<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Weak handle to a [`ContentRouter`], for injection into content factories.
pub struct Navigator<V> {
    inner: Weak<Mutex<RouterInner<V>>>,
}

impl<V> Clone for Navigator<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

/// Restores a stable phase when a transition unwinds early. The commit path
/// sets `Displaying` itself, so this only fires on failed swaps.
struct PhaseReset<'a, V> {
    inner: &'a Mutex<RouterInner<V>>,
}

impl<V> Drop for PhaseReset<'_, V> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            if inner.phase == RouterPhase::Transitioning {
                inner.phase = if inner.current.is_some() {
                    RouterPhase::Displaying
                } else {
                    RouterPhase::Idle
                };
            }
        }
    }
}

impl<V: Send + 'static> ContentRouter<V> {
    /// Create an idle router displaying into `container`.
    pub fn new(container: impl Container<V> + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RouterInner {
                registry: Registry::new(),
                history: HistoryStack::new(),
                phase: RouterPhase::Idle,
                current: None,
                observers: Observers::new(),
                container: Box::new(container),
            })),
        }
    }

    /// A weak handle suitable for handing to views and controllers.
    pub fn navigator(&self) -> Navigator<V> {
        Navigator {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Subscribe to navigation notifications. Observers are dispatched
    /// synchronously in registration order.
    pub fn add_observer(&self, observer: impl RouterObserver<V> + 'static) {
        if let Ok(mut inner) = self.lock() {
            inner.observers.push(Box::new(observer));
        }
    }

    /// Register content under `id`. Re-registration replaces the previous
    /// entry with a warning; the content currently on display is unaffected.
    pub fn register<F>(&self, id: impl Into<String>, factory: F)
    where
        F: ContentFactory<V> + 'static,
    {
        self.register_with_metadata(id, factory, StateMap::new());
    }

    /// Register content with host-defined metadata (titles, ordering hints).
    pub fn register_with_metadata<F>(&self, id: impl Into<String>, factory: F, metadata: StateMap)
    where
        F: ContentFactory<V> + 'static,
    {
        let id = id.into();
        match self.lock() {
            Ok(mut inner) => {
                inner
                    .registry
                    .insert(id, ContentRegistration::new(Arc::new(factory), metadata));
            }
            Err(error) => tracing::error!(content = %id, %error, "registration dropped"),
        }
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.lock().map(|inner| inner.registry.contains(id)).unwrap_or(false)
    }

    /// All registered ids, sorted.
    pub fn registered_ids(&self) -> Vec<String> {
        self.lock().map(|inner| inner.registry.ids()).unwrap_or_default()
    }

    /// Metadata stored with a registration.
    pub fn metadata(&self, id: &str) -> Option<StateMap> {
        self.lock()
            .ok()
            .and_then(|inner| inner.registry.get(id).map(|reg| reg.metadata().clone()))
    }

    /// Identifier of the content on display, if any.
    pub fn current_id(&self) -> Option<String> {
        self.lock()
            .ok()
            .and_then(|inner| inner.current.as_ref().map(|active| active.id.clone()))
    }

    /// Handle to the view on display. Valid for the current display cycle
    /// only; the router remains the owner.
    pub fn current_view(&self) -> Option<SharedView<V>> {
        self.lock()
            .ok()
            .and_then(|inner| inner.current.as_ref().map(|active| Arc::clone(&active.view)))
    }

    pub fn phase(&self) -> RouterPhase {
        self.lock().map(|inner| inner.phase).unwrap_or(RouterPhase::Idle)
    }

    pub fn history_len(&self) -> usize {
        self.lock().map(|inner| inner.history.len()).unwrap_or(0)
    }

    /// Drop all back-navigation entries.
    pub fn clear_history(&self) {
        if let Ok(mut inner) = self.lock() {
            inner.history.clear();
        }
    }

    /// True iff back navigation has somewhere to go. Pure query.
    pub fn can_navigate_back(&self) -> bool {
        self.lock().map(|inner| !inner.history.is_empty()).unwrap_or(false)
    }

    /// Swap the displayed content to `id`.
    ///
    /// With `add_to_history`, the outgoing content (if any, and if its id
    /// differs) is pushed onto the history stack together with its
    /// controller's state snapshot. `parameters` are delivered to the new
    /// controller's `initialize`.
    ///
    /// Failures are logged, surfaced through the navigation-error event and
    /// reported as `None`; the router recovers to a stable phase and never
    /// keeps a half-initialized view.
    pub async fn show_content(
        &self,
        id: &str,
        add_to_history: bool,
        parameters: StateMap,
    ) -> Option<SharedView<V>> {
        tracing::debug!(content = %id, add_to_history, "show content");
        match self.try_show(id, add_to_history, parameters).await {
            Ok(view) => Some(view),
            Err(error) => {
                self.report(&error);
                None
            }
        }
    }

    /// Pop the most recent history entry and show it, restoring the saved
    /// state as `initialize` parameters. Empty history is not an error: the
    /// call logs a warning and returns `None`.
    pub async fn navigate_back(&self) -> Option<SharedView<V>> {
        match self.pop_history() {
            Ok(Some(entry)) => {
                // `add_to_history = false`: the back target must not be
                // re-pushed, or repeated back navigation would never drain
                // the stack.
                self.show_content(&entry.id, false, entry.saved_state).await
            }
            Ok(None) => {
                tracing::warn!("back navigation requested with empty history");
                None
            }
            Err(error) => {
                self.report(&error);
                None
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, RouterInner<V>>> {
        self.inner.lock().map_err(|_| Error::LockPoisoned)
    }

    fn pop_history(&self) -> Result<Option<NavigationEntry>> {
        let mut inner = self.lock()?;
        // Do not consume an entry a rejected request could never show.
        ensure!(
            inner.phase != RouterPhase::Transitioning,
            ReentrantNavigationSnafu
        );
        Ok(inner.history.pop())
    }

    async fn try_show(
        &self,
        id: &str,
        add_to_history: bool,
        parameters: StateMap,
    ) -> Result<SharedView<V>> {
        // Validation, the reentrancy gate and detaching the current content
        // happen under one lock acquisition; every await below runs with the
        // lock released.
        let (outgoing, factory) = {
            let mut inner = self.lock()?;
            ensure!(
                inner.phase != RouterPhase::Transitioning,
                ReentrantNavigationSnafu
            );
            let factory = inner
                .registry
                .get(id)
                .context(NotRegisteredSnafu { id })?
                .factory();
            inner.phase = RouterPhase::Transitioning;
            let from = inner.current.as_ref().map(|active| active.id.clone());
            inner.observers.content_changing(from.as_deref(), id);
            (inner.current.take(), factory)
        };
        let _reset = PhaseReset {
            inner: &*self.inner,
        };

        if let Some(mut active) = outgoing {
            // Exit preparation runs to completion while the outgoing view is
            // still attached.
            if let Some(controller) = active.controller.as_mut() {
                if let Err(source) = controller.prepare_for_exit().await {
                    self.release_view(&active.id, &active.view);
                    return Err(Error::LifecycleHook {
                        id: active.id,
                        phase: HookPhase::PrepareForExit,
                        source,
                    });
                }
            }

            // Capture the state snapshot before the controller is dropped.
            // The id being shown is never pushed, so same-id navigation
            // leaves the stack untouched.
            if add_to_history && active.id != id {
                let saved = active
                    .controller
                    .as_ref()
                    .map(|controller| controller.state())
                    .unwrap_or_default();
                self.lock()?
                    .history
                    .push(NavigationEntry::new(active.id.clone(), saved));
            }

            // The previous view is fully released before the next attaches.
            self.release_view(&active.id, &active.view);
            drop(active);
        }

        // A fresh, independent instance per display.
        let Content {
            view,
            mut controller,
        } = factory.create(self.navigator());
        let view = Arc::new(Mutex::new(view));

        self.lock()?.container.attach(id, &view);

        // Initialize after attachment, before content-changed fires. A
        // failure tears the half-initialized view back down to Idle.
        if let Some(controller) = controller.as_mut() {
            if let Err(source) = controller.initialize(parameters).await {
                self.release_view(id, &view);
                return Err(Error::LifecycleHook {
                    id: id.to_string(),
                    phase: HookPhase::Initialize,
                    source,
                });
            }
        }

        let mut inner = self.lock()?;
        inner.current = Some(Active {
            id: id.to_string(),
            view: Arc::clone(&view),
            controller,
        });
        inner.phase = RouterPhase::Displaying;
        tracing::debug!(content = %id, "content displayed");
        inner.observers.content_changed(id, &view);
        Ok(view)
    }

    fn release_view(&self, id: &str, view: &SharedView<V>) {
        match self.lock() {
            Ok(mut inner) => inner.container.release(id, view),
            Err(_) => tracing::error!(content = %id, "router lock poisoned while releasing view"),
        }
    }

    fn report(&self, error: &Error) {
        match error {
            Error::ReentrantNavigation => tracing::warn!(%error, "navigation rejected"),
            _ => tracing::error!(%error, "navigation failed"),
        }
        if let Ok(mut inner) = self.inner.lock() {
            inner.observers.navigation_error(error);
        }
    }
}

impl<V: Send + 'static> Navigator<V> {
    /// Upgrade to a strong router handle, if the router is still alive.
    pub fn upgrade(&self) -> Option<ContentRouter<V>> {
        self.inner.upgrade().map(|inner| ContentRouter { inner })
    }

    /// Forward navigation with history. Returns `None` if the router is
    /// gone or the navigation failed.
    pub async fn navigate(&self, id: &str, parameters: StateMap) -> Option<SharedView<V>> {
        match self.upgrade() {
            Some(router) => router.show_content(id, true, parameters).await,
            None => {
                tracing::warn!(content = %id, "navigate on a dropped router");
                None
            }
        }
    }

    pub async fn back(&self) -> Option<SharedView<V>> {
        match self.upgrade() {
            Some(router) => router.navigate_back().await,
            None => {
                tracing::warn!("back navigation on a dropped router");
                None
            }
        }
    }

    pub fn can_navigate_back(&self) -> bool {
        self.upgrade().map_or(false, |router| router.can_navigate_back())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    use crate::error::HookError;

    struct TestView {
        label: String,
    }

    impl TestView {
        fn new(label: &str) -> Self {
            Self {
                label: label.to_string(),
            }
        }
    }

    type CallLog = Arc<Mutex<Vec<String>>>;

    fn log_push(log: &CallLog, entry: String) {
        log.lock().unwrap().push(entry);
    }

    fn log_entries(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    struct RecordingContainer {
        log: CallLog,
    }

    impl Container<TestView> for RecordingContainer {
        fn attach(&mut self, id: &str, _view: &SharedView<TestView>) {
            log_push(&self.log, format!("attach:{id}"));
        }

        fn release(&mut self, id: &str, _view: &SharedView<TestView>) {
            log_push(&self.log, format!("release:{id}"));
        }
    }

    struct CollectingObserver {
        log: CallLog,
    }

    impl RouterObserver<TestView> for CollectingObserver {
        fn content_changing(&mut self, from: Option<&str>, to: &str) {
            log_push(&self.log, format!("changing:{}->{to}", from.unwrap_or("-")));
        }

        fn content_changed(&mut self, id: &str, view: &SharedView<TestView>) {
            let label = view.lock().unwrap().label.clone();
            log_push(&self.log, format!("changed:{id}:{label}"));
        }

        fn navigation_error(&mut self, error: &Error) {
            let kind = match error {
                Error::NotRegistered { .. } => "not-registered",
                Error::LifecycleHook { .. } => "lifecycle",
                Error::ReentrantNavigation => "reentrant",
                Error::LockPoisoned => "poisoned",
            };
            log_push(&self.log, format!("error:{kind}"));
        }
    }

    struct RecordingController {
        name: &'static str,
        log: CallLog,
        saved: StateMap,
        received: Arc<Mutex<Option<StateMap>>>,
    }

    #[async_trait]
    impl ContentController for RecordingController {
        async fn initialize(&mut self, parameters: StateMap) -> std::result::Result<(), HookError> {
            log_push(&self.log, format!("init:{}", self.name));
            *self.received.lock().unwrap() = Some(parameters);
            Ok(())
        }

        async fn prepare_for_exit(&mut self) -> std::result::Result<(), HookError> {
            log_push(&self.log, format!("exit:{}", self.name));
            Ok(())
        }

        fn state(&self) -> StateMap {
            self.saved.clone()
        }
    }

    struct FailingController {
        fail_init: bool,
        fail_exit: bool,
    }

    #[async_trait]
    impl ContentController for FailingController {
        async fn initialize(&mut self, _parameters: StateMap) -> std::result::Result<(), HookError> {
            if self.fail_init {
                Err("initialize refused".into())
            } else {
                Ok(())
            }
        }

        async fn prepare_for_exit(&mut self) -> std::result::Result<(), HookError> {
            if self.fail_exit {
                Err("exit refused".into())
            } else {
                Ok(())
            }
        }
    }

    struct GatedController {
        gate: Option<oneshot::Receiver<()>>,
    }

    #[async_trait]
    impl ContentController for GatedController {
        async fn initialize(&mut self, _parameters: StateMap) -> std::result::Result<(), HookError> {
            if let Some(gate) = self.gate.take() {
                let _ = gate.await;
            }
            Ok(())
        }
    }

    struct Fixture {
        router: ContentRouter<TestView>,
        log: CallLog,
    }

    impl Fixture {
        fn new() -> Self {
            let log: CallLog = Arc::new(Mutex::new(Vec::new()));
            let router = ContentRouter::new(RecordingContainer { log: log.clone() });
            router.add_observer(CollectingObserver { log: log.clone() });
            Self { router, log }
        }

        /// Register plain content with a recording controller.
        fn register_page(&self, id: &'static str, saved: StateMap) -> Arc<Mutex<Option<StateMap>>> {
            let received = Arc::new(Mutex::new(None));
            let handle = Arc::clone(&received);
            let log = self.log.clone();
            self.router.register(id, move |_nav: Navigator<TestView>| {
                Content::new(TestView::new(id)).with_controller(RecordingController {
                    name: id,
                    log: log.clone(),
                    saved: saved.clone(),
                    received: Arc::clone(&handle),
                })
            });
            received
        }

        fn errors(&self) -> usize {
            log_entries(&self.log)
                .iter()
                .filter(|entry| entry.starts_with("error:"))
                .count()
        }
    }

    #[tokio::test]
    async fn show_then_back_scenario() {
        let fx = Fixture::new();
        let a_params = fx.register_page("a", StateMap::new());
        fx.register_page("b", StateMap::new());

        assert!(fx.router.show_content("a", true, StateMap::new()).await.is_some());
        assert_eq!(fx.router.current_id().as_deref(), Some("a"));
        assert_eq!(fx.router.history_len(), 0);
        assert_eq!(fx.router.phase(), RouterPhase::Displaying);

        assert!(fx.router.show_content("b", true, StateMap::new()).await.is_some());
        assert_eq!(fx.router.current_id().as_deref(), Some("b"));
        assert_eq!(fx.router.history_len(), 1);

        assert!(fx.router.navigate_back().await.is_some());
        assert_eq!(fx.router.current_id().as_deref(), Some("a"));
        assert_eq!(fx.router.history_len(), 0);
        assert!(a_params.lock().unwrap().is_some());
        assert_eq!(fx.errors(), 0);
    }

    #[tokio::test]
    async fn history_grows_by_one_per_forward_show() {
        let fx = Fixture::new();
        for id in ["a", "b", "c"] {
            fx.register_page(id, StateMap::new());
        }

        fx.router.show_content("a", true, StateMap::new()).await;
        assert_eq!(fx.router.history_len(), 0);
        fx.router.show_content("b", true, StateMap::new()).await;
        assert_eq!(fx.router.history_len(), 1);
        fx.router.show_content("c", true, StateMap::new()).await;
        assert_eq!(fx.router.history_len(), 2);
        fx.router.show_content("a", true, StateMap::new()).await;
        assert_eq!(fx.router.history_len(), 3);
    }

    #[tokio::test]
    async fn repeated_back_strictly_shrinks() {
        let fx = Fixture::new();
        for id in ["a", "b", "c"] {
            fx.register_page(id, StateMap::new());
        }
        fx.router.show_content("a", true, StateMap::new()).await;
        fx.router.show_content("b", true, StateMap::new()).await;
        fx.router.show_content("c", true, StateMap::new()).await;

        assert!(fx.router.navigate_back().await.is_some());
        assert_eq!(fx.router.history_len(), 1);
        assert!(fx.router.navigate_back().await.is_some());
        assert_eq!(fx.router.history_len(), 0);

        // Empty history fails silently: no view, no error event.
        assert!(fx.router.navigate_back().await.is_none());
        assert_eq!(fx.router.history_len(), 0);
        assert_eq!(fx.router.current_id().as_deref(), Some("a"));
        assert_eq!(fx.errors(), 0);
    }

    #[tokio::test]
    async fn unregistered_id_is_rejected() {
        let fx = Fixture::new();
        fx.register_page("a", StateMap::new());
        fx.router.show_content("a", true, StateMap::new()).await;

        let shown = fx.router.show_content("ghost", true, StateMap::new()).await;
        assert!(shown.is_none());
        assert_eq!(fx.router.current_id().as_deref(), Some("a"));
        assert_eq!(fx.router.phase(), RouterPhase::Displaying);
        assert_eq!(fx.router.history_len(), 0);

        let errors: Vec<String> = log_entries(&fx.log)
            .into_iter()
            .filter(|entry| entry.starts_with("error:"))
            .collect();
        assert_eq!(errors, vec!["error:not-registered"]);
    }

    #[tokio::test]
    async fn saved_state_round_trips_through_history() {
        let fx = Fixture::new();
        let saved = StateMap::new().with("cursor", 5).with("filter", "open");
        let a_params = fx.register_page("a", saved.clone());
        fx.register_page("b", StateMap::new());

        fx.router.show_content("a", true, StateMap::new()).await;
        fx.router.show_content("b", true, StateMap::new()).await;
        fx.router.navigate_back().await;

        let received = a_params.lock().unwrap().clone().unwrap();
        assert_eq!(received, saved);
    }

    #[tokio::test]
    async fn lifecycle_order_is_strict() {
        let fx = Fixture::new();
        fx.register_page("a", StateMap::new());
        fx.register_page("b", StateMap::new());

        fx.router.show_content("a", true, StateMap::new()).await;
        fx.router.show_content("b", true, StateMap::new()).await;

        assert_eq!(
            log_entries(&fx.log),
            vec![
                "changing:-->a",
                "attach:a",
                "init:a",
                "changed:a:a",
                "changing:a->b",
                "exit:a",
                "release:a",
                "attach:b",
                "init:b",
                "changed:b:b",
            ]
        );
    }

    #[tokio::test]
    async fn initialize_failure_recovers_to_idle() {
        let fx = Fixture::new();
        fx.register_page("a", StateMap::new());
        fx.router.register("bad", |_nav: Navigator<TestView>| {
            Content::new(TestView::new("bad")).with_controller(FailingController {
                fail_init: true,
                fail_exit: false,
            })
        });

        fx.router.show_content("a", true, StateMap::new()).await;
        let shown = fx.router.show_content("bad", true, StateMap::new()).await;

        assert!(shown.is_none());
        assert_eq!(fx.router.phase(), RouterPhase::Idle);
        assert!(fx.router.current_id().is_none());
        assert_eq!(fx.errors(), 1);
        // The half-initialized view was released again.
        let entries = log_entries(&fx.log);
        assert!(entries.contains(&"attach:bad".to_string()));
        assert!(entries.contains(&"release:bad".to_string()));
        // "a" went onto the stack before the failure, so back navigation
        // still recovers it.
        assert_eq!(fx.router.history_len(), 1);
        assert!(fx.router.navigate_back().await.is_some());
        assert_eq!(fx.router.current_id().as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn exit_failure_fails_the_swap() {
        let fx = Fixture::new();
        fx.register_page("a", StateMap::new());
        fx.router.register("brittle", |_nav: Navigator<TestView>| {
            Content::new(TestView::new("brittle")).with_controller(FailingController {
                fail_init: false,
                fail_exit: true,
            })
        });

        fx.router.show_content("brittle", true, StateMap::new()).await;
        let shown = fx.router.show_content("a", true, StateMap::new()).await;

        assert!(shown.is_none());
        assert_eq!(fx.router.phase(), RouterPhase::Idle);
        assert!(fx.router.current_id().is_none());
        // Failure happened before the history push; nothing was recorded.
        assert_eq!(fx.router.history_len(), 0);
        assert_eq!(fx.errors(), 1);

        // The router stays usable.
        assert!(fx.router.show_content("a", true, StateMap::new()).await.is_some());
        assert_eq!(fx.router.current_id().as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn mid_transition_requests_are_rejected() {
        let fx = Fixture::new();
        fx.register_page("fast", StateMap::new());

        let (open, gate) = oneshot::channel();
        let gate = Arc::new(Mutex::new(Some(gate)));
        fx.router.register("slow", move |_nav: Navigator<TestView>| {
            Content::new(TestView::new("slow")).with_controller(GatedController {
                gate: gate.lock().unwrap().take(),
            })
        });

        fx.router.show_content("fast", true, StateMap::new()).await;

        let second = fx.router.clone();
        let (first, rejected) = tokio::join!(
            fx.router.show_content("slow", true, StateMap::new()),
            async move {
                // Let the first call reach its suspended initialize hook.
                tokio::task::yield_now().await;
                assert_eq!(second.phase(), RouterPhase::Transitioning);
                let shown = second.show_content("fast", true, StateMap::new()).await;
                let back = second.navigate_back().await;
                let _ = open.send(());
                (shown, back)
            }
        );

        assert!(first.is_some());
        assert!(rejected.0.is_none());
        assert!(rejected.1.is_none());
        assert_eq!(fx.router.current_id().as_deref(), Some("slow"));
        assert_eq!(fx.router.phase(), RouterPhase::Displaying);
        // The rejected back navigation must not have consumed the entry.
        assert_eq!(fx.router.history_len(), 1);

        let reentrant = log_entries(&fx.log)
            .iter()
            .filter(|entry| *entry == "error:reentrant")
            .count();
        assert_eq!(reentrant, 2);
    }

    #[tokio::test]
    async fn same_id_show_does_not_push_history() {
        let fx = Fixture::new();
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        fx.router.register("a", move |_nav: Navigator<TestView>| {
            counter.fetch_add(1, Ordering::Relaxed);
            Content::new(TestView::new("a"))
        });

        fx.router.show_content("a", true, StateMap::new()).await;
        fx.router.show_content("a", true, StateMap::new()).await;

        assert_eq!(fx.router.history_len(), 0);
        assert_eq!(fx.router.current_id().as_deref(), Some("a"));
        // Each display is a fresh instance.
        assert_eq!(built.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn reregistration_replaces_factory() {
        let fx = Fixture::new();
        fx.router
            .register("a", |_nav: Navigator<TestView>| Content::new(TestView::new("one")));
        fx.router.show_content("a", true, StateMap::new()).await;

        fx.router
            .register("a", |_nav: Navigator<TestView>| Content::new(TestView::new("two")));
        let view = fx.router.show_content("a", true, StateMap::new()).await.unwrap();
        assert_eq!(view.lock().unwrap().label, "two");
    }

    #[tokio::test]
    async fn metadata_and_ids_are_queryable() {
        let fx = Fixture::new();
        fx.router.register_with_metadata(
            "sales",
            |_nav: Navigator<TestView>| Content::new(TestView::new("sales")),
            StateMap::new().with("title", "Sales"),
        );
        fx.router
            .register("menu", |_nav: Navigator<TestView>| Content::new(TestView::new("menu")));

        assert!(fx.router.is_registered("sales"));
        assert!(!fx.router.is_registered("refunds"));
        assert_eq!(fx.router.registered_ids(), vec!["menu", "sales"]);
        assert_eq!(
            fx.router.metadata("sales").unwrap().get_str("title"),
            Some("Sales")
        );
        assert!(fx.router.metadata("menu").unwrap().is_empty());
    }

    #[tokio::test]
    async fn navigator_does_not_keep_router_alive() {
        let fx = Fixture::new();
        fx.register_page("a", StateMap::new());
        let navigator = fx.router.navigator();

        assert!(navigator.navigate("a", StateMap::new()).await.is_some());
        assert!(navigator.upgrade().is_some());

        drop(fx);
        assert!(navigator.upgrade().is_none());
        assert!(navigator.navigate("a", StateMap::new()).await.is_none());
        assert!(!navigator.can_navigate_back());
    }

    #[tokio::test]
    async fn can_navigate_back_is_pure() {
        let fx = Fixture::new();
        fx.register_page("a", StateMap::new());
        fx.register_page("b", StateMap::new());
        fx.router.show_content("a", true, StateMap::new()).await;
        fx.router.show_content("b", true, StateMap::new()).await;

        assert!(fx.router.can_navigate_back());
        assert!(fx.router.can_navigate_back());
        assert_eq!(fx.router.history_len(), 1);
    }

    #[tokio::test]
    async fn clear_history_removes_back_targets() {
        let fx = Fixture::new();
        fx.register_page("a", StateMap::new());
        fx.register_page("b", StateMap::new());
        fx.router.show_content("a", true, StateMap::new()).await;
        fx.router.show_content("b", true, StateMap::new()).await;

        fx.router.clear_history();
        assert!(!fx.router.can_navigate_back());
        assert!(fx.router.navigate_back().await.is_none());
        assert_eq!(fx.router.current_id().as_deref(), Some("b"));
    }
}
