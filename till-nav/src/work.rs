//! Background work owned by displayed content.
//!
//! Content that polls or animates should run that work through a [`WorkSet`]
//! and abort it from `prepare_for_exit`, so nothing keeps ticking against a
//! view that is no longer displayed. Dropping the set aborts whatever is
//! still running.

use std::future::Future;

use tokio::task::AbortHandle;

#[derive(Debug, Default)]
pub struct WorkSet {
    handles: Vec<AbortHandle>,
}

impl WorkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a future onto the runtime and keep its abort handle.
    ///
    /// Finished work is pruned on each spawn, so long-lived content does not
    /// accumulate dead handles.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handles.retain(|handle| !handle.is_finished());
        self.handles.push(tokio::spawn(future).abort_handle());
    }

    /// Abort everything still running. Aborted tasks stop at their next
    /// await point.
    pub fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    /// Number of tasks that have not yet finished.
    pub fn active(&self) -> usize {
        self.handles.iter().filter(|handle| !handle.is_finished()).count()
    }
}

impl Drop for WorkSet {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn abort_all_stops_running_work() {
        let mut work = WorkSet::new();
        work.spawn(async {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        });
        work.spawn(async {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        });
        assert_eq!(work.active(), 2);

        work.abort_all();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(work.active(), 0);
    }

    #[tokio::test]
    async fn drop_aborts() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);
        {
            let mut work = WorkSet::new();
            work.spawn(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                flag.store(true, Ordering::Relaxed);
            });
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!finished.load(Ordering::Relaxed));
    }
}
