//! The update queue and its single background worker.
//!
//! The queue holds package names in FIFO order with set semantics:
//! enqueueing a name already present is a no-op, so duplicates collapse to
//! the earliest position. One worker thread is the only consumer; it is
//! spawned lazily on the first trigger and respawned by a later trigger if
//! it died. Losing in-flight work is acceptable, since periodic sweeps
//! re-enqueue everything.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;

use tracing::{debug, warn};

use crate::reconcile::reconcile_package;
use crate::registry::RegistryInner;

#[derive(Default)]
struct QueueState {
    queue: VecDeque<String>,
    current: Option<String>,
    worker_alive: bool,
}

/// Shared queue state; all mutation and inspection happens under one lock.
pub(crate) struct UpdateQueue {
    state: Mutex<QueueState>,
    nonempty: Condvar,
}

impl UpdateQueue {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            nonempty: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // A worker that died by panic must not wedge the queue.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// True iff the package is being processed right now or waiting in the
    /// queue.
    pub(crate) fn is_scheduled(&self, name: &str) -> bool {
        let state = self.lock();
        state.current.as_deref() == Some(name) || state.queue.iter().any(|n| n == name)
    }

    #[cfg(test)]
    pub(crate) fn queued_len(&self) -> usize {
        self.lock().queue.len()
    }
}

/// Enqueue a package for reconciliation, starting (or restarting) the
/// worker when needed.
pub(crate) fn trigger_update(inner: &Arc<RegistryInner>, name: &str) {
    let mut state = inner.queue.lock();

    if !state.worker_alive {
        match spawn_worker(Arc::clone(inner)) {
            Ok(()) => state.worker_alive = true,
            Err(err) => {
                warn!("Failed to spawn update worker: {}", err);
                return;
            }
        }
    }

    if !state.queue.iter().any(|n| n == name) {
        state.queue.push_back(name.to_string());
    }
    drop(state);

    inner.queue.nonempty.notify_one();
}

fn spawn_worker(inner: Arc<RegistryInner>) -> std::io::Result<()> {
    thread::Builder::new()
        .name("petrel-update-worker".into())
        .spawn(move || run_worker(inner))?;
    Ok(())
}

/// Clears the liveness flag and the in-flight marker on every exit path,
/// panic included, so the next trigger respawns a clean worker.
struct WorkerGuard(Arc<RegistryInner>);

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let mut state = self.0.queue.lock();
        state.worker_alive = false;
        state.current = None;
    }
}

fn run_worker(inner: Arc<RegistryInner>) {
    debug!("Update worker started");
    let _guard = WorkerGuard(Arc::clone(&inner));

    loop {
        let name = {
            let mut state = inner.queue.lock();
            loop {
                if let Some(name) = state.queue.pop_front() {
                    state.current = Some(name.clone());
                    break name;
                }
                state = inner
                    .queue
                    .nonempty
                    .wait(state)
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
            }
        };

        if let Err(err) = reconcile_package(&inner, &name) {
            warn!("Update of package {} failed: {}", name, err);
        }

        inner.queue.lock().current = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use petrel_db::DbController;

    use super::*;
    use crate::test_utils::{commit, info_doc, wait_until, TestSetup};

    fn seeded(setup: &TestSetup) {
        setup
            .db
            .add_package(&petrel_core::Package::new(
                "foo".into(),
                "u1".into(),
                setup.remote(),
            ))
            .unwrap();
        setup.stub.set_branches(vec![("master".into(), commit("c0", 100))]);
        setup.stub.put_file("c0", &info_doc("foo"));
    }

    #[test]
    fn test_worker_drains_queue() {
        let setup = TestSetup::new();
        seeded(&setup);
        setup.stub.set_read_delay(Duration::from_millis(50));

        setup.registry.trigger_package_update("foo");
        assert!(setup.registry.is_package_scheduled_for_update("foo"));

        wait_until(|| !setup.registry.is_package_scheduled_for_update("foo"));

        let pack = setup.db.get_package("foo").unwrap().unwrap();
        assert_eq!(pack.branches.len(), 1);
    }

    #[test]
    fn test_triggers_deduplicate() {
        let setup = TestSetup::new();
        seeded(&setup);
        // keep the worker busy long enough to observe the queue
        setup.stub.set_read_delay(Duration::from_millis(500));

        setup.registry.trigger_package_update("foo");
        setup.registry.trigger_package_update("foo");
        setup.registry.trigger_package_update("foo");

        assert!(setup.registry.inner.queue.queued_len() <= 1);
        assert!(setup.registry.is_package_scheduled_for_update("foo"));

        wait_until(|| !setup.registry.is_package_scheduled_for_update("foo"));
    }

    #[test]
    fn test_reconcile_error_does_not_kill_worker() {
        let setup = TestSetup::new();
        seeded(&setup);

        // unknown package first: the reconciler skips it and the worker
        // must go on to process the real one
        setup.registry.trigger_package_update("ghost");
        setup.registry.trigger_package_update("foo");

        wait_until(|| !setup.registry.is_package_scheduled_for_update("foo"));

        let pack = setup.db.get_package("foo").unwrap().unwrap();
        assert_eq!(pack.branches.len(), 1);
        assert!(!setup.registry.is_package_scheduled_for_update("ghost"));
    }

    #[test]
    fn test_queue_is_fifo_across_packages() {
        let setup = TestSetup::new();
        seeded(&setup);
        setup
            .db
            .add_package(&petrel_core::Package::new(
                "bar".into(),
                "u1".into(),
                setup.remote(),
            ))
            .unwrap();
        setup.stub.put_file("c0", &info_doc("foo"));

        setup.registry.trigger_package_update("foo");
        setup.registry.trigger_package_update("bar");

        wait_until(|| {
            !setup.registry.is_package_scheduled_for_update("foo")
                && !setup.registry.is_package_scheduled_for_update("bar")
        });
    }
}
