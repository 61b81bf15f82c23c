use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Detached work that outlives the request which started it.
///
/// Every task is counted while it runs and a panic inside it is caught and
/// logged, never propagated. The join handle yields `None` for a task that
/// panicked. Shutdown waits on the counter through [`BackgroundTasks::shutdown`].
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    inner: Arc<Tracker>,
}

#[derive(Default)]
struct Tracker {
    outstanding: AtomicUsize,
    idle: Notify,
}

/// Decrements the counter when the task finishes, whether it returned or panicked.
struct TaskGuard(Arc<Tracker>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if self.0.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self) -> TaskGuard {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        TaskGuard(Arc::clone(&self.inner))
    }

    /// Run `task` on the async runtime.
    pub fn spawn<F, T>(&self, name: &'static str, task: F) -> JoinHandle<Option<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.register();
        tokio::spawn(async move {
            let _guard = guard;
            match AssertUnwindSafe(task).catch_unwind().await {
                Ok(value) => Some(value),
                Err(payload) => {
                    report_panic(name, payload.as_ref());
                    None
                }
            }
        })
    }

    /// Run a blocking closure on the runtime's blocking pool.
    pub fn spawn_blocking<F, T>(&self, name: &'static str, work: F) -> JoinHandle<Option<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.register();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            match catch_unwind(AssertUnwindSafe(work)) {
                Ok(value) => Some(value),
                Err(payload) => {
                    report_panic(name, payload.as_ref());
                    None
                }
            }
        })
    }

    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Resolves once no task is outstanding.
    pub async fn wait(&self) {
        loop {
            let mut notified = pin!(self.inner.idle.notified());
            notified.as_mut().enable();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Wait up to `timeout` for outstanding tasks. Returns `true` if they all
    /// finished in time.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        let pending = self.outstanding();
        if pending == 0 {
            return true;
        }

        info!(pending, "waiting for background tasks to finish");
        match tokio::time::timeout(timeout, self.wait()).await {
            Ok(()) => {
                info!("background tasks finished");
                true
            }
            Err(_) => {
                warn!(
                    pending = self.outstanding(),
                    timeout = ?timeout,
                    "background tasks still running at shutdown deadline"
                );
                false
            }
        }
    }
}

impl fmt::Debug for BackgroundTasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundTasks")
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

fn report_panic(task: &'static str, payload: &(dyn Any + Send)) {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    error!(task, panic = message, "background task panicked");
}
