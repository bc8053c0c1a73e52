//! Per-request cancellation.
//!
//! A [`RequestContext`] is created by the handler for each request and passed by
//! reference into every service and repository call. Store operations run
//! through [`RequestContext::run`], which abandons them as soon as the request is
//! cancelled or its deadline passes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::{TodoError, TodoResult};

/// Cloneable trigger for one request's cancellation.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so this only returns once cancelled
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Cancellation signal and optional deadline for one request.
///
/// Dropping the context cancels it, so work tied to a request whose handler
/// future was dropped (client went away) stops as well.
#[derive(Debug)]
pub struct RequestContext {
    handle: CancelHandle,
    deadline: Option<Instant>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    /// A context with no deadline.
    pub fn new() -> Self {
        Self {
            handle: CancelHandle::new(),
            deadline: None,
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            handle: CancelHandle::new(),
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Handle that observes (and can trigger) this context's cancellation.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fail fast with `Cancelled` if the request is already over.
    pub fn ensure_active(&self) -> TodoResult<()> {
        if self.handle.is_cancelled() {
            return Err(TodoError::Cancelled("request cancelled".to_string()));
        }
        if self.is_cancelled() {
            return Err(TodoError::Cancelled("request deadline exceeded".to_string()));
        }
        Ok(())
    }

    /// Drive `operation` unless the request is cancelled or times out first.
    ///
    /// The operation is dropped (not awaited further) when cancellation wins.
    pub async fn run<F, T>(&self, operation: F) -> TodoResult<T>
    where
        F: Future<Output = TodoResult<T>>,
    {
        self.ensure_active()?;

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.handle.cancelled() => {
                tracing::debug!("Store operation abandoned: request cancelled");
                Err(TodoError::Cancelled("request cancelled".to_string()))
            }
            _ = expired => {
                tracing::debug!("Store operation abandoned: deadline exceeded");
                Err(TodoError::Cancelled("request deadline exceeded".to_string()))
            }
            result = operation => result,
        }
    }
}

impl Drop for RequestContext {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}
