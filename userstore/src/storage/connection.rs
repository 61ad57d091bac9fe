//! One-shot initialization of a shared connection handle

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::OnceCell;

use crate::userdb::UserError;

/// Lifecycle of a [`SharedConnection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connecting,
    Ready,
    /// Terminal. Every caller sees the same error and no reconnect is attempted.
    Failed,
}

/// A handle established at most once and shared by every caller.
///
/// Concurrent first callers run a single connection attempt; the others wait
/// for it and observe the same handle or the same failure.
pub struct SharedConnection<T> {
    cell: OnceCell<Result<T, UserError>>,
    connecting: AtomicBool,
}

impl<T> Default for SharedConnection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SharedConnection<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
            connecting: AtomicBool::new(false),
        }
    }

    /// Return the shared handle, running `connect` if nobody has yet.
    ///
    /// Errors from `connect` are recorded as [`UserError::Connection`].
    pub async fn get_or_connect<F, Fut>(&self, connect: F) -> Result<&T, UserError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, UserError>>,
    {
        self.cell
            .get_or_init(|| async {
                self.connecting.store(true, Ordering::Release);
                connect().await.map_err(|e| match e {
                    UserError::Connection(_) => e,
                    other => UserError::Connection(other.to_string()),
                })
            })
            .await
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn state(&self) -> ConnectionState {
        match self.cell.get() {
            Some(Ok(_)) => ConnectionState::Ready,
            Some(Err(_)) => ConnectionState::Failed,
            None if self.connecting.load(Ordering::Acquire) => ConnectionState::Connecting,
            None => ConnectionState::Uninitialized,
        }
    }
}
