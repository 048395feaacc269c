//! Cancellation utilities
//!
//! Every verb operation takes a cancel handle; firing it aborts the
//! in-flight call at the next suspension point and surfaces
//! [`ClientError::Cancelled`](crate::error::ClientError::Cancelled). A
//! handle that is never fired behaves like an unbounded context.

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// A handle that can be used to request cancellation of in-flight calls.
///
/// Cloning is cheap; all clones observe the same token, so a handle can be
/// passed to a request on one task and fired from another.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Any in-flight call observing this handle
    /// returns `Cancelled` as soon as possible, and dropping the aborted
    /// call closes the underlying HTTP connection.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
