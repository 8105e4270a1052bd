//! Transport abstraction for sync requests.
//!
//! Both strategies expose the same two operations with the same contract:
//!
//! - `fetch` issues a GET and decodes a 2xx JSON body into `T`
//! - `submit` POSTs `body` as JSON and decodes a 2xx JSON body into `T`
//!
//! Every header in `headers` is attached, the call is bounded by `timeout`,
//! and an empty `url` fails with [`SyncError::InvalidInput`] before any
//! network activity. Non-2xx responses, connection failures and
//! undecodable bodies are [`SyncError::Transport`]; exceeding the budget is
//! [`SyncError::Timeout`]. Given the same response, both strategies produce
//! the same outcome, which is what lets the service treat them as
//! interchangeable.
//!
//! [`SyncError::InvalidInput`]: crate::SyncError::InvalidInput
//! [`SyncError::Transport`]: crate::SyncError::Transport
//! [`SyncError::Timeout`]: crate::SyncError::Timeout

use crate::error::SyncResult;
use crate::headers::HeaderSet;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// A result that completes later, possibly on another thread.
///
/// The future resolves exactly once. It owns everything it needs, so it
/// can be spawned or joined independently of the call that created it.
pub type Deferred<T> = BoxFuture<'static, SyncResult<T>>;

/// Non-blocking transport: every call returns a [`Deferred`] result.
///
/// The timeout is enforced by the deferred computation itself, which
/// gives up and resolves to a timeout error once the budget is spent.
pub trait ReactiveTransport: Send + Sync {
    /// Issues a GET request.
    fn fetch<T>(&self, url: &str, headers: &HeaderSet, timeout: Duration) -> Deferred<T>
    where
        T: DeserializeOwned + Send + 'static;

    /// Issues a POST request with `body` encoded as JSON.
    ///
    /// The body is encoded before this returns; the deferred result does
    /// not borrow it.
    fn submit<B, T>(
        &self,
        url: &str,
        headers: &HeaderSet,
        body: &B,
        timeout: Duration,
    ) -> Deferred<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static;
}

/// Blocking transport: every call occupies the calling thread.
///
/// The timeout is enforced by the connection and response timeouts of the
/// underlying client. Must not be called from an async worker thread.
pub trait BlockingTransport: Send + Sync {
    /// Issues a GET request.
    fn fetch<T>(&self, url: &str, headers: &HeaderSet, timeout: Duration) -> SyncResult<T>
    where
        T: DeserializeOwned;

    /// Issues a POST request with `body` encoded as JSON.
    fn submit<B, T>(
        &self,
        url: &str,
        headers: &HeaderSet,
        body: &B,
        timeout: Duration,
    ) -> SyncResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned;
}

impl<R: ReactiveTransport> ReactiveTransport for std::sync::Arc<R> {
    fn fetch<T>(&self, url: &str, headers: &HeaderSet, timeout: Duration) -> Deferred<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        (**self).fetch(url, headers, timeout)
    }

    fn submit<B, T>(
        &self,
        url: &str,
        headers: &HeaderSet,
        body: &B,
        timeout: Duration,
    ) -> Deferred<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        (**self).submit(url, headers, body, timeout)
    }
}

impl<B: BlockingTransport> BlockingTransport for std::sync::Arc<B> {
    fn fetch<T>(&self, url: &str, headers: &HeaderSet, timeout: Duration) -> SyncResult<T>
    where
        T: DeserializeOwned,
    {
        (**self).fetch(url, headers, timeout)
    }

    fn submit<Body, T>(
        &self,
        url: &str,
        headers: &HeaderSet,
        body: &Body,
        timeout: Duration,
    ) -> SyncResult<T>
    where
        Body: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        (**self).submit(url, headers, body, timeout)
    }
}
