//! Recording transport for tests.

use crate::error::{SyncError, SyncResult};
use crate::headers::HeaderSet;
use crate::http::{decode_response, require_url, HttpMethod};
use crate::transport::{BlockingTransport, Deferred, ReactiveTransport};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Target URL.
    pub url: String,
    /// Headers supplied by the caller.
    pub headers: HeaderSet,
    /// JSON body, `Value::Null` for fetches.
    pub body: Value,
    /// Timeout supplied by the caller.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
enum Reply {
    Respond { status: u16, body: Value },
    Timeout,
    Disconnect(String),
}

impl Reply {
    fn ok(body: Value) -> Self {
        Reply::Respond { status: 200, body }
    }

    fn resolve<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: &str,
        timeout: Duration,
    ) -> SyncResult<T> {
        match self {
            Reply::Respond { status, body } => {
                let bytes = serde_json::to_vec(body).map_err(|e| {
                    SyncError::connection(format!("mock body is not serializable: {e}"))
                })?;
                decode_response(method, url, *status, &bytes)
            }
            Reply::Timeout => Err(SyncError::Timeout(timeout)),
            Reply::Disconnect(message) => Err(SyncError::connection(message.clone())),
        }
    }
}

#[derive(Debug)]
struct MockState {
    fetch_reply: Mutex<Option<Reply>>,
    submit_reply: Mutex<Reply>,
    submit_failures: Mutex<Vec<(usize, Reply)>>,
    fetch_calls: Mutex<Vec<RecordedCall>>,
    submit_calls: Mutex<Vec<RecordedCall>>,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// In-process transport implementing both [`ReactiveTransport`] and
/// [`BlockingTransport`].
///
/// Replies are classified exactly like real responses, so a mocked `503`
/// yields the same error as a remote `503`. Submits are numbered in the
/// order they are issued; a failure can be scheduled for a given index.
/// Clones share state.
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    /// Creates a mock with no fetch reply and an empty submit reply.
    pub fn new() -> Self {
        Self {
            state: Arc::new(MockState {
                fetch_reply: Mutex::new(None),
                submit_reply: Mutex::new(Reply::ok(Value::Null)),
                submit_failures: Mutex::new(Vec::new()),
                fetch_calls: Mutex::new(Vec::new()),
                submit_calls: Mutex::new(Vec::new()),
                delay: Mutex::new(None),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// Answers fetches with `200` and `body`.
    pub fn set_fetch_response(&self, body: Value) {
        *self.state.fetch_reply.lock() = Some(Reply::ok(body));
    }

    /// Answers fetches with `status` and `body`.
    pub fn set_fetch_status(&self, status: u16, body: Value) {
        *self.state.fetch_reply.lock() = Some(Reply::Respond { status, body });
    }

    /// Makes fetches time out.
    pub fn fail_fetch_with_timeout(&self) {
        *self.state.fetch_reply.lock() = Some(Reply::Timeout);
    }

    /// Makes fetches fail without a response.
    pub fn fail_fetch_with_disconnect(&self, message: impl Into<String>) {
        *self.state.fetch_reply.lock() = Some(Reply::Disconnect(message.into()));
    }

    /// Answers submits with `200` and `body`.
    pub fn set_submit_response(&self, body: Value) {
        *self.state.submit_reply.lock() = Reply::ok(body);
    }

    /// Answers the submit numbered `index` (zero-based) with `status`.
    pub fn fail_submit_at(&self, index: usize, status: u16) {
        self.state.submit_failures.lock().push((
            index,
            Reply::Respond {
                status,
                body: Value::Null,
            },
        ));
    }

    /// Makes the submit numbered `index` (zero-based) time out.
    pub fn fail_submit_at_with_timeout(&self, index: usize) {
        self.state
            .submit_failures
            .lock()
            .push((index, Reply::Timeout));
    }

    /// Holds every call for `delay` before replying.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock() = Some(delay);
    }

    /// Returns the fetches observed so far.
    pub fn fetch_calls(&self) -> Vec<RecordedCall> {
        self.state.fetch_calls.lock().clone()
    }

    /// Returns the submits observed so far, in issue order.
    pub fn submit_calls(&self) -> Vec<RecordedCall> {
        self.state.submit_calls.lock().clone()
    }

    /// Returns the largest number of reactive calls pending at once.
    pub fn peak_in_flight(&self) -> usize {
        self.state.peak_in_flight.load(Ordering::SeqCst)
    }

    fn record_fetch(&self, url: &str, headers: &HeaderSet, timeout: Duration) -> Reply {
        self.state.fetch_calls.lock().push(RecordedCall {
            url: url.to_string(),
            headers: headers.clone(),
            body: Value::Null,
            timeout,
        });
        self.state
            .fetch_reply
            .lock()
            .clone()
            .unwrap_or_else(|| Reply::Disconnect("no mock fetch response set".into()))
    }

    fn record_submit<B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: &HeaderSet,
        body: &B,
        timeout: Duration,
    ) -> SyncResult<Reply> {
        let body = serde_json::to_value(body)
            .map_err(|e| SyncError::invalid_input(format!("failed to encode request body: {e}")))?;

        let index = {
            let mut calls = self.state.submit_calls.lock();
            calls.push(RecordedCall {
                url: url.to_string(),
                headers: headers.clone(),
                body,
                timeout,
            });
            calls.len() - 1
        };

        let scheduled = self
            .state
            .submit_failures
            .lock()
            .iter()
            .find(|(at, _)| *at == index)
            .map(|(_, reply)| reply.clone());
        Ok(scheduled.unwrap_or_else(|| self.state.submit_reply.lock().clone()))
    }

    fn deferred<T>(&self, method: HttpMethod, url: &str, reply: Reply, timeout: Duration) -> Deferred<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let delay = *self.state.delay.lock();
        let url = url.to_string();

        Box::pin(async move {
            let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            state.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            state.in_flight.fetch_sub(1, Ordering::SeqCst);
            reply.resolve(method, &url, timeout)
        })
    }

    fn pause(&self) {
        if let Some(delay) = *self.state.delay.lock() {
            std::thread::sleep(delay);
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReactiveTransport for MockTransport {
    fn fetch<T>(&self, url: &str, headers: &HeaderSet, timeout: Duration) -> Deferred<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if let Err(e) = require_url(url) {
            return Box::pin(futures::future::ready(Err(e)));
        }
        let reply = self.record_fetch(url, headers, timeout);
        self.deferred(HttpMethod::Get, url, reply, timeout)
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
        let reply = require_url(url).and_then(|_| self.record_submit(url, headers, body, timeout));
        match reply {
            Ok(reply) => self.deferred(HttpMethod::Post, url, reply, timeout),
            Err(e) => Box::pin(futures::future::ready(Err(e))),
        }
    }
}

impl BlockingTransport for MockTransport {
    fn fetch<T>(&self, url: &str, headers: &HeaderSet, timeout: Duration) -> SyncResult<T>
    where
        T: DeserializeOwned,
    {
        require_url(url)?;
        let reply = self.record_fetch(url, headers, timeout);
        self.pause();
        reply.resolve(HttpMethod::Get, url, timeout)
    }

    fn submit<B, T>(
        &self,
        url: &str,
        headers: &HeaderSet,
        body: &B,
        timeout: Duration,
    ) -> SyncResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        require_url(url)?;
        let reply = self.record_submit(url, headers, body, timeout)?;
        self.pause();
        reply.resolve(HttpMethod::Post, url, timeout)
    }
}
