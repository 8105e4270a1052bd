//! Blocking HTTP transport.

use crate::error::{SyncError, SyncResult};
use crate::headers::HeaderSet;
use crate::http::{decode_response, encode_body, header_map, request_error, require_url, HttpMethod};
use crate::transport::BlockingTransport;
use parking_lot::Mutex;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// HTTP transport built on the blocking `reqwest` client.
///
/// One underlying client, with its connection pool, is kept per distinct
/// timeout so that the connect and response timeouts match the call's
/// budget. Clones share the cache. Calls hold the invoking thread until a
/// response, an error or the timeout; run them on a dedicated thread (for
/// example `tokio::task::spawn_blocking`) when the caller lives inside an
/// async runtime.
#[derive(Debug, Clone, Default)]
pub struct BlockingHttpClient {
    user_agent: Option<String>,
    clients: Arc<Mutex<HashMap<Duration, Client>>>,
}

impl BlockingHttpClient {
    /// Creates a client.
    pub fn new() -> Self {
        info!("Blocking HTTP client initialized");
        Self::default()
    }

    /// Sets the `User-Agent` sent with every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self.clients = Arc::default();
        self
    }

    fn client(&self, timeout: Duration) -> SyncResult<Client> {
        let mut clients = self.clients.lock();
        if let Some(client) = clients.get(&timeout) {
            return Ok(client.clone());
        }

        let client = self.build_client(timeout)?;
        debug!(?timeout, "Built blocking HTTP client");
        clients.insert(timeout, client.clone());
        Ok(client)
    }

    fn build_client(&self, timeout: Duration) -> SyncResult<Client> {
        let mut builder = Client::builder().connect_timeout(timeout).timeout(timeout);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder
            .build()
            .map_err(|e| SyncError::connection(format!("failed to create HTTP client: {e}")))
    }

    fn prepare(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HeaderSet,
        timeout: Duration,
    ) -> SyncResult<RequestBuilder> {
        require_url(url)?;
        let headers = header_map(headers)?;
        let client = self.client(timeout)?;
        let builder = match method {
            HttpMethod::Get => client.get(url),
            HttpMethod::Post => client.post(url),
        };
        Ok(builder.headers(headers))
    }
}

impl BlockingTransport for BlockingHttpClient {
    fn fetch<T>(&self, url: &str, headers: &HeaderSet, timeout: Duration) -> SyncResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.prepare(HttpMethod::Get, url, headers, timeout)?;
        execute(HttpMethod::Get, url, request, timeout)
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
        let request = self.prepare(HttpMethod::Post, url, headers, timeout)?;
        let body = encode_body(body)?;
        debug!(url, body = %String::from_utf8_lossy(&body), "POST request body");
        execute(HttpMethod::Post, url, request.body(body), timeout)
    }
}

fn execute<T: DeserializeOwned>(
    method: HttpMethod,
    url: &str,
    request: RequestBuilder,
    timeout: Duration,
) -> SyncResult<T> {
    debug!(%method, url, "Sending request");

    let response = request
        .send()
        .map_err(|e| request_error(method, url, e, timeout))?;
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .map_err(|e| request_error(method, url, e, timeout))?;

    decode_response(method, url, status, &body)
}
