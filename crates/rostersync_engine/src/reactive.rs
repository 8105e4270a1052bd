//! Non-blocking HTTP transport.

use crate::error::{SyncError, SyncResult};
use crate::headers::HeaderSet;
use crate::http::{decode_response, encode_body, header_map, request_error, require_url, HttpMethod};
use crate::transport::{Deferred, ReactiveTransport};
use futures::future;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

/// HTTP transport built on the async `reqwest` client.
///
/// Each call returns a [`Deferred`] that runs on whichever runtime polls
/// it. The request, response and body decoding all happen inside a single
/// `tokio::time::timeout`, so a slow body counts against the same budget
/// as a slow connect.
#[derive(Debug, Clone)]
pub struct ReactiveHttpClient {
    client: Client,
}

impl ReactiveHttpClient {
    /// Creates a client with a fresh connection pool.
    pub fn new() -> SyncResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| SyncError::connection(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Creates a client on top of an existing `reqwest` client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn prepare(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HeaderSet,
    ) -> SyncResult<RequestBuilder> {
        require_url(url)?;
        let headers = header_map(headers)?;
        let builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        Ok(builder.headers(headers))
    }
}

impl ReactiveTransport for ReactiveHttpClient {
    fn fetch<T>(&self, url: &str, headers: &HeaderSet, timeout: Duration) -> Deferred<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match self.prepare(HttpMethod::Get, url, headers) {
            Ok(request) => Box::pin(execute(HttpMethod::Get, url.to_string(), request, timeout)),
            Err(e) => Box::pin(future::ready(Err(e))),
        }
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
        let request = self.prepare(HttpMethod::Post, url, headers).and_then(|request| {
            let body = encode_body(body)?;
            debug!(url, body = %String::from_utf8_lossy(&body), "POST request body");
            Ok(request.body(body))
        });

        match request {
            Ok(request) => Box::pin(execute(HttpMethod::Post, url.to_string(), request, timeout)),
            Err(e) => Box::pin(future::ready(Err(e))),
        }
    }
}

async fn execute<T: DeserializeOwned>(
    method: HttpMethod,
    url: String,
    request: RequestBuilder,
    timeout: Duration,
) -> SyncResult<T> {
    debug!(%method, url = %url, "Sending request");

    let exchange = async {
        let response = request
            .send()
            .await
            .map_err(|e| request_error(method, &url, e, timeout))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| request_error(method, &url, e, timeout))?;
        decode_response(method, &url, status, &body)
    };

    match tokio::time::timeout(timeout, exchange).await {
        Ok(result) => result,
        Err(_) => {
            error!(%method, url = %url, ?timeout, "Request timed out");
            Err(SyncError::Timeout(timeout))
        }
    }
}
