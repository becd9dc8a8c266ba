//! Test helpers for integration tests
//!
//! Provides a self-contained test server, HTTP request helpers and a minimal
//! Server-Sent Events reader.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use feed_api::{create_app, create_app_state, run_server, start_sweeper};
use feed_common::{AppConfig, AppError};
use feed_realtime::SweeperHandle;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Header carrying the acting identity
pub const IDENTITY_HEADER: &str = "x-feed-identity";

/// Test server instance that manages lifecycle
///
/// Dropping it cancels the server; [`shutdown`](Self::shutdown) also waits
/// for the server task and the presence sweeper.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    stream_client: Client,
    shutdown: CancellationToken,
    sweeper: Option<SweeperHandle>,
    handle: Option<JoinHandle<Result<(), AppError>>>,
}

impl TestServer {
    /// Start a server with default configuration
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a server with configuration variables overridden, e.g.
    /// `("FEED_PRESENCE_EXPIRY_MS", "200")`
    pub async fn start_with(vars: &[(&str, &str)]) -> Result<Self> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let config = AppConfig::from_lookup(|key| vars.get(key).cloned())?;

        let state = create_app_state(config).await?;
        let shutdown = state.shutdown().clone();
        let sweeper = start_sweeper(&state);
        let app = create_app(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(run_server(app, listener, shutdown.clone()));

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        // no overall timeout: SSE bodies stay open
        let stream_client = Client::builder().build()?;

        Ok(Self {
            addr,
            client,
            stream_client,
            shutdown,
            sweeper: Some(sweeper),
            handle: Some(handle),
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with query parameters
    pub async fn get_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Response> {
        Ok(self.client.get(self.url(path)).query(query).send().await?)
    }

    /// POST a JSON body without an identity header
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// POST a JSON body acting as `identity`
    pub async fn post_as<T: Serialize>(
        &self,
        path: &str,
        identity: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header(IDENTITY_HEADER, identity)
            .json(body)
            .send()
            .await?)
    }

    /// Open a Server-Sent Events stream
    ///
    /// Returns once the response headers arrived, at which point the server
    /// side subscription is in place.
    pub async fn open_stream(&self, path: &str) -> Result<SseStream> {
        let response = self
            .stream_client
            .get(self.url(path))
            .header("accept", "text/event-stream")
            .send()
            .await?;
        assert_status(&response, StatusCode::OK)?;

        Ok(SseStream::new(response))
    }

    /// Cancel the server and wait for it and the sweeper to stop
    pub async fn shutdown(mut self) -> Result<()> {
        self.shutdown.cancel();

        if let Some(handle) = self.handle.take() {
            handle.await.context("server task panicked")??;
        }
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.stop().await;
        }
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// One Server-Sent Event
#[derive(Debug, Clone)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

impl SseEvent {
    /// Parse the data line as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.data)?)
    }
}

/// Incremental reader over an SSE response body
pub struct SseStream {
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    buffer: String,
}

impl SseStream {
    fn new(response: Response) -> Self {
        Self {
            body: response
                .bytes_stream()
                .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                .boxed(),
            buffer: String::new(),
        }
    }

    /// Next named event; `None` once the server closed the stream
    ///
    /// Keep-alive comments are skipped.
    pub async fn next_event(&mut self) -> Result<Option<SseEvent>> {
        loop {
            while let Some(end) = self.buffer.find("\n\n") {
                let frame: String = self.buffer.drain(..end + 2).collect();
                if let Some(event) = parse_frame(&frame) {
                    return Ok(Some(event));
                }
            }

            match self.body.next().await {
                Some(chunk) => self.buffer.push_str(&String::from_utf8_lossy(&chunk?)),
                None => return Ok(None),
            }
        }
    }

    /// Next named event, failing if none arrives within `limit`
    pub async fn expect_event(&mut self, limit: Duration) -> Result<SseEvent> {
        tokio::time::timeout(limit, self.next_event())
            .await
            .context("timed out waiting for an event")??
            .context("stream closed before an event arrived")
    }
}

fn parse_frame(frame: &str) -> Option<SseEvent> {
    let mut event = None;
    let mut data = Vec::new();

    for line in frame.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            event = Some(value.trim_start().to_string());
        } else if let Some(value) = line.strip_prefix("data:") {
            data.push(value.trim_start());
        }
    }

    event.map(|event| SseEvent {
        event,
        data: data.join("\n"),
    })
}

/// Assert a response status
pub fn assert_status(response: &Response, expected: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected {
        anyhow::bail!("Expected status {expected}, got {status}");
    }
    Ok(())
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame() {
        let event = parse_frame("event: post\ndata: {\"id\":\"p1\"}\n\n").unwrap();
        assert_eq!(event.event, "post");
        assert_eq!(event.data, "{\"id\":\"p1\"}");

        assert!(parse_frame(":\n\n").is_none());
    }
}
