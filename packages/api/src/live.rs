//! Live job feed: SSE decoding, reconnect policy and a cancellable feed task.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use dispatch_core::FeedSignal;
use futures_util::future::{AbortHandle, Abortable, LocalBoxFuture};
use futures_util::stream::LocalBoxStream;
use futures_util::{FutureExt, StreamExt};
use thiserror::Error;

const DEFAULT_EVENTS_URL: &str = "http://localhost:8080/api/events";

/// URL of the live event stream, fixed at build time through `DISPATCH_EVENTS_URL`.
pub fn events_url() -> &'static str {
    option_env!("DISPATCH_EVENTS_URL").unwrap_or(DEFAULT_EVENTS_URL)
}

/// Live feed errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("failed to connect: {0}")]
    Connect(String),
    #[error("stream rejected with status {0}")]
    Status(u16),
    #[error("stream read failed: {0}")]
    Read(String),
}

/// Incremental decoder for `text/event-stream` bodies.
///
/// Yields the `data` payload of each complete event. Multi-line data is
/// joined with `\n`; comments and other fields are skipped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk. Returns every event completed by it, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=newline).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if let Some(event) = self.process_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            return Some(std::mem::take(&mut self.data).join("\n"));
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }
}

/// Bounded exponential backoff between reconnect attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Consecutive failures tolerated before giving up. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based), or None to give up.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 {
            return Some(Duration::ZERO);
        }
        if self.max_attempts.is_some_and(|max| attempt > max) {
            return None;
        }
        let factor = self.multiplier.max(1.0).powi(attempt.saturating_sub(1) as i32);
        let delay = self.initial_delay.as_secs_f64() * factor;
        let capped = delay.min(self.max_delay.as_secs_f64());
        Some(Duration::from_secs_f64(capped))
    }
}

/// Byte stream of one open connection.
pub type FeedStream = LocalBoxStream<'static, Result<Vec<u8>, FeedError>>;

/// Opens connections to the event stream.
#[allow(async_fn_in_trait)]
pub trait FeedTransport {
    async fn open(&self) -> Result<FeedStream, FeedError>;
}

/// Transport over a streaming HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl FeedTransport for HttpTransport {
    async fn open(&self) -> Result<FeedStream, FeedError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| FeedError::Connect(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| FeedError::Read(e.to_string()))
            })
            .boxed_local())
    }
}

/// How a feed task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedExit {
    /// Stopped through its handle.
    Stopped,
    /// The reconnect policy ran out of attempts.
    GaveUp,
}

/// Stops a running feed.
#[derive(Debug, Clone)]
pub struct FeedHandle {
    abort: AbortHandle,
}

impl FeedHandle {
    pub fn stop(&self) {
        self.abort.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// The running feed. Must be polled (spawned) to make progress.
pub struct FeedTask {
    inner: Abortable<LocalBoxFuture<'static, FeedExit>>,
}

impl Future for FeedTask {
    type Output = FeedExit;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<FeedExit> {
        Pin::new(&mut self.inner)
            .poll(cx)
            .map(|result| result.unwrap_or(FeedExit::Stopped))
    }
}

/// Continuously consumed live stream with reconnects.
pub struct LiveFeed<T> {
    transport: T,
    policy: ReconnectPolicy,
}

impl<T: FeedTransport + 'static> LiveFeed<T> {
    pub fn new(transport: T, policy: ReconnectPolicy) -> Self {
        Self { transport, policy }
    }

    /// Start consuming. Every frame and every lost connection goes to `sink`.
    pub fn start<F>(self, sink: F) -> (FeedHandle, FeedTask)
    where
        F: FnMut(FeedSignal) + 'static,
    {
        let (abort, registration) = AbortHandle::new_pair();
        let inner = Abortable::new(self.run(sink).boxed_local(), registration);
        (FeedHandle { abort }, FeedTask { inner })
    }

    async fn run<F>(self, mut sink: F) -> FeedExit
    where
        F: FnMut(FeedSignal),
    {
        let mut failures: u32 = 0;

        loop {
            match self.transport.open().await {
                Ok(mut stream) => {
                    tracing::debug!("Live stream opened");
                    failures = 0;

                    let mut decoder = SseDecoder::new();
                    let reason = loop {
                        match stream.next().await {
                            Some(Ok(chunk)) => {
                                for data in decoder.push(&chunk) {
                                    sink(FeedSignal::Frame(data));
                                }
                            }
                            Some(Err(e)) => break e.to_string(),
                            None => break "stream closed".to_string(),
                        }
                    };
                    sink(FeedSignal::Lost(reason));
                }
                Err(e) => sink(FeedSignal::Lost(e.to_string())),
            }

            failures += 1;
            match self.policy.delay_for(failures) {
                Some(delay) => sleep(delay).await,
                None => {
                    tracing::warn!("Giving up on live stream after {} attempts", failures);
                    return FeedExit::GaveUp;
                }
            }
        }
    }
}

async fn sleep(delay: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(delay.as_millis().min(u32::MAX as u128) as u32).await;

    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(delay).await;
}
