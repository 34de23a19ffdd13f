#![allow(dead_code)]

use std::error::Error;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use futures_util::StreamExt;
use tokio::net::TcpListener;

pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Serve `router` on an ephemeral loopback port.
pub async fn spawn_server(router: Router) -> TestResult<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("test server stopped: {e}");
        }
    });
    Ok(addr)
}

/// A loopback address nothing is listening on.
pub async fn closed_port() -> TestResult<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

/// Minimal reader for `data:` frames of a text/event-stream response.
pub struct FrameReader {
    body: futures_util::stream::BoxStream<'static, reqwest::Result<axum::body::Bytes>>,
    buffer: String,
}

impl FrameReader {
    pub fn new(response: reqwest::Response) -> Self {
        Self {
            body: response.bytes_stream().boxed(),
            buffer: String::new(),
        }
    }

    /// Next frame's data payload, waiting at most five seconds.
    pub async fn next_frame(&mut self) -> TestResult<String> {
        tokio::time::timeout(Duration::from_secs(5), self.read_frame()).await?
    }

    async fn read_frame(&mut self) -> TestResult<String> {
        loop {
            let normalized = self.buffer.replace("\r\n", "\n");
            if let Some(end) = normalized.find("\n\n") {
                let frame = normalized[..end].to_string();
                self.buffer = normalized[end + 2..].to_string();
                let data: Vec<&str> = frame
                    .lines()
                    .filter_map(|line| line.strip_prefix("data:"))
                    .map(|value| value.strip_prefix(' ').unwrap_or(value))
                    .collect();
                if data.is_empty() {
                    continue;
                }
                return Ok(data.join("\n"));
            }

            match self.body.next().await {
                Some(chunk) => self.buffer.push_str(std::str::from_utf8(&chunk?)?),
                None => return Err("stream ended".into()),
            }
        }
    }
}
