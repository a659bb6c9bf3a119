//! One-shot request/response exchange with the remote text endpoint.
//!
//! Each commit opens a fresh TCP connection, writes the raw UTF-8 payload
//! with no framing or terminator, and performs exactly one read of up to
//! 4 KiB. A reply split across more than one chunk is truncated to its
//! first read; that matches the behavior this replaces and stays until the
//! wire format grows framing. No retry, no connection reuse.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::info;

const READ_BUF_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("connect to {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        source: std::io::Error,
    },

    #[error("write to {endpoint} failed: {source}")]
    Write {
        endpoint: String,
        source: std::io::Error,
    },

    #[error("read from {endpoint} failed: {source}")]
    Read {
        endpoint: String,
        source: std::io::Error,
    },

    #[error("no reply from {endpoint} within {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },
}

/// Sends one committed sentence and returns the first reply chunk.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    endpoint: String,
    read_timeout: Duration,
}

impl Dispatcher {
    pub fn new(host: &str, port: u16, read_timeout: Duration) -> Self {
        Self {
            endpoint: format!("{host}:{port}"),
            read_timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One exchange: connect, write the whole payload, read once.
    pub async fn dispatch(&self, text: &str) -> Result<String, DispatchError> {
        let mut stream =
            TcpStream::connect(&self.endpoint)
                .await
                .map_err(|source| DispatchError::Connect {
                    endpoint: self.endpoint.clone(),
                    source,
                })?;

        stream
            .write_all(text.as_bytes())
            .await
            .map_err(|source| DispatchError::Write {
                endpoint: self.endpoint.clone(),
                source,
            })?;
        info!(endpoint = %self.endpoint, bytes = text.len(), "sentence sent");

        let mut buf = vec![0u8; READ_BUF_SIZE];
        let n = match tokio::time::timeout(self.read_timeout, stream.read(&mut buf)).await {
            Ok(Ok(n)) => n,
            Ok(Err(source)) => {
                return Err(DispatchError::Read {
                    endpoint: self.endpoint.clone(),
                    source,
                });
            }
            Err(_) => {
                return Err(DispatchError::Timeout {
                    endpoint: self.endpoint.clone(),
                    timeout: self.read_timeout,
                });
            }
        };

        let reply = String::from_utf8_lossy(&buf[..n]).into_owned();
        info!(endpoint = %self.endpoint, bytes = n, "server responded");
        Ok(reply)
    }
}
