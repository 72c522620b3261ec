//! Stream-based heartbeat source.
//!
//! Receives heartbeat records from an async byte stream. This is useful for
//! network feeds such as a TCP relay in front of the realtime store.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::{HeartbeatSource, RawHeartbeat};

/// A heartbeat source that reads newline-delimited JSON from an async stream.
///
/// A background task parses each line and queues it for `poll()`. Lines
/// that are not JSON at all are skipped and recorded as the last error.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use pulsewatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"online\":true,\"uptimeSeconds\":1}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<RawHeartbeat>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let desc = description.to_string();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        *error_handle.lock() = Some("Connection closed".to_string());
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<RawHeartbeat>(trimmed) {
                            Ok(record) => {
                                *error_handle.lock() = None;
                                if tx.send(record).await.is_err() {
                                    debug!("Source for {} dropped, stopping reader", desc);
                                    break;
                                }
                            }
                            Err(e) => {
                                *error_handle.lock() = Some(format!("Parse error: {}", e));
                            }
                        }
                    }
                    Err(e) => {
                        *error_handle.lock() = Some(format!("Read error: {}", e));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }

    /// Create a StreamSource from a channel of raw JSON payloads.
    ///
    /// Useful when another client library delivers the store's change
    /// notifications as bytes.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, record_rx) = mpsc::channel(16);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match serde_json::from_slice::<RawHeartbeat>(&bytes) {
                    Ok(record) => {
                        *error_handle.lock() = None;
                        if tx.send(record).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        *error_handle.lock() = Some(format!("Parse error: {}", e));
                    }
                }
            }
        });

        Self {
            receiver: record_rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl HeartbeatSource for StreamSource {
    fn poll(&mut self) -> Option<RawHeartbeat> {
        match self.receiver.try_recv() {
            Ok(record) => Some(record),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                let mut error = self.last_error.lock();
                if error.is_none() {
                    *error = Some("Stream disconnected".to_string());
                }
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }
}
