//! Live activity stream channel
//!
//! Wraps the persistent event-stream connection to the backend. Inbound
//! payloads are a trigger, not a delta: every non-keep-alive line produces
//! exactly one `Message` signal and nothing is parsed. The channel never
//! reconnects on its own; once it reports `Closed`, fallback is the poll
//! scheduler's job.

use crate::client::ApiClient;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Lines starting with this character are keep-alives and are discarded
const KEEP_ALIVE_SENTINEL: char = ':';

/// Signals emitted by the live channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSignal {
    /// Stream connection established; polling can be suspended
    Opened,
    /// One inbound data message arrived (payload intentionally ignored)
    Message,
    /// Stream failed or ended; the channel will not reconnect itself
    Closed,
}

/// Handle to one live stream connection
///
/// Exactly one instance may be active per coordinator; re-subscribing must
/// drop the previous handle first. Dropping aborts the reader task, so the
/// connection is released on every exit path.
pub struct LiveChannel {
    signals: mpsc::Receiver<ChannelSignal>,
    task: JoinHandle<()>,
}

impl LiveChannel {
    /// Open the stream for the given workspace scope and start reading
    pub fn connect(client: ApiClient, workspace: Option<String>) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(run_stream(client, workspace, tx));
        Self { signals: rx, task }
    }

    /// Receive the next signal
    ///
    /// Returns `None` once the reader task has finished and all buffered
    /// signals were consumed.
    pub async fn recv(&mut self) -> Option<ChannelSignal> {
        self.signals.recv().await
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_stream(client: ApiClient, workspace: Option<String>, tx: mpsc::Sender<ChannelSignal>) {
    let response = match client.open_stream(workspace.as_deref()).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Failed to open activity stream");
            let _ = tx.send(ChannelSignal::Closed).await;
            return;
        }
    };

    info!(workspace = ?workspace, "Activity stream connected");
    if tx.send(ChannelSignal::Opened).await.is_err() {
        return;
    }

    let mut stream = response.bytes_stream();
    let mut buffer = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(error = %e, "Activity stream transport error");
                break;
            }
        };
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(newline) = buffer.find('\n') {
            let line: String = buffer.drain(..=newline).collect();
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            if line.starts_with(KEEP_ALIVE_SENTINEL) {
                debug!("Discarding stream keep-alive");
                continue;
            }
            if tx.send(ChannelSignal::Message).await.is_err() {
                // Receiver dropped, stop reading
                return;
            }
        }
    }

    info!("Activity stream closed");
    let _ = tx.send(ChannelSignal::Closed).await;
}
