//! Native WebSocket transport — `tokio-tungstenite`.
//!
//! One background tokio task per connection. The task owns the socket for
//! its whole life: it dials, emits tagged events into the session channel,
//! answers transport-level pings, and exits on close (commanded or not).
//!
//! There is no reconnection here — a dropped connection surfaces as a
//! `Disconnected` event and the task ends. Recovery is the session
//! manager's decision, driven by selection changes or an explicit rebind.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

use crate::ws::{BindingTag, MessageIn, TaggedEvent, WsConfig, WsEvent};

// ─── Commands from the session manager to the task ───────────────────────────

enum Command {
    Close,
}

// ─── WsClient ────────────────────────────────────────────────────────────────

/// Handle to one stream connection, bound to a single watchlist.
///
/// Opening spawns the background task immediately; the handshake outcome
/// arrives as a `Connected` or `Error` event carrying this binding's tag.
pub struct WsClient {
    cmd_tx: Option<mpsc::Sender<Command>>,
    task: Option<JoinHandle<()>>,
}

impl WsClient {
    /// Open a connection for `tag`, delivering events into `events`.
    pub fn open(config: &WsConfig, tag: BindingTag, events: mpsc::Sender<TaggedEvent>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let url = config.url_for(tag.watchlist_id);
        let connect_timeout = Duration::from_millis(config.connect_timeout_ms);

        let task = tokio::spawn(run_connection(url, connect_timeout, tag, events, cmd_rx));

        Self {
            cmd_tx: Some(cmd_tx),
            task: Some(task),
        }
    }

    /// Request teardown. Idempotent: closing an already-closed or
    /// never-opened handle is a no-op.
    ///
    /// Returns immediately; the background task flushes a close frame and
    /// exits on its own. No event is emitted for a commanded close.
    pub fn close(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.try_send(Command::Close);
        }
        // Detach; the task also exits when the command channel drops.
        self.task.take();
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        self.close();
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_connection(
    url: String,
    connect_timeout: Duration,
    tag: BindingTag,
    events: mpsc::Sender<TaggedEvent>,
    mut cmd_rx: mpsc::Receiver<Command>,
) {
    let emit = |event: WsEvent| {
        let _ = events.try_send(TaggedEvent { tag, event });
    };

    // ── 1. Handshake (abortable by an early close command) ───────────────
    let connect = tokio::time::timeout(connect_timeout, connect_async(&url));
    let ws_stream = tokio::select! {
        result = connect => match result {
            Ok(Ok((stream, _))) => stream,
            Ok(Err(e)) => {
                tracing::error!(%url, "WebSocket connection failed: {e}");
                emit(WsEvent::Error(format!("Connection failed: {e}")));
                return;
            }
            Err(_) => {
                tracing::error!(%url, "WebSocket connection timed out");
                emit(WsEvent::Error("Connection timeout".into()));
                return;
            }
        },
        _ = cmd_rx.recv() => {
            tracing::debug!(%url, "Connection abandoned before handshake completed");
            return;
        }
    };

    // ── 2. Connected ─────────────────────────────────────────────────────
    tracing::info!(watchlist = %tag.watchlist_id, "Quote stream connected");
    emit(WsEvent::Connected);
    let (mut sink, mut stream) = ws_stream.split();

    // ── 3. Read loop — runs until the connection ends either way ─────────
    loop {
        tokio::select! {
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let raw: &str = text.as_ref();
                        match serde_json::from_str::<MessageIn>(raw) {
                            Ok(parsed) => emit(WsEvent::Message(parsed)),
                            Err(e) => {
                                // Unrecognized shapes are dropped; the
                                // connection stays open.
                                tracing::debug!("Discarding unrecognized stream message: {e}");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = extract_close(frame.as_ref());
                        tracing::info!(
                            watchlist = %tag.watchlist_id,
                            code,
                            "Quote stream closed by server: {reason}"
                        );
                        emit(WsEvent::Disconnected { code: Some(code), reason });
                        return;
                    }
                    Some(Ok(_)) => {} // Pong, Binary, Frame — ignore
                    Some(Err(e)) => {
                        let reason = e.to_string();
                        tracing::warn!(watchlist = %tag.watchlist_id, "WebSocket error: {reason}");
                        emit(WsEvent::Disconnected { code: None, reason });
                        return;
                    }
                    None => {
                        emit(WsEvent::Disconnected {
                            code: None,
                            reason: "Stream ended".into(),
                        });
                        return;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                // Commanded close (or handle dropped). Flush a close frame
                // and exit without emitting — the session has moved on.
                let _ = cmd;
                let _ = sink
                    .send(Message::Close(Some(CloseFrame {
                        code: CloseCode::Normal,
                        reason: "client disconnect".into(),
                    })))
                    .await;
                return;
            }
        }
    }
}

/// Extract close code and reason from an optional close frame.
fn extract_close(frame: Option<&CloseFrame>) -> (u16, String) {
    match frame {
        Some(f) => (f.code.into(), f.reason.to_string()),
        None => (1006, "No close frame".into()),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::WatchlistId;

    fn tag(id: i64, epoch: u64) -> BindingTag {
        BindingTag {
            watchlist_id: WatchlistId::new(id),
            epoch,
        }
    }

    fn unroutable_config() -> WsConfig {
        WsConfig {
            // Port 1 refuses connections immediately on loopback.
            ws_base: "ws://127.0.0.1:1".into(),
            connect_timeout_ms: 2_000,
        }
    }

    #[tokio::test]
    async fn test_failed_connect_emits_tagged_error() {
        let (tx, mut rx) = mpsc::channel(8);
        let _client = WsClient::open(&unroutable_config(), tag(7, 1), tx);

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");

        assert_eq!(event.tag, tag(7, 1));
        assert!(matches!(event.event, WsEvent::Error(_)));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (tx, _rx) = mpsc::channel(8);
        let mut client = WsClient::open(&unroutable_config(), tag(1, 1), tx);

        client.close();
        client.close(); // second close is a no-op

        let mut never_opened = WsClient {
            cmd_tx: None,
            task: None,
        };
        never_opened.close();
    }

    #[test]
    fn test_extract_close_with_frame() {
        let frame = CloseFrame {
            code: CloseCode::Policy,
            reason: "Watchlist no encontrada".into(),
        };
        let (code, reason) = extract_close(Some(&frame));
        assert_eq!(code, 1008);
        assert_eq!(reason, "Watchlist no encontrada");
    }

    #[test]
    fn test_extract_close_no_frame() {
        let (code, reason) = extract_close(None);
        assert_eq!(code, 1006);
        assert_eq!(reason, "No close frame");
    }
}
