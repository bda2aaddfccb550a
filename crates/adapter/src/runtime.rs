//! Relay client runtime.
//!
//! Bridges the synchronous game loop with an async TCP connection to the
//! relay: a reader task parses inbound lines into [`ServerMessage`]s and a
//! writer task serializes outbound [`ClientMessage`]s, both talking to the
//! game loop over channels.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::config::RelayConfig;
use crate::protocol::{encode_message, parse_message, ClientMessage, ServerMessage};
use crate::session::OnlineSession;

/// Delivered to the game loop.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    Message(ServerMessage),
    Disconnected,
}

/// Running relay connection.
pub struct RelayClient {
    _rt: Runtime,
    event_rx: mpsc::Receiver<RelayEvent>,
    out_tx: mpsc::UnboundedSender<ClientMessage>,
}

impl RelayClient {
    /// Connect, spawn the I/O tasks and send the room `join`.
    pub fn connect(config: &RelayConfig) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let stream = rt
            .block_on(TcpStream::connect((config.host.as_str(), config.port)))
            .with_context(|| format!("failed to connect to relay {}:{}", config.host, config.port))?;
        tracing::info!(host = %config.host, port = config.port, room = %config.room, "connected to relay");

        let (event_tx, event_rx) = mpsc::channel::<RelayEvent>(config.max_pending.max(1));
        let (out_tx, out_rx) = mpsc::unbounded_channel::<ClientMessage>();

        rt.spawn(async move {
            if let Err(err) = run_connection(stream, event_tx, out_rx).await {
                tracing::warn!(error = %err, "relay connection ended with error");
            }
        });

        let client = Self {
            _rt: rt,
            event_rx,
            out_tx,
        };
        client.send(OnlineSession::join_message(&config.room, &config.name));
        Ok(client)
    }

    pub fn try_recv(&mut self) -> Option<RelayEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Queue a message for the writer task. Returns `false` once the
    /// connection is gone; the message is dropped.
    pub fn send(&self, msg: ClientMessage) -> bool {
        match self.out_tx.send(msg) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(message = ?err.0, "relay writer closed, dropping outbound message");
                false
            }
        }
    }
}

/// Drive one relay connection until either side closes it.
///
/// Lines that fail to parse are logged and skipped. A `Disconnected` event is
/// sent when the relay closes the stream.
pub async fn run_connection(
    stream: TcpStream,
    events: mpsc::Sender<RelayEvent>,
    mut outbound: mpsc::UnboundedReceiver<ClientMessage>,
) -> Result<()> {
    let (read_half, mut writer) = stream.into_split();

    let write_task = tokio::spawn(async move {
        while let Some(msg) = outbound.recv().await {
            let mut line = match encode_message(&msg) {
                Ok(line) => line,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to encode outbound message");
                    continue;
                }
            };
            line.push('\n');
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(read_half).lines();
    let result = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(err) => break Err(anyhow::Error::new(err).context("failed to read from relay")),
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_message(&line) {
            Ok(msg) => {
                if events.send(RelayEvent::Message(msg)).await.is_err() {
                    // Game loop is gone.
                    break Ok(());
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed relay line");
            }
        }
    };

    let _ = events.send(RelayEvent::Disconnected).await;
    write_task.abort();
    result
}
