//! Control connection to the extension.
//!
//! A spawned task owns the WebSocket. Callers talk to it through an mpsc
//! channel and get their [`Response`] back on a oneshot keyed by request id.
//! Events go to the single registered [`EventHandler`].

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{from_str, to_string};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::instrument::WithSubscriber;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{RequestId, TabId};
use crate::protocol::{Event, Request, Response};

// ============================================================================
// Constants
// ============================================================================

/// Default time a command may take.
pub(crate) const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Time the extension has to send READY after connecting.
const READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Requests in flight before new ones are rejected.
const MAX_PENDING_REQUESTS: usize = 100;

// ============================================================================
// Types
// ============================================================================

type CorrelationMap = FxHashMap<RequestId, oneshot::Sender<Result<Response>>>;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Callback invoked for every event from the extension.
pub type EventHandler = Box<dyn Fn(Event) + Send + Sync>;

/// Receiver for the READY handshake, registered before the loop starts.
pub(crate) type ReadyReceiver = oneshot::Receiver<Result<Response>>;

// ============================================================================
// ReadyData
// ============================================================================

/// Contents of the READY handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyData {
    /// Tab the extension opened the init page in.
    pub tab_id: TabId,
    /// Session id echoed back by the extension.
    pub session_id: u32,
}

// ============================================================================
// ConnectionCommand
// ============================================================================

enum ConnectionCommand {
    Send {
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
    },
    RemoveCorrelation(RequestId),
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// Handle to the event loop. Cheap to clone.
#[derive(Clone)]
pub struct Connection {
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    correlation: Arc<Mutex<CorrelationMap>>,
    event_handler: Arc<Mutex<Option<EventHandler>>>,
}

impl Connection {
    /// Spawns the event loop and returns the READY receiver.
    ///
    /// The READY slot is registered before the loop runs so a handshake sent
    /// right after the upgrade is never dropped as unknown.
    pub(crate) fn open(ws_stream: WebSocketStream<TcpStream>) -> (Self, ReadyReceiver) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        let mut map = CorrelationMap::default();
        map.insert(RequestId::ready(), ready_tx);
        let correlation = Arc::new(Mutex::new(map));
        let event_handler: Arc<Mutex<Option<EventHandler>>> = Arc::new(Mutex::new(None));

        tokio::spawn(
            Self::run_event_loop(
                ws_stream,
                command_rx,
                Arc::clone(&correlation),
                Arc::clone(&event_handler),
            )
            .with_current_subscriber(),
        );

        let connection = Self {
            command_tx,
            correlation,
            event_handler,
        };
        (connection, ready_rx)
    }

    /// Waits for READY and decodes it.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if READY does not arrive in time
    /// - [`Error::ConnectionClosed`] if the socket closes first
    /// - [`Error::Protocol`] if READY carries no tab id
    pub(crate) async fn wait_ready(ready_rx: ReadyReceiver) -> Result<ReadyData> {
        let response = timeout(READY_TIMEOUT, ready_rx)
            .await
            .map_err(|_| Error::connection_timeout(READY_TIMEOUT.as_millis() as u64))?
            .map_err(|_| Error::ConnectionClosed)??;

        let raw_tab = u32::try_from(response.get_u64("tabId")).unwrap_or_default();
        let tab_id = TabId::new(raw_tab)
            .ok_or_else(|| Error::protocol("READY handshake without a tab id"))?;
        let session_id = u32::try_from(response.get_u64("sessionId")).unwrap_or_default();

        debug!(%tab_id, session_id, "READY handshake completed");

        Ok(ReadyData { tab_id, session_id })
    }

    /// Replaces the event handler.
    pub fn set_event_handler(&self, handler: EventHandler) {
        *self.event_handler.lock() = Some(handler);
    }

    /// Removes the event handler.
    pub fn clear_event_handler(&self) {
        *self.event_handler.lock() = None;
    }

    /// Sends a request with the default timeout.
    ///
    /// # Errors
    ///
    /// See [`Connection::send_with_timeout`].
    pub async fn send(&self, request: Request) -> Result<Response> {
        self.send_with_timeout(request, DEFAULT_COMMAND_TIMEOUT)
            .await
    }

    /// Sends a request and waits for its response.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the loop has stopped
    /// - [`Error::RequestTimeout`] if no response arrives in time
    /// - [`Error::Protocol`] if too many requests are in flight
    pub async fn send_with_timeout(
        &self,
        request: Request,
        request_timeout: Duration,
    ) -> Result<Response> {
        let request_id = request.id;

        let pending = self.correlation.lock().len();
        if pending >= MAX_PENDING_REQUESTS {
            warn!(pending, max = MAX_PENDING_REQUESTS, "Too many pending requests");
            return Err(Error::protocol(format!(
                "Too many pending requests: {pending}/{MAX_PENDING_REQUESTS}"
            )));
        }

        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(ConnectionCommand::Send {
                request,
                response_tx,
            })
            .map_err(|_| Error::ConnectionClosed)?;

        match timeout(request_timeout, response_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                let _ = self
                    .command_tx
                    .send(ConnectionCommand::RemoveCorrelation(request_id));
                Err(Error::request_timeout(
                    request_id,
                    request_timeout.as_millis() as u64,
                ))
            }
        }
    }

    /// Asks the loop to close the socket. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    async fn run_event_loop(
        ws_stream: WebSocketStream<TcpStream>,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
        event_handler: Arc<Mutex<Option<EventHandler>>>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                message = ws_read.next() => match message {
                    Some(Ok(Message::Text(text))) => {
                        Self::handle_incoming_message(&text, &correlation, &event_handler);
                    }
                    Some(Ok(Message::Close(_))) => {
                        debug!("WebSocket closed by extension");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    None => {
                        debug!("WebSocket stream ended");
                        break;
                    }
                    Some(Ok(_)) => {}
                },

                command = command_rx.recv() => match command {
                    Some(ConnectionCommand::Send { request, response_tx }) => {
                        Self::handle_send_command(request, response_tx, &mut ws_write, &correlation)
                            .await;
                    }
                    Some(ConnectionCommand::RemoveCorrelation(request_id)) => {
                        correlation.lock().remove(&request_id);
                        trace!(%request_id, "Removed timed-out correlation");
                    }
                    Some(ConnectionCommand::Shutdown) | None => {
                        let _ = ws_write.close().await;
                        break;
                    }
                },
            }
        }

        Self::fail_pending_requests(&correlation);
        debug!("Event loop terminated");
    }

    fn handle_incoming_message(
        text: &str,
        correlation: &Mutex<CorrelationMap>,
        event_handler: &Mutex<Option<EventHandler>>,
    ) {
        if let Ok(response) = from_str::<Response>(text) {
            match correlation.lock().remove(&response.id) {
                Some(tx) => {
                    let _ = tx.send(Ok(response));
                }
                None => warn!(id = %response.id, "Response for unknown request"),
            }
            return;
        }

        if let Ok(event) = from_str::<Event>(text) {
            if let Some(handler) = event_handler.lock().as_ref() {
                handler(event);
            }
            return;
        }

        warn!(text = %text, "Unparseable message from extension");
    }

    async fn handle_send_command(
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
        ws_write: &mut WsSink,
        correlation: &Mutex<CorrelationMap>,
    ) {
        let request_id = request.id;

        let json = match to_string(&request) {
            Ok(json) => json,
            Err(e) => {
                let _ = response_tx.send(Err(Error::Json(e)));
                return;
            }
        };

        correlation.lock().insert(request_id, response_tx);

        if let Err(e) = ws_write.send(Message::Text(json.into())).await
            && let Some(tx) = correlation.lock().remove(&request_id)
        {
            let _ = tx.send(Err(Error::connection(e.to_string())));
            return;
        }

        trace!(%request_id, "Request sent");
    }

    fn fail_pending_requests(correlation: &Mutex<CorrelationMap>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, tx) in pending {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
