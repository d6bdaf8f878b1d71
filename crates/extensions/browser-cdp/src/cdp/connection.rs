//! The browser WebSocket, shared by the client and every page session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{RwLock, mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{CdpRequest, CdpResponse};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub(crate) type WsSource = SplitStream<WsStream>;
type Reply = oneshot::Sender<Result<Value, CdpError>>;

/// Upper bound for a single command round trip.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Command multiplexer over one socket. Responses are matched by id, events are
/// routed to the session that registered for them.
pub(crate) struct Connection {
    sink: tokio::sync::Mutex<SplitSink<WsStream, Message>>,
    next_id: AtomicU64,
    waiting: Mutex<HashMap<u64, Reply>>,
    sessions: RwLock<HashMap<String, mpsc::UnboundedSender<CdpResponse>>>,
}

impl Connection {
    /// Open the socket. The returned source must be handed to [`Connection::pump`].
    pub async fn open(ws_url: &str) -> Result<(Self, WsSource), CdpError> {
        let (stream, _) = tokio_tungstenite::connect_async(ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket {}: {}", ws_url, e)))?;
        let (sink, source) = stream.split();

        let connection = Self {
            sink: tokio::sync::Mutex::new(sink),
            next_id: AtomicU64::new(1),
            waiting: Mutex::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
        };
        Ok((connection, source))
    }

    /// Send `method` (scoped to `session_id` if given) and wait for its result.
    pub async fn command(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        };
        let text = serde_json::to_string(&request)?;
        trace!("CDP send: {}", text);

        let (tx, rx) = oneshot::channel();
        self.waiting.lock().insert(id, tx);

        let sent = self.sink.lock().await.send(Message::Text(text.into())).await;
        if let Err(e) = sent {
            self.waiting.lock().remove(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(COMMAND_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            // Sender dropped: the socket went away.
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.waiting.lock().remove(&id);
                Err(CdpError::Timeout(format!("{} got no response", method)))
            }
        }
    }

    /// Start routing events for `session_id`.
    pub async fn subscribe(&self, session_id: &str) -> mpsc::UnboundedReceiver<CdpResponse> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.sessions.write().await.insert(session_id.to_string(), tx);
        rx
    }

    pub async fn unsubscribe(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    /// Read the socket until it closes. Outstanding commands then fail with
    /// [`CdpError::SessionClosed`].
    pub async fn pump(&self, mut source: WsSource) {
        while let Some(frame) = source.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(message) => self.dispatch(message).await,
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("Browser closed the DevTools socket");
                    break;
                }
                Err(e) => {
                    error!("DevTools socket error: {}", e);
                    break;
                }
                Ok(_) => {}
            }
        }

        self.waiting.lock().clear();
        self.sessions.write().await.clear();
    }

    async fn dispatch(&self, message: CdpResponse) {
        if let Some(id) = message.id {
            let Some(reply) = self.waiting.lock().remove(&id) else {
                return;
            };
            let result = match message.error {
                Some(error) => Err(CdpError::Protocol {
                    code: error.code,
                    message: error.message,
                }),
                None => Ok(message.result.unwrap_or(Value::Null)),
            };
            let _ = reply.send(result);
        } else if message.method.is_some() {
            let key = message.session_id.clone().unwrap_or_default();
            if let Some(tx) = self.sessions.read().await.get(&key) {
                let _ = tx.send(message);
            }
        }
    }
}
