//! WebSocket JSON-RPC transport.
//!
//! Maintains one persistent connection driven by a background message loop.
//! Requests are correlated by id, so responses may arrive in any order.
//! Inbound messages without a pending id are routed to subscriptions by
//! subscription id; anything unmatched is discarded. On connection loss all
//! pending requests fail and every subscription route is dropped. There is
//! no reconnect at this layer.

use crate::error::{TransportError, TransportResult};
use crate::message::{Incoming, RpcNotification, RpcRequest, RpcResponse, SubscriptionId};
use crate::subscription::{Subscription, SubscriptionHost};
use crate::transport::{BoxFuture, Transport};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async_tls_with_config, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type SubscribeOutcome = TransportResult<(SubscriptionId, mpsc::UnboundedReceiver<Value>)>;

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// WebSocket URL.
    pub url: String,
    /// Capacity of the outbound message queue.
    pub outbound_capacity: usize,
}

impl WsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            outbound_capacity: 100,
        }
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

/// Outbound frame queued for the message loop.
#[derive(Debug)]
enum WsOutbound {
    Text(String),
}

/// Request awaiting its response.
enum PendingRequest {
    Call(oneshot::Sender<TransportResult<Value>>),
    /// Subscribe call; the route is registered by the message loop before the
    /// caller is woken so no notification can slip past.
    Subscribe {
        unsubscribe_method: String,
        tx: oneshot::Sender<SubscribeOutcome>,
    },
}

/// State shared between the transport handle, subscriptions and the message loop.
struct WsShared {
    url: String,
    next_id: AtomicU64,
    state: RwLock<ConnectionState>,
    pending: DashMap<u64, PendingRequest>,
    routes: DashMap<SubscriptionId, mpsc::UnboundedSender<Value>>,
    outbound_tx: mpsc::Sender<WsOutbound>,
    shutdown_token: CancellationToken,
}

impl WsShared {
    fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Queue a request whose pending entry is already registered under `id`.
    async fn dispatch(&self, id: u64, method: &str, params: Value) -> TransportResult<()> {
        if self.state() != ConnectionState::Connected {
            self.pending.remove(&id);
            return Err(TransportError::NotConnected);
        }

        let text = match serde_json::to_string(&RpcRequest::new(id, method, params)) {
            Ok(text) => text,
            Err(e) => {
                self.pending.remove(&id);
                return Err(e.into());
            }
        };

        debug!(url = %self.url, id, method, "Sending WebSocket JSON-RPC request");
        if self.outbound_tx.send(WsOutbound::Text(text)).await.is_err() {
            self.pending.remove(&id);
            return Err(TransportError::ConnectionClosed(
                "message loop stopped".to_string(),
            ));
        }
        Ok(())
    }

    async fn call(&self, method: &str, params: Value) -> TransportResult<Value> {
        let id = self.next_id();
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, PendingRequest::Call(tx));
        self.dispatch(id, method, params).await?;

        rx.await.map_err(|_| {
            TransportError::ConnectionClosed("request dropped before response".to_string())
        })?
    }

    async fn open_subscription(
        self: Arc<Self>,
        subscribe_method: &str,
        params: Value,
        unsubscribe_method: &str,
    ) -> TransportResult<Subscription> {
        let id = self.next_id();
        let (tx, rx) = oneshot::channel();
        self.pending.insert(
            id,
            PendingRequest::Subscribe {
                unsubscribe_method: unsubscribe_method.to_string(),
                tx,
            },
        );
        self.dispatch(id, subscribe_method, params).await?;

        let (subscription_id, notifications) = rx.await.map_err(|_| {
            TransportError::ConnectionClosed("subscribe dropped before response".to_string())
        })??;

        debug!(subscription = %subscription_id, method = subscribe_method, "Subscription registered");
        Ok(Subscription::new(
            subscription_id,
            unsubscribe_method,
            notifications,
            self,
        ))
    }

    fn handle_text_message(&self, text: &str) {
        let incoming: Incoming = match serde_json::from_str(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(?e, "Discarding unparseable message");
                return;
            }
        };

        match incoming {
            Incoming::Response(response) => self.complete_request(response),
            Incoming::Notification(notification) => self.route_notification(notification),
        }
    }

    fn complete_request(&self, response: RpcResponse) {
        let Some((id, pending)) = self.pending.remove(&response.id) else {
            debug!(id = response.id, "Discarding response without pending request");
            return;
        };

        let result = response.into_result();
        match pending {
            PendingRequest::Call(tx) => {
                if tx.send(result).is_err() {
                    debug!(id, "Caller went away before response");
                }
            }
            PendingRequest::Subscribe {
                unsubscribe_method,
                tx,
            } => {
                let outcome = result.and_then(|value| {
                    let subscription_id: SubscriptionId = serde_json::from_value(value)
                        .map_err(|e| {
                            TransportError::ParseError(format!("Invalid subscription id: {e}"))
                        })?;
                    let (route_tx, route_rx) = mpsc::unbounded_channel();
                    self.routes.insert(subscription_id.clone(), route_tx);
                    Ok((subscription_id, route_rx))
                });

                if let Err(Ok((subscription_id, _))) = tx.send(outcome) {
                    warn!(subscription = %subscription_id, "Subscriber went away, unsubscribing");
                    self.routes.remove(&subscription_id);
                    self.send_detached(&unsubscribe_method, json!([subscription_id]));
                }
            }
        }
    }

    fn route_notification(&self, notification: RpcNotification) {
        let subscription_id = notification.params.subscription;
        match self.routes.get(&subscription_id) {
            Some(route) => {
                if route.send(notification.params.result).is_err() {
                    debug!(subscription = %subscription_id, "Subscriber closed, dropping notification");
                }
            }
            None => {
                debug!(
                    subscription = %subscription_id,
                    method = %notification.method,
                    "Discarding notification for unknown subscription"
                );
            }
        }
    }

    /// Queue a request whose response nobody awaits.
    fn send_detached(&self, method: &str, params: Value) {
        let id = self.next_id();
        match serde_json::to_string(&RpcRequest::new(id, method, params)) {
            Ok(text) => {
                if self.outbound_tx.try_send(WsOutbound::Text(text)).is_err() {
                    warn!(id, method, "Failed to queue detached request");
                }
            }
            Err(e) => warn!(?e, method, "Failed to encode detached request"),
        }
    }

    /// Fail every pending request and drop all subscription routes.
    fn fail_all(&self, reason: &str) {
        *self.state.write() = ConnectionState::Disconnected;

        let ids: Vec<u64> = self.pending.iter().map(|entry| *entry.key()).collect();
        let failed = ids.len();
        for id in ids {
            if let Some((_, pending)) = self.pending.remove(&id) {
                let err = TransportError::ConnectionClosed(reason.to_string());
                match pending {
                    PendingRequest::Call(tx) => {
                        let _ = tx.send(Err(err));
                    }
                    PendingRequest::Subscribe { tx, .. } => {
                        let _ = tx.send(Err(err));
                    }
                }
            }
        }

        let subscriptions = self.routes.len();
        self.routes.clear();
        info!(failed, subscriptions, %reason, "WebSocket connection closed");
    }
}

impl SubscriptionHost for WsShared {
    fn release(&self, id: &SubscriptionId) {
        self.routes.remove(id);
    }

    fn unsubscribe(
        self: Arc<Self>,
        method: String,
        id: SubscriptionId,
    ) -> BoxFuture<'static, TransportResult<()>> {
        Box::pin(async move {
            if self.state() != ConnectionState::Connected {
                // The server drops registrations together with the connection.
                return Ok(());
            }
            self.call(&method, json!([id])).await.map(|_| ())
        })
    }
}

async fn run_message_loop(
    shared: Arc<WsShared>,
    stream: WsStream,
    mut outbound_rx: mpsc::Receiver<WsOutbound>,
) {
    let (mut write, mut read) = stream.split();

    let reason = loop {
        tokio::select! {
            () = shared.shutdown_token.cancelled() => {
                if let Err(e) = write.send(Message::Close(None)).await {
                    warn!(?e, "Failed to send Close frame during disconnect");
                }
                break "disconnected by client".to_string();
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        shared.handle_text_message(&text);
                    }
                    Some(Ok(Message::Ping(data))) => {
                        debug!("Received ping, sending pong");
                        if let Err(e) = write.send(Message::Pong(data)).await {
                            break format!("pong failed: {e}");
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason): (u16, String) = frame
                            .map(|f| (f.code.into(), f.reason.to_string()))
                            .unwrap_or((1000, "Normal close".to_string()));
                        warn!(code, %reason, "WebSocket closed by server");
                        break format!("closed by server: code={code}, reason={reason}");
                    }
                    Some(Err(e)) => {
                        error!(?e, "WebSocket read error");
                        break format!("read error: {e}");
                    }
                    None => {
                        warn!("WebSocket stream ended");
                        break "stream ended".to_string();
                    }
                    _ => {}
                }
            }

            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(WsOutbound::Text(text)) => {
                        if let Err(e) = write.send(Message::Text(text)).await {
                            error!(?e, "WebSocket write error");
                            break format!("write error: {e}");
                        }
                    }
                    None => break "outbound queue closed".to_string(),
                }
            }
        }
    };

    shared.fail_all(&reason);
}

/// Subscription-capable JSON-RPC transport over WebSocket.
pub struct WsTransport {
    shared: Arc<WsShared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl WsTransport {
    /// Connect to `url` with default settings.
    pub async fn connect(url: impl Into<String>) -> TransportResult<Self> {
        Self::connect_with_config(WsConfig::new(url)).await
    }

    pub async fn connect_with_config(config: WsConfig) -> TransportResult<Self> {
        info!(url = %config.url, "Connecting to WebSocket");

        let (ws_stream, _response) = connect_async_tls_with_config(&config.url, None, true, None)
            .await
            .map_err(|e| TransportError::ConnectionFailed(format!("{}: {e}", config.url)))?;

        let (outbound_tx, outbound_rx) = mpsc::channel(config.outbound_capacity);
        let shared = Arc::new(WsShared {
            url: config.url,
            next_id: AtomicU64::new(1),
            state: RwLock::new(ConnectionState::Connecting),
            pending: DashMap::new(),
            routes: DashMap::new(),
            outbound_tx,
            shutdown_token: CancellationToken::new(),
        });

        *shared.state.write() = ConnectionState::Connected;
        let task = tokio::spawn(run_message_loop(shared.clone(), ws_stream, outbound_rx));
        info!(url = %shared.url, "WebSocket connected");

        Ok(Self {
            shared,
            task: Mutex::new(Some(task)),
        })
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.shared.url
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Number of requests still awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.shared.pending.len()
    }

    /// Number of live subscription routes.
    pub fn subscription_count(&self) -> usize {
        self.shared.routes.len()
    }
}

impl Transport for WsTransport {
    fn request<'a>(&'a self, method: &'a str, params: Value) -> BoxFuture<'a, TransportResult<Value>> {
        Box::pin(self.shared.call(method, params))
    }

    fn subscriptions_supported(&self) -> bool {
        true
    }

    fn subscribe<'a>(
        &'a self,
        subscribe_method: &'a str,
        params: Value,
        unsubscribe_method: &'a str,
    ) -> BoxFuture<'a, TransportResult<Subscription>> {
        Box::pin(
            self.shared
                .clone()
                .open_subscription(subscribe_method, params, unsubscribe_method),
        )
    }

    fn disconnect(&self) -> BoxFuture<'_, TransportResult<()>> {
        Box::pin(async move {
            info!(url = %self.shared.url, "WebSocket disconnect requested");
            self.shared.shutdown_token.cancel();
            let task = self.task.lock().take();
            if let Some(task) = task {
                task.await.map_err(|e| {
                    TransportError::ConnectionClosed(format!("message loop panicked: {e}"))
                })?;
            }
            Ok(())
        })
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.shared.shutdown_token.cancel();
    }
}
