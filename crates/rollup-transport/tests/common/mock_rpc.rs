//! Mock JSON-RPC WebSocket server for integration tests.
//!
//! Each inbound request is recorded and passed to a scripted handler which
//! decides what frames to send back: responses, pushes, or a close.

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Frame the server sends in reaction to a request.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Close,
}

pub type Handler = Arc<dyn Fn(&Value) -> Vec<Reply> + Send + Sync>;

/// Build a success response for `request`.
pub fn result_for(request: &Value, result: Value) -> Reply {
    Reply::Json(json!({"jsonrpc": "2.0", "id": request["id"], "result": result}))
}

/// Build an error response for `request`.
pub fn error_for(request: &Value, code: i64, message: &str) -> Reply {
    Reply::Json(json!({
        "jsonrpc": "2.0",
        "id": request["id"],
        "error": {"code": code, "message": message}
    }))
}

/// Build a subscription push.
pub fn notification(method: &str, subscription: Value, result: Value) -> Reply {
    Reply::Json(json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": {"subscription": subscription, "result": result}
    }))
}

pub struct MockRpcServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockRpcServer {
    /// Start a server on an available port.
    pub async fn start(handler: Handler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let requests_clone = requests.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        tokio::spawn(handle_connection(stream, handler.clone(), requests_clone.clone()));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            requests,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// All requests received so far.
    pub async fn requests(&self) -> Vec<Value> {
        self.requests.lock().await.clone()
    }

    /// Requests received for one method.
    pub async fn requests_for(&self, method: &str) -> Vec<Value> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r["method"] == method)
            .cloned()
            .collect()
    }

    /// Poll until at least `count` requests for `method` arrived.
    pub async fn wait_for_requests(&self, method: &str, count: usize) -> Vec<Value> {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let found = self.requests_for(method).await;
                if found.len() >= count {
                    return found;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {count} x {method}"))
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(stream: TcpStream, handler: Handler, requests: Arc<Mutex<Vec<Value>>>) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let Ok(request) = serde_json::from_str::<Value>(&text) else {
                    continue;
                };
                requests.lock().await.push(request.clone());

                for reply in handler(&request) {
                    match reply {
                        Reply::Json(value) => {
                            let _ = write.send(Message::Text(value.to_string())).await;
                        }
                        Reply::Close => {
                            let _ = write.send(Message::Close(None)).await;
                            return;
                        }
                    }
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = write.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }
}
