//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A canned JSON-RPC node: serves fixed results per method and records
/// every method call it receives.
#[derive(Clone)]
pub struct MockRpcNode {
    addr: SocketAddr,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockRpcNode {
    /// Start the node on an ephemeral port with per-method canned results.
    pub async fn start(responses: HashMap<String, Value>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let calls: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let responses = Arc::new(responses);

        let node_calls = Arc::clone(&calls);
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let responses = Arc::clone(&responses);
                let calls = Arc::clone(&node_calls);
                tokio::spawn(async move {
                    handle_connection(socket, responses, calls).await;
                });
            }
        });

        Self { addr, calls }
    }

    /// JSON-RPC endpoint URL of the node.
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of calls received for one method.
    pub async fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|m| m.as_str() == method)
            .count()
    }
}

async fn handle_connection(
    mut socket: tokio::net::TcpStream,
    responses: Arc<HashMap<String, Value>>,
    calls: Arc<Mutex<Vec<String>>>,
) {
    let Some(body) = read_http_request(&mut socket).await else {
        return;
    };
    let Ok(request) = serde_json::from_slice::<Value>(&body) else {
        return;
    };

    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    calls.lock().await.push(method.clone());

    let response = match responses.get(&method) {
        Some(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        None => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": format!("method {method} not found") }
        }),
    };

    let payload = response.to_string();
    let reply = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    let _ = socket.write_all(reply.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Read one HTTP request off the socket and return its body.
async fn read_http_request(socket: &mut tokio::net::TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length: usize = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())?
        })
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(buf[body_start..body_start + content_length.min(buf.len() - body_start)].to_vec())
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
