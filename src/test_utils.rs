// file: src/test_utils.rs
// description: canned collaborators for unit tests

use crate::converter::ModelTransport;
use crate::error::{ConversionError, QueryError};
use crate::models::RawHit;
use crate::search::{SearchBackend, SearchResponse};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Model transport that answers every call with one text content block.
pub struct StaticModelTransport {
    body: String,
}

impl StaticModelTransport {
    pub fn with_text(text: &str) -> Self {
        Self {
            body: json!({ "content": [{ "type": "text", "text": text }] }).to_string(),
        }
    }
}

#[async_trait]
impl ModelTransport for StaticModelTransport {
    async fn invoke(&self, _model_id: &str, _body: &Value) -> Result<String, ConversionError> {
        Ok(self.body.clone())
    }
}

/// Search backend returning fixed hits and recording each request.
pub struct StaticSearchBackend {
    hits: Vec<Value>,
    total: Option<u64>,
    fail_with: Option<String>,
    pub requests: Mutex<Vec<(String, String)>>,
}

impl StaticSearchBackend {
    pub fn with_hits(hits: Vec<Value>) -> Self {
        Self {
            hits,
            total: None,
            fail_with: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn failing(message: &str) -> Self {
        Self {
            hits: Vec::new(),
            total: None,
            fail_with: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchBackend for StaticSearchBackend {
    async fn search(&self, dsl: &str, index: &str) -> crate::Result<SearchResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((dsl.to_string(), index.to_string()));
        }

        if let Some(message) = &self.fail_with {
            return Err(QueryError::SearchExecution(message.clone()));
        }

        let hits = self
            .hits
            .iter()
            .map(|hit| serde_json::from_value::<RawHit>(hit.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| QueryError::SearchExecution(e.to_string()))?;

        Ok(SearchResponse {
            total: self.total.unwrap_or(hits.len() as u64),
            hits,
        })
    }
}

/// Answers the first connection with `status` and a JSON `body`, then closes.
pub async fn serve_once(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    addr
}

/// Accepts connections and never answers them.
pub async fn serve_silently() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

async fn read_request(socket: &mut TcpStream) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        request.extend_from_slice(&chunk[..n]);
        if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while request.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        request.extend_from_slice(&chunk[..n]);
    }
}
