//! A one-shot HTTP endpoint standing in for the completion service.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use codemedic_core::CodemedicConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub struct MockEndpoint {
    pub url: String,
    handle: JoinHandle<String>,
}

impl MockEndpoint {
    /// The raw HTTP request the endpoint received.
    pub async fn received(self) -> String {
        self.handle.await.unwrap()
    }
}

/// Serve a single canned response, then close.
pub async fn serve_once(status: u16, reason: &str, body: &str) -> MockEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });
    MockEndpoint {
        url: format!("http://{addr}/api/v1/chat/completions"),
        handle,
    }
}

/// Accept a connection and never answer.
pub async fn serve_silence(hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((socket, _)) = listener.accept().await {
            tokio::time::sleep(hold).await;
            drop(socket);
        }
    });
    format!("http://{addr}/api/v1/chat/completions")
}

/// A loopback URL with nothing listening on it.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1/chat/completions")
}

pub fn success_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }],
    })
    .to_string()
}

pub fn config_for(url: &str, timeout_secs: u64) -> CodemedicConfig {
    let mut props = BTreeMap::new();
    props.insert("DEEPSEEK_API_KEY".to_string(), "sk-test".to_string());
    props.insert("REQUEST_TIMEOUT_SECS".to_string(), timeout_secs.to_string());
    CodemedicConfig::from_properties(&props, Some(url.to_string())).unwrap()
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
