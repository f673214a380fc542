//! Shared helpers for worker tests: a minimal one-shot HTTP responder and
//! canned clients/entries.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use carta_client::{FetchClient, FetchConfig, resolve};
use carta_core::cache::hash::compute_entry_key;
use carta_core::{CacheDb, StoredResponse};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// An origin nothing listens on; connections are refused immediately.
pub const OFFLINE_ORIGIN: &str = "http://127.0.0.1:1";

/// Fetch client with a short timeout so offline tests fail fast.
pub fn test_client() -> FetchClient {
    FetchClient::new(FetchConfig { timeout: Duration::from_millis(2_000), ..Default::default() }).unwrap()
}

/// Spawn a local HTTP responder answering every request with the given
/// status and body. Returns the origin URL and a connection counter.
pub async fn spawn_origin(status: u16, content_type: &str, body: &'static [u8]) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let content_type = content_type.to_string();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else { break };
            counter.fetch_add(1, Ordering::SeqCst);
            let content_type = content_type.clone();
            tokio::spawn(async move {
                // read the request head, contents don't matter
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let reason = if status == 200 { "OK" } else { "Error" };
                let head = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes()).await;
                let _ = stream.write_all(body).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), hits)
}

/// Store a canned 200 entry for `path` under the given bucket, keyed the
/// same way the handlers key live requests.
pub async fn seed_entry(db: &CacheDb, bucket: &str, origin: &str, path: &str, content_type: &str, body: &[u8]) {
    let url = resolve(origin, path).unwrap();
    let entry = StoredResponse {
        key: compute_entry_key("GET", url.as_str()),
        method: "GET".to_string(),
        url: url.to_string(),
        status: 200,
        content_type: Some(content_type.to_string()),
        headers_json: None,
        body: body.to_vec(),
        stored_at: chrono::Utc::now().to_rfc3339(),
    };
    db.put_response(bucket, &entry).await.unwrap();
}
