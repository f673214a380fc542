//! carta-sw entry point.
//!
//! Boots the offline cache worker on stdio transport: events arrive as JSON
//! lines on stdin, replies leave as JSON lines on stdout. Logging goes to
//! stderr to avoid interfering with the protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod events;
mod handlers;
mod lifecycle;
mod policy;
#[cfg(test)]
mod testutil;
mod worker;

use events::{WorkerEvent, WorkerReply};
use worker::Worker;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = carta_core::AppConfig::load()?;
    let manifest = match &config.manifest_path {
        Some(path) => carta_core::Manifest::load(path)?,
        None => carta_core::Manifest::default(),
    };

    let db = carta_core::CacheDb::open(&config.db_path).await?;

    tracing::info!(
        origin = %config.origin,
        version = %config.cache_version,
        "starting carta-sw on stdio transport"
    );

    let worker = Arc::new(Worker::new(&config, db, manifest)?);

    let (tx, mut rx) = mpsc::channel::<WorkerReply>(64);

    // Single writer task; handler tasks funnel replies through the channel
    // so reply lines never interleave.
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(reply) = rx.recv().await {
            match serde_json::to_vec(&reply) {
                Ok(mut line) => {
                    line.push(b'\n');
                    if stdout.write_all(&line).await.is_err() {
                        break;
                    }
                    let _ = stdout.flush().await;
                }
                Err(err) => tracing::error!(error = %err, "failed to encode reply"),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let event: WorkerEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed event");
                continue;
            }
        };

        // Every event is handled as an independent task; in-flight requests
        // suspend on their own cache/network I/O without blocking each other.
        let worker = Arc::clone(&worker);
        let tx = tx.clone();
        tokio::spawn(async move {
            let reply = worker.handle(event).await;
            let _ = tx.send(reply).await;
        });
    }

    drop(tx);
    writer.await?;

    Ok(())
}
