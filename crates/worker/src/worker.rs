//! The worker itself: a dispatch table over lifecycle and fetch events.
//!
//! Lifecycle phases follow the hosting contract: a fresh worker is parked,
//! becomes installed once the static bucket is populated, and active once
//! the stale-bucket sweep ran and it controls all pages. The skip-waiting
//! signal collapses the waiting period.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use carta_client::{FetchClient, FetchConfig};
use carta_core::{AppConfig, BucketNames, CacheDb, Error, Manifest};
use tokio::sync::Mutex;

use crate::events::{ControlMessage, FetchRequest, SKIP_WAITING, WorkerEvent, WorkerReply};
use crate::{handlers, lifecycle};

/// Lifecycle phase of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not installed yet.
    Parked,
    /// Static bucket populated, waiting to take control.
    Installed,
    /// Controlling all pages.
    Active,
}

/// The offline cache worker.
pub struct Worker {
    db: CacheDb,
    client: FetchClient,
    origin: String,
    manifest: Manifest,
    names: BucketNames,
    phase: Mutex<Phase>,
}

impl Worker {
    /// Build a worker from configuration, an open cache database, and a
    /// precache manifest.
    pub fn new(config: &AppConfig, db: CacheDb, manifest: Manifest) -> Result<Self, Error> {
        let client = FetchClient::new(FetchConfig {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        })?;

        Ok(Self {
            db,
            client,
            origin: config.origin.clone(),
            manifest,
            names: BucketNames::for_version(&config.cache_version),
            phase: Mutex::new(Phase::Parked),
        })
    }

    /// Dispatch one event to its handler.
    pub async fn handle(&self, event: WorkerEvent) -> WorkerReply {
        match event {
            WorkerEvent::Install => self.on_install().await,
            WorkerEvent::Activate => self.on_activate().await,
            WorkerEvent::Fetch { id, request } => self.on_fetch(id, request).await,
            WorkerEvent::Message { data } => self.on_message(data).await,
        }
    }

    /// Current lifecycle phase.
    pub async fn phase(&self) -> Phase {
        *self.phase.lock().await
    }

    async fn on_install(&self) -> WorkerReply {
        match lifecycle::install(&self.db, &self.client, &self.origin, &self.manifest, &self.names).await {
            Ok(precached) => {
                *self.phase.lock().await = Phase::Installed;
                tracing::info!(precached, "install complete, ready to activate immediately");
                WorkerReply::Installed { precached }
            }
            Err(err) => {
                tracing::error!(error = %err, "install failed, previous worker stays in control");
                WorkerReply::InstallFailed { error: err.to_string() }
            }
        }
    }

    async fn on_activate(&self) -> WorkerReply {
        self.activate_now().await
    }

    async fn on_message(&self, message: ControlMessage) -> WorkerReply {
        if message.kind == SKIP_WAITING {
            tracing::info!("skip-waiting requested, activating immediately");
            self.activate_now().await
        } else {
            tracing::debug!(kind = %message.kind, "ignoring unrecognized message");
            WorkerReply::Ignored
        }
    }

    async fn activate_now(&self) -> WorkerReply {
        match lifecycle::activate(&self.db, &self.names).await {
            Ok(removed_buckets) => {
                *self.phase.lock().await = Phase::Active;
                tracing::info!(removed = removed_buckets.len(), "activated, controlling all pages");
                WorkerReply::Activated { removed_buckets }
            }
            Err(err) => {
                tracing::error!(error = %err, "activation failed");
                WorkerReply::ActivateFailed { error: err.to_string() }
            }
        }
    }

    async fn on_fetch(&self, id: Option<u64>, request: FetchRequest) -> WorkerReply {
        match handlers::handle_fetch(&self.db, &self.client, &self.origin, &self.names.dynamic_bucket, &request).await
        {
            Ok(Some(outcome)) => WorkerReply::Fetched {
                id,
                source: outcome.source,
                status: outcome.status,
                content_type: outcome.content_type,
                body: BASE64.encode(&outcome.body),
                url: outcome.url,
            },
            Ok(None) => WorkerReply::Passthrough { id },
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "fetch failed with no cached fallback");
                WorkerReply::FetchFailed { id, error: err.to_string() }
            }
        }
    }
}
