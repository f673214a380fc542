//! Worker lifecycle: install-time precache and the activation sweep.

use carta_client::{FetchClient, resolve};
use carta_core::{BucketNames, CacheDb, Error, Manifest};

use crate::handlers::stored_response;

/// Install phase: populate the static bucket from the precache manifest.
///
/// Every manifest path must fetch with status 200. Responses are buffered
/// and written only once the whole manifest has succeeded, so a failed
/// install leaves no partial static bucket behind. There is no retry; the
/// host may attempt installation again on its own schedule.
///
/// Returns the number of precached entries.
pub async fn install(
    db: &CacheDb, client: &FetchClient, origin: &str, manifest: &Manifest, names: &BucketNames,
) -> Result<usize, Error> {
    let mut staged = Vec::with_capacity(manifest.paths.len());

    for path in &manifest.paths {
        let url = resolve(origin, path).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let response = client
            .get(&url, None)
            .await
            .map_err(|e| Error::PrecacheFailed(format!("{path}: {e}")))?;

        if response.status.as_u16() != 200 {
            return Err(Error::PrecacheFailed(format!("{path}: status {}", response.status.as_u16())));
        }

        staged.push(stored_response(&url, &response));
    }

    for entry in &staged {
        db.put_response(&names.static_bucket, entry).await?;
    }

    tracing::info!(bucket = %names.static_bucket, precached = staged.len(), "static bucket populated");

    Ok(staged.len())
}

/// Activation phase: delete every bucket that isn't the current version's
/// static or dynamic bucket.
///
/// Returns the names of the removed buckets.
pub async fn activate(db: &CacheDb, names: &BucketNames) -> Result<Vec<String>, Error> {
    let mut removed = Vec::new();

    for name in db.bucket_names().await? {
        if !names.is_current(&name) {
            let entries = db.delete_bucket(&name).await?;
            tracing::info!(bucket = %name, entries, "deleted stale cache bucket");
            removed.push(name);
        }
    }

    Ok(removed)
}
