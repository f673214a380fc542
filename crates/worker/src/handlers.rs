//! Fetch-event handling: strategy execution against cache and network.
//!
//! Stateless per request. The only shared state is the cache database;
//! racing fetches of the same resource may each store a copy, and the
//! last whole-value write wins.

use carta_client::{FetchClient, FetchResponse, resolve};
use carta_core::cache::hash::compute_entry_key;
use carta_core::{CacheDb, Error, StoredResponse};
use url::Url;

use crate::events::{FetchRequest, FetchSource};
use crate::policy::{Strategy, classify};

/// The materialized result of an intercepted fetch.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub source: FetchSource,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub url: String,
}

/// Serve one intercepted request according to the routing policy.
///
/// Returns `Ok(None)` for non-GET requests: they are never intercepted and
/// no cache or network I/O happens for them.
pub async fn handle_fetch(
    db: &CacheDb, client: &FetchClient, origin: &str, dynamic_bucket: &str, request: &FetchRequest,
) -> Result<Option<FetchOutcome>, Error> {
    if !request.method.eq_ignore_ascii_case("GET") {
        return Ok(None);
    }

    let url = resolve(origin, &request.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let key = compute_entry_key("GET", url.as_str());
    let accept = request.accept.as_deref();

    let outcome = match classify(url.path(), accept) {
        Strategy::NetworkFirst => match client.get(&url, accept).await {
            Ok(response) => {
                store_if_success(db, dynamic_bucket, &key, &url, &response).await;
                network_outcome(&url, response)
            }
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "network failed, trying cache");
                match db.match_any(&key).await? {
                    Some(entry) => cached_outcome(entry),
                    None => return Err(err),
                }
            }
        },
        Strategy::CacheFirst => match db.match_any(&key).await? {
            Some(entry) => cached_outcome(entry),
            None => {
                let response = client.get(&url, accept).await?;
                store_if_success(db, dynamic_bucket, &key, &url, &response).await;
                network_outcome(&url, response)
            }
        },
        Strategy::NetworkFallback => match client.get(&url, accept).await {
            Ok(response) => network_outcome(&url, response),
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "network failed, trying cache");
                match db.match_any(&key).await? {
                    Some(entry) => cached_outcome(entry),
                    None => return Err(err),
                }
            }
        },
    };

    Ok(Some(outcome))
}

/// Convert a live network response into a bucket entry.
pub(crate) fn stored_response(url: &Url, response: &FetchResponse) -> StoredResponse {
    let headers: Vec<(String, String)> = response
        .headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.to_string(), v.to_string())))
        .collect();

    StoredResponse {
        key: compute_entry_key("GET", url.as_str()),
        method: "GET".to_string(),
        url: url.to_string(),
        status: response.status.as_u16(),
        content_type: response.content_type.clone(),
        headers_json: serde_json::to_string(&headers).ok(),
        body: response.bytes.to_vec(),
        stored_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Copy a 200 response into the dynamic bucket.
///
/// Storage failures are diagnostic only; the live response is returned to
/// the requester either way.
async fn store_if_success(db: &CacheDb, bucket: &str, key: &str, url: &Url, response: &FetchResponse) {
    if response.status.as_u16() != 200 {
        return;
    }
    if let Err(err) = db.put_response(bucket, &stored_response(url, response)).await {
        tracing::warn!(key, error = %err, "failed to update dynamic cache");
    }
}

fn network_outcome(url: &Url, response: FetchResponse) -> FetchOutcome {
    FetchOutcome {
        source: FetchSource::Network,
        status: response.status.as_u16(),
        content_type: response.content_type,
        body: response.bytes.to_vec(),
        url: url.to_string(),
    }
}

fn cached_outcome(entry: StoredResponse) -> FetchOutcome {
    FetchOutcome {
        source: FetchSource::Cache,
        status: entry.status,
        content_type: entry.content_type,
        body: entry.body,
        url: entry.url,
    }
}
