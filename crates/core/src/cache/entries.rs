//! Bucket entry CRUD operations.
//!
//! Provides functions for storing, matching, and deleting cached
//! responses within named buckets.

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A response stored in a cache bucket.
///
/// Carries everything needed to replay the response to a requester:
/// status, content type, headers, and the raw body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResponse {
    pub key: String,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub headers_json: Option<String>,
    pub body: Vec<u8>,
    pub stored_at: String,
}

impl CacheDb {
    /// Insert or update an entry in the named bucket.
    ///
    /// Uses UPSERT semantics: a racing write for the same key is a
    /// whole-value replacement, last write wins.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for any response whose status is not 200;
    /// only success responses are ever stored in a bucket.
    pub async fn put_response(&self, bucket: &str, response: &StoredResponse) -> Result<(), Error> {
        if response.status != 200 {
            return Err(Error::InvalidInput(format!(
                "refusing to cache status {} for {}",
                response.status, response.url
            )));
        }

        let bucket = bucket.to_string();
        let response = response.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (
                    bucket, key, method, url, status, content_type,
                    headers_json, body, stored_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(bucket, key) DO UPDATE SET
                    method = excluded.method,
                    url = excluded.url,
                    status = excluded.status,
                    content_type = excluded.content_type,
                    headers_json = excluded.headers_json,
                    body = excluded.body,
                    stored_at = excluded.stored_at",
                    params![
                        &bucket,
                        &response.key,
                        &response.method,
                        &response.url,
                        response.status as i64,
                        &response.content_type,
                        &response.headers_json,
                        &response.body,
                        &response.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up an entry in one specific bucket.
    ///
    /// Returns None if the key isn't present there.
    pub async fn match_in(&self, bucket: &str, key: &str) -> Result<Option<StoredResponse>, Error> {
        let bucket = bucket.to_string();
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT key, method, url, status, content_type, headers_json, body, stored_at
                 FROM entries WHERE bucket = ?1 AND key = ?2",
                )?;

                let result = stmt.query_row(params![bucket, key], row_to_response);

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Look up an entry across all buckets.
    ///
    /// Static buckets are consulted before dynamic ones, matching the order
    /// the buckets were created in.
    pub async fn match_any(&self, key: &str) -> Result<Option<StoredResponse>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT key, method, url, status, content_type, headers_json, body, stored_at
                 FROM entries WHERE key = ?1
                 ORDER BY (bucket LIKE '%-static-%') DESC, bucket
                 LIMIT 1",
                )?;

                let result = stmt.query_row(params![key], row_to_response);

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// List the distinct bucket names currently present.
    pub async fn bucket_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT DISTINCT bucket FROM entries ORDER BY bucket")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry of a bucket.
    ///
    /// Returns the number of deleted entries.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<u64, Error> {
        let bucket = bucket.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM entries WHERE bucket = ?1", params![bucket])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Count the entries in a bucket.
    pub async fn count_entries(&self, bucket: &str) -> Result<u64, Error> {
        let bucket = bucket.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM entries WHERE bucket = ?1",
                    params![bucket],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

fn row_to_response(row: &rusqlite::Row<'_>) -> Result<StoredResponse, rusqlite::Error> {
    Ok(StoredResponse {
        key: row.get(0)?,
        method: row.get(1)?,
        url: row.get(2)?,
        status: row.get::<_, i64>(3)? as u16,
        content_type: row.get(4)?,
        headers_json: row.get(5)?,
        body: row.get(6)?,
        stored_at: row.get(7)?,
    })
}
