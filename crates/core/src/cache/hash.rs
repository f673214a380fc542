//! Request-identity cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key identifying a request.
///
/// The identity is method + URL; the worker only ever stores GET
/// responses, but the method is hashed so the keyspace stays honest.
pub fn compute_entry_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
