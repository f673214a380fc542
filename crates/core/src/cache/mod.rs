//! SQLite-backed cache buckets for the offline worker.
//!
//! This module provides the persistent request→response store using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Named buckets (static precache, dynamic runtime cache)
//! - Request-identity keys using SHA-256 hashing
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Whole-bucket deletion for the activation sweep

pub mod buckets;
pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;

pub use crate::Error;

pub use buckets::BucketNames;
pub use connection::CacheDb;
pub use entries::StoredResponse;
