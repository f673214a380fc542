//! Core types and shared functionality for carta-sw.
//!
//! This crate provides:
//! - Cache bucket implementation with SQLite backend
//! - Precache manifest handling
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod manifest;

pub use cache::{BucketNames, CacheDb, StoredResponse};
pub use config::AppConfig;
pub use error::Error;
pub use manifest::Manifest;
