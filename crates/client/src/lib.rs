//! Client code for carta-sw.
//!
//! This crate provides the HTTP fetch pipeline the offline worker uses to
//! reach its upstream origin.

pub mod fetch;

pub use fetch::{FetchClient, FetchConfig, FetchResponse, resolve};
