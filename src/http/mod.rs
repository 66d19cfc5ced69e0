//! HTTP client layer — `WatchlistsHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::WatchlistsHttp;
pub use retry::{RetryConfig, RetryPolicy};
