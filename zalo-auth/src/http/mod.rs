//! HTTP client building with middleware.

mod client;
mod retry;

pub use client::{HttpClientConfig, ProviderClient};
pub use retry::BackoffPolicy;
