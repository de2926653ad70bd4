//! Pre-defined provider configurations.

mod config;

pub use config::{
    urls_with_base, zalo_urls, ProviderUrls, DEFAULT_FIELDS, ZALO_AUTH_URL, ZALO_PROFILE_URL,
    ZALO_TOKEN_URL,
};
