//! HTTP client shared by the feed fetcher and the tile loader

use crate::core::constants::USER_AGENT;
use once_cell::sync::Lazy;
use reqwest::Client;

/// Shared HTTP client with a custom User-Agent so that public tile and feed
/// servers don't reject the request. Building the client once avoids the cost
/// of TLS and connection pool setup for every request.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default HTTP client: {}", e);
            Client::new()
        })
});
