//! Thin authenticated client for the OpenSea v2 REST API.
//!
//! Every call is a single GET attempt: non-2xx responses become errors
//! carrying the HTTP status, with no retry or backoff. Each call attaches a
//! cache lifetime hint; successful responses are kept in a small in-memory
//! map and reused until the hint expires.

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cache lifetime hint attached per call. Each endpoint declares how long
/// its responses stay useful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHint {
    NoStore,
    Ttl(u64),
}

impl CacheHint {
    fn duration(&self) -> Option<Duration> {
        match self {
            CacheHint::NoStore => None,
            CacheHint::Ttl(0) => None,
            CacheHint::Ttl(secs) => Some(Duration::from_secs(*secs)),
        }
    }
}

pub struct OpenSeaClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    timeout: Duration,
    cache: Mutex<HashMap<String, (Instant, Value)>>,
}

impl OpenSeaClient {
    pub fn new(api_url: &str, api_key: Option<String>, timeout_ms: u64) -> Self {
        if api_key.is_none() {
            log::warn!("[opensea] no API key configured; requests will likely be rejected");
        }
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_millis(timeout_ms),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Authenticated GET returning parsed JSON. `endpoint` is the path under
    /// the API base, query string included.
    pub async fn fetch(&self, endpoint: &str, cache: CacheHint) -> Result<Value> {
        if let Some(ttl) = cache.duration() {
            if let Some(hit) = self.cache_lookup(endpoint, ttl) {
                log::debug!("[opensea] cache hit for {endpoint}");
                return Ok(hit);
            }
        }

        log::info!("[opensea] GET {endpoint}");

        let mut request = self
            .http
            .get(format!("{}{}", self.api_url, endpoint))
            .header("accept", "application/json")
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("OpenSea request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow!("OpenSea API Error: {status}"));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse OpenSea response: {e}"))?;

        if cache.duration().is_some() {
            self.cache_store(endpoint, data.clone());
        }
        Ok(data)
    }

    fn cache_lookup(&self, endpoint: &str, ttl: Duration) -> Option<Value> {
        let cache = self.cache.lock().ok()?;
        cache.get(endpoint).and_then(|(stored, value)| {
            if stored.elapsed() < ttl {
                Some(value.clone())
            } else {
                None
            }
        })
    }

    fn cache_store(&self, endpoint: &str, value: Value) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(endpoint.to_string(), (Instant::now(), value));
        }
    }

    // ----- typed endpoint wrappers -----

    pub async fn collection_nfts(&self, slug: &str, limit: u32) -> Result<Value> {
        let slug = urlencoding::encode(slug);
        self.fetch(
            &format!("/collection/{slug}/nfts?limit={limit}"),
            CacheHint::Ttl(3600),
        )
        .await
    }

    pub async fn collection_traits(&self, slug: &str) -> Result<Value> {
        let slug = urlencoding::encode(slug);
        self.fetch(&format!("/traits/{slug}"), CacheHint::Ttl(3600)).await
    }

    /// Stats refresh fast; cache for a minute only.
    pub async fn collection_stats(&self, slug: &str) -> Result<Value> {
        let slug = urlencoding::encode(slug);
        self.fetch(&format!("/collections/{slug}/stats"), CacheHint::Ttl(60))
            .await
    }

    /// Metadata (description, banner, links) changes rarely.
    pub async fn collection_metadata(&self, slug: &str) -> Result<Value> {
        let slug = urlencoding::encode(slug);
        self.fetch(&format!("/collections/{slug}"), CacheHint::Ttl(86400))
            .await
    }

    pub async fn single_nft(&self, chain: &str, address: &str, identifier: &str) -> Result<Value> {
        let identifier = urlencoding::encode(identifier);
        self.fetch(
            &format!("/chain/{chain}/contract/{address}/nfts/{identifier}"),
            CacheHint::NoStore,
        )
        .await
    }

    pub async fn nft_events(&self, chain: &str, address: &str, identifier: &str) -> Result<Value> {
        let identifier = urlencoding::encode(identifier);
        self.fetch(
            &format!("/events/chain/{chain}/contract/{address}/nfts/{identifier}?limit=20"),
            CacheHint::NoStore,
        )
        .await
    }

    pub async fn best_listing(&self, chain: &str, address: &str, identifier: &str) -> Result<Value> {
        let identifier = urlencoding::encode(identifier);
        self.fetch(
            &format!("/listings/chain/{chain}/nfts/{address}/{identifier}/best"),
            CacheHint::NoStore,
        )
        .await
    }

    pub async fn item_offers(
        &self,
        chain: &str,
        protocol: &str,
        address: &str,
        identifier: &str,
    ) -> Result<Value> {
        let identifier = urlencoding::encode(identifier);
        self.fetch(
            &format!(
                "/orders/{chain}/{protocol}/offers?asset_contract_address={address}&token_ids={identifier}&order_by=eth_price&order_direction=desc"
            ),
            CacheHint::Ttl(60),
        )
        .await
    }

    /// Collection-wide listings, cheapest first (the endpoint sorts by floor).
    pub async fn collection_listings(&self, slug: &str, limit: u32, cache_secs: u64) -> Result<Value> {
        let slug = urlencoding::encode(slug);
        self.fetch(
            &format!("/listings/collection/{slug}/all?limit={limit}"),
            CacheHint::Ttl(cache_secs),
        )
        .await
    }

    pub async fn collection_sale_events(&self, slug: &str, limit: u32, cache_secs: u64) -> Result<Value> {
        let slug = urlencoding::encode(slug);
        self.fetch(
            &format!("/events/collection/{slug}?event_type=sale&limit={limit}"),
            CacheHint::Ttl(cache_secs),
        )
        .await
    }

    pub async fn collection_offers(&self, slug: &str, limit: u32, cache_secs: u64) -> Result<Value> {
        let slug = urlencoding::encode(slug);
        self.fetch(
            &format!("/offers/collection/{slug}/all?limit={limit}"),
            CacheHint::Ttl(cache_secs),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_hint_durations() {
        assert_eq!(CacheHint::NoStore.duration(), None);
        assert_eq!(CacheHint::Ttl(0).duration(), None);
        assert_eq!(CacheHint::Ttl(60).duration(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OpenSeaClient::new("https://api.opensea.io/api/v2/", None, 1000);
        assert_eq!(client.api_url, "https://api.opensea.io/api/v2");
    }
}
