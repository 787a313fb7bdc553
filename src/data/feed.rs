use crate::{
    core::constants::DEFAULT_FEED_URL,
    data::geojson::{extract_earthquakes, Earthquake, FeedSummary, GeoJson},
    http::HTTP_CLIENT,
    MapError, Result,
};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can hand over one earthquake feed document
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Where the document comes from, for logging
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<GeoJson>;
}

/// Feed read with a single HTTP GET
#[derive(Debug, Clone)]
pub struct HttpFeed {
    url: String,
    timeout: Duration,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_URL)
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<GeoJson> {
        log::debug!("GET {}", self.url);
        let resp = HTTP_CLIENT
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MapError::Feed(format!("{} returned HTTP {}", self.url, status)));
        }

        let body = resp.bytes().await?;
        log::debug!("received {} bytes from {}", body.len(), self.url);
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Feed backed by an in-memory document
#[derive(Debug, Clone)]
pub struct StaticFeed {
    document: GeoJson,
}

impl StaticFeed {
    pub fn new(document: GeoJson) -> Self {
        Self { document }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(GeoJson::from_json_str(json)?))
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    fn describe(&self) -> String {
        "static document".to_string()
    }

    async fn fetch(&self) -> Result<GeoJson> {
        Ok(self.document.clone())
    }
}

/// Fetch the feed once and extract its earthquakes
pub async fn load_earthquakes(source: &dyn FeedSource) -> Result<(Vec<Earthquake>, FeedSummary)> {
    let document = source.fetch().await?;
    let (quakes, summary) = extract_earthquakes(&document);
    log::info!(
        "loaded {} earthquakes from {} ({} features, {} skipped)",
        summary.accepted,
        source.describe(),
        summary.total,
        summary.skipped
    );
    Ok((quakes, summary))
}
