//! Runtime configuration of the earthquake map
//!
//! Every value has a default that reproduces the fixed startup view; a JSON
//! file and the process environment can override them. The tile access
//! token is carried here and handed to the map composer explicitly.

use crate::{
    core::{
        constants::{
            ACCESS_TOKEN_ENV, DEFAULT_CENTER, DEFAULT_FEED_URL, DEFAULT_ZOOM, FEED_URL_ENV,
            MAX_TILE_ZOOM,
        },
        geo::LatLng,
    },
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuakeMapConfig {
    /// GeoJSON feed of earthquake events
    pub feed_url: String,
    /// Access token substituted into the tile URL template
    pub access_token: String,
    /// Initial map center
    pub center: LatLng,
    /// Initial zoom level
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Timeout for the feed request
    pub request_timeout_secs: u64,
    /// Number of encoded tile images each base layer keeps in memory
    pub tile_cache_size: usize,
}

impl Default for QuakeMapConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            access_token: String::new(),
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            min_zoom: 1.0,
            max_zoom: MAX_TILE_ZOOM as f64,
            request_timeout_secs: 30,
            tile_cache_size: 512,
        }
    }
}

impl QuakeMapConfig {
    /// Parses a configuration from JSON, missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration file in JSON format
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Applies `MAPBOX_ACCESS_TOKEN` and `QUAKEMAP_FEED_URL` when set
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup; empty values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.access_token = token.trim().to_string();
        }
        if let Some(url) = lookup(FEED_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.feed_url = url.trim().to_string();
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks the values the rest of the crate relies on
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(MapError::Config(format!(
                "missing tile access token (set {ACCESS_TOKEN_ENV})"
            )));
        }
        if !(self.feed_url.starts_with("http://") || self.feed_url.starts_with("https://")) {
            return Err(MapError::Config(format!(
                "feed url must be http(s): {}",
                self.feed_url
            )));
        }
        if !self.center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "center {:?} is out of range",
                self.center
            )));
        }
        if self.min_zoom < 0.0 || self.min_zoom > self.max_zoom || self.max_zoom > MAX_TILE_ZOOM as f64 {
            return Err(MapError::Config(format!(
                "invalid zoom limits {}..{}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom < self.min_zoom || self.zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "zoom {} outside {}..{}",
                self.zoom, self.min_zoom, self.max_zoom
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(MapError::Config("request timeout must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_token() -> QuakeMapConfig {
        QuakeMapConfig {
            access_token: "pk.test".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_match_startup_view() {
        let config = QuakeMapConfig::default();
        assert_eq!(config.center, LatLng::new(26.3, 17.2));
        assert_eq!(config.zoom, 3.0);
        assert!(config.feed_url.ends_with("4.5_month.geojson"));
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let err = QuakeMapConfig::default().validate().unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
        assert!(with_token().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            QuakeMapConfig::from_json_str(r#"{"access_token": "pk.abc", "zoom": 4}"#).unwrap();
        assert_eq!(config.access_token, "pk.abc");
        assert_eq!(config.zoom, 4.0);
        assert_eq!(config.center, LatLng::new(26.3, 17.2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let config = with_token().with_overrides(|key| match key {
            ACCESS_TOKEN_ENV => Some("  ".to_string()),
            FEED_URL_ENV => Some("http://localhost/feed.geojson".to_string()),
            _ => None,
        });
        assert_eq!(config.access_token, "pk.test");
        assert_eq!(config.feed_url, "http://localhost/feed.geojson");
    }

    #[test]
    fn test_invalid_values() {
        let mut config = with_token();
        config.feed_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = with_token();
        config.zoom = 25.0;
        assert!(config.validate().is_err());

        let mut config = with_token();
        config.center = LatLng::new(95.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(MapError::InvalidCoordinates(_))
        ));
    }
}
