//! Assembles the earthquake map
//!
//! Two tile base layers that differ only in their style id, the all-events
//! and major-events overlays, and the fixed startup view. The tile access
//! token comes from [`QuakeMapConfig`] and nowhere else.

use crate::{
    core::{builder::MapBuilder, config::QuakeMapConfig, map::Map},
    data::{
        feed::{load_earthquakes, FeedSource},
        geojson::{Earthquake, FeedSummary},
    },
    layers::tile::{TileLayer, TileLayerOptions},
    quake::classify::{all_events_layer, major_events_layer},
    MapError, Result,
};

pub const TILE_URL_TEMPLATE: &str =
    "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";

pub const TILE_ATTRIBUTION: &str =
    "Map data © OpenStreetMap contributors, CC-BY-SA, Imagery © Mapbox";

pub const TILE_MAX_ZOOM: u8 = 18;

/// Tile styles offered as base layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseStyle {
    Dark,
    Light,
}

impl BaseStyle {
    pub const ALL: [BaseStyle; 2] = [BaseStyle::Dark, BaseStyle::Light];

    pub fn style_id(&self) -> &'static str {
        match self {
            BaseStyle::Dark => "mapbox.dark",
            BaseStyle::Light => "mapbox.light",
        }
    }

    pub fn layer_id(&self) -> &'static str {
        match self {
            BaseStyle::Dark => "dark-map",
            BaseStyle::Light => "light-map",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BaseStyle::Dark => "Dark Map",
            BaseStyle::Light => "Light Map",
        }
    }
}

pub fn base_tile_options(style: BaseStyle, access_token: &str) -> TileLayerOptions {
    TileLayerOptions {
        url_template: TILE_URL_TEMPLATE.to_string(),
        style_id: Some(style.style_id().to_string()),
        access_token: Some(access_token.to_string()),
        subdomains: Vec::new(),
        attribution: TILE_ATTRIBUTION.to_string(),
        max_zoom: TILE_MAX_ZOOM,
        ..Default::default()
    }
}

pub fn base_tile_layer(style: BaseStyle, config: &QuakeMapConfig) -> TileLayer {
    let options = TileLayerOptions {
        cache_size: config.tile_cache_size,
        request_timeout_secs: config.request_timeout_secs,
        ..base_tile_options(style, &config.access_token)
    };
    TileLayer::with_options(
        style.layer_id().to_string(),
        style.display_name().to_string(),
        options,
    )
}

/// Classify the earthquakes and compose the map in its startup state:
/// dark base layer and the all-events overlay active, control expanded.
pub fn compose_map(config: &QuakeMapConfig, quakes: &[Earthquake]) -> Result<Map> {
    if config.access_token.trim().is_empty() {
        return Err(MapError::Config("tile access token is empty".to_string()));
    }

    let all_events = all_events_layer(quakes);
    let major_events = major_events_layer(quakes);
    log::info!(
        "composing map: {} events, {} major",
        all_events.len(),
        major_events.len()
    );

    let mut builder = MapBuilder::new()
        .with_center_and_zoom(config.center, config.zoom)
        .with_zoom_limits(config.min_zoom, config.max_zoom)
        .with_collapsed_control(false)
        .with_active_base(BaseStyle::Dark.layer_id());
    for style in BaseStyle::ALL {
        builder = builder.with_base_layer(Box::new(base_tile_layer(style, config)));
    }

    builder
        .with_overlay(Box::new(all_events), true)
        .with_overlay(Box::new(major_events), false)
        .build()
}

/// A composed map together with what the feed delivered
pub struct QuakeMap {
    pub map: Map,
    pub summary: FeedSummary,
}

impl QuakeMap {
    /// Fetch, classify, compose
    pub async fn load(config: &QuakeMapConfig, source: &dyn FeedSource) -> Result<Self> {
        let (quakes, summary) = load_earthquakes(source).await?;
        let map = compose_map(config, &quakes)?;
        Ok(Self { map, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{LatLng, TileCoord};

    fn config() -> QuakeMapConfig {
        QuakeMapConfig {
            access_token: "pk.test".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_base_layers_differ_only_in_style() {
        let dark = base_tile_options(BaseStyle::Dark, "pk.test");
        let light = base_tile_options(BaseStyle::Light, "pk.test");
        assert_ne!(dark.style_id, light.style_id);
        assert_eq!(
            TileLayerOptions {
                style_id: None,
                ..dark
            },
            TileLayerOptions {
                style_id: None,
                ..light
            }
        );
    }

    #[test]
    fn test_token_flows_into_tile_urls() {
        let layer = base_tile_layer(BaseStyle::Dark, &config());
        assert_eq!(
            layer.tile_url(TileCoord::new(4, 3, 3)),
            "https://api.tiles.mapbox.com/v4/mapbox.dark/3/4/3.png?access_token=pk.test"
        );
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let result = compose_map(&QuakeMapConfig::default(), &[]);
        assert!(matches!(result, Err(MapError::Config(_))));
    }

    #[test]
    fn test_startup_state() {
        let quakes = vec![Earthquake::new(LatLng::new(0.0, 0.0), 6.5, "Test")];
        let map = compose_map(&config(), &quakes).unwrap();

        assert_eq!(map.active_base_layer(), Some("dark-map"));
        assert!(map.get_layer("dark-map").unwrap().is_visible());
        assert!(!map.get_layer("light-map").unwrap().is_visible());
        assert_eq!(map.active_overlays(), vec!["all-quakes"]);
        assert!(!map.control().is_collapsed());
        assert_eq!(map.attribution(), Some(TILE_ATTRIBUTION));
    }
}
