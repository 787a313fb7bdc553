//! # quakemap
//!
//! A Leaflet-style map of recent earthquakes.
//!
//! The crate fetches a GeoJSON feed of earthquake events, turns every event
//! into a circle marker sized and colored by magnitude, groups the markers
//! into two overlay layers (all events and major events) and composes a map
//! with two selectable tile base layers and a layers control.

pub mod core;
pub mod data;
mod http;
pub mod layers;
pub mod quake;
pub mod rendering;
pub mod tiles;
#[cfg(feature = "egui")]
pub mod ui;

pub mod prelude;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::QuakeMapConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use layers::{
    base::LayerTrait,
    tile::TileLayer,
    vector::{CircleMarker, VectorLayer},
};

pub use data::{
    feed::{load_earthquakes, FeedSource, HttpFeed, StaticFeed},
    geojson::{Earthquake, FeedSummary, GeoJson},
};

pub use quake::{
    classify::MagnitudeBucket,
    composer::{compose_map, BaseStyle, QuakeMap},
};

pub use rendering::context::{DrawCommand, RenderContext};

#[cfg(feature = "egui")]
pub use ui::{controls::LayersControlWidget, widget::MapWidget};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),
}

/// Error type alias for convenience
pub type Error = MapError;
