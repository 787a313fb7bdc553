//! Prelude module for common quakemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use quakemap::prelude::*;`

pub use crate::core::{
    builder::MapBuilder,
    config::QuakeMapConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, MapOptions},
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerProperties, LayerTrait, LayerType},
    control::LayersControl,
    manager::LayerManager,
    tile::{TileLayer, TileLayerOptions},
    vector::{CircleMarker, Color, PointStyle, VectorLayer},
};

pub use crate::data::{
    feed::{load_earthquakes, FeedSource, HttpFeed, StaticFeed},
    geojson::{Earthquake, FeedSummary, GeoJson, GeoJsonFeature, GeoJsonGeometry},
};

pub use crate::quake::{
    classify::{
        all_events_layer, is_major, major_events_layer, marker_radius, popup_text, quake_marker,
        MagnitudeBucket,
    },
    composer::{compose_map, BaseStyle, QuakeMap},
};

pub use crate::tiles::{
    cache::TileCache,
    loader::TileLoader,
    source::{TileSource, UrlTemplateSource},
};

pub use crate::rendering::context::{DrawCommand, RenderContext};

#[cfg(feature = "egui")]
pub use crate::ui::{
    controls::LayersControlWidget,
    popup::{Popup, PopupStyle},
    widget::{MapWidget, MapWidgetConfig},
};

pub use crate::{Error as MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
