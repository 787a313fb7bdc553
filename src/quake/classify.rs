//! Turns earthquake records into circle markers
//!
//! The marker radius grows linearly with magnitude and the fill color comes
//! from a three-step threshold table. A second, stricter threshold selects
//! the events shown in the major-events overlay.

use crate::{
    data::geojson::Earthquake,
    layers::vector::{CircleMarker, Color, PointStyle, VectorLayer},
};

/// Marker radius in pixels per unit of magnitude
pub const MAGNITUDE_RADIUS_SCALE: f64 = 1.5;

/// Upper bound (inclusive) of the moderate bucket
pub const MODERATE_MAX: f64 = 5.0;

/// Upper bound (inclusive) of the strong bucket
pub const STRONG_MAX: f64 = 5.9;

/// Lower bound (inclusive) of the major-events overlay
pub const MAJOR_MAGNITUDE: f64 = 6.0;

pub const MARKER_FILL_OPACITY: f32 = 0.8;

pub const ALL_EVENTS_LAYER_ID: &str = "all-quakes";
pub const ALL_EVENTS_LAYER_NAME: &str = "Month-to-date earthquakes (4.5+)";
pub const MAJOR_EVENTS_LAYER_ID: &str = "major-quakes";
pub const MAJOR_EVENTS_LAYER_NAME: &str = "Month-to-date earthquakes (6.0+)";

/// Color bucket of the all-events overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagnitudeBucket {
    /// magnitude <= 5.0
    Moderate,
    /// 5.0 < magnitude <= 5.9
    Strong,
    /// magnitude > 5.9
    Major,
}

impl MagnitudeBucket {
    pub fn classify(magnitude: f64) -> Self {
        if magnitude <= MODERATE_MAX {
            MagnitudeBucket::Moderate
        } else if magnitude <= STRONG_MAX {
            MagnitudeBucket::Strong
        } else {
            MagnitudeBucket::Major
        }
    }

    pub fn color(&self) -> Color {
        match self {
            MagnitudeBucket::Moderate => Color::LIGHT_SALMON,
            MagnitudeBucket::Strong => Color::INDIAN_RED,
            MagnitudeBucket::Major => Color::DARK_RED,
        }
    }
}

pub fn marker_radius(magnitude: f64) -> f64 {
    magnitude * MAGNITUDE_RADIUS_SCALE
}

/// Membership test of the major-events overlay.
/// Independent from the color table: 5.95 is colored as major but is not one.
pub fn is_major(quake: &Earthquake) -> bool {
    quake.magnitude >= MAJOR_MAGNITUDE
}

/// Place as a heading line, then the magnitude
pub fn popup_text(quake: &Earthquake) -> String {
    format!("{}\nMagnitude: {}", quake.place, quake.magnitude)
}

pub fn quake_marker(quake: &Earthquake, fill_color: Color) -> CircleMarker {
    let style = PointStyle {
        fill_color,
        fill_opacity: MARKER_FILL_OPACITY,
        stroke: false,
        stroke_color: Color::WHITE,
        stroke_width: 1.0,
        radius: marker_radius(quake.magnitude),
    };
    CircleMarker::new(quake.position, style).with_popup(popup_text(quake))
}

/// One marker per record, colored by its bucket
pub fn all_events_layer(quakes: &[Earthquake]) -> VectorLayer {
    let markers = quakes
        .iter()
        .map(|quake| quake_marker(quake, MagnitudeBucket::classify(quake.magnitude).color()))
        .collect();
    VectorLayer::new(
        ALL_EVENTS_LAYER_ID.to_string(),
        ALL_EVENTS_LAYER_NAME.to_string(),
        markers,
    )
}

/// Only the major events, all in the major color
pub fn major_events_layer(quakes: &[Earthquake]) -> VectorLayer {
    let markers = quakes
        .iter()
        .filter(|quake| is_major(quake))
        .map(|quake| quake_marker(quake, MagnitudeBucket::Major.color()))
        .collect();
    VectorLayer::new(
        MAJOR_EVENTS_LAYER_ID.to_string(),
        MAJOR_EVENTS_LAYER_NAME.to_string(),
        markers,
    )
}
