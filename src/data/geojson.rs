use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// GeoJSON geometry; types the map never draws are accepted and ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    /// `[lng, lat]` with an optional third element (depth for seismic feeds)
    Point {
        coordinates: Vec<f64>,
    },
    MultiPoint {
        coordinates: Vec<Vec<f64>>,
    },
    LineString {
        coordinates: Vec<Vec<f64>>,
    },
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    #[serde(other)]
    Other,
}

impl GeoJsonGeometry {
    /// Position of a `Point` geometry
    pub fn point(&self) -> Option<LatLng> {
        match self {
            GeoJsonGeometry::Point { coordinates } => LatLng::from_lng_lat(coordinates),
            _ => None,
        }
    }
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<HashMap<String, serde_json::Value>>,
}

impl GeoJsonFeature {
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref()?.get(key)
    }
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    FeatureCollection {
        features: Vec<GeoJsonFeature>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    Feature(GeoJsonFeature),
}

impl GeoJson {
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn features(&self) -> &[GeoJsonFeature] {
        match self {
            GeoJson::FeatureCollection { features, .. } => features,
            GeoJson::Feature(feature) => std::slice::from_ref(feature),
        }
    }
}

/// One earthquake event read from the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earthquake {
    pub position: LatLng,
    pub magnitude: f64,
    /// Human readable location, empty when the feed has none
    pub place: String,
    pub depth_km: Option<f64>,
    /// Origin time in milliseconds since the Unix epoch
    pub time: Option<i64>,
    /// Event page
    pub url: Option<String>,
    pub id: Option<String>,
}

impl Earthquake {
    pub fn new(position: LatLng, magnitude: f64, place: impl Into<String>) -> Self {
        Self {
            position,
            magnitude,
            place: place.into(),
            depth_km: None,
            time: None,
            url: None,
            id: None,
        }
    }

    /// Reads an event from a feature, or says why it can't be used
    pub fn from_feature(feature: &GeoJsonFeature) -> std::result::Result<Self, String> {
        let magnitude = match feature.property("mag") {
            None | Some(serde_json::Value::Null) => return Err("missing magnitude".to_string()),
            Some(value) => value
                .as_f64()
                .filter(|m| m.is_finite())
                .ok_or_else(|| format!("non-numeric magnitude {value}"))?,
        };

        let coordinates = match &feature.geometry {
            Some(GeoJsonGeometry::Point { coordinates }) => coordinates,
            Some(_) => return Err("geometry is not a point".to_string()),
            None => return Err("missing geometry".to_string()),
        };
        let position = LatLng::from_lng_lat(coordinates)
            .filter(LatLng::is_valid)
            .ok_or_else(|| format!("invalid coordinates {coordinates:?}"))?;

        let place = feature
            .property("place")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let id = feature.id.as_ref().and_then(|id| match id {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Ok(Self {
            position,
            magnitude,
            place,
            depth_km: coordinates.get(2).copied().filter(|d| d.is_finite()),
            time: feature.property("time").and_then(|v| v.as_i64()),
            url: feature
                .property("url")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            id,
        })
    }
}

/// Outcome of reading a feed document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSummary {
    pub total: usize,
    pub accepted: usize,
    pub skipped: usize,
}

/// Every usable earthquake in document order; malformed features are skipped
pub fn extract_earthquakes(document: &GeoJson) -> (Vec<Earthquake>, FeedSummary) {
    let features = document.features();
    let mut quakes = Vec::with_capacity(features.len());
    let mut summary = FeedSummary {
        total: features.len(),
        ..Default::default()
    };

    for (index, feature) in features.iter().enumerate() {
        match Earthquake::from_feature(feature) {
            Ok(quake) => quakes.push(quake),
            Err(reason) => {
                log::warn!(
                    "skipping feature {} ({}): {}",
                    index,
                    feature.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                    reason
                );
                summary.skipped += 1;
            }
        }
    }

    summary.accepted = quakes.len();
    (quakes, summary)
}
