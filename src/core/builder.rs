//! Map builder for fluent API configuration

use crate::{
    core::{
        geo::{LatLng, Point},
        map::{Map, MapOptions},
        viewport::Viewport,
    },
    layers::base::LayerTrait,
    MapError, Result,
};

/// Builder for creating and configuring Map instances
pub struct MapBuilder {
    center: LatLng,
    zoom: f64,
    size: Point,
    map_options: MapOptions,
    base_layers: Vec<Box<dyn LayerTrait>>,
    overlays: Vec<(Box<dyn LayerTrait>, bool)>,
    active_base: Option<String>,
    collapsed: bool,
}

impl MapBuilder {
    pub fn new() -> Self {
        let viewport = Viewport::default();
        Self {
            center: viewport.center,
            zoom: viewport.zoom,
            size: viewport.size,
            map_options: MapOptions::default(),
            base_layers: Vec::new(),
            overlays: Vec::new(),
            active_base: None,
            collapsed: true,
        }
    }

    /// Set the initial center and zoom level
    pub fn with_center_and_zoom(mut self, center: LatLng, zoom: f64) -> Self {
        self.center = center;
        self.zoom = zoom;
        self
    }

    /// Initial container size, replaced by the real size on the first frame
    pub fn with_size(mut self, size: Point) -> Self {
        self.size = size;
        self
    }

    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.map_options.min_zoom = Some(min_zoom);
        self.map_options.max_zoom = Some(max_zoom);
        self
    }

    pub fn with_base_layer(mut self, layer: Box<dyn LayerTrait>) -> Self {
        self.base_layers.push(layer);
        self
    }

    pub fn with_overlay(mut self, layer: Box<dyn LayerTrait>, active: bool) -> Self {
        self.overlays.push((layer, active));
        self
    }

    /// Base layer shown at start; defaults to the first one added
    pub fn with_active_base(mut self, layer_id: impl Into<String>) -> Self {
        self.active_base = Some(layer_id.into());
        self
    }

    /// Whether the layers control starts collapsed
    pub fn with_collapsed_control(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn build(self) -> Result<Map> {
        if !self.center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "invalid center {}, {}",
                self.center.lat, self.center.lng
            )));
        }

        let viewport = Viewport::new(self.center, self.zoom, self.size);
        let mut map = Map::with_options(viewport, self.map_options);
        map.viewport_mut().set_zoom(self.zoom);

        for layer in self.base_layers {
            map.add_base_layer(layer)?;
        }
        for (layer, active) in self.overlays {
            map.add_overlay(layer, active)?;
        }
        if let Some(active_base) = &self.active_base {
            map.select_base_layer(active_base)?;
        }
        map.set_control_collapsed(self.collapsed);

        Ok(map)
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::vector::VectorLayer;

    fn layer(id: &str) -> Box<dyn LayerTrait> {
        Box::new(VectorLayer::new(id.to_string(), id.to_string(), Vec::new()))
    }

    #[test]
    fn test_builder_defaults() {
        let map = MapBuilder::new().build().unwrap();
        assert_eq!(map.viewport().zoom, 0.0);
        assert!(map.active_base_layer().is_none());
        assert!(map.control().is_collapsed());
    }

    #[test]
    fn test_builder_configures_layers() {
        let map = MapBuilder::new()
            .with_center_and_zoom(LatLng::new(26.3, 17.2), 3.0)
            .with_zoom_limits(1.0, 18.0)
            .with_base_layer(layer("dark"))
            .with_base_layer(layer("light"))
            .with_overlay(layer("all"), true)
            .with_overlay(layer("major"), false)
            .with_active_base("light")
            .with_collapsed_control(false)
            .build()
            .unwrap();

        assert_eq!(map.viewport().center, LatLng::new(26.3, 17.2));
        assert_eq!(map.viewport().zoom, 3.0);
        assert_eq!(map.viewport().min_zoom, 1.0);
        assert_eq!(map.active_base_layer(), Some("light"));
        assert_eq!(map.active_overlays(), vec!["all"]);
        assert!(!map.control().is_collapsed());
    }

    #[test]
    fn test_builder_rejects_unknown_active_base() {
        let result = MapBuilder::new()
            .with_base_layer(layer("dark"))
            .with_active_base("satellite")
            .build();
        assert!(matches!(result, Err(MapError::Layer(_))));
    }

    #[test]
    fn test_builder_rejects_invalid_center() {
        let result = MapBuilder::new()
            .with_center_and_zoom(LatLng::new(120.0, 0.0), 3.0)
            .build();
        assert!(matches!(result, Err(MapError::InvalidCoordinates(_))));
    }
}
