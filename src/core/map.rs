use crate::{
    core::{
        constants::DEFAULT_ZOOM_DELTA,
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    layers::{
        base::LayerTrait,
        control::LayersControl,
        manager::LayerManager,
        tile::TileLayer,
        vector::{CircleMarker, VectorLayer},
    },
    rendering::context::RenderContext,
    MapError, Result,
};

/// z-index of base layers; overlays stack above from `OVERLAY_Z_INDEX`
const BASE_Z_INDEX: i32 = 0;
const OVERLAY_Z_INDEX: i32 = 100;

#[derive(Debug, Clone)]
pub struct MapOptions {
    pub dragging: bool,
    pub scroll_wheel_zoom: bool,
    pub attribution_control: bool,
    pub zoom_control: bool,
    pub layers_control: bool,
    pub zoom_delta: f64,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            dragging: true,
            scroll_wheel_zoom: true,
            attribution_control: true,
            zoom_control: true,
            layers_control: true,
            zoom_delta: DEFAULT_ZOOM_DELTA,
            min_zoom: None,
            max_zoom: None,
        }
    }
}

/// The map view: viewport, layers and the layers control state
pub struct Map {
    viewport: Viewport,
    layer_manager: LayerManager,
    control: LayersControl,
    options: MapOptions,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self::with_options(Viewport::new(center, zoom, size), MapOptions::default())
    }

    pub fn with_options(mut viewport: Viewport, options: MapOptions) -> Self {
        if options.min_zoom.is_some() || options.max_zoom.is_some() {
            viewport.set_zoom_limits(
                options.min_zoom.unwrap_or(viewport.min_zoom),
                options.max_zoom.unwrap_or(viewport.max_zoom),
            );
        }

        Self {
            viewport,
            layer_manager: LayerManager::new(),
            control: LayersControl::new(),
            options,
        }
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        if !center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "{}, {}",
                center.lat, center.lng
            )));
        }
        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);
        Ok(())
    }

    /// Pan by a screen-space drag delta
    pub fn pan(&mut self, delta: Point) {
        if self.options.dragging {
            self.viewport.pan(delta);
        }
    }

    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        self.viewport.zoom_to(zoom, focus_point);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_to(self.viewport.zoom + self.options.zoom_delta, None);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_to(self.viewport.zoom - self.options.zoom_delta, None);
    }

    /// Add a mutually exclusive base layer; the first one added is active
    pub fn add_base_layer(&mut self, mut layer: Box<dyn LayerTrait>) -> Result<()> {
        let id = layer.id().to_string();
        let name = layer.name().to_string();
        layer.set_z_index(BASE_Z_INDEX);
        self.layer_manager.add_layer(layer)?;
        self.control.add_base_layer(id, name);
        self.control.apply(&mut self.layer_manager)
    }

    /// Add an independently toggled overlay, stacked above earlier overlays
    pub fn add_overlay(&mut self, mut layer: Box<dyn LayerTrait>, active: bool) -> Result<()> {
        let id = layer.id().to_string();
        let name = layer.name().to_string();
        layer.set_z_index(OVERLAY_Z_INDEX + self.control.overlays().len() as i32);
        self.layer_manager.add_layer(layer)?;
        self.control.add_overlay(id, name, active);
        self.control.apply(&mut self.layer_manager)
    }

    pub fn select_base_layer(&mut self, layer_id: &str) -> Result<()> {
        self.control.select_base(layer_id)?;
        log::debug!("base layer switched to {}", layer_id);
        self.control.apply(&mut self.layer_manager)
    }

    pub fn set_overlay_visible(&mut self, layer_id: &str, visible: bool) -> Result<()> {
        self.control.toggle_overlay(layer_id, visible)?;
        self.control.apply(&mut self.layer_manager)
    }

    pub fn set_control_collapsed(&mut self, collapsed: bool) {
        self.control.set_collapsed(collapsed);
    }

    pub fn active_base_layer(&self) -> Option<&str> {
        self.control.active_base()
    }

    pub fn active_overlays(&self) -> Vec<&str> {
        self.control.active_overlays()
    }

    /// Attribution of the active base layer, if it is a tile layer
    pub fn attribution(&self) -> Option<&str> {
        let base = self.control.active_base()?;
        self.layer_manager
            .get_layer(base)?
            .as_any()
            .downcast_ref::<TileLayer>()
            .map(TileLayer::attribution)
    }

    /// Top-most marker of a visible overlay under a screen point
    pub fn marker_at(&self, point: &Point) -> Option<&CircleMarker> {
        self.layer_manager
            .layers()
            .into_iter()
            .rev()
            .filter(|layer| layer.is_visible())
            .filter_map(|layer| layer.as_any().downcast_ref::<VectorLayer>())
            .find_map(|layer| layer.marker_at(point, &self.viewport))
    }

    /// Queue the draw commands of every visible layer for this frame
    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        context.begin_frame();
        self.viewport
            .set_size(Point::new(context.width as f64, context.height as f64));
        self.layer_manager.render(context, &self.viewport)
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layer_manager
    }

    pub fn control(&self) -> &LayersControl {
        &self.control
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::vector::PointStyle;
    use crate::rendering::context::DrawCommand;

    fn overlay(id: &str, lat: f64, lng: f64) -> Box<dyn LayerTrait> {
        let marker = CircleMarker::new(
            LatLng::new(lat, lng),
            PointStyle {
                radius: 8.0,
                ..Default::default()
            },
        )
        .with_popup(id);
        Box::new(VectorLayer::new(id.to_string(), id.to_string(), vec![marker]))
    }

    fn map() -> Map {
        let mut map = Map::new(LatLng::new(0.0, 0.0), 3.0, Point::new(800.0, 600.0));
        map.add_base_layer(overlay("base-a", 20.0, 20.0)).unwrap();
        map.add_base_layer(overlay("base-b", 20.0, 20.0)).unwrap();
        map.add_overlay(overlay("first", 0.0, 0.0), true).unwrap();
        map.add_overlay(overlay("second", 0.0, 0.0), false).unwrap();
        map
    }

    #[test]
    fn test_exactly_one_base_layer_visible() {
        let mut map = map();
        let visible = |m: &Map, id: &str| m.get_layer(id).unwrap().is_visible();

        assert_eq!(map.active_base_layer(), Some("base-a"));
        assert!(visible(&map, "base-a"));
        assert!(!visible(&map, "base-b"));

        map.select_base_layer("base-b").unwrap();
        assert!(!visible(&map, "base-a"));
        assert!(visible(&map, "base-b"));

        assert!(map.select_base_layer("missing").is_err());
        assert_eq!(map.active_base_layer(), Some("base-b"));
    }

    #[test]
    fn test_marker_at_uses_visible_top_overlay() {
        let mut map = map();
        let center = Point::new(400.0, 300.0);
        assert_eq!(
            map.marker_at(&center).and_then(|m| m.popup.as_deref()),
            Some("first")
        );

        map.set_overlay_visible("second", true).unwrap();
        assert_eq!(
            map.marker_at(&center).and_then(|m| m.popup.as_deref()),
            Some("second")
        );

        map.set_overlay_visible("first", false).unwrap();
        map.set_overlay_visible("second", false).unwrap();
        assert!(map.marker_at(&center).is_none());
    }

    #[test]
    fn test_render_only_draws_visible_layers() {
        let mut map = map();
        let mut context = RenderContext::new(800, 600);
        map.render(&mut context).unwrap();

        // active base marker plus the first overlay
        let circles = context
            .drawing_queue()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        assert_eq!(circles, 2);
    }

    #[test]
    fn test_zoom_steps_and_set_view() {
        let mut map = map();
        map.zoom_in();
        assert_eq!(map.viewport().zoom, 4.0);
        map.zoom_out();
        map.zoom_out();
        assert_eq!(map.viewport().zoom, 2.0);

        assert!(map.set_view(LatLng::new(95.0, 0.0), 3.0).is_err());
        map.set_view(LatLng::new(26.3, 17.2), 5.0).unwrap();
        assert_eq!(map.viewport().center, LatLng::new(26.3, 17.2));
    }
}
