use crate::core::constants::{EARTH_RADIUS, MAX_LATITUDE, MAX_TILE_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let max_zoom = MAX_TILE_ZOOM as f64;
        Self {
            center: Self::clamp_center(center),
            zoom: zoom.clamp(0.0, max_zoom),
            size,
            min_zoom: 0.0,
            max_zoom,
        }
    }

    /// Sets the center of the viewport, clamped to the projectable world
    pub fn set_center(&mut self, center: LatLng) {
        self.center = Self::clamp_center(center);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        2_f64.powf(self.zoom)
    }

    /// Projects a LatLng to world pixel coordinates (EPSG:3857) at the given zoom
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);

        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let lat = LatLng::clamp_lat(lat_lng.lat);
        let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;

        let world = 2.0 * PI * EARTH_RADIUS;
        let pixel_x = (x + PI * EARTH_RADIUS) / world * scale;
        let pixel_y = (-y + PI * EARTH_RADIUS) / world * scale;

        Point::new(pixel_x, pixel_y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);

        let world = 2.0 * PI * EARTH_RADIUS;
        let x = (pixel.x / scale) * world - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - (pixel.y / scale) * world;

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();

        LatLng::new(lat, lng)
    }

    /// Converts a geographical coordinate to screen pixel coordinates (container relative)
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let origin = self.project(&self.center, None);
        let projected = self.project(lat_lng, None);
        projected
            .subtract(&origin)
            .add(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
    }

    /// Converts screen pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self.project(&self.center, None);
        let projected = pixel
            .subtract(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
            .add(&origin);
        self.unproject(&projected, None)
    }

    /// Pans the viewport by the given pixel offset (drag direction)
    pub fn pan(&mut self, delta: Point) {
        let center_px = Point::new(self.size.x / 2.0, self.size.y / 2.0);
        let new_center = self.pixel_to_lat_lng(&center_px.subtract(&delta));
        self.set_center(LatLng::new(new_center.lat, LatLng::wrap_lng(new_center.lng)));
    }

    /// Zooms the viewport, keeping `focus_point` (screen pixels) stationary
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus_point {
            Some(focus) => {
                let focus_lat_lng = self.pixel_to_lat_lng(&focus);
                self.zoom = new_zoom;
                let moved = self.lat_lng_to_pixel(&focus_lat_lng);
                self.pan(focus.subtract(&moved));
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&Point::new(self.size.x, self.size.y));

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    fn clamp_center(center: LatLng) -> LatLng {
        LatLng::new(
            center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            center.lng.clamp(-180.0, 180.0),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(LatLng::new(26.3, 17.2), 3.0, Point::new(800.0, 600.0));

        assert_eq!(viewport.zoom, 3.0);
        assert_eq!(viewport.center.lat, 26.3);
        assert_eq!(viewport.size.x, 800.0);
    }

    #[test]
    fn test_center_maps_to_middle_of_screen() {
        let viewport = Viewport::new(LatLng::new(26.3, 17.2), 3.0, Point::new(800.0, 600.0));
        let pixel = viewport.lat_lng_to_pixel(&viewport.center);

        assert!((pixel.x - 400.0).abs() < 1e-6);
        assert!((pixel.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_coordinate_round_trip() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        let center_lat_lng = viewport.pixel_to_lat_lng(&Point::new(256.0, 256.0));
        assert!(center_lat_lng.lat.abs() < 0.01);
        assert!(center_lat_lng.lng.abs() < 0.01);

        let tokyo = LatLng::new(35.68, 139.69);
        let back = viewport.pixel_to_lat_lng(&viewport.lat_lng_to_pixel(&tokyo));
        assert!((back.lat - tokyo.lat).abs() < 1e-6);
        assert!((back.lng - tokyo.lng).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(2.0, 15.0);

        viewport.set_zoom(1.0);
        assert_eq!(viewport.zoom, 2.0);

        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 15.0);
    }

    #[test]
    fn test_pan_moves_center_against_drag() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(512.0, 512.0));
        viewport.pan(Point::new(10.0, 0.0));

        // Dragging the map to the right reveals what lies to the west
        assert!(viewport.center.lng < 0.0);
        assert!(viewport.center.lat.abs() < 1e-9);
    }

    #[test]
    fn test_zoom_to_keeps_focus_point_fixed() {
        let mut viewport = Viewport::new(LatLng::new(10.0, 10.0), 3.0, Point::new(800.0, 600.0));
        let focus = Point::new(600.0, 200.0);
        let before = viewport.pixel_to_lat_lng(&focus);

        viewport.zoom_to(4.0, Some(focus));

        let after = viewport.lat_lng_to_pixel(&before);
        assert_eq!(viewport.zoom, 4.0);
        assert!((after.x - focus.x).abs() < 1e-3);
        assert!((after.y - focus.y).abs() < 1e-3);
    }
}
