use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::{CircleRenderStyle, RenderContext},
    Result,
};

#[cfg(feature = "egui")]
use egui::Color32;

use serde::{Deserialize, Serialize};

/// Serializable RGB color that can convert to egui::Color32
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// CSS `lightsalmon`
    pub const LIGHT_SALMON: Color = Color::rgb(255, 160, 122);
    /// CSS `indianred`
    pub const INDIAN_RED: Color = Color::rgb(205, 92, 92);
    /// CSS `darkred`
    pub const DARK_RED: Color = Color::rgb(139, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[cfg(feature = "egui")]
impl From<Color> for Color32 {
    fn from(color: Color) -> Self {
        Color32::from_rgb(color.r, color.g, color.b)
    }
}

/// Style of a circle marker, radius in screen pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub fill_color: Color,
    /// Fill opacity (0.0 to 1.0)
    pub fill_opacity: f32,
    /// Whether the outline is drawn
    pub stroke: bool,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub radius: f64,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            fill_color: Color::rgb(51, 136, 255),
            fill_opacity: 0.2,
            stroke: true,
            stroke_color: Color::rgb(51, 136, 255),
            stroke_width: 3.0,
            radius: 10.0,
        }
    }
}

/// A circle of fixed pixel radius anchored at a geographic position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMarker {
    pub position: LatLng,
    pub style: PointStyle,
    pub popup: Option<String>,
}

impl CircleMarker {
    pub fn new(position: LatLng, style: PointStyle) -> Self {
        Self {
            position,
            style,
            popup: None,
        }
    }

    pub fn with_popup(mut self, text: impl Into<String>) -> Self {
        self.popup = Some(text.into());
        self
    }

    /// Whether the screen point falls inside the drawn circle
    pub fn contains_screen_point(&self, point: &Point, viewport: &Viewport) -> bool {
        let center = viewport.lat_lng_to_pixel(&self.position);
        center.distance_to(point) <= self.style.radius
    }
}

/// A group of circle markers shown and hidden as a unit
pub struct VectorLayer {
    properties: LayerProperties,
    markers: Vec<CircleMarker>,
    bounds: Option<LatLngBounds>,
}

impl VectorLayer {
    /// Membership is fixed here; the layer offers no way to add or remove markers later
    pub fn new(id: String, name: String, markers: Vec<CircleMarker>) -> Self {
        let positions: Vec<LatLng> = markers.iter().map(|m| m.position).collect();
        Self {
            properties: LayerProperties::new(id, name, LayerType::Vector),
            bounds: LatLngBounds::from_points(&positions),
            markers,
        }
    }

    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Top-most marker under a screen point; later markers draw over earlier ones
    pub fn marker_at(&self, point: &Point, viewport: &Viewport) -> Option<&CircleMarker> {
        self.markers
            .iter()
            .rev()
            .find(|marker| marker.contains_screen_point(point, viewport))
    }
}

impl LayerTrait for VectorLayer {
    crate::impl_layer_trait!(VectorLayer, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        if !self.is_visible() {
            return Ok(());
        }

        let opacity = self.opacity();
        for marker in &self.markers {
            let style = &marker.style;
            let center = viewport.lat_lng_to_pixel(&marker.position);
            context.render_circle(
                center,
                style.radius,
                CircleRenderStyle {
                    fill_color: style.fill_color,
                    fill_opacity: style.fill_opacity * opacity,
                    stroke: style
                        .stroke
                        .then_some((style.stroke_color, style.stroke_width)),
                },
            );
        }

        Ok(())
    }

    // Markers spread over the whole world, so the layer never gets culled wholesale
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "marker_count": self.markers.len(),
            "bounds": self.bounds,
        })
    }
}
