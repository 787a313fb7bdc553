use crate::{
    core::geo::{Point, TileCoord},
    layers::vector::Color,
    MapError, Result,
};
use std::sync::Arc;

/// Resolved style of a circle on screen
#[derive(Debug, Clone, PartialEq)]
pub struct CircleRenderStyle {
    pub fill_color: Color,
    /// Fill opacity already multiplied by the layer opacity
    pub fill_opacity: f32,
    /// `None` when the marker is drawn without an outline
    pub stroke: Option<(Color, f32)>,
}

/// Commands that can be issued to the render context
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Encoded raster tile placed at screen bounds (min, max)
    Tile {
        layer_id: String,
        coord: TileCoord,
        data: Arc<Vec<u8>>,
        bounds: (Point, Point),
        opacity: f32,
    },
    Circle {
        center: Point,
        radius: f64,
        style: CircleRenderStyle,
    },
}

/// Frame-local queue of draw commands, filled by layers in render order
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    drawing_queue: Vec<DrawCommand>,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
        }
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) {
        self.drawing_queue.clear();
    }

    /// Queue a tile with validated bounds and opacity
    pub fn render_tile(
        &mut self,
        layer_id: &str,
        coord: TileCoord,
        data: Arc<Vec<u8>>,
        bounds: (Point, Point),
        opacity: f32,
    ) -> Result<()> {
        if bounds.0.x >= bounds.1.x || bounds.0.y >= bounds.1.y {
            return Err(MapError::Render(format!("invalid tile bounds for {coord:?}")));
        }
        if !(0.0..=1.0).contains(&opacity) {
            return Err(MapError::Render("opacity must be between 0.0 and 1.0".to_string()));
        }

        if self.is_on_screen(bounds.0, bounds.1) {
            self.drawing_queue.push(DrawCommand::Tile {
                layer_id: layer_id.to_string(),
                coord,
                data,
                bounds,
                opacity,
            });
        }
        Ok(())
    }

    /// Queue a circle; circles entirely off screen are dropped
    pub fn render_circle(&mut self, center: Point, radius: f64, style: CircleRenderStyle) {
        let min = Point::new(center.x - radius, center.y - radius);
        let max = Point::new(center.x + radius, center.y + radius);
        if radius > 0.0 && self.is_on_screen(min, max) {
            self.drawing_queue.push(DrawCommand::Circle {
                center,
                radius,
                style,
            });
        }
    }

    /// Get the current drawing queue
    pub fn drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    fn is_on_screen(&self, min: Point, max: Point) -> bool {
        !(max.x < 0.0 || max.y < 0.0 || min.x > self.width as f64 || min.y > self.height as f64)
    }
}
