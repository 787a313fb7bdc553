use crate::{
    core::{
        geo::{Point, TileCoord},
        map::Map,
    },
    layers::vector::Color,
    prelude::{HashMap, HashSet},
    rendering::context::{DrawCommand, RenderContext},
    ui::{controls::LayersControlWidget, popup::Popup},
};
use egui::{
    Align2, Color32, ColorImage, Context, FontId, Id, Pos2, Rect, Response, Sense, Stroke,
    TextureHandle, TextureOptions, Ui, Vec2,
};
use std::time::Duration;

/// Textures beyond this count are dropped unless drawn in the current frame
const MAX_TEXTURES: usize = 256;

/// Tiles arrive in the background, so keep repainting at this pace
const TILE_POLL_INTERVAL: Duration = Duration::from_millis(250);

type TextureKey = (String, TileCoord);

#[derive(Debug, Clone)]
pub struct MapWidgetConfig {
    pub show_zoom_control: bool,
    pub show_attribution: bool,
    pub show_layers_control: bool,
    /// Zoom levels per scrolled point
    pub scroll_zoom_speed: f64,
    pub background: Color32,
}

impl Default for MapWidgetConfig {
    fn default() -> Self {
        Self {
            show_zoom_control: true,
            show_attribution: true,
            show_layers_control: true,
            scroll_zoom_speed: 0.005,
            background: Color32::from_rgb(38, 38, 38),
        }
    }
}

/// egui widget that owns a [`Map`] and handles its interaction
pub struct MapWidget {
    map: Map,
    config: MapWidgetConfig,
    id: Id,
    context: RenderContext,
    textures: HashMap<TextureKey, TextureHandle>,
    undecodable: HashSet<TextureKey>,
    popup: Option<Popup>,
    layers_control: LayersControlWidget,
}

impl MapWidget {
    pub fn new(map: Map) -> Self {
        let size = map.viewport().size;
        Self {
            context: RenderContext::new(size.x as u32, size.y as u32),
            map,
            config: MapWidgetConfig::default(),
            id: Id::new("quakemap"),
            textures: HashMap::default(),
            undecodable: HashSet::default(),
            popup: None,
            layers_control: LayersControlWidget::new(),
        }
    }

    pub fn with_config(mut self, config: MapWidgetConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_id(mut self, id: impl std::hash::Hash) -> Self {
        self.id = Id::new(id);
        self
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Open the popup of the marker under a container-relative point, or close it
    pub fn click_at(&mut self, point: Point) {
        self.popup = self.map.marker_at(&point).and_then(Popup::from_marker);
    }

    /// Zoom by a scroll amount, keeping `focus` fixed
    pub fn scroll_zoom(&mut self, scroll: f32, focus: Point) {
        if !self.map.options().scroll_wheel_zoom {
            return;
        }
        let zoom = self.map.viewport().zoom + scroll as f64 * self.config.scroll_zoom_speed;
        self.map.zoom_to(zoom, Some(focus));
    }

    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.map
            .viewport_mut()
            .set_size(Point::new(rect.width() as f64, rect.height() as f64));

        self.handle_input(ui, rect, &response);

        self.context.width = rect.width().max(0.0) as u32;
        self.context.height = rect.height().max(0.0) as u32;
        if let Err(e) = self.map.render(&mut self.context) {
            log::warn!("map render failed: {}", e);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.config.background);
        self.paint_queue(ui.ctx(), &painter, rect);

        if let Some(popup) = &self.popup {
            let anchor = self.map.viewport().lat_lng_to_pixel(&popup.position);
            popup.render(&painter, to_screen(rect, anchor));
        }

        if self.config.show_attribution && self.map.options().attribution_control {
            if let Some(text) = self.map.attribution() {
                paint_attribution(&painter, rect, text);
            }
        }

        if self.config.show_zoom_control && self.map.options().zoom_control {
            self.zoom_buttons(ui, rect);
        }

        if self.config.show_layers_control && self.map.options().layers_control {
            self.layers_control.show(ui, rect, &mut self.map, self.id);
        }

        ui.ctx().request_repaint_after(TILE_POLL_INTERVAL);
        response
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.0 {
                self.map.pan(Point::new(delta.x as f64, delta.y as f64));
            }
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                if let Some(pos) = response.hover_pos() {
                    self.scroll_zoom(scroll, to_local(rect, pos));
                }
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.click_at(to_local(rect, pos));
            }
        }
    }

    fn zoom_buttons(&mut self, ui: &mut Ui, rect: Rect) {
        let size = Vec2::splat(28.0);
        let zoom_in_rect = Rect::from_min_size(rect.left_top() + Vec2::new(10.0, 10.0), size);
        let zoom_out_rect = Rect::from_min_size(rect.left_top() + Vec2::new(10.0, 40.0), size);

        let zoom = self.map.viewport().zoom;
        let viewport = self.map.viewport();
        let zoom_in = ui.put(
            zoom_in_rect,
            egui::Button::new("+").sense(if zoom < viewport.max_zoom {
                Sense::click()
            } else {
                Sense::hover()
            }),
        );
        let zoom_out = ui.put(
            zoom_out_rect,
            egui::Button::new("−").sense(if zoom > viewport.min_zoom {
                Sense::click()
            } else {
                Sense::hover()
            }),
        );

        if zoom_in.clicked() {
            self.map.zoom_in();
        }
        if zoom_out.clicked() {
            self.map.zoom_out();
        }
    }

    fn paint_queue(&mut self, ctx: &Context, painter: &egui::Painter, rect: Rect) {
        let mut drawn: HashSet<TextureKey> = HashSet::default();

        for command in self.context.drawing_queue() {
            match command {
                DrawCommand::Tile {
                    layer_id,
                    coord,
                    data,
                    bounds,
                    opacity,
                } => {
                    let key = (layer_id.clone(), *coord);
                    if self.undecodable.contains(&key) {
                        continue;
                    }
                    if !self.textures.contains_key(&key) {
                        match decode_tile(data) {
                            Some(image) => {
                                let name = format!("{}/{}/{}/{}", layer_id, coord.z, coord.x, coord.y);
                                let texture = ctx.load_texture(name, image, TextureOptions::LINEAR);
                                self.textures.insert(key.clone(), texture);
                            }
                            None => {
                                log::warn!("could not decode tile {:?} of {}", coord, layer_id);
                                self.undecodable.insert(key);
                                continue;
                            }
                        }
                    }
                    if let Some(texture) = self.textures.get(&key) {
                        let tile_rect =
                            Rect::from_two_pos(to_screen(rect, bounds.0), to_screen(rect, bounds.1));
                        painter.image(
                            texture.id(),
                            tile_rect,
                            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                            Color32::WHITE.gamma_multiply(*opacity),
                        );
                        drawn.insert(key);
                    }
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    style,
                } => {
                    let center = to_screen(rect, *center);
                    painter.circle_filled(
                        center,
                        *radius as f32,
                        with_opacity(style.fill_color, style.fill_opacity),
                    );
                    if let Some((color, width)) = style.stroke {
                        painter.circle_stroke(center, *radius as f32, Stroke::new(width, Color32::from(color)));
                    }
                }
            }
        }

        if self.textures.len() > MAX_TEXTURES {
            self.textures.retain(|key, _| drawn.contains(key));
        }
    }
}

fn to_screen(rect: Rect, point: Point) -> Pos2 {
    Pos2::new(rect.min.x + point.x as f32, rect.min.y + point.y as f32)
}

fn to_local(rect: Rect, pos: Pos2) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

pub(crate) fn with_opacity(color: Color, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}

/// Decode PNG/JPEG tile bytes into an egui image
pub(crate) fn decode_tile(bytes: &[u8]) -> Option<ColorImage> {
    let image = image::load_from_memory(bytes).ok()?.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

fn paint_attribution(painter: &egui::Painter, rect: Rect, text: &str) {
    let font = FontId::proportional(10.0);
    let galley = painter.layout_no_wrap(text.to_string(), font.clone(), Color32::DARK_GRAY);
    let padding = Vec2::new(4.0, 2.0);
    let box_rect = Rect::from_min_max(
        rect.right_bottom() - galley.size() - padding * 2.0,
        rect.right_bottom(),
    );
    painter.rect_filled(box_rect, 0.0, Color32::from_white_alpha(200));
    painter.text(
        box_rect.right_bottom() - padding,
        Align2::RIGHT_BOTTOM,
        text,
        font,
        Color32::DARK_GRAY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{builder::MapBuilder, geo::LatLng};
    use crate::layers::vector::{CircleMarker, PointStyle, VectorLayer};

    fn widget() -> MapWidget {
        let marker = CircleMarker::new(
            LatLng::new(0.0, 0.0),
            PointStyle {
                radius: 10.0,
                ..Default::default()
            },
        )
        .with_popup("Testville\nMagnitude: 4.8");
        let overlay = VectorLayer::new("quakes".to_string(), "Quakes".to_string(), vec![marker]);

        let map = MapBuilder::new()
            .with_center_and_zoom(LatLng::new(0.0, 0.0), 3.0)
            .with_size(Point::new(800.0, 600.0))
            .with_overlay(Box::new(overlay), true)
            .build()
            .unwrap();
        MapWidget::new(map)
    }

    #[test]
    fn test_click_opens_and_closes_popup() {
        let mut widget = widget();

        widget.click_at(Point::new(403.0, 298.0));
        let popup = widget.popup().unwrap();
        assert_eq!(popup.heading(), "Testville");
        assert_eq!(popup.body(), "Magnitude: 4.8");

        widget.click_at(Point::new(100.0, 100.0));
        assert!(widget.popup().is_none());
    }

    #[test]
    fn test_scroll_zoom_keeps_focus_point() {
        let mut widget = widget();
        let focus = Point::new(600.0, 200.0);
        let before = widget.map().viewport().pixel_to_lat_lng(&focus);

        widget.scroll_zoom(200.0, focus);

        let viewport = widget.map().viewport();
        assert!((viewport.zoom - 4.0).abs() < 1e-9);
        let after = viewport.pixel_to_lat_lng(&focus);
        assert!((before.lat - after.lat).abs() < 1e-6);
        assert!((before.lng - after.lng).abs() < 1e-6);
    }

    #[test]
    fn test_with_opacity() {
        let color = with_opacity(Color::DARK_RED, 0.8);
        assert_eq!(color.a(), 204);
    }

    #[test]
    fn test_decode_tile() {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(2, 2))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();

        let decoded = decode_tile(&bytes).unwrap();
        assert_eq!(decoded.size, [2, 2]);
        assert!(decode_tile(b"not an image").is_none());
    }
}
