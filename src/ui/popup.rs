use crate::{core::geo::LatLng, layers::vector::CircleMarker};
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};

#[derive(Debug, Clone)]
pub struct PopupStyle {
    pub background_color: Color32,
    pub border_color: Color32,
    pub border_width: f32,
    pub rounding: f32,
    pub padding: f32,
    pub heading_font: FontId,
    pub body_font: FontId,
    pub text_color: Color32,
    /// Gap between the popup tip and the anchor
    pub offset: f32,
}

impl Default for PopupStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::WHITE,
            border_color: Color32::GRAY,
            border_width: 1.0,
            rounding: 4.0,
            padding: 8.0,
            heading_font: FontId::proportional(16.0),
            body_font: FontId::proportional(12.0),
            text_color: Color32::BLACK,
            offset: 6.0,
        }
    }
}

/// Text bubble anchored to a map position.
/// The first line of the content is the heading; a rule separates it from the rest.
#[derive(Debug, Clone)]
pub struct Popup {
    pub position: LatLng,
    heading: String,
    body: String,
    /// Extra distance above the anchor, e.g. the radius of the clicked marker
    anchor_gap: f32,
    pub style: PopupStyle,
}

impl Popup {
    pub fn new(position: LatLng, content: &str) -> Self {
        let (heading, body) = match content.split_once('\n') {
            Some((heading, body)) => (heading.to_string(), body.to_string()),
            None => (content.to_string(), String::new()),
        };
        Self {
            position,
            heading,
            body,
            anchor_gap: 0.0,
            style: PopupStyle::default(),
        }
    }

    /// Popup of a marker, opened just above its circle
    pub fn from_marker(marker: &CircleMarker) -> Option<Self> {
        let content = marker.popup.as_deref()?;
        let mut popup = Self::new(marker.position, content);
        popup.anchor_gap = marker.style.radius as f32;
        Some(popup)
    }

    pub fn with_style(mut self, style: PopupStyle) -> Self {
        self.style = style;
        self
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Paint the popup above `anchor` and return the area it covers
    pub fn render(&self, painter: &Painter, anchor: Pos2) -> Rect {
        let style = &self.style;
        let heading = painter.layout_no_wrap(
            self.heading.clone(),
            style.heading_font.clone(),
            style.text_color,
        );
        let body = painter.layout_no_wrap(self.body.clone(), style.body_font.clone(), style.text_color);

        let rule_gap = if self.body.is_empty() { 0.0 } else { style.padding };
        let content = Vec2::new(
            heading.size().x.max(body.size().x),
            heading.size().y + rule_gap + body.size().y,
        );
        let size = content + Vec2::splat(style.padding * 2.0);
        let bottom = anchor.y - self.anchor_gap - style.offset;
        let rect = Rect::from_min_size(Pos2::new(anchor.x - size.x / 2.0, bottom - size.y), size);

        painter.rect_filled(rect, style.rounding, style.background_color);
        painter.rect_stroke(
            rect,
            style.rounding,
            Stroke::new(style.border_width, style.border_color),
        );

        let mut cursor = rect.min + Vec2::splat(style.padding);
        painter.text(
            cursor,
            Align2::LEFT_TOP,
            &self.heading,
            style.heading_font.clone(),
            style.text_color,
        );
        cursor.y += heading.size().y;

        if !self.body.is_empty() {
            let rule_y = cursor.y + rule_gap / 2.0;
            painter.line_segment(
                [
                    Pos2::new(rect.min.x + style.padding, rule_y),
                    Pos2::new(rect.max.x - style.padding, rule_y),
                ],
                Stroke::new(1.0, style.border_color),
            );
            cursor.y += rule_gap;
            painter.text(
                cursor,
                Align2::LEFT_TOP,
                &self.body,
                style.body_font.clone(),
                style.text_color,
            );
        }

        rect
    }
}
