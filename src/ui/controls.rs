use crate::core::map::Map;
use egui::{Align2, Area, Frame, Id, Order, Rect, Response, Ui, Vec2};

/// A change requested through the layers control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
    SelectBase(String),
    ToggleOverlay(String, bool),
    SetCollapsed(bool),
}

/// Leaflet-style layers control: radio buttons for base layers, checkboxes for overlays
#[derive(Debug, Clone)]
pub struct LayersControlWidget {
    pub margin: f32,
    pub title: String,
}

impl Default for LayersControlWidget {
    fn default() -> Self {
        Self {
            margin: 10.0,
            title: "Layers".to_string(),
        }
    }
}

impl LayersControlWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control in the top-right corner of `map_rect` and apply what the user picked
    pub fn show(&self, ui: &mut Ui, map_rect: Rect, map: &mut Map, id: Id) -> Response {
        let area = Area::new(id.with("layers_control"))
            .order(Order::Foreground)
            .pivot(Align2::RIGHT_TOP)
            .fixed_pos(map_rect.right_top() + Vec2::new(-self.margin, self.margin))
            .show(ui.ctx(), |ui| {
                Frame::popup(ui.style())
                    .show(ui, |ui| self.contents(ui, map))
                    .inner
            });

        for action in area.inner {
            if let Err(e) = apply_action(map, &action) {
                log::warn!("layers control: {}", e);
            }
        }
        area.response
    }

    fn contents(&self, ui: &mut Ui, map: &Map) -> Vec<ControlAction> {
        let control = map.control();
        let mut actions = Vec::new();

        let collapsed = control.is_collapsed();
        if ui.selectable_label(!collapsed, self.title.as_str()).clicked() {
            actions.push(ControlAction::SetCollapsed(!collapsed));
        }
        if collapsed {
            return actions;
        }

        ui.separator();
        for entry in control.base_layers() {
            let selected = control.active_base() == Some(entry.layer_id.as_str());
            if ui.radio(selected, entry.name.as_str()).clicked() && !selected {
                actions.push(ControlAction::SelectBase(entry.layer_id.clone()));
            }
        }

        if !control.overlays().is_empty() {
            ui.separator();
        }
        for entry in control.overlays() {
            let mut active = control.is_overlay_active(&entry.layer_id);
            if ui.checkbox(&mut active, entry.name.as_str()).changed() {
                actions.push(ControlAction::ToggleOverlay(entry.layer_id.clone(), active));
            }
        }

        actions
    }
}

pub fn apply_action(map: &mut Map, action: &ControlAction) -> crate::Result<()> {
    match action {
        ControlAction::SelectBase(id) => map.select_base_layer(id),
        ControlAction::ToggleOverlay(id, on) => map.set_overlay_visible(id, *on),
        ControlAction::SetCollapsed(collapsed) => {
            map.set_control_collapsed(*collapsed);
            Ok(())
        }
    }
}
