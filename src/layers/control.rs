//! State of a Leaflet-style layers control
//!
//! Base layers are mutually exclusive and exactly one of them is active once
//! any base layer is registered. Overlays toggle independently.

use crate::{layers::manager::LayerManager, MapError, Result};
use serde::{Deserialize, Serialize};

/// A named entry in the control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlEntry {
    pub layer_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayersControl {
    base_layers: Vec<ControlEntry>,
    overlays: Vec<ControlEntry>,
    active_base: Option<String>,
    active_overlays: Vec<String>,
    collapsed: bool,
}

impl LayersControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a base layer; the first one registered becomes active
    pub fn add_base_layer(&mut self, layer_id: impl Into<String>, name: impl Into<String>) {
        let layer_id = layer_id.into();
        if self.active_base.is_none() {
            self.active_base = Some(layer_id.clone());
        }
        self.base_layers.push(ControlEntry {
            layer_id,
            name: name.into(),
        });
    }

    pub fn add_overlay(&mut self, layer_id: impl Into<String>, name: impl Into<String>, active: bool) {
        let layer_id = layer_id.into();
        if active {
            self.active_overlays.push(layer_id.clone());
        }
        self.overlays.push(ControlEntry {
            layer_id,
            name: name.into(),
        });
    }

    /// Make `layer_id` the only active base layer
    pub fn select_base(&mut self, layer_id: &str) -> Result<()> {
        if !self.base_layers.iter().any(|e| e.layer_id == layer_id) {
            return Err(MapError::Layer(format!("unknown base layer '{layer_id}'")));
        }
        self.active_base = Some(layer_id.to_string());
        Ok(())
    }

    pub fn toggle_overlay(&mut self, layer_id: &str, on: bool) -> Result<()> {
        if !self.overlays.iter().any(|e| e.layer_id == layer_id) {
            return Err(MapError::Layer(format!("unknown overlay '{layer_id}'")));
        }
        let active = self.is_overlay_active(layer_id);
        if on && !active {
            self.active_overlays.push(layer_id.to_string());
        } else if !on && active {
            self.active_overlays.retain(|id| id != layer_id);
        }
        Ok(())
    }

    pub fn base_layers(&self) -> &[ControlEntry] {
        &self.base_layers
    }

    pub fn overlays(&self) -> &[ControlEntry] {
        &self.overlays
    }

    pub fn active_base(&self) -> Option<&str> {
        self.active_base.as_deref()
    }

    pub fn is_overlay_active(&self, layer_id: &str) -> bool {
        self.active_overlays.iter().any(|id| id == layer_id)
    }

    /// Active overlays in registration order
    pub fn active_overlays(&self) -> Vec<&str> {
        self.overlays
            .iter()
            .filter(|e| self.is_overlay_active(&e.layer_id))
            .map(|e| e.layer_id.as_str())
            .collect()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    /// Push the control state into layer visibility
    pub fn apply(&self, manager: &mut LayerManager) -> Result<()> {
        for entry in &self.base_layers {
            let visible = self.active_base.as_deref() == Some(entry.layer_id.as_str());
            manager.set_visible(&entry.layer_id, visible)?;
        }
        for entry in &self.overlays {
            manager.set_visible(&entry.layer_id, self.is_overlay_active(&entry.layer_id))?;
        }
        Ok(())
    }
}
