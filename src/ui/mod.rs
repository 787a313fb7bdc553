//! egui front end: the map widget, its layers control and popups

pub mod controls;
pub mod popup;
pub mod widget;

pub use controls::{ControlAction, LayersControlWidget};
pub use popup::{Popup, PopupStyle};
pub use widget::{MapWidget, MapWidgetConfig};
