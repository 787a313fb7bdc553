//! Earthquake-specific styling and map composition

pub mod classify;
pub mod composer;

pub use classify::{all_events_layer, is_major, major_events_layer, MagnitudeBucket};
pub use composer::{compose_map, BaseStyle, QuakeMap};
