pub mod base;
pub mod control;
#[macro_use]
pub mod macros;
pub mod manager;
pub mod tile;
pub mod vector;
