pub mod context;

pub use context::{CircleRenderStyle, DrawCommand, RenderContext};
