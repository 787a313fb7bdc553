pub mod cache;
pub mod loader;
pub mod source;

#[cfg(test)]
pub(crate) mod test_server;

// Re-exports for convenience
pub use cache::TileCache;
pub use loader::TileLoader;
pub use source::{TileSource, UrlTemplateSource};
