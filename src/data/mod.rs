pub mod feed;
pub mod geojson;

pub use feed::{load_earthquakes, FeedSource, HttpFeed, StaticFeed};
pub use geojson::{extract_earthquakes, Earthquake, FeedSummary, GeoJson};
