//! Core constants derived from Leaflet defaults and the earthquake map's
//! fixed startup configuration.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Mean earth radius used by the spherical Mercator projection (EPSG:3857).
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Highest zoom any tile source in this crate serves.
pub const MAX_TILE_ZOOM: u8 = 18;

/// Programmatic +/- zoom step when calling `zoom_in/zoom_out`.
pub const DEFAULT_ZOOM_DELTA: f64 = 1.0;

/// Default feed: magnitude 4.5+ earthquakes of the past 30 days.
pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/4.5_month.geojson";

/// Initial map center (latitude, longitude).
pub const DEFAULT_CENTER: (f64, f64) = (26.3, 17.2);

/// Initial map zoom.
pub const DEFAULT_ZOOM: f64 = 3.0;

/// Environment variable holding the tile access token.
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

/// Environment variable overriding the feed URL.
pub const FEED_URL_ENV: &str = "QUAKEMAP_FEED_URL";

/// User agent sent with feed and tile requests.
pub const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));
