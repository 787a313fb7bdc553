use crate::{
    core::{
        constants::{MAX_TILE_ZOOM, TILE_SIZE},
        geo::{LatLng, TileCoord},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::RenderContext,
    tiles::{
        cache::TileCache,
        loader::TileLoader,
        source::{TileSource, UrlTemplateSource},
    },
    Result,
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};

/// Load at most this many tiles per frame
const MAX_LOAD_PER_FRAME: usize = 8;

/// Configuration for a tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerOptions {
    /// URL template for tiles (e.g., "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")
    pub url_template: String,
    /// Substituted for `{id}` in the template
    pub style_id: Option<String>,
    /// Substituted for `{accessToken}` in the template
    pub access_token: Option<String>,
    /// Available subdomains for load balancing
    pub subdomains: Vec<String>,
    /// Attribution text
    pub attribution: String,
    /// Tile size in pixels
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Number of tiles kept in memory
    pub cache_size: usize,
    pub request_timeout_secs: u64,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            style_id: None,
            access_token: None,
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: "© OpenStreetMap contributors".to_string(),
            tile_size: TILE_SIZE,
            min_zoom: 0,
            max_zoom: MAX_TILE_ZOOM,
            cache_size: 512,
            request_timeout_secs: 30,
        }
    }
}

/// A tile-based layer that displays map tiles from a tile server
pub struct TileLayer {
    properties: LayerProperties,
    options: TileLayerOptions,
    source: UrlTemplateSource,
    loader: TileLoader,
    cache: TileCache,
}

impl TileLayer {
    /// Create a new tile layer with custom options
    pub fn with_options(id: String, name: String, options: TileLayerOptions) -> Self {
        let loader = TileLoader::new(Duration::from_secs(options.request_timeout_secs));
        Self::with_loader(id, name, options, loader)
    }

    pub(crate) fn with_loader(
        id: String,
        name: String,
        options: TileLayerOptions,
        loader: TileLoader,
    ) -> Self {
        let mut source = UrlTemplateSource::new(options.url_template.clone())
            .with_subdomains(options.subdomains.clone());
        if let Some(style_id) = &options.style_id {
            source = source.with_param("id", style_id.clone());
        }
        if let Some(token) = &options.access_token {
            source = source.with_param("accessToken", token.clone());
        }

        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            cache: TileCache::new(options.cache_size),
            options,
            source,
            loader,
        }
    }

    /// URL of a single tile
    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.source.url(coord)
    }

    pub fn tile_options(&self) -> &TileLayerOptions {
        &self.options
    }

    pub fn attribution(&self) -> &str {
        &self.options.attribution
    }

    /// Store already-fetched tile bytes
    pub fn insert_tile(&mut self, coord: TileCoord, data: Vec<u8>) {
        self.cache.insert(coord, data);
    }

    pub fn cached_tiles(&self) -> usize {
        self.cache.len()
    }

    /// Tile zoom level used for a viewport zoom, clamped to the layer limits
    pub fn tile_zoom(&self, viewport: &Viewport) -> u8 {
        let zoom = viewport.zoom.floor().max(0.0) as u8;
        zoom.clamp(self.options.min_zoom, self.options.max_zoom)
    }

    /// Tiles covering the viewport plus a one-tile margin
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileCoord> {
        let zoom = self.tile_zoom(viewport);
        let last = (1u32 << zoom) - 1;
        let bounds = viewport.bounds();

        let north_west = TileCoord::from_lat_lng(
            &LatLng::new(bounds.north_east.lat, bounds.south_west.lng),
            zoom,
        );
        let south_east = TileCoord::from_lat_lng(
            &LatLng::new(bounds.south_west.lat, bounds.north_east.lng),
            zoom,
        );

        let min_x = north_west.x.saturating_sub(1);
        let max_x = (south_east.x + 1).min(last);
        let min_y = north_west.y.saturating_sub(1);
        let max_y = (south_east.y + 1).min(last);

        let mut tiles = Vec::new();
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                tiles.push(TileCoord::new(x, y, zoom));
            }
        }
        tiles
    }

    /// Move finished downloads into the cache
    fn collect_downloads(&mut self) {
        for (coord, data) in self.loader.drain_completed() {
            log::debug!("tile ready {:?} ({} bytes)", coord, data.len());
            self.cache.insert(coord, data);
        }
    }

    /// Exact tile if cached, otherwise the closest cached ancestor
    fn find_best_tile(&self, coord: TileCoord) -> Option<(TileCoord, Arc<Vec<u8>>)> {
        let mut current = Some(coord);
        while let Some(candidate) = current {
            if let Some(data) = self.cache.get(&candidate) {
                return Some((candidate, data));
            }
            current = candidate.parent();
        }
        None
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        if !self.is_visible() {
            return Ok(());
        }

        self.collect_downloads();

        let mut requested = 0;
        for coord in self.visible_tiles(viewport) {
            let best = self.find_best_tile(coord);

            // Pending and recently failed tiles are skipped by the loader
            if best.as_ref().map(|(c, _)| *c != coord).unwrap_or(true)
                && requested < MAX_LOAD_PER_FRAME
                && self.loader.start_download(&self.source, coord)
            {
                requested += 1;
            }

            // Parent tiles stretch over the area until the exact tile arrives
            if let Some((tile_coord, data)) = best {
                let tile_bounds = tile_coord.bounds();
                let mut min = viewport.lat_lng_to_pixel(&tile_bounds.south_west);
                let mut max = viewport.lat_lng_to_pixel(&tile_bounds.north_east);
                if min.x > max.x {
                    std::mem::swap(&mut min.x, &mut max.x);
                }
                if min.y > max.y {
                    std::mem::swap(&mut min.y, &mut max.y);
                }

                context.render_tile(&self.properties.id, tile_coord, data, (min, max), self.opacity())?;
            }
        }

        Ok(())
    }

    fn options(&self) -> serde_json::Value {
        let mut options = serde_json::to_value(&self.options).unwrap_or_default();
        // Never leak the token through diagnostics
        if let Some(obj) = options.as_object_mut() {
            obj.remove("access_token");
        }
        options
    }
}
