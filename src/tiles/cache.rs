use crate::core::geo::TileCoord;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

const DEFAULT_CAPACITY: usize = 512;

/// In-memory cache of encoded tile bytes using LRU eviction
#[derive(Debug)]
pub struct TileCache {
    cache: Arc<Mutex<LruCache<TileCoord, Arc<Vec<u8>>>>>,
}

impl TileCache {
    /// Create a new tile cache with the given capacity (0 falls back to the default)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Get a tile from the cache, marking it as recently used
    pub fn get(&self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        self.cache.lock().ok()?.get(coord).cloned()
    }

    /// Insert a tile into the cache
    pub fn insert(&self, coord: TileCoord, data: Vec<u8>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(coord, Arc::new(data));
        }
    }

    /// Check if a tile is in the cache
    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.cache
            .lock()
            .map(|cache| cache.contains(coord))
            .unwrap_or(false)
    }

    /// Clear all tiles from the cache
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// Get the current number of cached tiles
    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for TileCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_cache_basic_operations() {
        let cache = TileCache::new(2);
        let coord = TileCoord::new(1, 2, 3);

        assert!(cache.is_empty());

        cache.insert(coord, vec![1, 2, 3]);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&coord));
        assert_eq!(*cache.get(&coord).unwrap(), vec![1, 2, 3]);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_tile_cache_lru_eviction() {
        let cache = TileCache::new(2);
        let coord1 = TileCoord::new(1, 1, 1);
        let coord2 = TileCoord::new(2, 2, 2);
        let coord3 = TileCoord::new(3, 3, 3);

        cache.insert(coord1, vec![1]);
        cache.insert(coord2, vec![2]);

        // Touch coord1 so coord2 becomes the eviction candidate
        assert!(cache.get(&coord1).is_some());
        cache.insert(coord3, vec![3]);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&coord1));
        assert!(!cache.contains(&coord2));
        assert!(cache.contains(&coord3));
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = TileCache::new(0);
        let clone = cache.clone();
        clone.insert(TileCoord::new(0, 0, 0), vec![7]);
        assert_eq!(cache.len(), 1);
    }
}
