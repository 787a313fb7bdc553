use crate::core::geo::TileCoord;
use crate::prelude::HashMap;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Leaflet-style URL template.
///
/// `{z}`, `{x}` and `{y}` are replaced by the tile coordinate, `{s}` by a
/// subdomain picked from the coordinate, and any other `{key}` by the
/// matching template parameter (for example `{id}` or `{accessToken}`).
/// Unknown keys are left untouched.
#[derive(Debug, Clone)]
pub struct UrlTemplateSource {
    template: String,
    subdomains: Vec<String>,
    params: HashMap<String, String>,
}

impl UrlTemplateSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            subdomains: Vec::new(),
            params: HashMap::default(),
        }
    }

    pub fn with_subdomains(mut self, subdomains: Vec<String>) -> Self {
        self.subdomains = subdomains;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    fn lookup(&self, key: &str, coord: TileCoord) -> Option<String> {
        match key {
            "z" => Some(coord.z.to_string()),
            "x" => Some(coord.x.to_string()),
            "y" => Some(coord.y.to_string()),
            "s" if !self.subdomains.is_empty() => {
                let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
                Some(self.subdomains[idx].clone())
            }
            other => self.params.get(other).cloned(),
        }
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        let mut url = String::with_capacity(self.template.len() + 32);
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            url.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let key = &after[..close];
                    match self.lookup(key, coord) {
                        Some(value) => url.push_str(&value),
                        None => {
                            url.push('{');
                            url.push_str(key);
                            url.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    url.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        url.push_str(rest);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapbox_style_template() {
        let source = UrlTemplateSource::new(
            "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}",
        )
        .with_param("id", "mapbox.dark")
        .with_param("accessToken", "pk.secret");

        assert_eq!(
            source.url(TileCoord::new(4, 3, 3)),
            "https://api.tiles.mapbox.com/v4/mapbox.dark/3/4/3.png?access_token=pk.secret"
        );
    }

    #[test]
    fn test_subdomains_rotate_with_coordinate() {
        let source = UrlTemplateSource::new("https://{s}.tile.example.org/{z}/{x}/{y}.png")
            .with_subdomains(vec!["a".into(), "b".into(), "c".into()]);

        assert_eq!(
            source.url(TileCoord::new(0, 0, 1)),
            "https://a.tile.example.org/1/0/0.png"
        );
        assert_eq!(
            source.url(TileCoord::new(1, 1, 1)),
            "https://c.tile.example.org/1/1/1.png"
        );
    }

    #[test]
    fn test_unknown_and_unclosed_placeholders_are_kept() {
        let source = UrlTemplateSource::new("https://example.org/{style}/{z}.png?q={open");
        assert_eq!(
            source.url(TileCoord::new(0, 0, 2)),
            "https://example.org/{style}/2.png?q={open"
        );
    }
}
