//! Base layer catalogue
//!
//! The five mutually-exclusive tile styles the viewer can display. Exactly
//! one base layer is attached to the map surface at any time; switching is
//! handled by the controller.

use serde::{Deserialize, Serialize};

/// A base tile layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BaseLayer {
    /// Standard OpenStreetMap tiles (initial layer)
    #[default]
    Osm,
    /// Humanitarian-style imagery tiles
    Satellite,
    /// OpenTopoMap terrain tiles
    Terrain,
    /// Carto dark basemap
    Dark,
    /// Stadia alidade smooth dark basemap
    Night,
}

impl BaseLayer {
    /// All base layers, in display order.
    pub const ALL: [BaseLayer; 5] = [
        BaseLayer::Osm,
        BaseLayer::Satellite,
        BaseLayer::Terrain,
        BaseLayer::Dark,
        BaseLayer::Night,
    ];

    /// Human-readable layer name for display.
    pub fn label(&self) -> &'static str {
        match self {
            BaseLayer::Osm => "OSM",
            BaseLayer::Satellite => "Satellite",
            BaseLayer::Terrain => "Terrain",
            BaseLayer::Dark => "Dark",
            BaseLayer::Night => "Night",
        }
    }

    /// Slippy-map tile URL template for this layer.
    pub fn tile_url(&self) -> &'static str {
        match self {
            BaseLayer::Osm => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            BaseLayer::Satellite => "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png",
            BaseLayer::Terrain => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            BaseLayer::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
            BaseLayer::Night => {
                "https://tiles.stadiamaps.com/tiles/alidade_smooth_dark/{z}/{x}/{y}{r}.png"
            }
        }
    }

    /// Attribution text required by the tile provider.
    pub fn attribution(&self) -> &'static str {
        match self {
            BaseLayer::Terrain => {
                "Map data: © OpenStreetMap contributors, SRTM | Map style: © OpenTopoMap (CC-BY-SA)"
            }
            _ => "© OpenStreetMap contributors",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layer_is_osm() {
        assert_eq!(BaseLayer::default(), BaseLayer::Osm);
    }

    #[test]
    fn test_all_contains_every_layer_once() {
        assert_eq!(BaseLayer::ALL.len(), 5);
        for layer in BaseLayer::ALL {
            assert_eq!(
                BaseLayer::ALL.iter().filter(|l| **l == layer).count(),
                1,
                "{} appears more than once",
                layer.label()
            );
        }
    }

    #[test]
    fn test_tile_urls_are_templates() {
        for layer in BaseLayer::ALL {
            let url = layer.tile_url();
            assert!(url.starts_with("https://"), "{}", url);
            assert!(url.contains("{z}") && url.contains("{x}") && url.contains("{y}"));
        }
    }

    #[test]
    fn test_serialisation_uses_snake_case() {
        let json = serde_json::to_string(&BaseLayer::Satellite).unwrap();
        assert_eq!(json, "\"satellite\"");

        let deserialised: BaseLayer = serde_json::from_str("\"night\"").unwrap();
        assert_eq!(deserialised, BaseLayer::Night);
    }
}
