//! Level loading from Tiled JSON maps.
//!
//! Only the subset the scene needs is read: tile layers, object groups and
//! per-tile `collides` properties.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::math::{Rect, Vec2};
use crate::tilemap::{Tile, Tilemap};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level has no layer named `{0}`")]
    MissingLayer(String),
    #[error("layer `{layer}` has {found} tiles, expected {expected}")]
    LayerSize {
        layer: String,
        expected: usize,
        found: usize,
    },
    #[error("map of {width}x{height} tiles is too large")]
    TooLarge { width: u32, height: u32 },
}

/// A named marker placed in an object layer (coins, flags).
#[derive(Clone, Debug, PartialEq)]
pub struct MapObject {
    pub name: String,
    /// Top-left corner and size in world units.
    pub rect: Rect,
    pub gid: Option<u32>,
}

/// A loaded level: tile layers, collidable tile ids and object markers.
#[derive(Clone, Debug)]
pub struct Level {
    pub map: Tilemap,
    /// Global tile ids flagged `collides`.
    pub collidable: HashSet<u32>,
    /// Objects of every object layer, tagged with their layer name.
    pub objects: Vec<(String, MapObject)>,
}

impl Level {
    /// Parse a Tiled JSON map.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let raw: RawMap = serde_json::from_str(json)?;
        let mut map = Tilemap::new(
            Vec2::new(raw.tilewidth as f32, raw.tileheight as f32),
            (raw.width, raw.height),
        );
        let expected = raw
            .width
            .checked_mul(raw.height)
            .ok_or(LevelError::TooLarge {
                width: raw.width,
                height: raw.height,
            })? as usize;
        let mut objects = Vec::new();

        for layer in raw.layers {
            match layer {
                RawLayer::TileLayer { name, data } => {
                    if data.len() != expected {
                        return Err(LevelError::LayerSize {
                            layer: name,
                            expected,
                            found: data.len(),
                        });
                    }
                    let tiles = data.into_iter().map(|gid| Tile::new(gid & GID_MASK)).collect();
                    map.push_layer(name, tiles);
                }
                RawLayer::ObjectGroup {
                    name,
                    objects: layer_objects,
                } => {
                    objects.extend(
                        layer_objects
                            .into_iter()
                            .map(|o| (name.clone(), o.into_object())),
                    );
                }
                RawLayer::Other => {}
            }
        }

        let collidable = raw
            .tilesets
            .iter()
            .flat_map(|set| {
                set.tiles
                    .iter()
                    .filter(|tile| tile.collides())
                    .map(move |tile| set.firstgid + tile.id)
            })
            .collect();

        Ok(Self {
            map,
            collidable,
            objects,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Merged solid rectangles of the named tile layer.
    pub fn collision_rects(&self, layer: &str) -> Result<Vec<Rect>, LevelError> {
        let index = self
            .map
            .layer_index(layer)
            .ok_or_else(|| LevelError::MissingLayer(layer.to_string()))?;
        Ok(self.map.collision_rects(index, &self.collidable))
    }

    /// Objects named `name` in the object layer `layer`.
    pub fn objects_named<'a>(
        &'a self,
        layer: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MapObject> + 'a {
        self.objects
            .iter()
            .filter(move |(l, o)| l == layer && o.name == name)
            .map(|(_, o)| o)
    }

    pub fn bounds(&self) -> Rect {
        self.map.bounds()
    }
}

// Tiled stores flip flags in the top bits of a gid.
const GID_MASK: u32 = 0x1fff_ffff;

#[derive(Deserialize)]
struct RawMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    layers: Vec<RawLayer>,
    #[serde(default)]
    tilesets: Vec<RawTileset>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawLayer {
    #[serde(rename = "tilelayer")]
    TileLayer { name: String, data: Vec<u32> },
    #[serde(rename = "objectgroup")]
    ObjectGroup {
        name: String,
        #[serde(default)]
        objects: Vec<RawObject>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct RawObject {
    #[serde(default)]
    name: String,
    x: f32,
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    gid: Option<u32>,
}

impl RawObject {
    fn into_object(self) -> MapObject {
        // Tile objects are anchored at their bottom-left corner.
        let top = if self.gid.is_some() {
            self.y - self.height
        } else {
            self.y
        };
        MapObject {
            name: self.name,
            rect: Rect::new(self.x, top, self.width, self.height),
            gid: self.gid.map(|g| g & GID_MASK),
        }
    }
}

#[derive(Deserialize)]
struct RawTileset {
    firstgid: u32,
    #[serde(default)]
    tiles: Vec<RawTile>,
}

#[derive(Deserialize)]
struct RawTile {
    id: u32,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

impl RawTile {
    fn collides(&self) -> bool {
        self.properties
            .iter()
            .any(|p| p.name == "collides" && p.value == serde_json::Value::Bool(true))
    }
}

#[derive(Deserialize)]
struct RawProperty {
    name: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{
        "width": 4, "height": 3, "tilewidth": 16, "tileheight": 16,
        "layers": [
            { "type": "tilelayer", "name": "Layer 0", "data": [0,0,0,0, 0,0,0,0, 0,0,0,0] },
            { "type": "tilelayer", "name": "Layer 1", "data": [0,0,0,0, 0,0,0,3, 2,2,2,2] },
            { "type": "objectgroup", "name": "Objects", "objects": [
                { "name": "coin", "x": 16, "y": 32, "width": 16, "height": 16, "gid": 36 },
                { "name": "flag", "x": 48, "y": 0, "width": 16, "height": 16 }
            ]},
            { "type": "imagelayer", "name": "sky" }
        ],
        "tilesets": [
            { "firstgid": 1, "name": "tiles", "tiles": [
                { "id": 1, "properties": [ { "name": "collides", "type": "bool", "value": true } ] },
                { "id": 2, "properties": [ { "name": "collides", "type": "bool", "value": false } ] }
            ]}
        ]
    }"#;

    #[test]
    fn reads_layers_objects_and_collision_flags() {
        let level = Level::from_json(MAP).unwrap();
        assert_eq!(level.map.layers.len(), 2);
        assert_eq!(level.collidable, HashSet::from([2]));

        let rects = level.collision_rects("Layer 1").unwrap();
        assert_eq!(rects, vec![Rect::new(0.0, 32.0, 64.0, 16.0)]);
        assert_eq!(level.bounds(), Rect::new(0.0, 0.0, 64.0, 48.0));
    }

    #[test]
    fn tile_objects_are_anchored_at_the_bottom() {
        let level = Level::from_json(MAP).unwrap();
        let coin = level.objects_named("Objects", "coin").next().unwrap();
        assert_eq!(coin.rect, Rect::new(16.0, 16.0, 16.0, 16.0));
        let flag = level.objects_named("Objects", "flag").next().unwrap();
        assert_eq!(flag.rect, Rect::new(48.0, 0.0, 16.0, 16.0));
        assert_eq!(level.objects_named("Other", "coin").count(), 0);
    }

    #[test]
    fn missing_layer_is_an_error() {
        let level = Level::from_json(MAP).unwrap();
        assert!(matches!(
            level.collision_rects("Layer 9"),
            Err(LevelError::MissingLayer(name)) if name == "Layer 9"
        ));
    }

    #[test]
    fn short_layer_data_is_rejected() {
        let json = r#"{ "width": 2, "height": 2, "tilewidth": 8, "tileheight": 8,
            "layers": [ { "type": "tilelayer", "name": "a", "data": [1, 2, 3] } ] }"#;
        assert!(matches!(
            Level::from_json(json),
            Err(LevelError::LayerSize { expected: 4, found: 3, .. })
        ));
    }

    #[test]
    fn oversized_map_header_is_rejected() {
        let json = r#"{ "width": 100000, "height": 100000, "tilewidth": 8, "tileheight": 8,
            "layers": [] }"#;
        assert!(matches!(
            Level::from_json(json),
            Err(LevelError::TooLarge { width: 100000, height: 100000 })
        ));
    }
}
