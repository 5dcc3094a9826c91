use std::collections::HashSet;

use crate::math::{Rect, Vec2};

/// A single tile in a tilemap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Global tile ID (0 = empty/no tile)
    pub gid: u32,
}

impl Tile {
    pub fn new(gid: u32) -> Self {
        Self { gid }
    }

    pub fn is_empty(&self) -> bool {
        self.gid == 0
    }
}

/// One named grid of tiles.
#[derive(Clone, Debug)]
pub struct TileLayer {
    pub name: String,
    /// Tile data (row-major: [y * width + x])
    pub tiles: Vec<Tile>,
}

/// Tile-based level geometry: a stack of equally sized layers.
#[derive(Clone, Debug)]
pub struct Tilemap {
    /// Size of each tile in pixels
    pub tile_size: Vec2,
    /// Map dimensions (width, height) in tiles
    pub map_size: (u32, u32),
    pub layers: Vec<TileLayer>,
    /// Position of the tilemap in world space (top-left corner)
    pub position: Vec2,
}

impl Tilemap {
    /// Create a tilemap with no layers.
    pub fn new(tile_size: Vec2, map_size: (u32, u32)) -> Self {
        Self {
            tile_size,
            map_size,
            layers: Vec::new(),
            position: Vec2::ZERO,
        }
    }

    /// Append a layer of row-major tiles and return its index.
    pub fn push_layer(&mut self, name: impl Into<String>, tiles: Vec<Tile>) -> usize {
        self.layers.push(TileLayer {
            name: name.into(),
            tiles,
        });
        self.layers.len() - 1
    }

    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    pub fn width_in_pixels(&self) -> f32 {
        self.map_size.0 as f32 * self.tile_size.x
    }

    pub fn height_in_pixels(&self) -> f32 {
        self.map_size.1 as f32 * self.tile_size.y
    }

    /// World rectangle covered by the map.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.width_in_pixels(),
            self.height_in_pixels(),
        )
    }

    /// Solid rectangles of a layer, for tiles whose gid is in `solid`.
    ///
    /// Horizontal runs of solid tiles become one rectangle, and runs with
    /// the same span on consecutive rows are stacked into one, so bodies
    /// sliding along a floor or a wall don't catch on tile seams.
    pub fn collision_rects(&self, layer: usize, solid: &HashSet<u32>) -> Vec<Rect> {
        let Some(layer) = self.layers.get(layer) else {
            return Vec::new();
        };
        let (width, height) = self.map_size;

        // Runs as (start column, end column exclusive, first row, row count).
        let mut finished: Vec<(u32, u32, u32, u32)> = Vec::new();
        let mut open: Vec<(u32, u32, u32, u32)> = Vec::new();

        for y in 0..height {
            let mut row_runs = Vec::new();
            let mut x = 0;
            while x < width {
                let is_solid = |x: u32| {
                    layer
                        .tiles
                        .get((y * width + x) as usize)
                        .map_or(false, |tile| !tile.is_empty() && solid.contains(&tile.gid))
                };
                if is_solid(x) {
                    let start = x;
                    while x < width && is_solid(x) {
                        x += 1;
                    }
                    row_runs.push((start, x));
                } else {
                    x += 1;
                }
            }

            let mut next_open = Vec::with_capacity(row_runs.len());
            for (start, end) in row_runs {
                match open.iter().position(|&(s, e, _, _)| s == start && e == end) {
                    Some(i) => {
                        let (s, e, top, rows) = open.swap_remove(i);
                        next_open.push((s, e, top, rows + 1));
                    }
                    None => next_open.push((start, end, y, 1)),
                }
            }
            finished.append(&mut open);
            open = next_open;
        }
        finished.append(&mut open);

        finished
            .into_iter()
            .map(|(start, end, top, rows)| {
                Rect::new(
                    self.position.x + start as f32 * self.tile_size.x,
                    self.position.y + top as f32 * self.tile_size.y,
                    (end - start) as f32 * self.tile_size.x,
                    rows as f32 * self.tile_size.y,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut rects: Vec<Rect>) -> Vec<Rect> {
        rects.sort_by(|a, b| (a.y, a.x).partial_cmp(&(b.y, b.x)).unwrap());
        rects
    }

    fn layer(rows: &[&[u32]]) -> Vec<Tile> {
        rows.iter().flat_map(|row| row.iter().map(|&gid| Tile::new(gid))).collect()
    }

    #[test]
    fn floor_run_becomes_one_rect() {
        let mut map = Tilemap::new(Vec2::new(16.0, 16.0), (6, 3));
        let ground = map.push_layer(
            "ground",
            layer(&[&[0, 0, 0, 0, 0, 0], &[0, 0, 0, 0, 0, 0], &[0, 7, 7, 7, 7, 0]]),
        );

        let rects = map.collision_rects(ground, &HashSet::from([7]));
        assert_eq!(rects, vec![Rect::new(16.0, 32.0, 64.0, 16.0)]);
    }

    #[test]
    fn wall_stacks_rows_with_same_span() {
        let mut map = Tilemap::new(Vec2::new(10.0, 10.0), (4, 4));
        // Tile 9 is decorative and does not collide.
        let ground = map.push_layer(
            "ground",
            layer(&[&[1, 0, 0, 0], &[1, 0, 9, 0], &[1, 0, 0, 0], &[1, 1, 1, 1]]),
        );

        let rects = sorted(map.collision_rects(ground, &HashSet::from([1])));
        assert_eq!(
            rects,
            vec![
                Rect::new(0.0, 0.0, 10.0, 30.0),
                Rect::new(0.0, 30.0, 40.0, 10.0),
            ]
        );
    }

    #[test]
    fn bounds_follow_position_and_size() {
        let mut map = Tilemap::new(Vec2::new(64.0, 64.0), (60, 20));
        map.position = Vec2::new(10.0, 0.0);
        assert_eq!(map.bounds(), Rect::new(10.0, 0.0, 3840.0, 1280.0));
    }

    #[test]
    fn missing_or_short_layers_give_no_rects() {
        let mut map = Tilemap::new(Vec2::new(8.0, 8.0), (2, 2));
        let short = map.push_layer("short", layer(&[&[1, 1]]));
        assert_eq!(map.layer_index("short"), Some(short));
        assert!(map.layer("missing").is_none());
        assert!(map.collision_rects(5, &HashSet::from([1])).is_empty());
        assert_eq!(
            map.collision_rects(short, &HashSet::from([1])),
            vec![Rect::new(0.0, 0.0, 16.0, 8.0)]
        );
    }
}
