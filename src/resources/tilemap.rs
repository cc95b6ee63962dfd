//! Tile map data model.
//!
//! Serializable structs describing a map built from a single tileset: sparse
//! tile layers of positioned tile ids plus object groups used for debug
//! overlays. Layers keep a dense lookup grid that is rebuilt after loading.
//!
//! Tile ids index the tileset row-major: `id % columns` is the tileset column
//! and `id / columns` the tileset row.

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::AssetError;
use crate::geometry::{Color, Rect};
use crate::resources::batcher::Batcher;

/// Single tile placement within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TilePosition {
    /// X coordinate in tiles.
    pub x: u32,
    /// Y coordinate in tiles.
    pub y: u32,
    /// Tile identifier (tileset-local).
    pub id: u32,
}

/// Texture the tile ids are cut from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Tileset {
    pub tex_key: String,
    /// Tiles per tileset row.
    pub columns: u32,
}

/// A named tile layer containing positions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TileLayer {
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    pub positions: Vec<TilePosition>,
    /// Dense `width * height` id grid, `None` where no tile is placed.
    #[serde(skip)]
    grid: Vec<Option<u32>>,
    #[serde(skip)]
    width: u32,
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

impl TileLayer {
    pub fn new(name: impl Into<String>, positions: Vec<TilePosition>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            positions,
            grid: Vec::new(),
            width: 0,
        }
    }

    fn rebuild_grid(&mut self, width: u32, height: u32) {
        self.width = width;
        self.grid = vec![None; (width * height) as usize];
        for p in &self.positions {
            if p.x < width && p.y < height {
                self.grid[(p.y * width + p.x) as usize] = Some(p.id);
            }
        }
    }

    /// Tile id at tile coordinates, `None` for empty or out-of-map cells.
    pub fn tile_id(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x as u32 >= self.width {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.grid.get(index).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectShape {
    Rectangle,
    Ellipse,
    Polygon { points: Vec<Vec2> },
    Polyline { points: Vec<Vec2> },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MapObject {
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    pub shape: ObjectShape,
    #[serde(default = "default_true")]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObjectGroup {
    pub name: String,
    #[serde(default = "default_object_color")]
    pub color: Color,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub objects: Vec<MapObject>,
}

fn default_object_color() -> Color {
    Color::new(128, 128, 128, 255)
}

/// A tile found by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub id: u32,
}

/// Tile map metadata and layers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TileMap {
    pub tile_width: u32,
    pub tile_height: u32,
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    pub tileset: Tileset,
    pub layers: Vec<TileLayer>,
    #[serde(default)]
    pub object_groups: Vec<ObjectGroup>,
}

impl TileMap {
    pub fn new(
        tile_width: u32,
        tile_height: u32,
        width: u32,
        height: u32,
        tileset: Tileset,
        layers: Vec<TileLayer>,
    ) -> Self {
        let mut map = Self {
            tile_width,
            tile_height,
            width,
            height,
            tileset,
            layers,
            object_groups: Vec::new(),
        };
        map.rebuild_grids();
        map
    }

    /// Parses a map and builds its lookup grids.
    pub fn load_from_json_str(json: &str) -> Result<Self, AssetError> {
        let mut map: TileMap = serde_json::from_str(json)?;
        map.rebuild_grids();
        debug!(
            "Parsed {}x{} tile map with {} layers",
            map.width,
            map.height,
            map.layers.len()
        );
        Ok(map)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Arc<Self>, AssetError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let map = Self::load_from_json_str(&json)?;
        info!("Loaded tile map {}", path.display());
        Ok(Arc::new(map))
    }

    /// Must be called after editing `layers` or the map size by hand.
    pub fn rebuild_grids(&mut self) {
        let (w, h) = (self.width, self.height);
        for layer in &mut self.layers {
            layer.rebuild_grid(w, h);
        }
    }

    pub fn pixel_width(&self) -> f32 {
        (self.width * self.tile_width) as f32
    }

    pub fn pixel_height(&self) -> f32 {
        (self.height * self.tile_height) as f32
    }

    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Map-local x to a tile column, clamped to the map.
    pub fn world_to_tile_x(&self, x: f32) -> i32 {
        let tile = (x / self.tile_width as f32).floor() as i32;
        tile.clamp(0, (self.width as i32 - 1).max(0))
    }

    /// Map-local y to a tile row, clamped to the map.
    pub fn world_to_tile_y(&self, y: f32) -> i32 {
        let tile = (y / self.tile_height as f32).floor() as i32;
        tile.clamp(0, (self.height as i32 - 1).max(0))
    }

    pub fn tile_at(&self, layer: usize, x: i32, y: i32) -> Option<Tile> {
        let id = self.layers.get(layer)?.tile_id(x, y)?;
        Some(Tile { x, y, id })
    }

    /// Every tile of `layer` under a map-local rect, row by row.
    pub fn tiles_intersecting(&self, layer: usize, bounds: Rect) -> Vec<Tile> {
        let min_x = self.world_to_tile_x(bounds.left());
        let min_y = self.world_to_tile_y(bounds.top());
        let max_x = self.world_to_tile_x(bounds.right());
        let max_y = self.world_to_tile_y(bounds.bottom());

        let mut tiles = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if let Some(tile) = self.tile_at(layer, x, y) {
                    tiles.push(tile);
                }
            }
        }
        tiles
    }

    /// Tileset region of a tile id.
    pub fn source_rect(&self, id: u32) -> Rect {
        let columns = self.tileset.columns.max(1);
        let (tw, th) = (self.tile_width as f32, self.tile_height as f32);
        Rect::new(
            (id % columns) as f32 * tw,
            (id / columns) as f32 * th,
            tw,
            th,
        )
    }

    /// Map-local rectangles covering every solid tile of `layer`.
    ///
    /// Horizontal runs of solid tiles are grown downwards while the rows
    /// below are solid across the whole run, so a filled block becomes one
    /// rectangle.
    pub fn collision_rects(&self, layer: usize) -> Vec<Rect> {
        let Some(layer) = self.layers.get(layer) else {
            return Vec::new();
        };
        let (w, h) = (self.width as i32, self.height as i32);
        let mut checked = vec![false; (w * h) as usize];
        let mut rects = Vec::new();

        for y in 0..h {
            let mut start_col: Option<i32> = None;
            for x in 0..w {
                let index = (y * w + x) as usize;
                let solid = layer.tile_id(x, y).is_some();
                if solid && !checked[index] {
                    start_col.get_or_insert(x);
                    checked[index] = true;
                } else if let Some(start) = start_col.take() {
                    rects.push(self.grow_run(layer, start, x, y, &mut checked));
                }
            }
            if let Some(start) = start_col {
                rects.push(self.grow_run(layer, start, w, y, &mut checked));
            }
        }
        rects
    }

    fn grow_run(
        &self,
        layer: &TileLayer,
        start_x: i32,
        end_x: i32,
        start_y: i32,
        checked: &mut [bool],
    ) -> Rect {
        let (w, h) = (self.width as i32, self.height as i32);
        let (tw, th) = (self.tile_width as f32, self.tile_height as f32);
        let rect = |rows: i32| {
            Rect::new(
                start_x as f32 * tw,
                start_y as f32 * th,
                (end_x - start_x) as f32 * tw,
                rows as f32 * th,
            )
        };

        for y in start_y + 1..h {
            for x in start_x..end_x {
                let index = (y * w + x) as usize;
                if layer.tile_id(x, y).is_none() || checked[index] {
                    // partial row stays available for later runs
                    for revisit in start_x..x {
                        checked[(y * w + revisit) as usize] = false;
                    }
                    return rect(y - start_y);
                }
                checked[index] = true;
            }
        }
        rect(h - start_y)
    }

    /// Draws the tiles of `layer` that fall inside `clip` (world space).
    /// `position` is the world position of the map's top-left corner.
    pub fn draw_layer(
        &self,
        layer: usize,
        batcher: &mut dyn Batcher,
        position: Vec2,
        color: Color,
        clip: Rect,
    ) {
        let Some(tile_layer) = self.layers.get(layer) else {
            return;
        };
        if !tile_layer.visible || self.width == 0 || self.height == 0 {
            return;
        }
        let local = clip.translated(-position);
        let min_x = self.world_to_tile_x(local.left());
        let min_y = self.world_to_tile_y(local.top());
        let max_x = self.world_to_tile_x(local.right());
        let max_y = self.world_to_tile_y(local.bottom());

        let tex_key: Arc<str> = Arc::from(self.tileset.tex_key.as_str());
        let mut tint = color;
        tint.a = (color.a as f32 * tile_layer.opacity.clamp(0.0, 1.0)).round() as u8;
        let (tw, th) = (self.tile_width as f32, self.tile_height as f32);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let Some(id) = tile_layer.tile_id(x, y) else {
                    continue;
                };
                let dest = Rect::new(
                    position.x + x as f32 * tw,
                    position.y + y as f32 * th,
                    tw,
                    th,
                );
                batcher.draw_rect(&tex_key, dest, self.source_rect(id), tint);
            }
        }
    }
}
