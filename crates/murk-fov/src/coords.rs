//! Mapping between world space and tile space.
//!
//! The grid is centred on the world origin: tile `(0, 0)` starts at world
//! offset `-size/2` tiles on both horizontal axes. World `z` maps to tile `y`.

use murk_core::{FogError, MAX_GRID_SIZE, Point, Range};

/// World-to-tile conversion for a grid of a given size and tile edge length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMapping {
    grid_size: i32,
    tile_size: f32,
}

impl TileMapping {
    pub fn new(grid_size: i32, tile_size: f32) -> Result<Self, FogError> {
        if !(1..=MAX_GRID_SIZE).contains(&grid_size) {
            return Err(FogError::InvalidSize(grid_size));
        }
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(FogError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            grid_size,
            tile_size,
        })
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn unclamped(&self, x: f32, z: f32) -> Point {
        let half = self.grid_size / 2;
        // `as` saturates, so far-away positions stay far away.
        let tx = (x / self.tile_size).floor() as i32;
        let tz = (z / self.tile_size).floor() as i32;
        Point::new(tx.saturating_add(half), tz.saturating_add(half))
    }

    /// The tile containing world position `(x, z)`, or `None` when it lies
    /// outside the grid or is not finite.
    pub fn to_tile(&self, x: f32, z: f32) -> Option<Point> {
        if !x.is_finite() || !z.is_finite() {
            return None;
        }
        let p = self.unclamped(x, z);
        Range::square(self.grid_size).contains(p).then_some(p)
    }

    /// The tile containing world position `(x, z)`, clamped into the grid.
    /// NaN coordinates count as 0.
    pub fn to_tile_clamped(&self, x: f32, z: f32) -> Point {
        let x = if x.is_nan() { 0.0 } else { x };
        let z = if z.is_nan() { 0.0 } else { z };
        Range::square(self.grid_size).clamp(self.unclamped(x, z))
    }

    /// World `(x, z)` of the centre of tile `p`: where a height sampler
    /// should probe the scene for that tile.
    pub fn tile_center(&self, p: Point) -> (f32, f32) {
        let half = self.grid_size / 2;
        (
            ((p.x - half) as f32 + 0.5) * self.tile_size,
            ((p.y - half) as f32 + 0.5) * self.tile_size,
        )
    }
}
