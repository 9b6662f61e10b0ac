//! The square tile grid holding fog-of-war state: [`VisibilityGrid`].

use crate::error::FogError;
use crate::geom::{Point, Range};
use crate::heights::HeightSource;
use crate::tile::TileState;

/// Largest supported side length. Keeps tile indices and the shadowcaster's
/// slope products inside `i32`.
pub const MAX_GRID_SIZE: i32 = 1 << 14;

/// A fixed `size × size` array of [`TileState`], indexed by tile coordinates
/// in `[0, size)`.
///
/// Heights are sampled once at construction and never change afterwards.
/// Visibility is cleared by [`reset_visibility`](Self::reset_visibility) and
/// set by [`mark_revealed`](Self::mark_revealed); the seen flag only ever
/// goes from false to true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityGrid {
    tiles: Vec<TileState>,
    size: i32,
}

impl VisibilityGrid {
    /// Allocate a grid, sampling every tile's height from `heights`.
    pub fn new(size: i32, heights: &impl HeightSource) -> Result<Self, FogError> {
        if !(1..=MAX_GRID_SIZE).contains(&size) {
            return Err(FogError::InvalidSize(size));
        }
        let tiles = Range::square(size)
            .iter()
            .map(|p| TileState::checked(p, heights.height_at(p)))
            .collect::<Result<Vec<_>, _>>()?;
        let tallest = tiles.iter().map(|t| t.height()).max().unwrap_or(0);
        log::debug!("visibility grid {size}x{size} created, tallest tile {tallest}");
        Ok(Self { tiles, size })
    }

    /// A grid with every height at 0.
    pub fn flat(size: i32) -> Result<Self, FogError> {
        Self::new(size, &|_: Point| 0)
    }

    /// Side length.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// The tiles covered by the grid.
    pub fn bounds(&self) -> Range {
        Range::square(self.size)
    }

    #[inline]
    pub fn is_in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.size && p.y >= 0 && p.y < self.size
    }

    #[inline]
    fn idx(&self, p: Point) -> usize {
        (p.y * self.size + p.x) as usize
    }

    /// The state of a tile, or `None` out of bounds.
    #[inline]
    pub fn tile(&self, p: Point) -> Option<TileState> {
        if !self.is_in_bounds(p) {
            return None;
        }
        Some(self.tiles[self.idx(p)])
    }

    pub fn height(&self, p: Point) -> Option<u8> {
        self.tile(p).map(TileState::height)
    }

    pub fn is_visible(&self, p: Point) -> bool {
        self.tile(p).is_some_and(TileState::visible)
    }

    pub fn is_seen(&self, p: Point) -> bool {
        self.tile(p).is_some_and(TileState::seen)
    }

    /// Whether the tile at `p` stops sight for an observer whose eyes are
    /// at `observer_height`. A blocking tile is itself still revealable.
    /// Out-of-bounds tiles never block.
    #[inline]
    pub fn is_blocking(&self, p: Point, observer_height: u8) -> bool {
        self.tile(p).is_some_and(|t| t.height() > observer_height)
    }

    /// Clear the visible flag of every tile. Seen flags are untouched.
    pub fn reset_visibility(&mut self) {
        for t in &mut self.tiles {
            t.hide();
        }
    }

    /// Mark a tile visible and seen. Does nothing out of bounds.
    #[inline]
    pub fn mark_revealed(&mut self, p: Point) {
        if !self.is_in_bounds(p) {
            return;
        }
        let idx = self.idx(p);
        self.tiles[idx].reveal();
    }

    /// Iterate over `(Point, TileState)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, TileState)> + '_ {
        self.bounds().iter().zip(self.tiles.iter().copied())
    }

    pub fn count_visible(&self) -> usize {
        self.tiles.iter().filter(|t| t.visible()).count()
    }

    pub fn count_seen(&self) -> usize {
        self.tiles.iter().filter(|t| t.seen()).count()
    }

    /// The packed tiles in row-major order, one byte per tile, laid out as
    /// described on [`TileState`]. Suitable for a direct texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tiles)
    }
}
