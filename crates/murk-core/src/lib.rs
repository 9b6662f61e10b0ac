//! Fog-of-war core types.
//!
//! This crate holds the data the visibility engine works on: tile-space
//! geometry, the packed per-tile record, height sources, and the square grid
//! of tiles that observers reveal. The algorithms live in `murk-fov`.

pub mod error;
pub mod geom;
pub mod grid;
pub mod heights;
pub mod tile;

pub use error::FogError;
pub use geom::{Point, Range};
pub use grid::{MAX_GRID_SIZE, VisibilityGrid};
pub use heights::{HeightMap, HeightSource, clamp_height};
pub use tile::{MAX_HEIGHT, TileState};
