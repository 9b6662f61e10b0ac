//! Configuration for [`FogOfWar`](crate::FogOfWar).

use murk_core::{FogError, MAX_GRID_SIZE};

/// Fog-of-war settings.
///
/// With the `serde` feature every field is optional when deserializing;
/// missing fields take their [`Default`] value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FogConfig {
    /// Side length of the square tile grid.
    pub grid_size: i32,
    /// World units per tile edge, used to map world positions onto tiles.
    pub tile_size: f32,
    /// Run the wall-artifact cleanup pass after each tick's observers.
    pub cleanup_artifacts: bool,
    /// Always reveal the 3×3 block around each observer, whatever the
    /// shadowcasting result.
    pub reveal_footprint: bool,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            grid_size: 64,
            tile_size: 1.0,
            cleanup_artifacts: true,
            reveal_footprint: true,
        }
    }
}

impl FogConfig {
    /// Check the sizes are usable.
    pub fn validate(&self) -> Result<(), FogError> {
        if !(1..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(FogError::InvalidSize(self.grid_size));
        }
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(FogError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }
}
