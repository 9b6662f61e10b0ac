//! The per-tick fog-of-war entry point: [`FogOfWar`].
//!
//! A tick is one [`reset`](FogOfWar::reset), any number of
//! [`reveal`](FogOfWar::reveal) calls and one [`finish`](FogOfWar::finish),
//! or all three at once through [`update`](FogOfWar::update). The grid is
//! only complete after `finish`: the artifact cleanup and then the 3×3
//! footprints of the tick's observers are applied there. Observers
//! accumulate: a tile is visible when any observer of the tick sees it, and
//! the order observers are revealed in does not change the result.

use murk_core::{FogError, HeightSource, Point, VisibilityGrid};

use crate::cleanup::cleanup_wall_artifacts;
use crate::config::FogConfig;
use crate::coords::TileMapping;
use crate::shadowcast::ShadowCaster;

/// A viewer revealing the grid around its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observer {
    pub pos: Point,
    pub radius: i32,
}

impl Observer {
    pub const fn new(pos: Point, radius: i32) -> Self {
        Self { pos, radius }
    }
}

/// What one [`FogOfWar::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickStats {
    /// Observers passed in.
    pub observers: usize,
    /// Observers standing inside the grid, which actually revealed tiles.
    pub revealed_observers: usize,
    /// Tiles the artifact cleanup revealed.
    pub cleanup_revealed: usize,
    /// Tiles visible at the end of the tick.
    pub visible: usize,
    /// Tiles ever seen, at the end of the tick.
    pub seen: usize,
}

/// Fog-of-war state for one shared grid, plus the machinery to update it.
#[derive(Debug)]
pub struct FogOfWar {
    grid: VisibilityGrid,
    caster: ShadowCaster,
    config: FogConfig,
    mapping: TileMapping,
    /// Lowest sighting height among observers revealed since the last
    /// cleanup, or `None` when no cleanup is owed.
    pending_sight: Option<u8>,
    /// Origins whose 3×3 footprint is still to be forced visible.
    pending_footprints: Vec<Point>,
}

impl FogOfWar {
    /// Build a `config.grid_size` grid sampling heights from `heights`.
    pub fn new(config: FogConfig, heights: &impl HeightSource) -> Result<Self, FogError> {
        config.validate()?;
        let grid = VisibilityGrid::new(config.grid_size, heights)?;
        Self::with_grid(grid, config)
    }

    /// Wrap an existing grid. Its size takes precedence over
    /// `config.grid_size`.
    pub fn with_grid(grid: VisibilityGrid, mut config: FogConfig) -> Result<Self, FogError> {
        config.grid_size = grid.size();
        config.validate()?;
        let mapping = TileMapping::new(grid.size(), config.tile_size)?;
        Ok(Self {
            grid,
            caster: ShadowCaster::new(),
            config,
            mapping,
            pending_sight: None,
            pending_footprints: Vec::new(),
        })
    }

    pub fn grid(&self) -> &VisibilityGrid {
        &self.grid
    }

    pub fn into_grid(self) -> VisibilityGrid {
        self.grid
    }

    pub fn config(&self) -> &FogConfig {
        &self.config
    }

    pub fn mapping(&self) -> &TileMapping {
        &self.mapping
    }

    /// Whether tile `p` is currently visible to some observer.
    pub fn can_see(&self, p: Point) -> bool {
        self.grid.is_visible(p)
    }

    /// Whether tile `p` has ever been revealed.
    pub fn has_seen(&self, p: Point) -> bool {
        self.grid.is_seen(p)
    }

    /// Start a tick: hide every tile and drop any cleanup or footprint
    /// still owed.
    pub fn reset(&mut self) {
        self.grid.reset_visibility();
        self.pending_sight = None;
        self.pending_footprints.clear();
    }

    /// Reveal what an observer at tile `origin` sees within `radius`.
    ///
    /// Returns `Ok(false)` and leaves the grid untouched when `origin` is
    /// outside the grid. The artifact cleanup and the footprint for this
    /// observer are queued for the next [`finish`](Self::finish).
    pub fn reveal(&mut self, origin: Point, radius: i32) -> Result<bool, FogError> {
        if radius < 0 {
            return Err(FogError::InvalidRadius(radius));
        }
        let Some(tile) = self.grid.tile(origin) else {
            log::trace!("observer at {origin} is outside the grid, skipped");
            return Ok(false);
        };

        let marks = self.caster.cast(&mut self.grid, origin, radius);
        if self.config.reveal_footprint {
            self.pending_footprints.push(origin);
        }
        if self.config.cleanup_artifacts {
            let sight = tile.height();
            self.pending_sight = Some(self.pending_sight.map_or(sight, |s| s.min(sight)));
        }
        log::trace!(
            "observer at {origin} (height {}) radius {radius}: {marks} marks",
            tile.height()
        );
        Ok(true)
    }

    /// Reveal from a world position, mapped onto the grid with the
    /// configured tile size. Positions outside the grid are skipped like
    /// out-of-bounds tiles.
    pub fn reveal_world(&mut self, x: f32, z: f32, radius: i32) -> Result<bool, FogError> {
        if radius < 0 {
            return Err(FogError::InvalidRadius(radius));
        }
        match self.mapping.to_tile(x, z) {
            Some(p) => self.reveal(p, radius),
            None => {
                log::trace!("observer at world ({x}, {z}) is outside the grid, skipped");
                Ok(false)
            }
        }
    }

    /// Complete the observers revealed since the last reset or finish.
    ///
    /// First the artifact cleanup runs once over the whole grid, using the
    /// lowest sighting height among those observers. Then each observer's
    /// 3×3 footprint is forced visible, so footprint tiles never seed the
    /// cleanup. Returns the number of tiles the cleanup revealed.
    pub fn finish(&mut self) -> usize {
        let cleaned = match self.pending_sight.take() {
            Some(sight) => cleanup_wall_artifacts(&mut self.grid, sight),
            None => 0,
        };
        for origin in self.pending_footprints.drain(..) {
            self.grid.mark_revealed(origin);
            for p in origin.neighbors_8() {
                self.grid.mark_revealed(p);
            }
        }
        cleaned
    }

    /// Run a whole tick for `observers`.
    ///
    /// Every radius is checked before the grid is touched, so an error
    /// leaves the previous tick's state in place.
    pub fn update(&mut self, observers: &[Observer]) -> Result<TickStats, FogError> {
        if let Some(bad) = observers.iter().find(|o| o.radius < 0) {
            return Err(FogError::InvalidRadius(bad.radius));
        }
        self.reset();
        let mut revealed_observers = 0;
        for o in observers {
            if self.reveal(o.pos, o.radius)? {
                revealed_observers += 1;
            }
        }
        let cleanup_revealed = self.finish();
        let stats = TickStats {
            observers: observers.len(),
            revealed_observers,
            cleanup_revealed,
            visible: self.grid.count_visible(),
            seen: self.grid.count_seen(),
        };
        log::debug!(
            "fog tick: {}/{} observers, {} visible, {} seen, {} from cleanup",
            stats.revealed_observers,
            stats.observers,
            stats.visible,
            stats.seen,
            stats.cleanup_revealed
        );
        Ok(stats)
    }
}
