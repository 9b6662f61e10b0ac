//! Height-aware fog of war.
//!
//! [`ShadowCaster`] reveals what one observer sees on a
//! [`VisibilityGrid`], [`cleanup_wall_artifacts`] patches the gaps it leaves
//! along raised terrain, and [`FogOfWar`] ties both into a per-tick update
//! over any number of observers.
//!
//! ```
//! use murk_fov::{FogConfig, FogOfWar, Observer, Point};
//!
//! let cfg = FogConfig { grid_size: 16, ..FogConfig::default() };
//! let mut fog = FogOfWar::new(cfg, &|_: Point| 0).unwrap();
//! let stats = fog.update(&[Observer::new(Point::new(8, 8), 2)]).unwrap();
//! assert_eq!(stats.visible, 13);
//! assert!(fog.can_see(Point::new(8, 6)));
//! ```

pub mod cleanup;
pub mod config;
pub mod coords;
pub mod query;
pub mod shadowcast;

pub use cleanup::cleanup_wall_artifacts;
pub use config::FogConfig;
pub use coords::TileMapping;
pub use query::{FogOfWar, Observer, TickStats};
pub use shadowcast::ShadowCaster;

pub use murk_core::{FogError, HeightMap, HeightSource, Point, VisibilityGrid};
