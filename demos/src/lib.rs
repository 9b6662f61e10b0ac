//! Shared pieces of the fog-of-war demos: a seeded arena, the circling
//! observer, and the debug colouring of tiles.

use murk_core::{
    HeightSource, MAX_GRID_SIZE, MAX_HEIGHT, Point, Range, TileState, VisibilityGrid,
};
use rand::{Rng, SeedableRng};

pub const GRID_SIZE: i32 = 64;
/// World-space radius of the observer's circle around the grid centre.
pub const ORBIT_RADIUS: f32 = 10.0;
/// Radians per second.
pub const ORBIT_SPEED: f32 = 2.0;
pub const SIGHT_RADIUS: i32 = 50;

/// Tiles around the centre kept flat so the orbit starts on open ground.
const CLEAR_RADIUS: i32 = 12;

/// A random height field: pillars, low walls and a couple of plateaus on
/// flat ground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    heights: Vec<u8>,
    size: i32,
}

impl Arena {
    /// Generate a `size × size` arena. The same seed always gives the same
    /// arena.
    pub fn generate(seed: u64, size: i32) -> Self {
        let size = size.clamp(1, MAX_GRID_SIZE);
        let mut heights = vec![0u8; (size * size) as usize];
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let bounds = Range::square(size);
        let centre = Point::new(size / 2, size / 2);
        let clear_sq = (CLEAR_RADIUS as u64) * (CLEAR_RADIUS as u64);

        let raise = |p: Point, h: u8, heights: &mut [u8]| {
            if !bounds.contains(p) || p.distance_sq(centre) <= clear_sq {
                return;
            }
            let idx = (p.y * size + p.x) as usize;
            heights[idx] = heights[idx].max(h);
        };

        // Plateaus: wide, low.
        for _ in 0..2 {
            let w = rng.random_range(4..=10);
            let h = rng.random_range(4..=10);
            let x0 = rng.random_range(0..size);
            let y0 = rng.random_range(0..size);
            let level = rng.random_range(1..=3u8);
            for p in Range::new(x0, y0, x0 + w, y0 + h).iter() {
                raise(p, level, &mut heights);
            }
        }
        // Walls: thin, straight.
        for _ in 0..size / 4 {
            let len = rng.random_range(3..=size / 6 + 3);
            let x0 = rng.random_range(0..size);
            let y0 = rng.random_range(0..size);
            let level = rng.random_range(4..=MAX_HEIGHT);
            let horizontal = rng.random_bool(0.5);
            for i in 0..len {
                let p = if horizontal {
                    Point::new(x0 + i, y0)
                } else {
                    Point::new(x0, y0 + i)
                };
                raise(p, level, &mut heights);
            }
        }
        // Pillars.
        for _ in 0..size {
            let p = Point::new(rng.random_range(0..size), rng.random_range(0..size));
            let level = rng.random_range(1..=MAX_HEIGHT);
            raise(p, level, &mut heights);
        }

        Self { heights, size }
    }

    pub fn size(&self) -> i32 {
        self.size
    }
}

impl HeightSource for Arena {
    fn height_at(&self, p: Point) -> i32 {
        if p.x < 0 || p.y < 0 || p.x >= self.size || p.y >= self.size {
            return 0;
        }
        self.heights[(p.y * self.size + p.x) as usize] as i32
    }
}

/// An observer circling the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub angle: f32,
    pub radius: f32,
    pub speed: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            angle: 0.0,
            radius: ORBIT_RADIUS,
            speed: ORBIT_SPEED,
        }
    }
}

impl Orbit {
    /// Advance by `dt` seconds and return the new world `(x, z)`.
    pub fn advance(&mut self, dt: f32) -> (f32, f32) {
        self.angle = (self.angle + self.speed * dt) % std::f32::consts::TAU;
        self.position()
    }

    pub fn position(&self) -> (f32, f32) {
        (
            self.radius * self.angle.cos(),
            self.radius * self.angle.sin(),
        )
    }
}

/// Debug colouring of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    /// Currently seen by some observer.
    Visible,
    /// Seen before, not now.
    Remembered,
    /// Never seen.
    Unknown,
}

impl Shade {
    pub fn of(t: TileState) -> Self {
        if t.visible() {
            Shade::Visible
        } else if t.seen() {
            Shade::Remembered
        } else {
            Shade::Unknown
        }
    }

    /// RGB for a tile of this shade at the given height. Taller tiles are
    /// drawn brighter.
    pub fn rgb(self, height: u8) -> (u8, u8, u8) {
        let lift = height.min(MAX_HEIGHT) * 4;
        match self {
            Shade::Visible => (130 + lift, 20 + lift / 2, 20 + lift / 2),
            Shade::Remembered => (60 + lift, 60 + lift, 60 + lift),
            Shade::Unknown => (0, 0, 0),
        }
    }
}

/// One character per tile, one line per row: `.` and `#` for visible
/// ground and raised tiles, `,` and `+` for remembered ones, a space for
/// tiles never seen.
pub fn render_ascii(grid: &VisibilityGrid) -> String {
    let size = grid.size() as usize;
    let mut out = String::with_capacity(size * (size + 1));
    for (p, t) in grid.iter() {
        let raised = t.height() > 0;
        out.push(match (Shade::of(t), raised) {
            (Shade::Visible, false) => '.',
            (Shade::Visible, true) => '#',
            (Shade::Remembered, false) => ',',
            (Shade::Remembered, true) => '+',
            (Shade::Unknown, _) => ' ',
        });
        if p.x == grid.size() - 1 {
            out.push('\n');
        }
    }
    out
}
