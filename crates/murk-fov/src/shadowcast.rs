//! Height-aware recursive shadowcasting.
//!
//! Scans the four quadrants around an origin row by row, tracking the
//! visible wedge of each row as an interval of exact rational slopes. A tile
//! taller than the origin tile stops sight past it but is itself revealed.
//! Range is circular: a tile is only considered when its squared Euclidean
//! distance from the origin is at most `radius²`.
//!
//! Based on Albert Ford's symmetric shadowcasting, with an explicit row stack
//! instead of recursion.

use murk_core::{Point, Range, VisibilityGrid};
use std::ops::RangeInclusive;

/// Recursive shadowcasting over a [`VisibilityGrid`].
///
/// The caster only owns its row work stack, so one instance can be reused
/// for every observer of every tick without reallocating.
#[derive(Debug, Default)]
pub struct ShadowCaster {
    rows: Vec<Row>,
}

impl ShadowCaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal every tile within `radius` of `origin` that has line of sight
    /// to it, plus the origin itself. The sighting height is the origin
    /// tile's height.
    ///
    /// Returns the number of reveal marks made; tiles on the diagonals are
    /// scanned by two quadrants and counted twice. An out-of-bounds origin
    /// returns 0 and leaves the grid untouched. A negative radius reveals the
    /// origin only; callers validate radii before getting here.
    pub fn cast(&mut self, grid: &mut VisibilityGrid, origin: Point, radius: i32) -> usize {
        let Some(tile) = grid.tile(origin) else {
            return 0;
        };
        let sight = tile.height();
        grid.mark_revealed(origin);
        let mut marks = 1;
        for qt in QUADRANTS {
            marks += self.scan_quadrant(grid, origin, sight, radius, qt);
        }
        marks
    }

    fn scan_quadrant(
        &mut self,
        grid: &mut VisibilityGrid,
        origin: Point,
        sight: u8,
        radius: i32,
        qt: Quadrant,
    ) -> usize {
        let max_depth = radius.min(qt.max_depth(origin, grid.bounds()));
        if max_depth < 1 {
            return 0;
        }
        let radius_sq = (radius as u64) * (radius as u64);
        let mut marks = 0;

        self.rows.clear();
        self.rows.push(Row::first());
        while let Some(mut row) = self.rows.pop() {
            // `None` until the first in-range tile of the row.
            let mut prev_wall: Option<bool> = None;
            for col in row.columns() {
                let p = origin + qt.offset(row.depth, col);
                if !grid.is_in_bounds(p) || origin.distance_sq(p) > radius_sq {
                    continue;
                }
                // Exact ceil/floor bounds only yield columns whose centre lies
                // in the wedge, so every scanned tile is revealed, walls and
                // floors alike.
                let wall = grid.is_blocking(p, sight);
                grid.mark_revealed(p);
                marks += 1;
                match (prev_wall, wall) {
                    (Some(true), false) => {
                        // Leaving a wall: the shadow it casts ends here.
                        row.start = Slope::column_edge(row.depth, col);
                    }
                    (Some(false), true) => {
                        // Entering a wall: scan the open span before it one
                        // row deeper, bounded away from the wall's shadow.
                        let mut next = row.next();
                        next.end = Slope::column_edge(row.depth, col);
                        if next.depth <= max_depth {
                            self.rows.push(next);
                        }
                    }
                    _ => {}
                }
                prev_wall = Some(wall);
            }
            if prev_wall == Some(false) && row.depth < max_depth {
                self.rows.push(row.next());
            }
        }
        marks
    }
}

// ── Quadrants ─────────────────────────────────────────────────────

/// A rotation mapping the canonical scan, with depth growing away from the
/// origin and columns running across it, onto one side of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Quadrant {
    xx: i32,
    xy: i32,
    yx: i32,
    yy: i32,
}

const QUADRANTS: [Quadrant; 4] = [
    Quadrant { xx: 0, xy: 1, yx: -1, yy: 0 }, // north (-y)
    Quadrant { xx: 1, xy: 0, yx: 0, yy: 1 },  // east (+x)
    Quadrant { xx: 0, xy: 1, yx: 1, yy: 0 },  // south (+y)
    Quadrant { xx: -1, xy: 0, yx: 0, yy: 1 }, // west (-x)
];

impl Quadrant {
    /// Grid offset of column `col` in the row at `depth`.
    #[inline]
    fn offset(self, depth: i32, col: i32) -> Point {
        Point::new(
            depth * self.xx + col * self.xy,
            depth * self.yx + col * self.yy,
        )
    }

    /// Deepest row that still lies inside `bounds` along the depth axis.
    fn max_depth(self, origin: Point, bounds: Range) -> i32 {
        match (self.xx, self.yx) {
            (1, _) => bounds.max.x - 1 - origin.x,
            (-1, _) => origin.x - bounds.min.x,
            (_, 1) => bounds.max.y - 1 - origin.y,
            _ => origin.y - bounds.min.y,
        }
    }
}

// ── Rows and slopes ───────────────────────────────────────────────

/// An exact rational slope `num / den`, with `den > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slope {
    num: i32,
    den: i32,
}

impl Slope {
    const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// Slope of the edge between columns `col - 1` and `col` at `depth`:
    /// `(2*col - 1) / (2*depth)`.
    #[inline]
    fn column_edge(depth: i32, col: i32) -> Self {
        Self::new(2 * col - 1, 2 * depth)
    }

    /// `ceil(depth * self)`
    #[inline]
    fn ceil_at(self, depth: i32) -> i32 {
        -(-(depth * self.num)).div_euclid(self.den)
    }

    /// `floor(depth * self)`
    #[inline]
    fn floor_at(self, depth: i32) -> i32 {
        (depth * self.num).div_euclid(self.den)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    depth: i32,
    start: Slope,
    end: Slope,
}

impl Row {
    fn first() -> Self {
        Self {
            depth: 1,
            start: Slope::new(-1, 1),
            end: Slope::new(1, 1),
        }
    }

    /// Columns whose centres fall inside the row's wedge, edges included.
    #[inline]
    fn columns(&self) -> RangeInclusive<i32> {
        self.start.ceil_at(self.depth)..=self.end.floor_at(self.depth)
    }

    #[inline]
    fn next(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murk_core::{HeightMap, MAX_GRID_SIZE};

    fn visible_set(grid: &VisibilityGrid) -> Vec<Point> {
        grid.iter()
            .filter(|(_, t)| t.visible())
            .map(|(p, _)| p)
            .collect()
    }

    fn disk(grid: &VisibilityGrid, origin: Point, radius: i32) -> Vec<Point> {
        let r_sq = (radius as u64) * (radius as u64);
        grid.bounds()
            .iter()
            .filter(|&p| origin.distance_sq(p) <= r_sq)
            .collect()
    }

    #[test]
    fn slope_rounding_is_exact() {
        let s = Slope::new(3, 2);
        assert_eq!(s.ceil_at(1), 2);
        assert_eq!(s.floor_at(1), 1);
        let s = Slope::new(-3, 2);
        assert_eq!(s.ceil_at(1), -1);
        assert_eq!(s.floor_at(1), -2);
        assert_eq!(Slope::new(-1, 1).ceil_at(4), -4);
        assert_eq!(Slope::column_edge(2, 1), Slope::new(1, 4));

        // The deepest row of the largest grid stays inside `i32`.
        let d = MAX_GRID_SIZE;
        assert_eq!(Slope::column_edge(d, d).floor_at(d), d - 1);
        assert_eq!(Slope::column_edge(d, d).ceil_at(d), d);
        assert_eq!(Slope::column_edge(d, 1 - d).ceil_at(d), 1 - d);
    }

    #[test]
    fn first_row_spans_three_columns() {
        let r = Row::first();
        assert_eq!(r.columns(), -1..=1);
        assert_eq!(r.next().columns(), -2..=2);
        let narrowed = Row {
            depth: 5,
            start: Slope::column_edge(2, 1),
            end: Slope::new(1, 1),
        };
        assert_eq!(narrowed.columns(), 2..=5);
    }

    #[test]
    fn quadrants_cover_all_four_sides() {
        let offsets: Vec<Point> = QUADRANTS.iter().map(|q| q.offset(1, 0)).collect();
        assert_eq!(
            offsets,
            vec![
                Point::new(0, -1),
                Point::new(1, 0),
                Point::new(0, 1),
                Point::new(-1, 0)
            ]
        );
        let b = Range::square(10);
        let o = Point::new(2, 7);
        let depths: Vec<i32> = QUADRANTS.iter().map(|q| q.max_depth(o, b)).collect();
        assert_eq!(depths, vec![7, 7, 2, 2]);
    }

    #[test]
    fn open_field_reveals_exact_disk() {
        for radius in 0..=6 {
            let mut g = VisibilityGrid::flat(16).unwrap();
            let o = Point::new(7, 8);
            ShadowCaster::new().cast(&mut g, o, radius);
            assert_eq!(visible_set(&g), disk(&g, o, radius), "radius {radius}");
        }
    }

    #[test]
    fn open_field_radius_two_is_thirteen_tiles() {
        let mut g = VisibilityGrid::flat(8).unwrap();
        ShadowCaster::new().cast(&mut g, Point::new(4, 4), 2);
        assert_eq!(g.count_visible(), 13);
    }

    #[test]
    fn disk_is_clipped_at_grid_edges() {
        let mut g = VisibilityGrid::flat(8).unwrap();
        let o = Point::new(0, 1);
        ShadowCaster::new().cast(&mut g, o, 5);
        assert_eq!(visible_set(&g), disk(&g, o, 5));
    }

    #[test]
    fn out_of_bounds_origin_touches_nothing() {
        let mut g = VisibilityGrid::flat(8).unwrap();
        let before = g.clone();
        let mut caster = ShadowCaster::new();
        assert_eq!(caster.cast(&mut g, Point::new(8, 4), 5), 0);
        assert_eq!(caster.cast(&mut g, Point::new(-1, -1), 5), 0);
        assert_eq!(g, before);
    }

    #[test]
    fn adjacent_wall_hides_the_line_behind_it() {
        let map = HeightMap::parse(
            "\
.........
.........
.........
.........
....#....
.........
.........
.........
.........",
        )
        .unwrap();
        let mut g = VisibilityGrid::new(9, &map).unwrap();
        let o = Point::new(3, 4);
        ShadowCaster::new().cast(&mut g, o, 5);
        assert!(g.is_visible(Point::new(4, 4)), "the wall itself is seen");
        for x in 5..9 {
            assert!(!g.is_visible(Point::new(x, 4)), "({x}, 4) is behind the wall");
        }
        assert!(!g.is_visible(Point::new(6, 5)));
        assert!(g.is_visible(Point::new(4, 5)));
        assert!(g.is_visible(Point::new(3, 0)));
    }

    #[test]
    fn distant_wall_casts_a_widening_shadow() {
        let map = HeightMap::parse(
            "\
...........
...........
...........
...........
...........
.......#...
...........
...........
...........
...........
...........",
        )
        .unwrap();
        let mut g = VisibilityGrid::new(11, &map).unwrap();
        let o = Point::new(5, 5);
        ShadowCaster::new().cast(&mut g, o, 6);
        assert!(g.is_visible(Point::new(7, 5)));
        assert!(!g.is_visible(Point::new(8, 5)));
        assert!(!g.is_visible(Point::new(9, 5)));
        assert!(!g.is_visible(Point::new(10, 5)));
        assert!(!g.is_visible(Point::new(10, 6)));
        assert!(g.is_visible(Point::new(8, 6)));
        assert!(g.is_visible(Point::new(3, 5)));
    }

    #[test]
    fn wedge_edges_are_decided_by_tile_centres() {
        // The wall at (2, 5) bounds the wedge above it by slope 1/4. The
        // floor at (4, 6) has its centre exactly on that edge and is seen;
        // the wall at (5, 6) overlaps the wedge but its centre is outside,
        // so it stays hidden.
        let walls = [Point::new(2, 5), Point::new(5, 6)];
        let heights = |p: Point| if walls.contains(&p) { 31 } else { 0 };
        let mut g = VisibilityGrid::new(11, &heights).unwrap();
        ShadowCaster::new().cast(&mut g, Point::new(0, 5), 10);

        assert!(g.is_visible(Point::new(2, 5)));
        assert!(g.is_visible(Point::new(3, 6)));
        assert!(g.is_visible(Point::new(4, 6)));
        assert!(!g.is_visible(Point::new(5, 6)));
        assert!(!g.is_visible(Point::new(3, 5)));
        assert!(g.is_visible(Point::new(4, 4)));
        assert!(!g.is_visible(Point::new(5, 4)));
    }

    #[test]
    fn tiles_at_eye_level_do_not_block() {
        // The observer stands on a height-5 plateau: height-5 tiles are
        // see-through, height-6 ones are not.
        let map = HeightMap::parse(
            "\
.......
.......
.......
5556...
.......
.......
.......",
        )
        .unwrap();
        let mut g = VisibilityGrid::new(7, &map).unwrap();
        ShadowCaster::new().cast(&mut g, Point::new(0, 3), 6);
        assert!(g.is_visible(Point::new(2, 3)));
        assert!(g.is_visible(Point::new(3, 3)));
        assert!(!g.is_visible(Point::new(4, 3)));
        assert!(!g.is_visible(Point::new(6, 3)));
    }

    #[test]
    fn low_observer_is_blocked_by_any_raised_tile() {
        let map = HeightMap::parse(
            "\
.....
.....
..1..
.....
.....",
        )
        .unwrap();
        let mut g = VisibilityGrid::new(5, &map).unwrap();
        ShadowCaster::new().cast(&mut g, Point::new(2, 4), 4);
        assert!(g.is_visible(Point::new(2, 2)));
        assert!(!g.is_visible(Point::new(2, 1)));
        assert!(!g.is_visible(Point::new(2, 0)));
    }

    #[test]
    fn blocked_sight_is_symmetric() {
        let wall = Point::new(8, 10);
        let heights = |p: Point| if p == wall { 31 } else { 0 };
        let a = Point::new(10, 10);
        let b = Point::new(6, 10);

        let mut caster = ShadowCaster::new();
        let mut ga = VisibilityGrid::new(20, &heights).unwrap();
        caster.cast(&mut ga, a, 10);
        let mut gb = VisibilityGrid::new(20, &heights).unwrap();
        caster.cast(&mut gb, b, 10);

        assert!(!ga.is_visible(b));
        assert_eq!(ga.is_visible(b), gb.is_visible(a));
    }

    #[test]
    fn radius_zero_reveals_only_the_origin() {
        let mut g = VisibilityGrid::flat(5).unwrap();
        assert_eq!(ShadowCaster::new().cast(&mut g, Point::new(2, 2), 0), 1);
        assert_eq!(visible_set(&g), vec![Point::new(2, 2)]);
    }
}
