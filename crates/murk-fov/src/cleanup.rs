//! Second pass patching the one-tile gaps shadowcasting leaves along raised
//! obstructions.
//!
//! Each quadrant is scanned independently, so a raised tile next to a
//! revealed one is sometimes skipped by the slope bounds even though it
//! would plausibly be seen. The pass reveals such tiles.

use murk_core::{Point, VisibilityGrid};

/// Reveal every hidden tile that borders a visible tile (8-neighbourhood),
/// stands strictly taller than it, and reaches at least `sight_height`.
///
/// Candidates are collected from the visible set as it is on entry, so one
/// pass does not cascade from the tiles it reveals and the result does not
/// depend on scan order. Returns the number of tiles revealed.
pub fn cleanup_wall_artifacts(grid: &mut VisibilityGrid, sight_height: u8) -> usize {
    let mut raised: Vec<Point> = Vec::new();
    for (p, tile) in grid.iter() {
        if !tile.visible() {
            continue;
        }
        for n in p.neighbors_8() {
            let Some(nt) = grid.tile(n) else {
                continue;
            };
            if !nt.visible() && nt.height() > tile.height() && nt.height() >= sight_height {
                raised.push(n);
            }
        }
    }
    raised.sort_unstable();
    raised.dedup();
    for &p in &raised {
        grid.mark_revealed(p);
    }
    raised.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use murk_core::HeightMap;

    fn grid(text: &str) -> VisibilityGrid {
        let map = HeightMap::parse(text).unwrap();
        VisibilityGrid::new(map.bounds().width(), &map).unwrap()
    }

    #[test]
    fn reveals_raised_neighbour_of_visible_floor() {
        let mut g = grid("...\n.#.\n...");
        g.mark_revealed(Point::new(0, 0));
        assert_eq!(cleanup_wall_artifacts(&mut g, 0), 1);
        assert!(g.is_visible(Point::new(1, 1)));
        assert!(g.is_seen(Point::new(1, 1)));
        assert!(!g.is_visible(Point::new(1, 0)));
    }

    #[test]
    fn ignores_neighbours_below_sight_height() {
        let mut g = grid("..\n.3");
        g.mark_revealed(Point::new(0, 0));
        assert_eq!(cleanup_wall_artifacts(&mut g, 4), 0);
        assert!(!g.is_visible(Point::new(1, 1)));
        assert_eq!(cleanup_wall_artifacts(&mut g, 3), 1);
        assert!(g.is_visible(Point::new(1, 1)));
    }

    #[test]
    fn ignores_neighbours_not_taller_than_the_visible_tile() {
        let mut g = grid("55\n5.");
        g.mark_revealed(Point::new(0, 0));
        assert_eq!(cleanup_wall_artifacts(&mut g, 0), 0);
        assert_eq!(g.count_visible(), 1);
    }

    #[test]
    fn one_pass_does_not_cascade() {
        let mut g = grid("012\n...\n...");
        g.mark_revealed(Point::new(0, 0));
        assert_eq!(cleanup_wall_artifacts(&mut g, 0), 1);
        assert!(g.is_visible(Point::new(1, 0)));
        assert!(!g.is_visible(Point::new(2, 0)));

        assert_eq!(cleanup_wall_artifacts(&mut g, 0), 1);
        assert!(g.is_visible(Point::new(2, 0)));
    }

    #[test]
    fn shared_neighbour_counts_once() {
        let mut g = grid("...\n.#.\n...");
        g.mark_revealed(Point::new(0, 0));
        g.mark_revealed(Point::new(2, 2));
        assert_eq!(cleanup_wall_artifacts(&mut g, 0), 1);
        assert_eq!(g.count_visible(), 3);
    }

    #[test]
    fn nothing_visible_nothing_revealed() {
        let mut g = grid("#.\n.#");
        assert_eq!(cleanup_wall_artifacts(&mut g, 0), 0);
        assert_eq!(g.count_seen(), 0);
    }
}
