//! The error type shared by every fallible fog-of-war operation.

use crate::geom::Point;
use crate::grid::MAX_GRID_SIZE;
use std::fmt;

/// Errors raised at the public boundary of the fog-of-war crates.
///
/// Everything past the boundary is total: out-of-bounds tiles met during a
/// scan are skipped, not reported.
#[derive(Debug, Clone, PartialEq)]
pub enum FogError {
    /// A grid was requested with a side length outside
    /// `1..=MAX_GRID_SIZE`.
    InvalidSize(i32),
    /// A height source produced a value that does not fit in five bits.
    HeightOutOfRange { pos: Point, height: i32 },
    /// A vision radius was negative.
    InvalidRadius(i32),
    /// A world-to-tile mapping was configured with a tile size that is not
    /// finite and positive.
    InvalidTileSize(f32),
    /// Lines of a text height map have different widths.
    InconsistentSize(String),
    /// A text height map contains a character with no height meaning.
    InvalidRune { ch: char, pos: Point },
}

impl fmt::Display for FogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize(size) => write!(f, "grid size must be in 1..={MAX_GRID_SIZE}, got {size}"),
            Self::HeightOutOfRange { pos, height } => {
                write!(f, "height {height} at {pos} is outside 0..=31")
            }
            Self::InvalidRadius(radius) => {
                write!(f, "vision radius must not be negative, got {radius}")
            }
            Self::InvalidTileSize(size) => {
                write!(f, "tile size must be finite and positive, got {size}")
            }
            Self::InconsistentSize(s) => write!(f, "height map: inconsistent size:\n{s}"),
            Self::InvalidRune { ch, pos } => {
                write!(f, "height map contains invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for FogError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let e = FogError::HeightOutOfRange {
            pos: Point::new(3, 4),
            height: 40,
        };
        assert_eq!(e.to_string(), "height 40 at (3, 4) is outside 0..=31");
        assert!(FogError::InvalidRadius(-2).to_string().contains("-2"));
        assert_eq!(
            FogError::InvalidSize(0).to_string(),
            "grid size must be in 1..=16384, got 0"
        );
    }

    #[test]
    fn usable_as_boxed_error() {
        let e: Box<dyn std::error::Error> = Box::new(FogError::InvalidTileSize(0.0));
        assert!(e.to_string().starts_with("tile size"));
    }
}
