//! Occlusion height providers.
//!
//! A [`VisibilityGrid`](crate::VisibilityGrid) samples its height source once,
//! at construction. Anything implementing [`HeightSource`] will do: a closure,
//! a [`HeightMap`] parsed from text, or an adapter over a scene raycaster that
//! feeds its hits through [`clamp_height`].

use crate::error::FogError;
use crate::geom::{Point, Range};
use crate::tile::MAX_HEIGHT;
use std::fmt::{self, Write};

/// Yields the occlusion height of a tile.
///
/// Values must lie in `0..=31`; grid construction fails on anything else.
pub trait HeightSource {
    fn height_at(&self, p: Point) -> i32;
}

impl<F> HeightSource for F
where
    F: Fn(Point) -> i32,
{
    fn height_at(&self, p: Point) -> i32 {
        self(p)
    }
}

/// Convert a sampled surface elevation into a tile height: floor, then clamp
/// into `0..=31`. NaN maps to 0.
pub fn clamp_height(sample: f32) -> u8 {
    if sample.is_nan() {
        return 0;
    }
    sample.floor().clamp(0.0, MAX_HEIGHT as f32) as u8
}

/// A rectangular height field described by text, one character per tile.
///
/// `.` and `0`-`9` are heights 0-9, `A`-`V` are heights 10-31 and `#` is a
/// full-height wall (31). Lines are separated by `'\n'` and must all have the
/// same width. Tiles outside the map read as height 0.
///
/// With the `serde` feature a map (de)serializes as that text, so loading one
/// goes through [`parse`](HeightMap::parse) and its checks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct HeightMap {
    heights: Vec<u8>,
    width: i32,
    height: i32,
}

impl HeightMap {
    /// Parse a height map. Leading and trailing whitespace of the whole
    /// string is trimmed, but not of individual lines.
    pub fn parse(s: &str) -> Result<Self, FogError> {
        let s = s.trim();
        let mut heights = Vec::with_capacity(s.len());
        let mut x: i32 = 0;
        let mut y: i32 = 0;
        let mut w: i32 = -1;

        for ch in s.chars() {
            if ch == '\n' {
                if w < 0 {
                    w = x;
                } else if x != w {
                    return Err(FogError::InconsistentSize(s.to_string()));
                }
                x = 0;
                y += 1;
                continue;
            }
            let h = rune_height(ch).ok_or(FogError::InvalidRune {
                ch,
                pos: Point::new(x, y),
            })?;
            heights.push(h);
            x += 1;
        }
        if w >= 0 && x != w {
            return Err(FogError::InconsistentSize(s.to_string()));
        }
        let width = if w < 0 { x } else { w };
        let height = if heights.is_empty() { 0 } else { y + 1 };
        Ok(Self {
            heights,
            width,
            height,
        })
    }

    /// The tiles covered by the map.
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Height of a tile, or `None` outside the map.
    pub fn get(&self, p: Point) -> Option<u8> {
        if !self.bounds().contains(p) {
            return None;
        }
        Some(self.heights[(p.y * self.width + p.x) as usize])
    }
}

impl HeightSource for HeightMap {
    fn height_at(&self, p: Point) -> i32 {
        self.get(p).map_or(0, i32::from)
    }
}

impl fmt::Display for HeightMap {
    /// Writes the map back as text that [`HeightMap::parse`] reads. Height 31
    /// is written as `#`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                f.write_char('\n')?;
            }
            for x in 0..self.width {
                let h = self.heights[(y * self.width + x) as usize];
                f.write_char(height_rune(h))?;
            }
        }
        Ok(())
    }
}

impl TryFrom<String> for HeightMap {
    type Error = FogError;

    fn try_from(s: String) -> Result<Self, FogError> {
        Self::parse(&s)
    }
}

impl From<HeightMap> for String {
    fn from(m: HeightMap) -> Self {
        m.to_string()
    }
}

fn height_rune(h: u8) -> char {
    match h {
        0 => '.',
        1..=9 => (b'0' + h) as char,
        MAX_HEIGHT => '#',
        _ => (b'A' + h - 10) as char,
    }
}

fn rune_height(ch: char) -> Option<u8> {
    match ch {
        '.' => Some(0),
        '#' => Some(MAX_HEIGHT),
        '0'..='9' => Some(ch as u8 - b'0'),
        'A'..='V' => Some(ch as u8 - b'A' + 10),
        _ => None,
    }
}
