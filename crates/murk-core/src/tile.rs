//! The packed per-tile record: [`TileState`].

use crate::error::FogError;
use crate::geom::Point;
use bytemuck::{Pod, Zeroable};

/// Largest height a tile can hold (five bits).
pub const MAX_HEIGHT: u8 = 31;

/// Visibility flags and occlusion height of one tile, packed into a byte.
///
/// Layout, high to low: visible (bit 7), seen (bit 6), reserved (bit 5,
/// always zero), height (bits 0-4). The layout is the one presentation
/// layers receive from [`VisibilityGrid::as_bytes`](crate::VisibilityGrid::as_bytes).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
#[repr(transparent)]
pub struct TileState(u8);

impl TileState {
    pub const VISIBLE: u8 = 0b1000_0000;
    pub const SEEN: u8 = 0b0100_0000;
    pub const HEIGHT_MASK: u8 = 0b0001_1111;

    /// A hidden, never-seen tile of the given height.
    pub fn new(height: u8) -> Result<Self, FogError> {
        Self::checked(Point::ZERO, height as i32)
    }

    /// Like [`new`](Self::new), taking the raw height a source produced and
    /// the position it belongs to, for error reporting.
    pub(crate) fn checked(pos: Point, height: i32) -> Result<Self, FogError> {
        if !(0..=MAX_HEIGHT as i32).contains(&height) {
            return Err(FogError::HeightOutOfRange { pos, height });
        }
        Ok(Self(height as u8))
    }

    /// Rebuild a tile from its packed byte. The reserved bit is dropped.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & (Self::VISIBLE | Self::SEEN | Self::HEIGHT_MASK))
    }

    /// The packed byte.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn height(self) -> u8 {
        self.0 & Self::HEIGHT_MASK
    }

    /// Inside some observer's revealed set this tick.
    #[inline]
    pub const fn visible(self) -> bool {
        self.0 & Self::VISIBLE != 0
    }

    /// Revealed at least once since the grid was created.
    #[inline]
    pub const fn seen(self) -> bool {
        self.0 & Self::SEEN != 0
    }

    /// Mark visible, and therefore seen.
    #[inline]
    pub fn reveal(&mut self) {
        self.0 |= Self::VISIBLE | Self::SEEN;
    }

    /// Clear the visible flag. Seen and height are kept.
    #[inline]
    pub fn hide(&mut self) {
        self.0 &= !Self::VISIBLE;
    }
}

impl From<u8> for TileState {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

impl From<TileState> for u8 {
    fn from(t: TileState) -> Self {
        t.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tile_is_dark() {
        let t = TileState::new(12).unwrap();
        assert_eq!(t.height(), 12);
        assert!(!t.visible());
        assert!(!t.seen());
        assert_eq!(t.bits(), 12);
    }

    #[test]
    fn height_above_five_bits_is_rejected() {
        assert!(TileState::new(MAX_HEIGHT).is_ok());
        assert_eq!(
            TileState::new(32),
            Err(FogError::HeightOutOfRange {
                pos: Point::ZERO,
                height: 32
            })
        );
        assert!(TileState::checked(Point::new(1, 1), -1).is_err());
    }

    #[test]
    fn flags_are_independent_of_height() {
        let mut t = TileState::new(MAX_HEIGHT).unwrap();
        t.reveal();
        assert!(t.visible() && t.seen());
        assert_eq!(t.height(), MAX_HEIGHT);
        assert_eq!(t.bits(), 0b1101_1111);

        t.hide();
        assert!(!t.visible());
        assert!(t.seen());
        assert_eq!(t.height(), MAX_HEIGHT);
    }

    #[test]
    fn reserved_bit_is_masked() {
        let t = TileState::from_bits(0xFF);
        assert_eq!(t.bits(), 0b1101_1111);
        assert_eq!(TileState::from_bits(0b0010_0000), TileState::default());
    }

    #[test]
    fn casts_to_bytes() {
        let mut tiles = [TileState::new(3).unwrap(), TileState::new(31).unwrap()];
        tiles[1].reveal();
        let bytes: &[u8] = bytemuck::cast_slice(&tiles);
        assert_eq!(bytes, &[3, 0b1101_1111]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_keeps_the_packed_byte() {
        let mut t = TileState::new(7).unwrap();
        t.reveal();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, (0b1100_0111u8).to_string());
        let back: TileState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        let masked: TileState = serde_json::from_str("255").unwrap();
        assert_eq!(masked.bits(), 0b1101_1111);
    }
}
