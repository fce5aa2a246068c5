//! Compass direction algebra.
//!
//! Four- and eight-way directions, direction flag sets and quarter-turn
//! rotations. Everything here is a fixed lookup table; several consumers
//! (flag rotation, `DirFlags::to_dir` priority, ring traversal) depend on
//! the exact enumeration orders, so they must not be reordered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Vec2i;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DirectionError {
    #[error("direction flags have no bit set")]
    EmptyFlags,
}

/// One of the 4 cardinal directions.
///
/// Declared in alphabetical order (directions are frequently spelled out
/// in identifiers); `opposite` and the clockwise permutation rely on this
/// order, not on a rotational one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    E,
    N,
    S,
    W,
}

const DIR_UNIT: [Vec2i; 4] = [Vec2i::RIGHT, Vec2i::UP, Vec2i::DOWN, Vec2i::LEFT];
const DIR_SIGN: [i32; 4] = [1, 1, -1, -1];
const DIR_CW: [Dir; 4] = [Dir::S, Dir::E, Dir::W, Dir::N];
const DIR_TO_DIR8: [Dir8; 4] = [Dir8::E, Dir8::N, Dir8::S, Dir8::W];
const DIR_FLAG: [DirFlags; 4] = [DirFlags::E, DirFlags::N, DirFlags::S, DirFlags::W];

impl Dir {
    /// All 4 directions in declaration order.
    pub const ALL: [Dir; 4] = [Dir::E, Dir::N, Dir::S, Dir::W];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Dir {
        Dir::ALL[3 - self.index()]
    }

    /// +1 for the positive directions (E, N), -1 for S and W.
    pub fn sign(self) -> i32 {
        DIR_SIGN[self.index()]
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Dir::N | Dir::S)
    }

    /// Axis index: 0 = horizontal, 1 = vertical.
    pub fn axis(self) -> usize {
        self.is_vertical() as usize
    }

    /// The unit vector pointing this way.
    pub fn to_vec2i(self) -> Vec2i {
        DIR_UNIT[self.index()]
    }

    pub fn to_flags(self) -> DirFlags {
        DIR_FLAG[self.index()]
    }

    pub fn to_dir8(self) -> Dir8 {
        DIR_TO_DIR8[self.index()]
    }

    pub fn next_cw(self) -> Dir {
        DIR_CW[self.index()]
    }

    pub fn next_ccw(self) -> Dir {
        self.next_cw().opposite()
    }
}

/// One of the 8 compass directions, in CCW order starting at east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir8 {
    E,
    NE,
    N,
    NW,
    W,
    SW,
    S,
    SE,
}

const DIR8_UNIT: [Vec2i; 8] = [
    Vec2i::RIGHT,
    Vec2i::new(1, 1),
    Vec2i::UP,
    Vec2i::new(-1, 1),
    Vec2i::LEFT,
    Vec2i::new(-1, -1),
    Vec2i::DOWN,
    Vec2i::new(1, -1),
];

impl Dir8 {
    /// All 8 directions in CCW order.
    pub const ALL: [Dir8; 8] = [
        Dir8::E,
        Dir8::NE,
        Dir8::N,
        Dir8::NW,
        Dir8::W,
        Dir8::SW,
        Dir8::S,
        Dir8::SE,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn to_vec2i(self) -> Vec2i {
        DIR8_UNIT[self.index()]
    }

    pub fn next_cw(self) -> Dir8 {
        Dir8::ALL[(self.index() + 7) % 8]
    }

    pub fn next_ccw(self) -> Dir8 {
        Dir8::ALL[(self.index() + 1) % 8]
    }

    pub fn opposite(self) -> Dir8 {
        Dir8::ALL[(self.index() + 4) % 8]
    }
}

bitflags::bitflags! {
    /// Flag set over the 4 cardinal directions.
    ///
    /// The bit order (E, N, W, S over bits 0..=3) is what makes `rotate`
    /// a plain 4-bit rotation; keep it as is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DirFlags: u8 {
        const E = 1 << 0;
        const N = 1 << 1;
        const W = 1 << 2;
        const S = 1 << 3;
        const ALL = Self::E.bits() | Self::N.bits() | Self::W.bits() | Self::S.bits();
    }
}

/// `to_dir` resolves ambiguous flag sets by this fixed priority, which is
/// the clockwise permutation table of `Dir`.
const FLAG_PRIORITY: [Dir; 4] = DIR_CW;

impl DirFlags {
    /// Rotate the whole flag set by a multiple of 90 degrees.
    ///
    /// A left shift by `rot` quarter turns, folding the overflow nibble
    /// back into the low 4 bits, i.e. a 4-bit bit rotation.
    pub fn rotate(self, rot: Rot4) -> DirFlags {
        let shifted = (self.bits() as u32) << rot.quarter_turns();
        DirFlags::from_bits_truncate(((shifted & 0xF) | (shifted >> 4)) as u8)
    }

    /// Collapse the flag set to a single direction.
    ///
    /// With more than one bit set, the first match in the priority order
    /// S, E, W, N wins. Empty flags are an error.
    pub fn to_dir(self) -> Result<Dir, DirectionError> {
        FLAG_PRIORITY
            .iter()
            .copied()
            .find(|d| self.contains(d.to_flags()))
            .ok_or(DirectionError::EmptyFlags)
    }
}

/// A rotation by a multiple of 90 degrees, counted in CCW quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rot4 {
    None,
    Ccw90,
    Rev,
    Cw90,
}

impl Rot4 {
    pub const ALL: [Rot4; 4] = [Rot4::None, Rot4::Ccw90, Rot4::Rev, Rot4::Cw90];

    /// Number of CCW quarter turns (0..=3).
    pub fn quarter_turns(self) -> u32 {
        self as u32
    }

    /// The inverse rotation. Not the same as composing with `Rev`.
    pub fn reversed(self) -> Rot4 {
        Rot4::ALL[((4 - self.quarter_turns()) % 4) as usize]
    }
}

impl std::ops::Add for Rot4 {
    type Output = Rot4;

    /// Compose two rotations (addition modulo a full turn).
    fn add(self, rhs: Rot4) -> Rot4 {
        Rot4::ALL[((self.quarter_turns() + rhs.quarter_turns()) % 4) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_opposite() {
        assert_eq!(Dir::E.opposite(), Dir::W);
        assert_eq!(Dir::W.opposite(), Dir::E);
        assert_eq!(Dir::N.opposite(), Dir::S);
        assert_eq!(Dir::S.opposite(), Dir::N);
    }

    #[test]
    fn test_dir_sign() {
        assert_eq!(Dir::E.sign(), 1);
        assert_eq!(Dir::N.sign(), 1);
        assert_eq!(Dir::S.sign(), -1);
        assert_eq!(Dir::W.sign(), -1);
    }

    #[test]
    fn test_dir_axis() {
        assert!(!Dir::E.is_vertical());
        assert!(!Dir::W.is_vertical());
        assert!(Dir::N.is_vertical());
        assert!(Dir::S.is_vertical());

        assert_eq!(Dir::E.axis(), 0);
        assert_eq!(Dir::W.axis(), 0);
        assert_eq!(Dir::N.axis(), 1);
        assert_eq!(Dir::S.axis(), 1);
    }

    #[test]
    fn test_dir_to_vec2i() {
        assert_eq!(Dir::E.to_vec2i(), Vec2i::RIGHT);
        assert_eq!(Dir::N.to_vec2i(), Vec2i::UP);
        assert_eq!(Dir::S.to_vec2i(), Vec2i::DOWN);
        assert_eq!(Dir::W.to_vec2i(), Vec2i::LEFT);
    }

    #[test]
    fn test_dir_to_flags() {
        assert_eq!(Dir::E.to_flags(), DirFlags::E);
        assert_eq!(Dir::N.to_flags(), DirFlags::N);
        assert_eq!(Dir::W.to_flags(), DirFlags::W);
        assert_eq!(Dir::S.to_flags(), DirFlags::S);
    }

    #[test]
    fn test_dir_next_cw_ccw() {
        assert_eq!(Dir::E.next_cw(), Dir::S);
        assert_eq!(Dir::S.next_cw(), Dir::W);
        assert_eq!(Dir::W.next_cw(), Dir::N);
        assert_eq!(Dir::N.next_cw(), Dir::E);

        assert_eq!(Dir::E.next_ccw(), Dir::N);
        assert_eq!(Dir::N.next_ccw(), Dir::W);
        assert_eq!(Dir::W.next_ccw(), Dir::S);
        assert_eq!(Dir::S.next_ccw(), Dir::E);
    }

    #[test]
    fn test_dir8_to_vec2i() {
        assert_eq!(Dir8::E.to_vec2i(), Vec2i::new(1, 0));
        assert_eq!(Dir8::NE.to_vec2i(), Vec2i::new(1, 1));
        assert_eq!(Dir8::N.to_vec2i(), Vec2i::new(0, 1));
        assert_eq!(Dir8::NW.to_vec2i(), Vec2i::new(-1, 1));
        assert_eq!(Dir8::W.to_vec2i(), Vec2i::new(-1, 0));
        assert_eq!(Dir8::SW.to_vec2i(), Vec2i::new(-1, -1));
        assert_eq!(Dir8::S.to_vec2i(), Vec2i::new(0, -1));
        assert_eq!(Dir8::SE.to_vec2i(), Vec2i::new(1, -1));
    }

    #[test]
    fn test_dir8_rotation() {
        let mut d = Dir8::E;
        for expected in [
            Dir8::SE,
            Dir8::S,
            Dir8::SW,
            Dir8::W,
            Dir8::NW,
            Dir8::N,
            Dir8::NE,
            Dir8::E,
        ] {
            d = d.next_cw();
            assert_eq!(d, expected);
        }

        for d in Dir8::ALL {
            assert_eq!(d.next_cw().next_ccw(), d);
            assert_eq!(d.opposite().opposite(), d);
        }
        assert_eq!(Dir8::SE.opposite(), Dir8::NW);
        assert_eq!(Dir8::SW.opposite(), Dir8::NE);
    }

    #[test]
    fn test_dir_dir8_agree() {
        for d in Dir::ALL {
            assert_eq!(d.to_vec2i(), d.to_dir8().to_vec2i());
        }
    }

    #[test]
    fn test_flags_rotate_fixed_points() {
        for rot in Rot4::ALL {
            assert_eq!(DirFlags::ALL.rotate(rot), DirFlags::ALL);
            assert_eq!(DirFlags::empty().rotate(rot), DirFlags::empty());
        }
        for d in Dir::ALL {
            assert_eq!(d.to_flags().rotate(Rot4::None), d.to_flags());
        }
    }

    #[test]
    fn test_flags_rotate_single() {
        assert_eq!(DirFlags::E.rotate(Rot4::Cw90), DirFlags::S);
        assert_eq!(DirFlags::S.rotate(Rot4::Cw90), DirFlags::W);
        assert_eq!(DirFlags::W.rotate(Rot4::Cw90), DirFlags::N);
        assert_eq!(DirFlags::N.rotate(Rot4::Cw90), DirFlags::E);

        assert_eq!(DirFlags::E.rotate(Rot4::Ccw90), DirFlags::N);
        assert_eq!(DirFlags::N.rotate(Rot4::Ccw90), DirFlags::W);
        assert_eq!(DirFlags::W.rotate(Rot4::Ccw90), DirFlags::S);
        assert_eq!(DirFlags::S.rotate(Rot4::Ccw90), DirFlags::E);

        assert_eq!(DirFlags::E.rotate(Rot4::Rev), DirFlags::W);
        assert_eq!(DirFlags::S.rotate(Rot4::Rev), DirFlags::N);
    }

    #[test]
    fn test_flags_rotate_combined() {
        assert_eq!(
            (DirFlags::N | DirFlags::S).rotate(Rot4::Cw90),
            DirFlags::W | DirFlags::E
        );
        assert_eq!(
            (DirFlags::N | DirFlags::W).rotate(Rot4::Ccw90),
            DirFlags::W | DirFlags::S
        );
        assert_eq!(
            (DirFlags::E | DirFlags::N).rotate(Rot4::Ccw90),
            DirFlags::N | DirFlags::W
        );
        assert_eq!(
            (DirFlags::W | DirFlags::N | DirFlags::E).rotate(Rot4::Rev),
            DirFlags::W | DirFlags::S | DirFlags::E
        );
    }

    #[test]
    fn test_flags_rotate_cycles() {
        // Four CCW quarter turns bring any flag set back to itself.
        for d in Dir::ALL {
            let mut f = d.to_flags();
            for _ in 0..4 {
                f = f.rotate(Rot4::Ccw90);
            }
            assert_eq!(f, d.to_flags());
        }
    }

    #[test]
    fn test_flags_to_dir() {
        assert_eq!(DirFlags::empty().to_dir(), Err(DirectionError::EmptyFlags));

        for d in Dir::ALL {
            assert_eq!(d.to_flags().to_dir(), Ok(d));
        }

        // Ambiguous sets resolve to one of their members by priority.
        assert!(matches!(
            (DirFlags::E | DirFlags::N).to_dir(),
            Ok(Dir::E | Dir::N)
        ));
        assert_eq!((DirFlags::S | DirFlags::E).to_dir(), Ok(Dir::S));
        assert_eq!(DirFlags::ALL.to_dir(), Ok(Dir::S));
    }

    #[test]
    fn test_rot4_add() {
        assert_eq!(Rot4::Ccw90 + Rot4::Ccw90, Rot4::Rev);
        assert_eq!(Rot4::Rev + Rot4::Ccw90, Rot4::Cw90);
        assert_eq!(Rot4::Cw90 + Rot4::Ccw90, Rot4::None);
        for rot in Rot4::ALL {
            assert_eq!(rot + Rot4::None, rot);
        }
    }

    #[test]
    fn test_rot4_reversed() {
        assert_eq!(Rot4::None.reversed(), Rot4::None);
        assert_eq!(Rot4::Ccw90.reversed(), Rot4::Cw90);
        assert_eq!(Rot4::Rev.reversed(), Rot4::Rev);
        assert_eq!(Rot4::Cw90.reversed(), Rot4::Ccw90);
        for rot in Rot4::ALL {
            assert_eq!(rot + rot.reversed(), Rot4::None);
        }
    }
}
