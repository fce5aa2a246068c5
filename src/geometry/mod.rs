//! Integer geometry primitives.
//!
//! 2D integer vectors, axis-aligned rectangles and 1D/2D segments, all
//! using half-open `[min, max)` interval semantics. Everything is a
//! plain `Copy` value; operations return new values instead of mutating
//! in place.

mod rect;
mod segment;

pub use rect::{RectCells, Recti};
pub use segment::{RectSide, Segment1i, Segment2i, SegmentLerp};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::direction::{Dir, Dir8};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("segment bounds inverted: [{a}, {b})")]
    InvertedSegment { a: i32, b: i32 },
}

/// An ordered pair of signed 32-bit integers.
///
/// Equality is component-wise; inequality is its logical negation. The
/// comparison helpers (`all_lt` and friends) are conjunctive over both
/// axes and therefore do *not* form a total order: two vectors can be
/// mutually incomparable, which is why `PartialOrd` is not implemented.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const ZERO: Vec2i = Vec2i::new(0, 0);
    pub const ONE: Vec2i = Vec2i::new(1, 1);
    pub const RIGHT: Vec2i = Vec2i::new(1, 0);
    pub const UP: Vec2i = Vec2i::new(0, 1);
    pub const LEFT: Vec2i = Vec2i::new(-1, 0);
    pub const DOWN: Vec2i = Vec2i::new(0, -1);

    pub const fn new(x: i32, y: i32) -> Vec2i {
        Vec2i { x, y }
    }

    /// Both components set to the same value.
    pub const fn splat(v: i32) -> Vec2i {
        Vec2i::new(v, v)
    }

    /// The components swapped, `(y, x)`.
    pub fn swapped(self) -> Vec2i {
        Vec2i::new(self.y, self.x)
    }

    pub fn length(self) -> f32 {
        ((self.x * self.x + self.y * self.y) as f32).sqrt()
    }

    /// Component by axis index: 0 = x, 1 = y.
    pub fn axis(self, axis: usize) -> i32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => panic!("Vec2i axis index out of range: {axis}"),
        }
    }

    /// A copy with the component on `axis` replaced.
    pub fn with_axis(self, axis: usize, value: i32) -> Vec2i {
        match axis {
            0 => Vec2i::new(value, self.y),
            1 => Vec2i::new(self.x, value),
            _ => panic!("Vec2i axis index out of range: {axis}"),
        }
    }

    /// Interpret a unit vector as a cardinal direction.
    pub fn to_dir(self) -> Option<Dir> {
        Dir::ALL.into_iter().find(|d| d.to_vec2i() == self)
    }

    /// True when both components are strictly less than `other`'s.
    pub fn all_lt(self, other: Vec2i) -> bool {
        self.x < other.x && self.y < other.y
    }

    /// True when both components are strictly greater than `other`'s.
    pub fn all_gt(self, other: Vec2i) -> bool {
        self.x > other.x && self.y > other.y
    }

    pub fn all_le(self, other: Vec2i) -> bool {
        self.x <= other.x && self.y <= other.y
    }

    pub fn all_ge(self, other: Vec2i) -> bool {
        self.x >= other.x && self.y >= other.y
    }

    /// One step in a cardinal direction.
    pub fn step(self, dir: Dir) -> Vec2i {
        self + dir.to_vec2i()
    }

    /// `dist` steps in a cardinal direction.
    pub fn step_by(self, dir: Dir, dist: i32) -> Vec2i {
        self + dir.to_vec2i() * dist
    }

    /// One step in one of the 8 compass directions.
    pub fn step8(self, dir: Dir8) -> Vec2i {
        self + dir.to_vec2i()
    }

    pub fn step8_by(self, dir: Dir8, dist: i32) -> Vec2i {
        self + dir.to_vec2i() * dist
    }

    /// The 8 Moore neighbours, starting east and walking CCW.
    pub fn moore_neighbours(self) -> impl Iterator<Item = Vec2i> {
        Dir8::ALL.into_iter().map(move |d| self.step8(d))
    }

    /// The 4 von Neumann neighbours in E, N, W, S order.
    pub fn von_neumann_neighbours(self) -> impl Iterator<Item = Vec2i> {
        [Dir::E, Dir::N, Dir::W, Dir::S]
            .into_iter()
            .map(move |d| self.step(d))
    }

    /// The ring of cells at exactly `distance` (Chebyshev) from this cell.
    ///
    /// Distance 0 yields the cell itself. Otherwise the sides are visited
    /// in `Dir` declaration order (E, N, S, W), each walked CCW for
    /// `2 * distance` cells starting at the corner clockwise of that
    /// side; callers may rely on this emission order. Negative distance
    /// is a caller error.
    pub fn moore_ring(self, distance: i32) -> MooreRing {
        assert!(distance >= 0, "moore_ring distance must be non-negative");
        MooreRing::new(self, distance)
    }
}

impl fmt::Display for Vec2i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::ops::Neg for Vec2i {
    type Output = Vec2i;
    fn neg(self) -> Vec2i {
        Vec2i::new(-self.x, -self.y)
    }
}

impl std::ops::Add for Vec2i {
    type Output = Vec2i;
    fn add(self, rhs: Vec2i) -> Vec2i {
        Vec2i::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2i {
    type Output = Vec2i;
    fn sub(self, rhs: Vec2i) -> Vec2i {
        Vec2i::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul for Vec2i {
    type Output = Vec2i;
    fn mul(self, rhs: Vec2i) -> Vec2i {
        Vec2i::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl std::ops::Div for Vec2i {
    type Output = Vec2i;
    fn div(self, rhs: Vec2i) -> Vec2i {
        Vec2i::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl std::ops::Add<i32> for Vec2i {
    type Output = Vec2i;
    fn add(self, rhs: i32) -> Vec2i {
        Vec2i::new(self.x + rhs, self.y + rhs)
    }
}

impl std::ops::Sub<i32> for Vec2i {
    type Output = Vec2i;
    fn sub(self, rhs: i32) -> Vec2i {
        Vec2i::new(self.x - rhs, self.y - rhs)
    }
}

impl std::ops::Mul<i32> for Vec2i {
    type Output = Vec2i;
    fn mul(self, rhs: i32) -> Vec2i {
        Vec2i::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<i32> for Vec2i {
    type Output = Vec2i;
    fn div(self, rhs: i32) -> Vec2i {
        Vec2i::new(self.x / rhs, self.y / rhs)
    }
}

/// Lazy iterator over a Moore ring, see [`Vec2i::moore_ring`].
#[derive(Debug, Clone)]
pub struct MooreRing {
    center: Vec2i,
    distance: i32,
    /// Index into `Dir::ALL` for the side currently being walked.
    side: usize,
    /// Cells still to emit on the current side.
    remaining: i32,
    curr: Vec2i,
    center_emitted: bool,
}

impl MooreRing {
    fn new(center: Vec2i, distance: i32) -> MooreRing {
        let mut ring = MooreRing {
            center,
            distance,
            side: 0,
            remaining: 0,
            curr: center,
            center_emitted: false,
        };
        if distance > 0 {
            ring.start_side(0);
        }
        ring
    }

    fn start_side(&mut self, side: usize) {
        let dir = Dir::ALL[side];
        self.side = side;
        self.remaining = self.distance * 2;
        self.curr = self
            .center
            .step8_by(dir.to_dir8().next_cw(), self.distance);
    }
}

impl Iterator for MooreRing {
    type Item = Vec2i;

    fn next(&mut self) -> Option<Vec2i> {
        if self.distance == 0 {
            if self.center_emitted {
                return None;
            }
            self.center_emitted = true;
            return Some(self.center);
        }

        while self.remaining == 0 {
            if self.side + 1 >= Dir::ALL.len() {
                return None;
            }
            let next = self.side + 1;
            self.start_side(next);
        }

        let cell = self.curr;
        self.curr = cell.step(Dir::ALL[self.side].next_ccw());
        self.remaining -= 1;
        Some(cell)
    }
}
