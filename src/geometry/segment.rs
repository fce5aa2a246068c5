//! 1D and 2D integer segments.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{GeometryError, Vec2i};
use crate::direction::Dir;

/// Half-open integer interval `[a, b)` with `a <= b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Segment1iRaw")]
pub struct Segment1i {
    a: i32,
    b: i32,
}

/// Unvalidated mirror of [`Segment1i`]; deserialization routes through
/// [`Segment1i::new`] so inverted bounds are rejected.
#[derive(Deserialize)]
struct Segment1iRaw {
    a: i32,
    b: i32,
}

impl TryFrom<Segment1iRaw> for Segment1i {
    type Error = GeometryError;

    fn try_from(raw: Segment1iRaw) -> Result<Segment1i, GeometryError> {
        Segment1i::new(raw.a, raw.b)
    }
}

impl Segment1i {
    pub fn new(a: i32, b: i32) -> Result<Segment1i, GeometryError> {
        if a > b {
            return Err(GeometryError::InvertedSegment { a, b });
        }
        Ok(Segment1i { a, b })
    }

    /// Internal constructor for bounds already known to be ordered.
    pub(crate) fn ordered(a: i32, b: i32) -> Segment1i {
        debug_assert!(a <= b);
        Segment1i { a, b }
    }

    pub fn a(self) -> i32 {
        self.a
    }

    pub fn b(self) -> i32 {
        self.b
    }

    pub fn len(self) -> i32 {
        self.b - self.a
    }

    pub fn is_empty(self) -> bool {
        self.a == self.b
    }

    pub fn center(self) -> i32 {
        (self.a + self.b) / 2
    }

    pub fn overlaps(self, other: Segment1i) -> bool {
        self.a < other.b && self.b > other.a
    }

    /// Integer gap to another segment; 0 when they overlap.
    pub fn distance(self, other: Segment1i) -> i32 {
        if self.overlaps(other) {
            0
        } else {
            (self.a - other.b + 1).abs().min((other.a - self.b + 1).abs())
        }
    }

    /// Overlapping region, or the empty segment `[0, 0)` when disjoint.
    pub fn intersect(self, other: Segment1i) -> Segment1i {
        if self.overlaps(other) {
            Segment1i::ordered(self.a.max(other.a), self.b.min(other.b))
        } else {
            Segment1i::ordered(0, 0)
        }
    }

    /// Smallest segment covering both.
    pub fn union(self, other: Segment1i) -> Segment1i {
        Segment1i::ordered(self.a.min(other.a), self.b.max(other.b))
    }

    /// The integers contained in the segment, in order.
    pub fn iter(self) -> impl Iterator<Item = i32> {
        self.a..self.b
    }

    /// The intermediate segments morphing linearly into `target`.
    ///
    /// Each bound advances by one toward its target per emitted segment,
    /// stopping independently once it arrives; the sequence has exactly
    /// `max(|da|, |db|) - 1` entries and excludes both the starting and
    /// the target segment.
    pub fn lerp(self, target: Segment1i) -> SegmentLerp {
        let da = target.a - self.a;
        let db = target.b - self.b;
        SegmentLerp {
            curr_a: self.a,
            curr_b: self.b,
            target,
            step_a: da.signum(),
            step_b: db.signum(),
            remaining: (da.abs().max(db.abs()) - 1).max(0),
        }
    }
}

impl fmt::Display for Segment1i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.a, self.b)
    }
}

/// Lazy iterator produced by [`Segment1i::lerp`].
#[derive(Debug, Clone)]
pub struct SegmentLerp {
    curr_a: i32,
    curr_b: i32,
    target: Segment1i,
    step_a: i32,
    step_b: i32,
    remaining: i32,
}

impl Iterator for SegmentLerp {
    type Item = Segment1i;

    fn next(&mut self) -> Option<Segment1i> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if self.curr_a != self.target.a {
            self.curr_a += self.step_a;
        }
        if self.curr_b != self.target.b {
            self.curr_b += self.step_b;
        }
        Some(Segment1i::ordered(self.curr_a, self.curr_b))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

/// A segment between two 2D points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment2i {
    pub a: Vec2i,
    pub b: Vec2i,
}

impl Segment2i {
    pub fn new(a: Vec2i, b: Vec2i) -> Segment2i {
        Segment2i { a, b }
    }

    pub fn center(self) -> Vec2i {
        (self.a + self.b) / 2
    }
}

/// One edge of a rectangle: a 1D range plus the side's direction and the
/// fixed coordinate on the perpendicular axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RectSide {
    pub seg: Segment1i,
    pub dir: Dir,
    pub other_axis: i32,
}

impl RectSide {
    pub fn new(dir: Dir, seg: Segment1i, other_axis: i32) -> RectSide {
        RectSide {
            seg,
            dir,
            other_axis,
        }
    }

    /// Map a 1D coordinate in the range onto the 2D cell on this side.
    ///
    /// N/S sides run along x at the fixed y; E/W sides run along y at the
    /// fixed x.
    pub fn to_cell(self, coord: i32) -> Vec2i {
        if self.dir.is_vertical() {
            Vec2i::new(coord, self.other_axis)
        } else {
            Vec2i::new(self.other_axis, coord)
        }
    }

    /// The cells of this side in range order.
    pub fn cells(self) -> impl Iterator<Item = Vec2i> {
        self.seg.iter().map(move |c| self.to_cell(c))
    }
}

impl fmt::Display for RectSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {:?}, {}", self.seg, self.dir, self.other_axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: i32, b: i32) -> Segment1i {
        Segment1i::new(a, b).unwrap()
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(Segment1i::new(0, 1).is_ok());
        assert!(Segment1i::new(0, 0).is_ok());
        assert_eq!(
            Segment1i::new(0, -1),
            Err(GeometryError::InvertedSegment { a: 0, b: -1 })
        );
    }

    #[test]
    fn test_deserialize_rejects_inverted_bounds() {
        // The invariant holds through serde, not just Segment1i::new.
        let err = serde_json::from_str::<Segment1i>(r#"{"a":5,"b":1}"#).unwrap_err();
        assert!(err.to_string().contains("inverted"), "{err}");

        let ok: Segment1i = serde_json::from_str(r#"{"a":1,"b":5}"#).unwrap();
        assert_eq!(ok, seg(1, 5));
        assert_eq!(ok.len(), 4);
    }

    #[test]
    fn test_len_center() {
        assert_eq!(seg(2, 7).len(), 5);
        assert_eq!(seg(2, 7).center(), 4);
        assert!(seg(5, 5).is_empty());
    }

    #[test]
    fn test_overlaps() {
        assert!(!seg(0, 2).overlaps(seg(2, 3)));
        assert!(seg(0, 2).overlaps(seg(1, 3)));
    }

    #[test]
    fn test_distance() {
        assert_eq!(seg(0, 2).distance(seg(4, 5)), 3);
        assert_eq!(seg(4, 5).distance(seg(0, 2)), 3);
        assert_eq!(seg(0, 2).distance(seg(1, 3)), 0);
    }

    #[test]
    fn test_intersect() {
        assert_eq!(seg(0, 2).intersect(seg(1, 3)), seg(1, 2));
        assert_eq!(seg(0, 2).intersect(seg(0, 3)), seg(0, 2));
        assert_eq!(seg(0, 2).intersect(seg(-1, 3)), seg(0, 2));
        assert_eq!(seg(2, 2).intersect(seg(0, 5)).len(), 0);
    }

    #[test]
    fn test_union() {
        assert_eq!(seg(0, 2).union(seg(1, 3)), seg(0, 3));
        assert_eq!(seg(0, 2).union(seg(-1, 3)), seg(-1, 3));
        assert_eq!(seg(0, 0).union(seg(3, 3)).len(), 3);
        assert_eq!(seg(0, 0).union(seg(0, 1)), seg(0, 1));
    }

    #[test]
    fn test_iter() {
        assert_eq!(seg(0, 0).iter().count(), 0);
        assert_eq!(seg(3, 4).iter().collect::<Vec<_>>(), vec![3]);
        assert_eq!(
            seg(5, 10).iter().collect::<Vec<_>>(),
            vec![5, 6, 7, 8, 9]
        );
    }

    #[test]
    fn test_lerp_identity() {
        let origin = seg(0, 5);
        assert_eq!(origin.lerp(origin).count(), 0);
    }

    #[test]
    fn test_lerp_expansion() {
        let origin = seg(0, 5);
        assert_eq!(
            origin.lerp(seg(-2, 7)).collect::<Vec<_>>(),
            vec![seg(-1, 6)]
        );
        assert_eq!(
            origin.lerp(seg(-3, 6)).collect::<Vec<_>>(),
            vec![seg(-1, 6), seg(-2, 6)]
        );
    }

    #[test]
    fn test_lerp_contraction() {
        let origin = seg(0, 5);
        assert_eq!(
            origin.lerp(seg(2, 3)).collect::<Vec<_>>(),
            vec![seg(1, 4)]
        );
        assert_eq!(
            origin.lerp(seg(3, 5)).collect::<Vec<_>>(),
            vec![seg(1, 5), seg(2, 5)]
        );
    }

    #[test]
    fn test_lerp_shift() {
        let origin = seg(0, 5);
        assert_eq!(
            origin.lerp(seg(4, 9)).collect::<Vec<_>>(),
            vec![seg(1, 6), seg(2, 7), seg(3, 8)]
        );
        assert_eq!(
            origin.lerp(seg(7, 10)).collect::<Vec<_>>(),
            vec![
                seg(1, 6),
                seg(2, 7),
                seg(3, 8),
                seg(4, 9),
                seg(5, 10),
                seg(6, 10)
            ]
        );
    }

    #[test]
    fn test_segment2i_center() {
        assert_eq!(
            Segment2i::new(Vec2i::new(-1, 0), Vec2i::new(1, 0)).center(),
            Vec2i::ZERO
        );
        assert_eq!(
            Segment2i::new(Vec2i::new(-1, 2), Vec2i::new(1, -2)).center(),
            Vec2i::ZERO
        );
        assert_eq!(
            Segment2i::new(Vec2i::new(0, 3), Vec2i::new(2, -1)).center(),
            Vec2i::ONE
        );
    }

    #[test]
    fn test_rect_side_cells() {
        let east = RectSide::new(Dir::E, seg(4, 7), 3);
        assert_eq!(
            east.cells().collect::<Vec<_>>(),
            vec![Vec2i::new(3, 4), Vec2i::new(3, 5), Vec2i::new(3, 6)]
        );

        let south = RectSide::new(Dir::S, seg(4, 8), -1);
        assert_eq!(
            south.cells().collect::<Vec<_>>(),
            vec![
                Vec2i::new(4, -1),
                Vec2i::new(5, -1),
                Vec2i::new(6, -1),
                Vec2i::new(7, -1)
            ]
        );
    }
}
