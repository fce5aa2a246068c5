//! Axis-aligned integer rectangles.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{RectSide, Segment1i, Vec2i};
use crate::direction::Dir;

/// Axis-aligned rectangle covering `[position, position + size)`.
///
/// All algorithms assume non-negative size on both axes; the `min_max`
/// constructor clamps negative extents to zero, and the bound builders
/// (`with_x_min` etc.) keep the opposite bound fixed.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Recti {
    pub position: Vec2i,
    pub size: Vec2i,
}

impl Recti {
    pub const fn new(x_min: i32, y_min: i32, width: i32, height: i32) -> Recti {
        Recti {
            position: Vec2i::new(x_min, y_min),
            size: Vec2i::new(width, height),
        }
    }

    pub const fn from_pos_size(position: Vec2i, size: Vec2i) -> Recti {
        Recti { position, size }
    }

    /// Build from bounds, clamping negative extents to zero.
    pub fn min_max(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Recti {
        Recti::new(
            x_min,
            y_min,
            (x_max - x_min).max(0),
            (y_max - y_min).max(0),
        )
    }

    pub fn width(self) -> i32 {
        self.size.x
    }

    pub fn height(self) -> i32 {
        self.size.y
    }

    pub fn area(self) -> i32 {
        self.size.x * self.size.y
    }

    pub fn min(self) -> Vec2i {
        self.position
    }

    pub fn max(self) -> Vec2i {
        self.position + self.size
    }

    pub fn x_min(self) -> i32 {
        self.position.x
    }

    pub fn x_max(self) -> i32 {
        self.position.x + self.size.x
    }

    pub fn y_min(self) -> i32 {
        self.position.y
    }

    pub fn y_max(self) -> i32 {
        self.position.y + self.size.y
    }

    pub fn left(self) -> i32 {
        self.x_min()
    }

    pub fn right(self) -> i32 {
        self.x_max()
    }

    pub fn bottom(self) -> i32 {
        self.y_min()
    }

    pub fn top(self) -> i32 {
        self.y_max()
    }

    /// Center cell (integer division).
    pub fn center(self) -> Vec2i {
        self.position + self.size / 2
    }

    /// Corner cells (cell coordinates, so the exclusive bounds back off
    /// by one).
    pub fn top_left(self) -> Vec2i {
        Vec2i::new(self.left(), self.top() - 1)
    }

    pub fn top_right(self) -> Vec2i {
        Vec2i::new(self.right() - 1, self.top() - 1)
    }

    pub fn bottom_left(self) -> Vec2i {
        Vec2i::new(self.left(), self.bottom())
    }

    pub fn bottom_right(self) -> Vec2i {
        Vec2i::new(self.right() - 1, self.bottom())
    }

    /// Cell coordinate of the border line on the given side.
    pub fn side_bound(self, dir: Dir) -> i32 {
        match dir {
            Dir::E => self.x_max() - 1,
            Dir::N => self.y_max() - 1,
            Dir::S => self.y_min(),
            Dir::W => self.x_min(),
        }
    }

    /// Move the left bound, keeping the right bound fixed.
    pub fn with_x_min(self, x_min: i32) -> Recti {
        Recti::new(
            x_min,
            self.y_min(),
            self.size.x + self.position.x - x_min,
            self.size.y,
        )
    }

    /// Move the right bound, keeping the left bound fixed.
    pub fn with_x_max(self, x_max: i32) -> Recti {
        Recti::new(
            self.x_min(),
            self.y_min(),
            x_max - self.position.x,
            self.size.y,
        )
    }

    /// Move the bottom bound, keeping the top bound fixed.
    pub fn with_y_min(self, y_min: i32) -> Recti {
        Recti::new(
            self.x_min(),
            y_min,
            self.size.x,
            self.size.y + self.position.y - y_min,
        )
    }

    /// Move the top bound, keeping the bottom bound fixed.
    pub fn with_y_max(self, y_max: i32) -> Recti {
        Recti::new(
            self.x_min(),
            self.y_min(),
            self.size.x,
            y_max - self.position.y,
        )
    }

    pub fn contains(self, p: Vec2i) -> bool {
        p.all_ge(self.min()) && p.all_lt(self.max())
    }

    pub fn contains_rect(self, r: Recti) -> bool {
        self.min().all_le(r.min()) && self.max().all_ge(r.max())
    }

    pub fn overlaps(self, r: Recti) -> bool {
        self.max().all_gt(r.min()) && self.min().all_lt(r.max())
    }

    pub fn translated(self, offset: Vec2i) -> Recti {
        Recti::from_pos_size(self.position + offset, self.size)
    }

    pub fn moved_to(self, position: Vec2i) -> Recti {
        Recti::from_pos_size(position, self.size)
    }

    /// Overlapping region; empty (zero-size) when disjoint.
    pub fn intersect(self, ot: Recti) -> Recti {
        Recti::min_max(
            self.x_min().max(ot.x_min()),
            self.y_min().max(ot.y_min()),
            self.x_max().min(ot.x_max()),
            self.y_max().min(ot.y_max()),
        )
    }

    /// Smallest rectangle covering both.
    pub fn union(self, ot: Recti) -> Recti {
        Recti::min_max(
            self.x_min().min(ot.x_min()),
            self.y_min().min(ot.y_min()),
            self.x_max().max(ot.x_max()),
            self.y_max().max(ot.y_max()),
        )
    }

    /// Grow symmetrically by a per-axis thickness.
    pub fn expand(self, thickness: Vec2i) -> Recti {
        Recti::min_max(
            self.x_min() - thickness.x,
            self.y_min() - thickness.y,
            self.x_max() + thickness.x,
            self.y_max() + thickness.y,
        )
    }

    /// Push one edge outward.
    pub fn expand_side(self, side: Dir, thickness: i32) -> Recti {
        match side {
            Dir::E => Recti::min_max(
                self.x_min(),
                self.y_min(),
                self.x_max() + thickness,
                self.y_max(),
            ),
            Dir::N => Recti::min_max(
                self.x_min(),
                self.y_min(),
                self.x_max(),
                self.y_max() + thickness,
            ),
            Dir::S => Recti::min_max(
                self.x_min(),
                self.y_min() - thickness,
                self.x_max(),
                self.y_max(),
            ),
            Dir::W => Recti::min_max(
                self.x_min() - thickness,
                self.y_min(),
                self.x_max(),
                self.y_max(),
            ),
        }
    }

    /// Shrink symmetrically by a per-axis thickness (clamped at empty).
    pub fn shrink(self, thickness: Vec2i) -> Recti {
        Recti::min_max(
            self.x_min() + thickness.x,
            self.y_min() + thickness.y,
            self.x_max() - thickness.x,
            self.y_max() - thickness.y,
        )
    }

    /// Pull one edge inward.
    pub fn shrink_side(self, side: Dir, thickness: i32) -> Recti {
        self.expand_side(side, -thickness)
    }

    /// Grow minimally to cover a point; a degenerate (zero-area)
    /// rectangle snaps directly onto the point.
    pub fn expand_to_include(self, v: Vec2i) -> Recti {
        if self.size.x == 0 || self.size.y == 0 {
            return Recti::from_pos_size(v, Vec2i::ONE);
        }
        let mut r = self;
        if v.x < r.x_min() {
            r = r.with_x_min(v.x);
        } else if v.x >= r.x_max() {
            r = r.with_x_max(v.x + 1);
        }
        if v.y < r.y_min() {
            r = r.with_y_min(v.y);
        } else if v.y >= r.y_max() {
            r = r.with_y_max(v.y + 1);
        }
        r
    }

    /// Split in two at a cut line on the given axis.
    ///
    /// Returns the pieces in min-to-max order; if the line is not
    /// strictly interior the rectangle comes back whole as a single
    /// element.
    pub fn divide(self, vertical_cut: bool, line: i32) -> Vec<Recti> {
        if vertical_cut {
            if line > self.left() && line < self.right() {
                vec![
                    Recti::min_max(self.left(), self.bottom(), line, self.top()),
                    Recti::min_max(line, self.bottom(), self.right(), self.top()),
                ]
            } else {
                vec![self]
            }
        } else if line > self.bottom() && line < self.top() {
            vec![
                Recti::min_max(self.left(), self.bottom(), self.right(), line),
                Recti::min_max(self.left(), line, self.right(), self.top()),
            ]
        } else {
            vec![self]
        }
    }

    /// Split into `lines.len() + 1` pieces along sorted cut lines.
    ///
    /// Lines are expected to lie inside the rectangle's span on the cut
    /// axis; lines outside it produce degenerate pieces.
    pub fn multi_cut(self, vertical_cut: bool, lines: &[i32]) -> Vec<Recti> {
        if lines.is_empty() {
            return vec![self];
        }
        let mut lines = lines.to_vec();
        lines.sort_unstable();

        let cut_axis = if vertical_cut { 0 } else { 1 };
        let cut_max = self.max().axis(cut_axis);
        let cut_min = self.min().axis(cut_axis);

        let mut regions = Vec::with_capacity(lines.len() + 1);
        let mut pos = self.position;
        let mut size = self.size.with_axis(cut_axis, lines[0] - cut_min);
        regions.push(Recti::from_pos_size(pos, size));

        for (i, &line) in lines.iter().enumerate() {
            let next_line = lines.get(i + 1).copied().unwrap_or(cut_max);
            pos = pos.with_axis(cut_axis, pos.axis(cut_axis) + size.axis(cut_axis));
            size = size.with_axis(cut_axis, next_line - line);
            regions.push(Recti::from_pos_size(pos, size));
        }

        regions
    }

    /// The rectangle's x range as a segment.
    pub fn x_span(self) -> Segment1i {
        Segment1i::ordered(self.x_min(), self.x_max())
    }

    /// The rectangle's y range as a segment.
    pub fn y_span(self) -> Segment1i {
        Segment1i::ordered(self.y_min(), self.y_max())
    }

    /// Whether a line segment lies on one of the four border lines and
    /// numerically overlaps it.
    pub fn overlaps_edge(self, line: Segment1i, other_axis: i32, is_vertical: bool) -> bool {
        if is_vertical {
            (other_axis == self.left() || other_axis == self.right() - 1)
                && line.overlaps(self.y_span())
        } else {
            (other_axis == self.bottom() || other_axis == self.top() - 1)
                && line.overlaps(self.x_span())
        }
    }

    /// Whether any border line of `other` coincides with and overlaps one
    /// of this rectangle's border lines. Distinguishes touching edges
    /// from plain overlap or containment.
    pub fn overlaps_edge_rect(self, other: Recti) -> bool {
        let h = other.x_span();
        let v = other.y_span();
        self.overlaps_edge(h, other.bottom(), false)
            || self.overlaps_edge(v, other.left(), true)
            || self.overlaps_edge(h, other.top() - 1, false)
            || self.overlaps_edge(v, other.right() - 1, true)
    }

    /// The corner reached going CCW past the given side.
    pub fn corner_after(self, side: Dir) -> Vec2i {
        match side {
            Dir::E => self.top_right(),
            Dir::N => self.top_left(),
            Dir::W => self.bottom_left(),
            Dir::S => self.bottom_right(),
        }
    }

    /// One side of the rectangle with its cells in CCW order.
    ///
    /// `skip_tail` drops the final cell of the side, which makes walking
    /// all four sides cover the perimeter without duplicating corners.
    pub fn side_on(self, dir: Dir, skip_tail: bool) -> RectSide {
        let seg = Segment1i::ordered;
        match dir {
            Dir::E => RectSide::new(
                dir,
                seg(self.y_min(), if skip_tail { self.y_max() - 1 } else { self.y_max() }),
                self.x_max() - 1,
            ),
            Dir::N => RectSide::new(
                dir,
                seg(if skip_tail { self.x_min() + 1 } else { self.x_min() }, self.x_max()),
                self.y_max() - 1,
            ),
            Dir::S => RectSide::new(
                dir,
                seg(self.x_min(), if skip_tail { self.x_max() - 1 } else { self.x_max() }),
                self.y_min(),
            ),
            Dir::W => RectSide::new(
                dir,
                seg(if skip_tail { self.y_min() + 1 } else { self.y_min() }, self.y_max()),
                self.x_min(),
            ),
        }
    }

    /// All contained cells, x outer and y inner.
    ///
    /// This matches the layout of [`crate::grid::Grid`] storage, so
    /// zipping with a grid's linear iteration lines up.
    pub fn cells(self) -> RectCells {
        let mut curr = self.position;
        if self.size.x <= 0 || self.size.y <= 0 {
            // Empty on either axis: start exhausted.
            curr.x = self.right();
        }
        RectCells { rect: self, curr }
    }
}

impl fmt::Display for Recti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.position, self.size)
    }
}

/// Iterator over a rectangle's cells, see [`Recti::cells`].
#[derive(Debug, Clone)]
pub struct RectCells {
    rect: Recti,
    curr: Vec2i,
}

impl Iterator for RectCells {
    type Item = Vec2i;

    fn next(&mut self) -> Option<Vec2i> {
        if self.curr.x >= self.rect.right() {
            return None;
        }
        let cell = self.curr;
        self.curr.y += 1;
        if self.curr.y >= self.rect.top() {
            self.curr.y = self.rect.bottom();
            self.curr.x += 1;
        }
        Some(cell)
    }
}
