//! Dense 2D grids: generic cell storage, bit-packed boolean masks, and
//! the flag-plus-payload combination of the two.
//!
//! All grids share the same shape contract: `width * height` cells
//! addressed by [`Vec2i`] over `[0, w) x [0, h)`. Enumeration order is
//! x-outer, y-inner. Direct indexing panics out of range; `try_get` is
//! the non-failing accessor and is what new call sites should reach for.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Recti, Vec2i};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("incompatible grid dimensions: {a} vs {b}")]
    DimensionMismatch { a: Vec2i, b: Vec2i },
    #[error("grid dimensions must be non-negative: {size}")]
    NegativeSize { size: Vec2i },
    #[error("grid data length {got} does not match the {expected} cells implied by the dimensions")]
    DataLength { expected: usize, got: usize },
    #[error("bit grid blocks do not match {width}x{height} cells")]
    InvalidBitBlocks { width: i32, height: i32 },
}

/// Dense 2D array of `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRaw<T>")]
pub struct Grid<T> {
    size: Vec2i,
    // x-major so that linear order matches cell enumeration order.
    data: Vec<T>,
}

/// Unvalidated mirror of [`Grid`]; deserialization routes through
/// [`Grid::from_vec`] so the shape invariant survives crafted input.
#[derive(Deserialize)]
struct GridRaw<T> {
    size: Vec2i,
    data: Vec<T>,
}

impl<T> TryFrom<GridRaw<T>> for Grid<T> {
    type Error = GridError;

    fn try_from(raw: GridRaw<T>) -> Result<Grid<T>, GridError> {
        Grid::from_vec(raw.size.x, raw.size.y, raw.data)
    }
}

impl<T: Default + Clone> Grid<T> {
    pub fn new(width: i32, height: i32) -> Grid<T> {
        Grid::filled(width, height, T::default())
    }

    pub fn square(side: i32) -> Grid<T> {
        Grid::new(side, side)
    }

    /// Reset every cell to the default value.
    pub fn clear(&mut self) {
        self.fill(T::default());
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: i32, height: i32, value: T) -> Grid<T> {
        assert!(width >= 0 && height >= 0, "grid dimensions must be non-negative");
        Grid {
            size: Vec2i::new(width, height),
            data: vec![value; (width * height) as usize],
        }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    /// Adopt existing cell data, in x-major order (all of column 0's
    /// cells bottom to top, then column 1, ...).
    pub fn from_vec(width: i32, height: i32, data: Vec<T>) -> Result<Grid<T>, GridError> {
        let size = Vec2i::new(width, height);
        if width < 0 || height < 0 {
            return Err(GridError::NegativeSize { size });
        }
        let expected = (width * height) as usize;
        if data.len() != expected {
            return Err(GridError::DataLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Grid { size, data })
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn size(&self) -> Vec2i {
        self.size
    }

    pub fn total_cells(&self) -> usize {
        self.data.len()
    }

    /// The grid's own coordinate space as a rectangle at the origin.
    pub fn local_region(&self) -> Recti {
        Recti::from_pos_size(Vec2i::ZERO, self.size)
    }

    pub fn contains(&self, v: Vec2i) -> bool {
        self.local_region().contains(v)
    }

    fn offset(&self, v: Vec2i) -> usize {
        v.x as usize * self.size.y as usize + v.y as usize
    }

    /// Value at `v`, or `None` outside the grid. Never panics.
    pub fn try_get(&self, v: Vec2i) -> Option<&T> {
        if self.contains(v) {
            Some(&self.data[self.offset(v)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, v: Vec2i) -> Option<&mut T> {
        if self.contains(v) {
            let i = self.offset(v);
            Some(&mut self.data[i])
        } else {
            None
        }
    }

    pub fn set(&mut self, v: Vec2i, value: T) {
        assert!(self.contains(v), "cell {v} outside {}x{} grid", self.size.x, self.size.y);
        let i = self.offset(v);
        self.data[i] = value;
    }

    /// Cell values in enumeration order (x outer, y inner).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Coordinates paired with values, in enumeration order.
    pub fn cells(&self) -> impl Iterator<Item = (Vec2i, &T)> {
        self.local_region().cells().zip(self.data.iter())
    }
}

impl<T> Index<Vec2i> for Grid<T> {
    type Output = T;

    fn index(&self, v: Vec2i) -> &T {
        assert!(self.contains(v), "cell {v} outside {}x{} grid", self.size.x, self.size.y);
        &self.data[self.offset(v)]
    }
}

impl<T> IndexMut<Vec2i> for Grid<T> {
    fn index_mut(&mut self, v: Vec2i) -> &mut T {
        assert!(self.contains(v), "cell {v} outside {}x{} grid", self.size.x, self.size.y);
        let i = self.offset(v);
        &mut self.data[i]
    }
}

impl<T> Index<(i32, i32)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (i32, i32)) -> &T {
        &self[Vec2i::new(x, y)]
    }
}

impl<T> IndexMut<(i32, i32)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (i32, i32)) -> &mut T {
        &mut self[Vec2i::new(x, y)]
    }
}

impl<T: fmt::Display> fmt::Display for Grid<T> {
    /// Rows top-down so the printout matches the conventional
    /// y-up orientation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.size.y).rev() {
            for x in 0..self.size.x {
                write!(f, "{}\t", self[Vec2i::new(x, y)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

const BLOCK_BITS: usize = u64::BITS as usize;

/// Bit-packed boolean grid.
///
/// Bits beyond `width * height` in the last block are kept zero so that
/// whole-grid operations like [`BitGrid::count_set_bits`] stay exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BitGridRaw")]
pub struct BitGrid {
    size: Vec2i,
    blocks: Vec<u64>,
}

/// Unvalidated mirror of [`BitGrid`]; deserialization checks the block
/// count and rejects stray bits past the last cell.
#[derive(Deserialize)]
struct BitGridRaw {
    size: Vec2i,
    blocks: Vec<u64>,
}

impl TryFrom<BitGridRaw> for BitGrid {
    type Error = GridError;

    fn try_from(raw: BitGridRaw) -> Result<BitGrid, GridError> {
        let size = raw.size;
        if size.x < 0 || size.y < 0 {
            return Err(GridError::NegativeSize { size });
        }
        let bits = (size.x * size.y) as usize;
        let invalid = GridError::InvalidBitBlocks {
            width: size.x,
            height: size.y,
        };
        if raw.blocks.len() != bits.div_ceil(BLOCK_BITS) {
            return Err(invalid);
        }
        let used = bits % BLOCK_BITS;
        if used != 0 {
            let tail = raw.blocks.last().copied().unwrap_or(0);
            if tail & !((1u64 << used) - 1) != 0 {
                return Err(invalid);
            }
        }
        Ok(BitGrid {
            size,
            blocks: raw.blocks,
        })
    }
}

impl BitGrid {
    pub fn new(width: i32, height: i32) -> BitGrid {
        assert!(width >= 0 && height >= 0, "grid dimensions must be non-negative");
        let bits = (width * height) as usize;
        BitGrid {
            size: Vec2i::new(width, height),
            blocks: vec![0; bits.div_ceil(BLOCK_BITS)],
        }
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn size(&self) -> Vec2i {
        self.size
    }

    pub fn total_cells(&self) -> usize {
        (self.size.x * self.size.y) as usize
    }

    pub fn local_region(&self) -> Recti {
        Recti::from_pos_size(Vec2i::ZERO, self.size)
    }

    pub fn contains(&self, v: Vec2i) -> bool {
        self.local_region().contains(v)
    }

    fn bit_index(&self, v: Vec2i) -> usize {
        v.y as usize * self.size.x as usize + v.x as usize
    }

    pub fn get(&self, v: Vec2i) -> bool {
        assert!(self.contains(v), "cell {v} outside {}x{} grid", self.size.x, self.size.y);
        let bit = self.bit_index(v);
        self.blocks[bit / BLOCK_BITS] >> (bit % BLOCK_BITS) & 1 != 0
    }

    pub fn try_get(&self, v: Vec2i) -> Option<bool> {
        if self.contains(v) {
            Some(self.get(v))
        } else {
            None
        }
    }

    pub fn set(&mut self, v: Vec2i, value: bool) {
        assert!(self.contains(v), "cell {v} outside {}x{} grid", self.size.x, self.size.y);
        let bit = self.bit_index(v);
        let mask = 1u64 << (bit % BLOCK_BITS);
        if value {
            self.blocks[bit / BLOCK_BITS] |= mask;
        } else {
            self.blocks[bit / BLOCK_BITS] &= !mask;
        }
    }

    pub fn set_all(&mut self, value: bool) {
        self.blocks.fill(if value { !0 } else { 0 });
        if value {
            self.clear_tail();
        }
    }

    pub fn and(&mut self, other: &BitGrid) -> Result<(), GridError> {
        self.combine(other, |a, b| a & b)
    }

    pub fn or(&mut self, other: &BitGrid) -> Result<(), GridError> {
        self.combine(other, |a, b| a | b)
    }

    pub fn xor(&mut self, other: &BitGrid) -> Result<(), GridError> {
        self.combine(other, |a, b| a ^ b)
    }

    pub fn not(&mut self) {
        for block in &mut self.blocks {
            *block = !*block;
        }
        self.clear_tail();
    }

    pub fn count_set_bits(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }

    fn combine(&mut self, other: &BitGrid, op: impl Fn(u64, u64) -> u64) -> Result<(), GridError> {
        if self.size != other.size {
            return Err(GridError::DimensionMismatch {
                a: self.size,
                b: other.size,
            });
        }
        for (a, b) in self.blocks.iter_mut().zip(&other.blocks) {
            *a = op(*a, *b);
        }
        Ok(())
    }

    fn clear_tail(&mut self) {
        let used = self.total_cells() % BLOCK_BITS;
        if used != 0 {
            if let Some(last) = self.blocks.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

impl fmt::Display for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.size.y).rev() {
            for x in 0..self.size.x {
                write!(f, "{}", if self.get(Vec2i::new(x, y)) { '1' } else { '0' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A [`BitGrid`] with a payload slot per flagged cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlagGridRaw<T>")]
pub struct FlagGrid<T> {
    bits: BitGrid,
    items: Grid<T>,
}

/// Unvalidated mirror of [`FlagGrid`]; the halves validate themselves,
/// this only checks that they agree on the shape.
#[derive(Deserialize)]
struct FlagGridRaw<T> {
    bits: BitGrid,
    items: Grid<T>,
}

impl<T> TryFrom<FlagGridRaw<T>> for FlagGrid<T> {
    type Error = GridError;

    fn try_from(raw: FlagGridRaw<T>) -> Result<FlagGrid<T>, GridError> {
        if raw.bits.size() != raw.items.size() {
            return Err(GridError::DimensionMismatch {
                a: raw.bits.size(),
                b: raw.items.size(),
            });
        }
        Ok(FlagGrid {
            bits: raw.bits,
            items: raw.items,
        })
    }
}

impl<T: Default + Clone> FlagGrid<T> {
    pub fn new(width: i32, height: i32) -> FlagGrid<T> {
        FlagGrid {
            bits: BitGrid::new(width, height),
            items: Grid::new(width, height),
        }
    }

    /// Flag a cell and store its payload.
    pub fn insert(&mut self, v: Vec2i, item: T) {
        self.bits.set(v, true);
        self.items.set(v, item);
    }

    /// Unflag a cell, returning the payload if one was present.
    pub fn remove(&mut self, v: Vec2i) -> Option<T> {
        if !self.bits.get(v) {
            return None;
        }
        self.bits.set(v, false);
        self.items
            .get_mut(v)
            .map(|slot| std::mem::take(&mut *slot))
    }
}

impl<T> FlagGrid<T> {
    pub fn width(&self) -> i32 {
        self.bits.width()
    }

    pub fn height(&self) -> i32 {
        self.bits.height()
    }

    pub fn bits(&self) -> &BitGrid {
        &self.bits
    }

    pub fn contains(&self, v: Vec2i) -> bool {
        self.bits.try_get(v).unwrap_or(false)
    }

    /// Payload at `v`, if the cell is flagged.
    pub fn get(&self, v: Vec2i) -> Option<&T> {
        if self.contains(v) {
            self.items.try_get(v)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.bits.count_set_bits()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flagged cells with their payloads, in bit order (y outer, x inner).
    pub fn iter(&self) -> impl Iterator<Item = (Vec2i, &T)> {
        let bits = &self.bits;
        let items = &self.items;
        (0..bits.height()).flat_map(move |y| {
            (0..bits.width()).filter_map(move |x| {
                let v = Vec2i::new(x, y);
                if bits.get(v) {
                    Some((v, &items[v]))
                } else {
                    None
                }
            })
        })
    }
}
