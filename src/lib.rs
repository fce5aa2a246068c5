//! Deterministic building blocks for procedural 2D grid content:
//! - WELL-512 RNG with explicit, resumable state
//! - Direction algebra (4-way, 8-way, flag sets, quarter-turn rotations)
//! - Integer geometry (vectors, segments, half-open rectangles)
//! - Dense and bit-packed grids
//! - Weighted random selection
//!
//! Everything is engine-independent and reproducible: given the same
//! seed or captured RNG state, every algorithm built on this crate
//! produces the same output, bit for bit.

pub mod direction;
pub mod geometry;
pub mod grid;
pub mod logging;
pub mod rng;
pub mod selection;

pub use direction::{Dir, Dir8, DirFlags, Rot4};
pub use geometry::{Recti, Segment1i, Segment2i, Vec2i};
pub use grid::{BitGrid, FlagGrid, Grid};
pub use rng::{RngState, Well512};
pub use selection::WeightedSelection;
