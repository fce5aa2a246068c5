//! Weighted random selection over an item list.
//!
//! Weights are folded into a running cumulative sum, so drawing is a
//! binary search. Items with non-positive weight are dropped up front;
//! a selection with zero total weight cannot be constructed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::Well512;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    #[error("total weight is zero, nothing to select")]
    ZeroTotalWeight,
    #[error("sample {sample} outside [1, {total}]")]
    SampleOutOfRange { sample: i32, total: i32 },
    #[error("weight table is inconsistent with its items")]
    InvalidWeightTable,
}

/// Items paired with a strictly increasing cumulative weight table.
///
/// Invariant: `weight_cdf[i] == weights[0] + .. + weights[i]` and
/// `total_weights == *weight_cdf.last() > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WeightedSelectionRaw<T>")]
pub struct WeightedSelection<T> {
    items: Vec<T>,
    weights: Vec<i32>,
    weight_cdf: Vec<i32>,
    total_weights: i32,
}

/// Unvalidated mirror of [`WeightedSelection`]; deserialization
/// re-checks the CDF invariant so a crafted table cannot skew draws.
#[derive(Deserialize)]
struct WeightedSelectionRaw<T> {
    items: Vec<T>,
    weights: Vec<i32>,
    weight_cdf: Vec<i32>,
    total_weights: i32,
}

impl<T> TryFrom<WeightedSelectionRaw<T>> for WeightedSelection<T> {
    type Error = SelectionError;

    fn try_from(raw: WeightedSelectionRaw<T>) -> Result<WeightedSelection<T>, SelectionError> {
        if raw.weights.len() != raw.items.len() || raw.weight_cdf.len() != raw.items.len() {
            return Err(SelectionError::InvalidWeightTable);
        }
        let mut running = 0i32;
        for (&weight, &cum) in raw.weights.iter().zip(&raw.weight_cdf) {
            if weight <= 0 {
                return Err(SelectionError::InvalidWeightTable);
            }
            running += weight;
            if cum != running {
                return Err(SelectionError::InvalidWeightTable);
            }
        }
        // An emptied selection (everything removed) is a valid state.
        if raw.total_weights != running {
            return Err(SelectionError::InvalidWeightTable);
        }
        Ok(WeightedSelection {
            items: raw.items,
            weights: raw.weights,
            weight_cdf: raw.weight_cdf,
            total_weights: raw.total_weights,
        })
    }
}

impl<T> WeightedSelection<T> {
    /// Build a selection, weighing each item with `weight_fn`.
    ///
    /// Items weighted zero or less are discarded.
    pub fn new(
        items: impl IntoIterator<Item = T>,
        weight_fn: impl Fn(&T) -> i32,
    ) -> Result<WeightedSelection<T>, SelectionError> {
        let mut kept = Vec::new();
        let mut weights = Vec::new();
        let mut weight_cdf = Vec::new();
        let mut total = 0i32;
        let mut dropped = 0usize;

        for item in items {
            let weight = weight_fn(&item);
            if weight <= 0 {
                dropped += 1;
                continue;
            }
            total += weight;
            kept.push(item);
            weights.push(weight);
            weight_cdf.push(total);
        }

        if dropped > 0 {
            tracing::debug!(dropped, "discarded non-positive weight items");
        }
        if total <= 0 {
            return Err(SelectionError::ZeroTotalWeight);
        }

        Ok(WeightedSelection {
            items: kept,
            weights,
            weight_cdf,
            total_weights: total,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_weights(&self) -> i32 {
        self.total_weights
    }

    pub fn weight(&self, index: usize) -> i32 {
        self.weights[index]
    }

    /// Index of the item owning `sample`, for `sample` in `[1, total]`.
    ///
    /// The item at index `i` owns the sample range
    /// `(weight_cdf[i-1], weight_cdf[i]]`.
    pub fn select_sample(&self, sample: i32) -> Result<usize, SelectionError> {
        if sample < 1 || sample > self.total_weights {
            return Err(SelectionError::SampleOutOfRange {
                sample,
                total: self.total_weights,
            });
        }
        Ok(self.weight_cdf.partition_point(|&cum| cum < sample))
    }

    /// Draw a weighted random index.
    pub fn select(&self, rng: &mut Well512) -> usize {
        // total_weights > 0 at construction; drawing from a selection
        // emptied by remove() is a caller error.
        let sample = rng.next_int_range(self.total_weights) + 1;
        self.weight_cdf.partition_point(|&cum| cum < sample)
    }

    /// Draw a weighted random item.
    pub fn select_item(&self, rng: &mut Well512) -> &T {
        &self.items[self.select(rng)]
    }

    /// Remove an item, deducting its weight from the table.
    ///
    /// The selection may end up empty; drawing from it afterwards is a
    /// caller error.
    pub fn remove(&mut self, index: usize) -> T {
        let weight = self.weights.remove(index);
        self.weight_cdf.remove(index);
        for cum in &mut self.weight_cdf[index..] {
            *cum -= weight;
        }
        self.total_weights -= weight;
        self.items.remove(index)
    }
}
