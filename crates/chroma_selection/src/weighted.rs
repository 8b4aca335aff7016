//! # Weighted Table
//!
//! Picks one item from a list of `(item, weight)` pairs with probability
//! proportional to its weight: `P(item_i) = weight_i / total`.
//!
//! The walk subtracts weights from a single uniform draw over
//! `[0, total)`, so one entropy consumption decides the pick regardless of
//! table size.

use chroma_core::RandomSource;

use crate::error::{SelectionError, SelectionResult};

/// A list of weighted entries supporting probability-proportional picks.
#[derive(Clone, Debug)]
pub struct WeightedTable<T> {
    /// The `(item, weight)` entries, in declaration order.
    entries: Vec<(T, f32)>,
}

impl<T> WeightedTable<T> {
    /// Creates a table from `(item, weight)` pairs.
    ///
    /// Weights must be non-negative and finite; violating this is a
    /// configuration error caught by the config layer.
    #[must_use]
    pub fn new(entries: Vec<(T, f32)>) -> Self {
        debug_assert!(
            entries.iter().all(|(_, w)| w.is_finite() && *w >= 0.0),
            "weights must be non-negative and finite"
        );
        Self { entries }
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[(T, f32)] {
        &self.entries
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.entries.iter().map(|(_, w)| *w).sum()
    }

    /// Picks an entry with probability proportional to its weight.
    ///
    /// Consumes exactly one draw from `rng`. Zero-weight entries are never
    /// selected while any positive weight exists.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::EmptyTable`] if the table has no entries
    /// - [`SelectionError::ZeroTotalWeight`] if no weight is positive
    pub fn pick(&self, rng: &mut dyn RandomSource) -> SelectionResult<&T> {
        if self.entries.is_empty() {
            return Err(SelectionError::EmptyTable);
        }
        let total = self.total_weight();
        if !total.is_finite() || total <= 0.0 {
            return Err(SelectionError::ZeroTotalWeight);
        }

        let mut remainder = rng.next_float(0.0, total);
        for (item, weight) in &self.entries {
            if *weight <= 0.0 {
                continue;
            }
            remainder -= weight;
            if remainder <= 0.0 {
                return Ok(item);
            }
        }

        // With remainder drawn below the total the walk always terminates;
        // float error can leave a sliver, in which case the last weighted
        // entry takes it.
        let (item, _) = self
            .entries
            .iter()
            .rfind(|(_, w)| *w > 0.0)
            .ok_or(SelectionError::ZeroTotalWeight)?;
        Ok(item)
    }
}
