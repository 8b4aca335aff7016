//! # CHROMA Selection
//!
//! Constrained weighted-random selection, shared by segment spawning and
//! color assignment.
//!
//! ## Core Components
//!
//! - [`WeightedTable`]: picks an item with probability proportional to its
//!   weight
//! - [`ColorPalette`]: uniform color pick with an exclusion rule (never
//!   repeat a given color unless it is the only candidate) and a
//!   Fisher-Yates shuffle
//! - [`ObstacleColorSet`]: assigns each sub-part of an obstacle a distinct
//!   color, cycling when sub-parts outnumber colors
//!
//! ## Error Model
//!
//! Empty tables and palettes are configuration bugs, not runtime failures:
//! they are reported through `tracing` and degrade to "no result" or the
//! sentinel [`chroma_core::GameColor::INVALID`] instead of panicking.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod obstacle;
pub mod palette;
pub mod weighted;

pub use error::{SelectionError, SelectionResult};
pub use obstacle::ObstacleColorSet;
pub use palette::ColorPalette;
pub use weighted::WeightedTable;
