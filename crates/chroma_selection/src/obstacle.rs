//! # Obstacle Color Set
//!
//! An obstacle is made of sub-parts (e.g. the four arcs of a ring), each of
//! which must carry a gameplay color. The assignment is built once at
//! obstacle creation from a shuffled copy of the palette:
//!
//! - more colors than sub-parts: the shuffled list is truncated, so each
//!   part gets a distinct color
//! - more sub-parts than colors: parts cycle round-robin through the
//!   shuffled list, repeating only after every color has been used
//!
//! The deduplicated `used` list doubles as the viable-color set for a color
//! switch placed before the obstacle.

use chroma_core::{GameColor, RandomSource};

use crate::palette::ColorPalette;

/// The per-part color assignment of one obstacle, fixed at creation.
#[derive(Clone, Debug)]
pub struct ObstacleColorSet {
    /// The shuffled (and possibly truncated) colors this obstacle draws on.
    used: Vec<GameColor>,
    /// One color per sub-part, round-robin over `used`.
    parts: Vec<GameColor>,
}

impl ObstacleColorSet {
    /// Builds the assignment for an obstacle with `part_count` sub-parts.
    ///
    /// An empty palette is reported and assigns the sentinel
    /// [`GameColor::INVALID`] to every part.
    #[must_use]
    pub fn assign(
        palette: &ColorPalette,
        rng: &mut dyn RandomSource,
        part_count: usize,
    ) -> Self {
        let mut used = palette.shuffled(rng);
        if used.len() > part_count {
            used.truncate(part_count);
        }

        if used.is_empty() && part_count > 0 {
            tracing::error!("obstacle created against an empty color palette");
        }

        let parts = if used.is_empty() {
            vec![GameColor::INVALID; part_count]
        } else {
            (0..part_count).map(|i| used[i % used.len()]).collect()
        };

        Self { used, parts }
    }

    /// Number of sub-parts this assignment covers.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// The color assigned to one sub-part.
    #[must_use]
    pub fn part_color(&self, part: usize) -> Option<GameColor> {
        self.parts.get(part).copied()
    }

    /// All per-part colors in part order.
    #[must_use]
    pub fn parts(&self) -> &[GameColor] {
        &self.parts
    }

    /// The distinct colors this obstacle uses, in shuffled order.
    ///
    /// A color switch preceding this obstacle limits its pick to these.
    #[must_use]
    pub fn used_colors(&self) -> &[GameColor] {
        &self.used
    }
}
