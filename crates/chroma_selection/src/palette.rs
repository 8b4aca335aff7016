//! # Color Palette
//!
//! The canonical set of gameplay colors, loaded once from configuration and
//! read-only at runtime. Supplies uniform picks with an exclusion rule and a
//! Fisher-Yates shuffle.
//!
//! The exclusion rule keeps the puzzle solvable: a color switch never hands
//! the player the color they already have - unless it is the only color
//! configured, in which case the pick degrades to a plain uniform pick so a
//! single-color palette still always succeeds.

use chroma_core::{GameColor, RandomSource};

/// Ordered, read-only sequence of the available gameplay colors.
#[derive(Clone, Debug, Default)]
pub struct ColorPalette {
    /// The configured colors, in declaration order.
    colors: Vec<GameColor>,
}

impl ColorPalette {
    /// Creates a palette from configured colors.
    ///
    /// The palette must be non-empty in a correctly configured system; an
    /// empty palette degrades every pick to [`GameColor::INVALID`].
    #[must_use]
    pub fn new(colors: Vec<GameColor>) -> Self {
        if colors.is_empty() {
            tracing::warn!("color palette configured empty; picks will return the sentinel");
        }
        Self { colors }
    }

    /// The configured colors in declaration order.
    #[must_use]
    pub fn colors(&self) -> &[GameColor] {
        &self.colors
    }

    /// Number of configured colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if no colors are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns a uniformly random color.
    ///
    /// An empty palette is reported and yields [`GameColor::INVALID`].
    #[must_use]
    pub fn pick_any(&self, rng: &mut dyn RandomSource) -> GameColor {
        self.pick_excluding(rng, None)
    }

    /// Returns a uniformly random color, avoiding `exception` when possible.
    ///
    /// The exception is honored only if it is present in the palette (by id)
    /// and at least one other color exists; otherwise this is a plain
    /// uniform pick. An empty palette is reported and yields
    /// [`GameColor::INVALID`].
    #[must_use]
    pub fn pick_excluding(
        &self,
        rng: &mut dyn RandomSource,
        exception: Option<GameColor>,
    ) -> GameColor {
        Self::pick_excluding_from(&self.colors, rng, exception)
    }

    /// Exclusion pick over a caller-supplied color list.
    ///
    /// Used when a pickup limits the viable colors to those an upcoming
    /// obstacle actually uses; same exclusion rule as
    /// [`ColorPalette::pick_excluding`].
    #[must_use]
    pub fn pick_excluding_from(
        colors: &[GameColor],
        rng: &mut dyn RandomSource,
        exception: Option<GameColor>,
    ) -> GameColor {
        if colors.is_empty() {
            tracing::error!("color list was empty");
            return GameColor::INVALID;
        }

        let excluded =
            exception.filter(|e| colors.len() > 1 && colors.iter().any(|c| c.id == e.id));

        match excluded {
            Some(e) => {
                let candidates: Vec<GameColor> =
                    colors.iter().copied().filter(|c| c.id != e.id).collect();
                candidates[rng.next_index(candidates.len())]
            }
            None => colors[rng.next_index(colors.len())],
        }
    }

    /// Returns every configured color exactly once, in uniformly random
    /// order.
    ///
    /// Fisher-Yates on a copy; the palette's own order is never mutated.
    #[must_use]
    pub fn shuffled(&self, rng: &mut dyn RandomSource) -> Vec<GameColor> {
        let mut shuffled = self.colors.clone();
        for i in (1..shuffled.len()).rev() {
            let swap_place = rng.next_index(i + 1);
            shuffled.swap(i, swap_place);
        }
        shuffled
    }
}
