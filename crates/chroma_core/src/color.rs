//! Gameplay color values.
//!
//! A [`GameColor`] pairs a stable id (what gameplay compares) with an opaque
//! display value (what rendering glue applies). Id `-1` is the reserved
//! sentinel returned only on configuration errors such as an empty palette;
//! it never matches a real color.

use serde::{Deserialize, Serialize};

/// Opaque display value of a color, in linear RGBA.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
    /// Alpha channel (0.0 - 1.0)
    pub a: f32,
}

impl Rgba {
    /// Creates a new opaque color value.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
}

/// A color as gameplay sees it: matched by id, displayed by value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameColor {
    /// Stable id used for gameplay matching.
    pub id: i32,
    /// Display value applied by external rendering glue.
    pub value: Rgba,
}

impl GameColor {
    /// Sentinel returned on configuration errors (empty palette).
    ///
    /// Never matches any real color and must never be used as a valid
    /// gameplay match.
    pub const INVALID: Self = Self {
        id: -1,
        value: Rgba::WHITE,
    };

    /// Creates a new color.
    #[must_use]
    pub const fn new(id: i32, value: Rgba) -> Self {
        Self { id, value }
    }

    /// Returns true if this is a real, configured color.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.id >= 0
    }

    /// Gameplay equality: colors match by id, not by display value.
    #[must_use]
    pub const fn matches(self, other: Self) -> bool {
        self.id == other.id
    }
}
