//! # CHROMA Core
//!
//! Leaf types shared by every other crate in the workspace.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: all randomness flows through [`RandomSource`],
//!    so a seeded run replays identically
//! 2. **Value data**: colors and vectors are small `Copy` types
//! 3. **No game logic**: selection and streaming live in their own crates
//!
//! ## Core Components
//!
//! - [`Vec2`]: 2D position math
//! - [`GameColor`]: gameplay color with display value and sentinel
//! - [`RandomSource`]: pluggable entropy provider

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod color;
pub mod math;
pub mod rng;

pub use color::{GameColor, Rgba};
pub use math::Vec2;
pub use rng::{RandomSource, ScriptedSource, SeededSource};
