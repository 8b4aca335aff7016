//! # CHROMA Stage
//!
//! An effectively infinite vertical stage over bounded memory and bounded
//! floating-point range.
//!
//! ## Design Principles
//!
//! 1. **Streamed**: segments spawn just ahead of the observer and retire
//!    far behind it; the live window stays small
//! 2. **Amortized**: at most one spawn per tick beyond the initial seed,
//!    so per-tick cost is bounded even when the window lags
//! 3. **Rebased**: once the observer passes the reset threshold, every
//!    tracked coordinate shifts toward the origin in one atomic step,
//!    preserving all relative distances
//!
//! ## Core Components
//!
//! - [`StageLibrary`]: id-indexed segment templates and spawn catalogs
//! - [`SegmentFactory`]: the entity creation/destruction seam
//! - [`ObserverRig`]: the follow proxy whose position the window brackets
//! - [`StageStreamer`]: the per-tick cleanup / fill / rebase orchestrator

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod factory;
pub mod rig;
pub mod segment;
pub mod streamer;

pub use error::{StageError, StageResult};
pub use factory::{RecordingFactory, SegmentFactory, SegmentHandle};
pub use rig::ObserverRig;
pub use segment::{CatalogId, Segment, SegmentTemplate, SpawnCatalog, StageLibrary, TemplateId};
pub use streamer::{StageStreamer, StreamerConfig, TickReport};
