//! # CHROMA
//!
//! The game crate: configuration, events and the session state machine on
//! top of the selection and streaming subsystems.
//!
//! ## Core Components
//!
//! - [`StageFile`]: declarative TOML stage description, validated into the
//!   runtime library/palette/config triple
//! - [`EventBus`]: synchronous pub-sub with explicit unsubscribe handles
//!   and deterministic delivery order
//! - [`GameSession`]: stars, player color, pickups and the single terminal
//!   death transition

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod events;
pub mod session;

pub use config::{StageFile, StageSetup};
pub use error::{GameError, GameResult};
pub use events::{EventBus, GameEvent, SubscriptionId};
pub use session::{GameSession, PickupDescriptor, PickupKind, SessionState};
