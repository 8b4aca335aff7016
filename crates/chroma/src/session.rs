//! # Game Session
//!
//! The run state machine on top of the streaming and selection subsystems:
//! player color, star count, pickups and the single terminal death
//! transition. The session owns the bus and publishes every state change
//! through it; external glue (rendering, audio, UI) subscribes instead of
//! polling.
//!
//! Death is one-shot by construction: the state check and the transition
//! happen in the same method, so no sequence of collisions can publish
//! [`GameEvent::PlayerDied`] twice in one run.

use chroma_core::{GameColor, RandomSource};
use chroma_selection::ColorPalette;
use chroma_stage::{
    ObserverRig, SegmentFactory, StageLibrary, StageStreamer, TickReport,
};

use crate::config::StageSetup;
use crate::events::{EventBus, GameEvent};

/// Where a run currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No run active; `start()` transitions out.
    Idle,
    /// A run is in progress.
    Running,
    /// The run ended; only `reset()` transitions out.
    GameOver,
}

/// What a pickup does when collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupKind {
    /// Increments the star count.
    Star,
    /// Re-rolls the player color.
    ColorSwitch,
}

/// A collectible placed in the stage by external glue.
///
/// The viable-color list is resolved when the pickup is placed, not when it
/// is collected: a switch in front of an obstacle offers only the colors
/// that obstacle actually uses.
#[derive(Clone, Debug)]
pub struct PickupDescriptor {
    /// What collecting this pickup does.
    pub kind: PickupKind,
    /// For a color switch, the colors it may hand out. `None` means the
    /// whole palette is viable.
    pub color_limit: Option<Vec<GameColor>>,
}

/// One playable run: stage streaming, player color, stars and death.
pub struct GameSession {
    /// Shared read-only stage assets.
    library: StageLibrary,
    /// The gameplay color palette.
    palette: ColorPalette,
    /// The streaming controller.
    streamer: StageStreamer,
    /// The follow proxy the window brackets.
    rig: ObserverRig,
    /// Synchronous event bus.
    bus: EventBus,
    /// Current run state.
    state: SessionState,
    /// The player's vertical position, in the same rebased frame as the
    /// window.
    player_y: f32,
    /// The player's current color.
    player_color: GameColor,
    /// Stars collected this run.
    stars: u32,
}

impl GameSession {
    /// Creates an idle session from validated stage assets.
    #[must_use]
    pub fn new(setup: StageSetup) -> Self {
        let base_y = setup.streamer_config.base_anchor.y;
        Self {
            library: setup.library,
            palette: setup.palette,
            streamer: StageStreamer::new(setup.streamer_config),
            rig: ObserverRig::new(setup.pan_speed, base_y),
            bus: EventBus::new(),
            state: SessionState::Idle,
            player_y: base_y,
            player_color: GameColor::INVALID,
            stars: 0,
        }
    }

    /// Current run state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Stars collected this run.
    #[must_use]
    pub const fn stars(&self) -> u32 {
        self.stars
    }

    /// The player's current color.
    #[must_use]
    pub const fn player_color(&self) -> GameColor {
        self.player_color
    }

    /// The player's vertical position.
    #[must_use]
    pub const fn player_y(&self) -> f32 {
        self.player_y
    }

    /// The gameplay color palette.
    #[must_use]
    pub const fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// The streaming controller, for window inspection.
    #[must_use]
    pub const fn streamer(&self) -> &StageStreamer {
        &self.streamer
    }

    /// The observer rig.
    #[must_use]
    pub const fn rig(&self) -> &ObserverRig {
        &self.rig
    }

    /// The event bus, for subscribing external glue.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Starts a fresh run: streams the first segments, places the player at
    /// the base anchor with a random color and zeroes the stars.
    ///
    /// Publishes [`GameEvent::StarCountChanged`] with the reset count, then
    /// [`GameEvent::GameStarted`].
    pub fn start(&mut self, factory: &mut dyn SegmentFactory, rng: &mut dyn RandomSource) {
        let report = self.streamer.start(&self.library, factory, rng, &mut self.rig);
        self.player_y = self.streamer.config().base_anchor.y;
        self.player_color = self.palette.pick_any(rng);
        self.stars = 0;
        self.state = SessionState::Running;

        tracing::info!(
            spawned = report.spawned,
            color = self.player_color.id,
            "run started"
        );
        self.bus.publish(&GameEvent::StarCountChanged(0));
        self.bus.publish(&GameEvent::GameStarted);
    }

    /// Moves the player vertically. Ignored outside a running session.
    pub fn move_player(&mut self, dy: f32) {
        if self.state == SessionState::Running {
            self.player_y += dy;
        }
    }

    /// One frame: the rig chases the player, the window is maintained, and
    /// a rebase shifts the player by the same distance as the window.
    pub fn tick(
        &mut self,
        dt: f32,
        factory: &mut dyn SegmentFactory,
        rng: &mut dyn RandomSource,
    ) -> TickReport {
        if self.state != SessionState::Running {
            return TickReport::default();
        }

        self.rig.observe(self.player_y);
        self.rig.advance(dt);
        let report = self.streamer.tick(&self.library, factory, rng, &mut self.rig);
        if let Some(shift) = report.rebase_shift {
            self.player_y -= shift;
        }
        report
    }

    /// The player touched an obstacle part of the given color.
    ///
    /// A matching color is harmless. A mismatch ends the run: the state
    /// flips to game over and [`GameEvent::PlayerDied`] then
    /// [`GameEvent::GameOver`] fire exactly once. Further collisions after
    /// the run ended are no-ops.
    pub fn collide_with_part(&mut self, part_color: GameColor) {
        if self.state != SessionState::Running || self.player_color.matches(part_color) {
            return;
        }
        self.state = SessionState::GameOver;
        tracing::info!(
            player = self.player_color.id,
            part = part_color.id,
            stars = self.stars,
            "player died on color mismatch"
        );
        self.bus.publish(&GameEvent::PlayerDied);
        self.bus.publish(&GameEvent::GameOver);
    }

    /// The player collected a pickup. Ignored outside a running session.
    ///
    /// A star increments the count and publishes the new total. A color
    /// switch re-rolls the player color over the pickup's viable list (or
    /// the whole palette), never handing back the current color unless it
    /// is the only one viable.
    pub fn collect(&mut self, pickup: &PickupDescriptor, rng: &mut dyn RandomSource) {
        if self.state != SessionState::Running {
            return;
        }
        match pickup.kind {
            PickupKind::Star => {
                self.stars += 1;
                self.bus.publish(&GameEvent::StarCountChanged(self.stars));
            }
            PickupKind::ColorSwitch => {
                let exception = Some(self.player_color);
                let next = match &pickup.color_limit {
                    Some(viable) => ColorPalette::pick_excluding_from(viable, rng, exception),
                    None => self.palette.pick_excluding(rng, exception),
                };
                if next.is_valid() {
                    tracing::debug!(from = self.player_color.id, to = next.id, "color switched");
                    self.player_color = next;
                }
            }
        }
    }

    /// Tears the run down: destroys every live segment, returns the rig and
    /// player to the base anchor and goes idle. Star count survives until
    /// the next `start()` so end screens can read it.
    pub fn reset(&mut self, factory: &mut dyn SegmentFactory) {
        self.streamer.reset(factory, &mut self.rig);
        self.player_y = self.streamer.config().base_anchor.y;
        self.state = SessionState::Idle;
    }
}
