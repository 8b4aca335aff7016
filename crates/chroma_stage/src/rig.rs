//! # Observer Rig
//!
//! The follow proxy the window brackets. It chases a target upward at a
//! bounded panning speed and never moves down on its own; the streamer
//! reads its position once per tick and writes to it only during a rebase.
//!
//! Decoupling the window from the raw target position means a fast-moving
//! target pulls the rig smoothly instead of teleporting the window.

/// Vertical follow proxy with bounded panning speed.
#[derive(Clone, Copy, Debug)]
pub struct ObserverRig {
    /// Current vertical position.
    y: f32,
    /// Remaining distance to climb toward the last observed target.
    height_goal: f32,
    /// Maximum climb per second.
    pan_speed: f32,
}

impl ObserverRig {
    /// Creates a rig at `start_y` with the given panning speed.
    #[must_use]
    pub const fn new(pan_speed: f32, start_y: f32) -> Self {
        Self {
            y: start_y,
            height_goal: 0.0,
            pan_speed,
        }
    }

    /// Current vertical position.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Raises the height goal when the target has moved above it.
    ///
    /// A target below the rig never lowers the goal; the rig only climbs.
    pub fn observe(&mut self, target_y: f32) {
        if target_y > self.y + self.height_goal {
            self.height_goal = target_y - self.y;
        }
    }

    /// Advances toward the height goal by at most `pan_speed * dt`.
    pub fn advance(&mut self, dt: f32) {
        if self.height_goal > 0.0 {
            let dy = (self.pan_speed * dt).min(self.height_goal);
            self.height_goal -= dy;
            self.y += dy;
        }
    }

    /// Moves back to `y` and drops any pending goal. Used on stage reset.
    pub fn reset_to(&mut self, y: f32) {
        self.y = y;
        self.height_goal = 0.0;
    }

    /// Shifts the rig down during a window rebase.
    ///
    /// The height goal is relative and therefore unaffected.
    pub fn shift_down(&mut self, distance: f32) {
        self.y -= distance;
    }
}
