//! # Stage Streamer
//!
//! The orchestrator of the endless stage. Each tick, against the observer
//! rig's current position, it:
//!
//! 1. **Cleanup** - retires segments whose top edge fell below
//!    `y_obs - cleanup_threshold`, strictly oldest-first
//! 2. **Fill** - seeds the window from the first-segment catalog when it is
//!    empty, then spawns at most ONE segment at the newest top edge while
//!    the window trails `y_obs + fill_threshold` (amortized fill: the
//!    window catches up across ticks at bounded per-tick cost)
//! 3. **Rebase** - once `y_obs` passes the reset threshold, shifts the rig
//!    and every live segment down by `y_obs` in one atomic step, keeping
//!    absolute coordinates near the origin over arbitrarily long sessions
//!
//! This order is load-bearing: rebase runs last so both thresholds are
//! evaluated against pre-rebase values within the same tick, and cleanup
//! runs before fill so the window cannot grow on a tick where both apply.

use std::collections::VecDeque;

use chroma_core::{RandomSource, Vec2};

use crate::error::StageResult;
use crate::factory::SegmentFactory;
use crate::rig::ObserverRig;
use crate::segment::{CatalogId, Segment, StageLibrary};

/// Per-instance streaming thresholds and anchors. Static input, loaded
/// before `start()` and never mutated by the streamer.
#[derive(Clone, Copy, Debug)]
pub struct StreamerConfig {
    /// How far above the rig the window is filled.
    pub fill_threshold: f32,
    /// How far below the rig segments are retired.
    pub cleanup_threshold: f32,
    /// Rig height that triggers a whole-window rebase.
    pub position_reset_threshold: f32,
    /// Where the first segment of a fresh stage spawns.
    pub base_anchor: Vec2,
    /// Catalog used for the first segment (and for re-seeding an emptied
    /// window).
    pub first_catalog: CatalogId,
}

/// What a single tick did to the window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Segments retired by cleanup.
    pub retired: usize,
    /// Segments spawned by fill (seed included).
    pub spawned: usize,
    /// Distance subtracted from every tracked coordinate, if a rebase ran.
    /// The caller must shift its own entities (the player) by the same
    /// amount.
    pub rebase_shift: Option<f32>,
}

/// Streaming state: no window is maintained while idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamerState {
    /// No active window; `start()` transitions out.
    Idle,
    /// Window maintained every tick; `reset()` transitions out.
    Active,
}

/// The streaming controller. Owns the live window exclusively.
#[derive(Debug)]
pub struct StageStreamer {
    /// Streaming thresholds and anchors.
    config: StreamerConfig,
    /// Live segments, oldest (lowest) first. Ordered by spawn time, which
    /// equals ascending top edges by construction; never re-sorted.
    window: VecDeque<Segment>,
    /// Current state.
    state: StreamerState,
}

impl StageStreamer {
    /// Creates an idle streamer.
    #[must_use]
    pub fn new(config: StreamerConfig) -> Self {
        Self {
            config,
            window: VecDeque::new(),
            state: StreamerState::Idle,
        }
    }

    /// The configured thresholds and anchors.
    #[must_use]
    pub const fn config(&self) -> &StreamerConfig {
        &self.config
    }

    /// Returns true while a window is being maintained.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == StreamerState::Active
    }

    /// Live segments, oldest first.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.window.iter()
    }

    /// Number of live segments.
    #[must_use]
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Starts a fresh stage: clears any residual window, moves the rig to
    /// the base anchor, seeds one segment from the first catalog and runs
    /// one fill pass.
    ///
    /// A failed seed (misconfigured catalog) is reported and leaves the
    /// window empty; the next tick retries.
    pub fn start(
        &mut self,
        library: &StageLibrary,
        factory: &mut dyn SegmentFactory,
        rng: &mut dyn RandomSource,
        rig: &mut ObserverRig,
    ) -> TickReport {
        self.clear(factory);
        rig.reset_to(self.config.base_anchor.y);
        self.state = StreamerState::Active;

        let spawned = self.fill(library, factory, rng, rig.y());
        tracing::info!(spawned, "stage started");
        TickReport {
            retired: 0,
            spawned,
            rebase_shift: None,
        }
    }

    /// One frame of streaming. No-op while idle.
    pub fn tick(
        &mut self,
        library: &StageLibrary,
        factory: &mut dyn SegmentFactory,
        rng: &mut dyn RandomSource,
        rig: &mut ObserverRig,
    ) -> TickReport {
        if self.state != StreamerState::Active {
            return TickReport::default();
        }

        // Read the rig once; all three steps of this tick see the same
        // pre-rebase value.
        let y_obs = rig.y();

        let retired = self.cleanup(factory, y_obs);
        let spawned = self.fill(library, factory, rng, y_obs);
        let rebase_shift = self.rebase(rig, y_obs);

        TickReport {
            retired,
            spawned,
            rebase_shift,
        }
    }

    /// Destroys every live segment, clears the window, returns the rig to
    /// the base anchor and goes idle. Total and synchronous: no entity
    /// outlives this call.
    pub fn reset(&mut self, factory: &mut dyn SegmentFactory, rig: &mut ObserverRig) {
        self.clear(factory);
        rig.reset_to(self.config.base_anchor.y);
        self.state = StreamerState::Idle;
        tracing::info!("stage reset");
    }

    /// Retires segments whose top edge fell below the cleanup line,
    /// strictly oldest-first. The boundary is exclusive.
    fn cleanup(&mut self, factory: &mut dyn SegmentFactory, y_obs: f32) -> usize {
        let line = y_obs - self.config.cleanup_threshold;
        let mut retired = 0;
        while self.window.front().is_some_and(|s| s.anchor_top.y < line) {
            if let Some(segment) = self.window.pop_front() {
                factory.destroy(segment.handle);
                tracing::debug!(
                    handle = segment.handle.0,
                    top = segment.anchor_top.y,
                    "segment retired"
                );
                retired += 1;
            }
        }
        retired
    }

    /// Seeds an empty window, then spawns at most one segment toward the
    /// fill line. A failed catalog pick aborts the fill for this tick; the
    /// window is left exactly as it was and the next tick retries.
    fn fill(
        &mut self,
        library: &StageLibrary,
        factory: &mut dyn SegmentFactory,
        rng: &mut dyn RandomSource,
        y_obs: f32,
    ) -> usize {
        let mut spawned = 0;

        if self.window.is_empty() {
            match self.spawn_from(self.config.first_catalog, self.config.base_anchor, library, factory, rng)
            {
                Ok(()) => spawned += 1,
                Err(err) => {
                    tracing::error!(%err, "seed spawn aborted");
                    return spawned;
                }
            }
        }

        let newest = self.window.back().map(|s| (s.successor, s.anchor_top));
        if let Some((catalog, anchor)) = newest {
            if anchor.y < y_obs + self.config.fill_threshold {
                match self.spawn_from(catalog, anchor, library, factory, rng) {
                    Ok(()) => spawned += 1,
                    Err(err) => tracing::error!(%err, "fill spawn aborted"),
                }
            }
        }

        spawned
    }

    /// Spawns one segment from `catalog` at `anchor` and appends it.
    fn spawn_from(
        &mut self,
        catalog: CatalogId,
        anchor: Vec2,
        library: &StageLibrary,
        factory: &mut dyn SegmentFactory,
        rng: &mut dyn RandomSource,
    ) -> StageResult<()> {
        let template_id = library.catalog(catalog)?.pick(rng)?;
        let template = library.template(template_id)?;

        let handle = factory.spawn(template, anchor);
        let variant = if template.variants.is_empty() {
            None
        } else {
            Some(rng.next_index(template.variants.len()))
        };
        let segment = Segment {
            handle,
            template: template.id,
            anchor_top: anchor + Vec2::new(0.0, template.height),
            successor: template.successor,
            variant,
        };

        debug_assert!(
            self.window
                .back()
                .map_or(true, |last| last.anchor_top.y <= segment.anchor_top.y),
            "window must stay ordered by ascending top edges"
        );

        tracing::debug!(
            handle = handle.0,
            template = template.id.0,
            top = segment.anchor_top.y,
            ?variant,
            "segment spawned"
        );
        self.window.push_back(segment);
        Ok(())
    }

    /// Shifts every tracked coordinate down by `y_obs` once the rig passes
    /// the reset threshold. Relative positions are preserved exactly.
    fn rebase(&mut self, rig: &mut ObserverRig, y_obs: f32) -> Option<f32> {
        if y_obs <= self.config.position_reset_threshold {
            return None;
        }
        rig.shift_down(y_obs);
        for segment in &mut self.window {
            segment.anchor_top.y -= y_obs;
        }
        tracing::info!(shift = y_obs, "window rebased toward origin");
        Some(y_obs)
    }

    /// Destroys and drops every live segment.
    fn clear(&mut self, factory: &mut dyn SegmentFactory) {
        for segment in self.window.drain(..) {
            factory.destroy(segment.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::RecordingFactory;
    use crate::segment::{SegmentTemplate, SpawnCatalog, TemplateId};
    use chroma_core::SeededSource;

    const MAIN: CatalogId = CatalogId(0);

    fn library_with(height: f32) -> StageLibrary {
        let mut library = StageLibrary::new();
        library.insert_template(SegmentTemplate {
            id: TemplateId(1),
            height,
            successor: MAIN,
            variants: Vec::new(),
        });
        library.insert_catalog(SpawnCatalog::new(MAIN, vec![(TemplateId(1), 1.0)]));
        library
    }

    fn config() -> StreamerConfig {
        StreamerConfig {
            fill_threshold: 10.0,
            cleanup_threshold: 20.0,
            position_reset_threshold: 400.0,
            base_anchor: Vec2::ZERO,
            first_catalog: MAIN,
        }
    }

    fn harness(height: f32) -> (StageStreamer, StageLibrary, RecordingFactory, SeededSource, ObserverRig)
    {
        (
            StageStreamer::new(config()),
            library_with(height),
            RecordingFactory::new(),
            SeededSource::from_seed(9),
            ObserverRig::new(1000.0, 0.0),
        )
    }

    #[test]
    fn test_idle_tick_is_a_noop() {
        let (mut streamer, library, mut factory, mut rng, mut rig) = harness(2.0);
        let report = streamer.tick(&library, &mut factory, &mut rng, &mut rig);
        assert_eq!(report, TickReport::default());
        assert_eq!(streamer.window_len(), 0);
        assert!(!streamer.is_active());
    }

    #[test]
    fn test_start_seeds_and_fills_once() {
        let (mut streamer, library, mut factory, mut rng, mut rig) = harness(2.0);
        let report = streamer.start(&library, &mut factory, &mut rng, &mut rig);
        assert!(streamer.is_active());
        // Seed plus one amortized fill spawn.
        assert_eq!(report.spawned, 2);
        assert_eq!(streamer.window_len(), 2);
        assert_eq!(factory.live_count(), 2);
    }

    #[test]
    fn test_fill_is_amortized_one_spawn_per_tick() {
        let (mut streamer, library, mut factory, mut rng, mut rig) = harness(2.0);
        let _ = streamer.start(&library, &mut factory, &mut rng, &mut rig);

        // Far below the fill line: each tick adds exactly one segment until
        // the window catches up to y_obs + 10.
        let mut below_line = true;
        while below_line {
            let report = streamer.tick(&library, &mut factory, &mut rng, &mut rig);
            assert!(report.spawned <= 1, "amortized fill spawns at most one");
            below_line = report.spawned == 1;
        }

        let newest = streamer.segments().last().unwrap().anchor_top.y;
        assert!(newest >= rig.y() + 10.0);
    }

    #[test]
    fn test_window_stays_ordered() {
        let (mut streamer, library, mut factory, mut rng, mut rig) = harness(2.0);
        let _ = streamer.start(&library, &mut factory, &mut rng, &mut rig);
        for _ in 0..200 {
            rig.observe(rig.y() + 1.5);
            rig.advance(1.0 / 60.0);
            let _ = streamer.tick(&library, &mut factory, &mut rng, &mut rig);

            let anchors: Vec<f32> = streamer.segments().map(|s| s.anchor_top.y).collect();
            assert!(
                anchors.windows(2).all(|w| w[0] <= w[1]),
                "anchors must be non-decreasing front to back: {anchors:?}"
            );
        }
    }

    #[test]
    fn test_cleanup_boundary_is_exclusive() {
        let (mut streamer, library, mut factory, mut rng, _) = harness(100.0);
        // One 100-high segment; cleanup threshold 20.
        let mut rig = ObserverRig::new(0.0, 0.0);
        let _ = streamer.start(&library, &mut factory, &mut rng, &mut rig);
        let first = streamer.segments().next().unwrap().handle;
        assert!((streamer.segments().next().unwrap().anchor_top.y - 100.0).abs() < f32::EPSILON);

        // Exactly on the line: 100 < 120 - 20 is false, nothing retires.
        rig.reset_to(120.0);
        let report = streamer.tick(&library, &mut factory, &mut rng, &mut rig);
        assert_eq!(report.retired, 0);
        assert!(factory.is_live(first));

        // Just past the line: the segment retires and the factory is told.
        rig.reset_to(120.01);
        let report = streamer.tick(&library, &mut factory, &mut rng, &mut rig);
        assert_eq!(report.retired, 1);
        assert!(!factory.is_live(first));
    }

    #[test]
    fn test_rebase_is_exact_and_preserves_distances() {
        let library = library_with(2.0);
        // Cleanup disabled so every pre-rebase anchor survives to compare.
        let mut streamer = StageStreamer::new(StreamerConfig {
            cleanup_threshold: 10_000.0,
            ..config()
        });
        let mut factory = RecordingFactory::new();
        let mut rng = SeededSource::from_seed(9);
        let mut rig = ObserverRig::new(0.0, 0.0);
        let _ = streamer.start(&library, &mut factory, &mut rng, &mut rig);

        // Build some window, then push the rig past the reset threshold.
        rig.reset_to(500.0);
        // Threshold comparisons this tick still see y_obs = 500.
        let before: Vec<f32> = streamer.segments().map(|s| s.anchor_top.y).collect();
        let report = streamer.tick(&library, &mut factory, &mut rng, &mut rig);

        assert_eq!(report.rebase_shift, Some(500.0));
        assert!((rig.y() - 0.0).abs() < f32::EPSILON);

        let after: Vec<f32> = streamer.segments().map(|s| s.anchor_top.y).collect();
        // Segments spawned by this tick's fill step also got shifted; only
        // compare the ones that existed before.
        for (b, a) in before.iter().zip(after.iter()) {
            assert!((b - a - 500.0).abs() < 1e-3, "each anchor drops by exactly 500");
        }
        for pair in after.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_empty_catalog_skips_fill_without_crashing() {
        let mut library = StageLibrary::new();
        library.insert_catalog(SpawnCatalog::new(MAIN, vec![]));
        let mut streamer = StageStreamer::new(config());
        let mut factory = RecordingFactory::new();
        let mut rng = SeededSource::from_seed(1);
        let mut rig = ObserverRig::new(0.0, 0.0);

        let report = streamer.start(&library, &mut factory, &mut rng, &mut rig);
        assert_eq!(report.spawned, 0);
        assert_eq!(streamer.window_len(), 0);
        assert!(streamer.is_active());

        // Retried (and still failing) every tick; never panics, never spawns.
        for _ in 0..10 {
            let report = streamer.tick(&library, &mut factory, &mut rng, &mut rig);
            assert_eq!(report.spawned, 0);
        }
        assert_eq!(factory.spawned_total(), 0);
    }

    #[test]
    fn test_reset_destroys_everything() {
        let (mut streamer, library, mut factory, mut rng, mut rig) = harness(2.0);
        let _ = streamer.start(&library, &mut factory, &mut rng, &mut rig);
        assert!(factory.live_count() > 0);

        streamer.reset(&mut factory, &mut rig);
        assert!(!streamer.is_active());
        assert_eq!(streamer.window_len(), 0);
        assert_eq!(factory.live_count(), 0);
        assert!((rig.y() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_start_clears_residual_window() {
        let (mut streamer, library, mut factory, mut rng, mut rig) = harness(2.0);
        let _ = streamer.start(&library, &mut factory, &mut rng, &mut rig);
        let first_run: Vec<_> = streamer.segments().map(|s| s.handle).collect();

        let _ = streamer.start(&library, &mut factory, &mut rng, &mut rig);
        for handle in first_run {
            assert!(!factory.is_live(handle), "residual segments must be destroyed");
        }
        assert_eq!(factory.live_count(), streamer.window_len());
    }

    #[test]
    fn test_variant_chosen_when_declared() {
        let mut library = StageLibrary::new();
        library.insert_template(SegmentTemplate {
            id: TemplateId(1),
            height: 2.0,
            successor: MAIN,
            variants: vec!["left".into(), "right".into(), "gap".into()],
        });
        library.insert_catalog(SpawnCatalog::new(MAIN, vec![(TemplateId(1), 1.0)]));

        let mut streamer = StageStreamer::new(config());
        let mut factory = RecordingFactory::new();
        let mut rng = SeededSource::from_seed(77);
        let mut rig = ObserverRig::new(0.0, 0.0);
        let _ = streamer.start(&library, &mut factory, &mut rng, &mut rig);

        let mut seen = [false; 3];
        for _ in 0..300 {
            rig.reset_to(rig.y() + 2.0);
            let _ = streamer.tick(&library, &mut factory, &mut rng, &mut rig);
            for segment in streamer.segments() {
                let variant = segment.variant.expect("template declares variants");
                assert!(variant < 3);
                seen[variant] = true;
            }
        }
        assert!(seen.iter().all(|s| *s), "every variant should be reachable");
    }
}
