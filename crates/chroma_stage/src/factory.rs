//! # Segment Factory Seam
//!
//! Entity creation and destruction is an external collaborator: the engine
//! (or a test harness) implements [`SegmentFactory`], and the streamer only
//! stores the opaque handles it returns. [`RecordingFactory`] is the
//! in-memory implementation used by tests and the headless simulation.

use std::collections::HashMap;

use chroma_core::Vec2;

use crate::segment::{SegmentTemplate, TemplateId};

/// Opaque handle to a spawned segment instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentHandle(pub u64);

/// Creation/destruction seam for segment instances.
pub trait SegmentFactory {
    /// Instantiates `template` at `position` and returns its handle.
    fn spawn(&mut self, template: &SegmentTemplate, position: Vec2) -> SegmentHandle;

    /// Destroys a previously spawned instance.
    fn destroy(&mut self, handle: SegmentHandle);
}

/// In-memory factory that tracks live instances.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    /// Next handle value.
    next_handle: u64,
    /// Live instances by handle.
    live: HashMap<SegmentHandle, (TemplateId, Vec2)>,
    /// Total instances ever spawned.
    spawned_total: u64,
    /// Total instances destroyed.
    destroyed_total: u64,
}

impl RecordingFactory {
    /// Creates an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently live instances.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Returns true if `handle` refers to a live instance.
    #[must_use]
    pub fn is_live(&self, handle: SegmentHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Total instances ever spawned.
    #[must_use]
    pub const fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Total instances destroyed.
    #[must_use]
    pub const fn destroyed_total(&self) -> u64 {
        self.destroyed_total
    }
}

impl SegmentFactory for RecordingFactory {
    fn spawn(&mut self, template: &SegmentTemplate, position: Vec2) -> SegmentHandle {
        let handle = SegmentHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.spawned_total += 1;
        let _ = self.live.insert(handle, (template.id, position));
        handle
    }

    fn destroy(&mut self, handle: SegmentHandle) {
        if self.live.remove(&handle).is_some() {
            self.destroyed_total += 1;
        } else {
            tracing::warn!(handle = handle.0, "destroy of unknown segment handle");
        }
    }
}
