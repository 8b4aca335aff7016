//! # Segments, Templates and Catalogs
//!
//! A [`SegmentTemplate`] is an instantiable blueprint: its height places the
//! top edge (the next spawn anchor) relative to the spawn position, and its
//! successor catalog decides what may follow it. Templates and catalogs are
//! shared read-only assets referenced by stable id, never by owning
//! pointer - a template refers to *other* catalogs, which avoids
//! self-referential spawn cycles on instantiation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use chroma_core::{RandomSource, Vec2};
use chroma_selection::{SelectionError, WeightedTable};

use crate::error::{StageError, StageResult};
use crate::factory::SegmentHandle;

/// Stable identifier of a segment template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

/// Stable identifier of a spawn catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogId(pub u32);

/// Blueprint for a stage segment.
#[derive(Clone, Debug)]
pub struct SegmentTemplate {
    /// This template's id.
    pub id: TemplateId,
    /// Vertical extent from spawn anchor to top edge. Must be positive.
    pub height: f32,
    /// Catalog used to choose this segment's successor.
    pub successor: CatalogId,
    /// Declared sub-variants; exactly one is activated per spawned instance.
    /// Empty when the template has no variants.
    pub variants: Vec<String>,
}

/// Weighted list of templates that may spawn after a segment.
#[derive(Clone, Debug)]
pub struct SpawnCatalog {
    /// This catalog's id.
    id: CatalogId,
    /// Weighted template entries.
    entries: WeightedTable<TemplateId>,
}

impl SpawnCatalog {
    /// Creates a catalog from weighted template entries.
    #[must_use]
    pub fn new(id: CatalogId, entries: Vec<(TemplateId, f32)>) -> Self {
        Self {
            id,
            entries: WeightedTable::new(entries),
        }
    }

    /// This catalog's id.
    #[must_use]
    pub const fn id(&self) -> CatalogId {
        self.id
    }

    /// The weighted entries of this catalog.
    #[must_use]
    pub fn entries(&self) -> &[(TemplateId, f32)] {
        self.entries.entries()
    }

    /// Picks a template with probability proportional to its weight.
    ///
    /// # Errors
    ///
    /// [`StageError::EmptyCatalog`] when the catalog has no entries or no
    /// positive total weight; the caller must not spawn on this path.
    pub fn pick(&self, rng: &mut dyn RandomSource) -> StageResult<TemplateId> {
        self.entries.pick(rng).copied().map_err(|err| match err {
            SelectionError::EmptyTable | SelectionError::ZeroTotalWeight => {
                StageError::EmptyCatalog(self.id)
            }
        })
    }
}

/// Id-indexed registry of templates and catalogs, loaded once before
/// streaming starts and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct StageLibrary {
    /// Registered templates by id.
    templates: HashMap<TemplateId, SegmentTemplate>,
    /// Registered catalogs by id.
    catalogs: HashMap<CatalogId, SpawnCatalog>,
}

impl StageLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template, replacing any previous one with the same id.
    pub fn insert_template(&mut self, template: SegmentTemplate) {
        let _ = self.templates.insert(template.id, template);
    }

    /// Registers a catalog, replacing any previous one with the same id.
    pub fn insert_catalog(&mut self, catalog: SpawnCatalog) {
        let _ = self.catalogs.insert(catalog.id(), catalog);
    }

    /// Looks up a template by id.
    ///
    /// # Errors
    ///
    /// [`StageError::UnknownTemplate`] if the id is not registered.
    pub fn template(&self, id: TemplateId) -> StageResult<&SegmentTemplate> {
        self.templates.get(&id).ok_or(StageError::UnknownTemplate(id))
    }

    /// Looks up a catalog by id.
    ///
    /// # Errors
    ///
    /// [`StageError::UnknownCatalog`] if the id is not registered.
    pub fn catalog(&self, id: CatalogId) -> StageResult<&SpawnCatalog> {
        self.catalogs.get(&id).ok_or(StageError::UnknownCatalog(id))
    }

    /// Ids of all registered templates.
    pub fn template_ids(&self) -> impl Iterator<Item = TemplateId> + '_ {
        self.templates.keys().copied()
    }

    /// Ids of all registered catalogs.
    pub fn catalog_ids(&self) -> impl Iterator<Item = CatalogId> + '_ {
        self.catalogs.keys().copied()
    }
}

/// A live, spawned segment. Owned exclusively by the streamer's window.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    /// Handle reported by the entity factory.
    pub handle: SegmentHandle,
    /// Template this segment was spawned from.
    pub template: TemplateId,
    /// Top edge: the spawn anchor for this segment's successor.
    pub anchor_top: Vec2,
    /// Catalog used to choose this segment's successor.
    pub successor: CatalogId,
    /// Index of the sub-variant activated at spawn, if the template
    /// declares any.
    pub variant: Option<usize>,
}
