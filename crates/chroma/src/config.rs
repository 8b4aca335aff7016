//! # Stage Configuration
//!
//! Declarative TOML surface for a whole stage: streaming thresholds, the
//! color palette, segment templates and spawn catalogs. A [`StageFile`] is
//! parsed once at startup and validated into a [`StageSetup`], the runtime
//! triple of library, palette and streamer config. Validation is total:
//! every id reference must resolve and every numeric field must be usable,
//! so nothing after [`StageFile::build`] needs to re-check the data.

use serde::Deserialize;

use chroma_core::{GameColor, Rgba, Vec2};
use chroma_selection::ColorPalette;
use chroma_stage::{
    CatalogId, SegmentTemplate, SpawnCatalog, StageLibrary, StreamerConfig, TemplateId,
};

use crate::error::{GameError, GameResult};

/// Streaming thresholds and rig parameters, `[stage]` in the file.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct StageParams {
    /// How far above the rig the window is filled.
    pub fill_threshold: f32,
    /// How far below the rig segments are retired.
    pub cleanup_threshold: f32,
    /// Rig height that triggers a whole-window rebase.
    pub position_reset_threshold: f32,
    /// Maximum rig climb per second.
    pub pan_speed: f32,
    /// Where the first segment of a fresh stage spawns.
    pub base_anchor: Vec2,
}

/// One `[[color]]` entry.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ColorDef {
    /// Stable gameplay id. Must be unique and non-negative.
    pub id: i32,
    /// Display value.
    pub value: Rgba,
}

/// One `[[template]]` entry.
#[derive(Clone, Debug, Deserialize)]
pub struct TemplateDef {
    /// Stable template id. Must be unique.
    pub id: u32,
    /// Vertical extent. Must be positive and finite.
    pub height: f32,
    /// Catalog that picks this template's successor.
    pub successor: u32,
    /// Declared sub-variants, if any.
    #[serde(default)]
    pub variants: Vec<String>,
}

/// One weighted entry of a `[[catalog]]`.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CatalogEntryDef {
    /// Referenced template id.
    pub template: u32,
    /// Spawn weight. Must be finite and non-negative.
    pub weight: f32,
}

/// One `[[catalog]]` entry.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogDef {
    /// Stable catalog id. Must be unique.
    pub id: u32,
    /// Weighted template entries. Total weight must be positive.
    pub entries: Vec<CatalogEntryDef>,
}

/// A parsed stage file, schema-checked but not yet cross-validated.
#[derive(Clone, Debug, Deserialize)]
pub struct StageFile {
    /// Seed for the deterministic random source.
    pub seed: u64,
    /// Catalog used for the first segment of a fresh stage.
    pub first_catalog: u32,
    /// Streaming thresholds and rig parameters.
    pub stage: StageParams,
    /// The color palette, in declaration order.
    #[serde(default, rename = "color")]
    pub colors: Vec<ColorDef>,
    /// Segment templates.
    #[serde(default, rename = "template")]
    pub templates: Vec<TemplateDef>,
    /// Spawn catalogs.
    #[serde(default, rename = "catalog")]
    pub catalogs: Vec<CatalogDef>,
}

/// The validated runtime assets a stage file describes.
#[derive(Clone, Debug)]
pub struct StageSetup {
    /// Templates and catalogs, fully cross-referenced.
    pub library: StageLibrary,
    /// The gameplay color palette.
    pub palette: ColorPalette,
    /// Streaming thresholds and anchors.
    pub streamer_config: StreamerConfig,
    /// Maximum rig climb per second.
    pub pan_speed: f32,
    /// Seed for the deterministic random source.
    pub seed: u64,
}

impl StageFile {
    /// Parses a stage file from TOML text.
    ///
    /// # Errors
    ///
    /// [`GameError::Parse`] when the text is not valid TOML for this schema.
    pub fn from_toml(text: &str) -> GameResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Cross-validates the file and builds the runtime assets.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidConfig`] naming the first violated constraint:
    /// duplicate or negative ids, non-positive heights, unusable weights,
    /// dangling template/catalog references or a missing first catalog.
    pub fn build(&self) -> GameResult<StageSetup> {
        self.check_stage_params()?;
        let palette = self.build_palette()?;
        let library = self.build_library()?;

        if library.catalog(CatalogId(self.first_catalog)).is_err() {
            return Err(invalid(format!(
                "first_catalog {} is not a declared catalog",
                self.first_catalog
            )));
        }

        let setup = StageSetup {
            library,
            palette,
            streamer_config: StreamerConfig {
                fill_threshold: self.stage.fill_threshold,
                cleanup_threshold: self.stage.cleanup_threshold,
                position_reset_threshold: self.stage.position_reset_threshold,
                base_anchor: self.stage.base_anchor,
                first_catalog: CatalogId(self.first_catalog),
            },
            pan_speed: self.stage.pan_speed,
            seed: self.seed,
        };
        tracing::info!(
            colors = self.colors.len(),
            templates = self.templates.len(),
            catalogs = self.catalogs.len(),
            seed = self.seed,
            "stage configuration validated"
        );
        Ok(setup)
    }

    fn check_stage_params(&self) -> GameResult<()> {
        let p = &self.stage;
        for (name, v) in [
            ("fill_threshold", p.fill_threshold),
            ("cleanup_threshold", p.cleanup_threshold),
            ("position_reset_threshold", p.position_reset_threshold),
            ("pan_speed", p.pan_speed),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(invalid(format!("stage.{name} must be finite and positive, got {v}")));
            }
        }
        if !p.base_anchor.x.is_finite() || !p.base_anchor.y.is_finite() {
            return Err(invalid("stage.base_anchor must be finite".to_owned()));
        }
        Ok(())
    }

    fn build_palette(&self) -> GameResult<ColorPalette> {
        if self.colors.is_empty() {
            return Err(invalid("at least one color must be declared".to_owned()));
        }
        let mut seen = std::collections::HashSet::new();
        for color in &self.colors {
            if color.id < 0 {
                return Err(invalid(format!("color id {} is negative", color.id)));
            }
            if !seen.insert(color.id) {
                return Err(invalid(format!("color id {} declared twice", color.id)));
            }
        }
        Ok(ColorPalette::new(
            self.colors
                .iter()
                .map(|c| GameColor::new(c.id, c.value))
                .collect(),
        ))
    }

    fn build_library(&self) -> GameResult<StageLibrary> {
        let mut library = StageLibrary::new();

        let mut template_ids = std::collections::HashSet::new();
        for template in &self.templates {
            if !template_ids.insert(template.id) {
                return Err(invalid(format!("template id {} declared twice", template.id)));
            }
            if !template.height.is_finite() || template.height <= 0.0 {
                return Err(invalid(format!(
                    "template {} height must be finite and positive, got {}",
                    template.id, template.height
                )));
            }
            library.insert_template(SegmentTemplate {
                id: TemplateId(template.id),
                height: template.height,
                successor: CatalogId(template.successor),
                variants: template.variants.clone(),
            });
        }

        let mut catalog_ids = std::collections::HashSet::new();
        for catalog in &self.catalogs {
            if !catalog_ids.insert(catalog.id) {
                return Err(invalid(format!("catalog id {} declared twice", catalog.id)));
            }
            let mut total = 0.0_f32;
            for entry in &catalog.entries {
                if !entry.weight.is_finite() || entry.weight < 0.0 {
                    return Err(invalid(format!(
                        "catalog {} entry for template {} has unusable weight {}",
                        catalog.id, entry.template, entry.weight
                    )));
                }
                if !template_ids.contains(&entry.template) {
                    return Err(invalid(format!(
                        "catalog {} references undeclared template {}",
                        catalog.id, entry.template
                    )));
                }
                total += entry.weight;
            }
            if total <= 0.0 {
                return Err(invalid(format!(
                    "catalog {} has no positive total weight",
                    catalog.id
                )));
            }
            library.insert_catalog(SpawnCatalog::new(
                CatalogId(catalog.id),
                catalog
                    .entries
                    .iter()
                    .map(|e| (TemplateId(e.template), e.weight))
                    .collect(),
            ));
        }

        // Successor references are checked after all catalogs are known, so
        // declaration order in the file does not matter.
        for template in &self.templates {
            if !catalog_ids.contains(&template.successor) {
                return Err(invalid(format!(
                    "template {} references undeclared successor catalog {}",
                    template.id, template.successor
                )));
            }
        }

        Ok(library)
    }
}

fn invalid(message: String) -> GameError {
    GameError::InvalidConfig(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
seed = 42
first_catalog = 0

[stage]
fill_threshold = 30.0
cleanup_threshold = 20.0
position_reset_threshold = 200.0
pan_speed = 50.0
base_anchor = { x = 0.0, y = 0.0 }

[[color]]
id = 0
value = { r = 1.0, g = 0.2, b = 0.2, a = 1.0 }

[[color]]
id = 1
value = { r = 0.2, g = 0.4, b = 1.0, a = 1.0 }

[[template]]
id = 1
height = 6.0
successor = 0
variants = ["left", "right"]

[[template]]
id = 2
height = 9.0
successor = 0

[[catalog]]
id = 0
entries = [{ template = 1, weight = 3.0 }, { template = 2, weight = 1.0 }]
"#;

    fn with_line(extra: &str) -> String {
        format!("{VALID}\n{extra}")
    }

    #[test]
    fn test_valid_file_builds() {
        let setup = StageFile::from_toml(VALID).unwrap().build().unwrap();
        assert_eq!(setup.seed, 42);
        assert_eq!(setup.palette.len(), 2);
        assert_eq!(setup.library.template_ids().count(), 2);
        assert_eq!(setup.streamer_config.first_catalog, CatalogId(0));
        assert!((setup.pan_speed - 50.0).abs() < f32::EPSILON);
        // Optional variants list defaults to empty.
        let plain = setup.library.template(TemplateId(2)).unwrap();
        assert!(plain.variants.is_empty());
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = StageFile::from_toml("seed = ").unwrap_err();
        assert!(matches!(err, GameError::Parse(_)));
    }

    #[test]
    fn test_missing_first_catalog_rejected() {
        let file = StageFile::from_toml(&VALID.replace("first_catalog = 0", "first_catalog = 9"))
            .unwrap();
        let err = file.build().unwrap_err();
        assert!(err.to_string().contains("first_catalog 9"));
    }

    #[test]
    fn test_duplicate_color_id_rejected() {
        let extra = "[[color]]\nid = 1\nvalue = { r = 0.0, g = 0.0, b = 0.0, a = 1.0 }";
        let err = StageFile::from_toml(&with_line(extra)).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn test_negative_color_id_rejected() {
        let extra = "[[color]]\nid = -3\nvalue = { r = 0.0, g = 0.0, b = 0.0, a = 1.0 }";
        let err = StageFile::from_toml(&with_line(extra)).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn test_nonpositive_height_rejected() {
        let file = StageFile::from_toml(&VALID.replace("height = 6.0", "height = 0.0")).unwrap();
        let err = file.build().unwrap_err();
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn test_dangling_catalog_entry_rejected() {
        let extra = "[[catalog]]\nid = 1\nentries = [{ template = 99, weight = 1.0 }]";
        let err = StageFile::from_toml(&with_line(extra)).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("undeclared template 99"));
    }

    #[test]
    fn test_dangling_successor_rejected() {
        let extra = "[[template]]\nid = 3\nheight = 4.0\nsuccessor = 12";
        let err = StageFile::from_toml(&with_line(extra)).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("successor catalog 12"));
    }

    #[test]
    fn test_zero_total_weight_rejected() {
        let file = StageFile::from_toml(VALID).unwrap();
        let file = StageFile {
            catalogs: vec![CatalogDef {
                id: 0,
                entries: vec![
                    CatalogEntryDef { template: 1, weight: 0.0 },
                    CatalogEntryDef { template: 2, weight: 0.0 },
                ],
            }],
            ..file
        };
        let err = file.build().unwrap_err();
        assert!(err.to_string().contains("no positive total weight"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let file = StageFile::from_toml(&VALID.replace("weight = 3.0", "weight = -1.0")).unwrap();
        let err = file.build().unwrap_err();
        assert!(err.to_string().contains("unusable weight"));
    }

    #[test]
    fn test_nonpositive_threshold_rejected() {
        let file =
            StageFile::from_toml(&VALID.replace("pan_speed = 50.0", "pan_speed = 0.0")).unwrap();
        let err = file.build().unwrap_err();
        assert!(err.to_string().contains("pan_speed"));
    }
}
