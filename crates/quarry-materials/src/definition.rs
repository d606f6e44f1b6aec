//! Block definition documents.
//!
//! A document is a RON file of the form `(blocks: [ ... ])`. Each record names
//! a primary id and the attributes to write for it; `data` overrides produce
//! per-variant records and `tex_direction_data` rotates the record's textures
//! for directional variants. Each record is parsed and validated on its own
//! before anything is written, so a rejected record leaves the registry
//! untouched and the rest of the document still loads.

use std::collections::BTreeMap;
use std::path::Path;

use ron::value::RawValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attributes::BlockAttributes;
use crate::face::{Compass, FaceTextures, TILE_SIZE, TexCoord, TextureDirection, rotate_to, uniform};
use crate::identifier::Identifier;
use crate::registry::{Registry, RegistryError};

/// Failure to read or parse a whole document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read definition document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse definition document: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// A single record that was rejected. The rest of the document is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("block record #{index} ({name}) has no id")]
    MissingId { index: usize, name: String },

    #[error("block record #{index} ({name}): {source}")]
    Invalid {
        index: usize,
        name: String,
        #[source]
        source: RegistryError,
    },

    #[error("block record #{index} ({name}): map colour has {channels} channels, expected 3 or 4")]
    BadColor {
        index: usize,
        name: String,
        channels: usize,
    },

    #[error("block record #{index} ({name}): texture tile ({column}, {row}) is outside the atlas")]
    TextureOutOfRange {
        index: usize,
        name: String,
        column: u16,
        row: u16,
    },

    #[error("block record #{index} is malformed: {message}")]
    Malformed { index: usize, message: String },
}

impl DefinitionError {
    /// Position of the offending record in its document.
    pub fn index(&self) -> usize {
        match self {
            DefinitionError::MissingId { index, .. }
            | DefinitionError::Invalid { index, .. }
            | DefinitionError::BadColor { index, .. }
            | DefinitionError::TextureOutOfRange { index, .. }
            | DefinitionError::Malformed { index, .. } => *index,
        }
    }
}

/// Attribute fields shared by block records and their variant overrides.
///
/// Field names follow the document format: `type` is the category,
/// `brightness`/`opacity` are light emission/absorption, `tex` is an atlas
/// tile (column, row) applied to every face.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantDefinition {
    pub name: Option<String>,
    pub aka: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub brightness: Option<u8>,
    pub opacity: Option<u8>,
    pub mapcolor: Option<Vec<u8>>,
    pub tex: Option<(u16, u16)>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tex_direction: BTreeMap<TextureDirection, (u16, u16)>,
    pub id_str: Option<String>,
}

impl VariantDefinition {
    /// Fields of `self` take precedence; anything unset falls back to `base`.
    /// A non-empty `tex_direction` replaces the base map wholesale.
    pub fn merged_over(&self, base: &VariantDefinition) -> VariantDefinition {
        VariantDefinition {
            name: self.name.clone().or_else(|| base.name.clone()),
            aka: self.aka.clone().or_else(|| base.aka.clone()),
            category: self.category.clone().or_else(|| base.category.clone()),
            brightness: self.brightness.or(base.brightness),
            opacity: self.opacity.or(base.opacity),
            mapcolor: self.mapcolor.clone().or_else(|| base.mapcolor.clone()),
            tex: self.tex.or(base.tex),
            tex_direction: if self.tex_direction.is_empty() {
                base.tex_direction.clone()
            } else {
                self.tex_direction.clone()
            },
            id_str: self.id_str.clone().or_else(|| base.id_str.clone()),
        }
    }
}

/// One `blocks` entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockDefinition {
    pub id: Option<u16>,
    pub name: Option<String>,
    pub aka: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub brightness: Option<u8>,
    pub opacity: Option<u8>,
    pub mapcolor: Option<Vec<u8>>,
    pub tex: Option<(u16, u16)>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tex_direction: BTreeMap<TextureDirection, (u16, u16)>,
    pub id_str: Option<String>,
    /// Per-variant overrides merged over the record's own fields. When empty,
    /// the record defines variant 0 (the whole family).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<u8, VariantDefinition>,
    /// Facing of directional variants.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tex_direction_data: BTreeMap<u8, Compass>,
}

impl BlockDefinition {
    /// The record's own attribute fields, without `id` or variant data.
    pub fn base(&self) -> VariantDefinition {
        VariantDefinition {
            name: self.name.clone(),
            aka: self.aka.clone(),
            category: self.category.clone(),
            brightness: self.brightness,
            opacity: self.opacity,
            mapcolor: self.mapcolor.clone(),
            tex: self.tex,
            tex_direction: self.tex_direction.clone(),
            id_str: self.id_str.clone(),
        }
    }
}

/// One entry of a document's `blocks` list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefinitionRecord {
    Block(BlockDefinition),
    /// Well-formed RON that does not fit the record shape, e.g. an id past
    /// `u16` or a string where a tile is expected.
    Malformed(String),
}

/// A parsed definition document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefinitionDocument {
    pub blocks: Vec<DefinitionRecord>,
}

/// Document shell: entries are kept as raw text and typed one at a time.
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    blocks: Vec<Box<RawValue>>,
}

impl DefinitionDocument {
    fn ron_options() -> ron::Options {
        ron::Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
    }

    /// Parses a document from RON text. Only a syntax error or a missing
    /// document shell fails the whole document.
    pub fn from_ron_str(source: &str) -> Result<Self, DocumentError> {
        let options = Self::ron_options();
        let raw: RawDocument = options.from_str(source)?;
        let blocks = raw
            .blocks
            .iter()
            .map(|entry| match options.from_str::<BlockDefinition>(entry.get_ron()) {
                Ok(def) => DefinitionRecord::Block(def),
                Err(err) => DefinitionRecord::Malformed(err.code.to_string()),
            })
            .collect();
        Ok(Self { blocks })
    }

    /// Typed records only, skipping malformed entries.
    pub fn definitions(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.blocks.iter().filter_map(|record| match record {
            DefinitionRecord::Block(def) => Some(def),
            DefinitionRecord::Malformed(_) => None,
        })
    }

    /// Reads and parses a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&source)
    }
}

/// Outcome of loading a document into a registry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Records seen.
    pub records: usize,
    /// `define_block` writes performed.
    pub defined: usize,
    /// Rejected records, in document order.
    pub failures: Vec<DefinitionError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: LoadReport) {
        self.records += other.records;
        self.defined += other.defined;
        self.failures.extend(other.failures);
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Atlas textures of a record before they are laid over the current slot.
#[derive(Clone, Debug, Default)]
struct TextureSpec {
    all: Option<TexCoord>,
    directions: Vec<(TextureDirection, TexCoord)>,
}

impl TextureSpec {
    /// `None` when the record carries no texture information at all.
    fn resolve(&self, current: FaceTextures) -> Option<FaceTextures> {
        if self.all.is_none() && self.directions.is_empty() {
            return None;
        }
        let mut faces = self.all.map(uniform).unwrap_or(current);
        for (direction, tex) in &self.directions {
            for face in direction.faces() {
                faces[face.index()] = *tex;
            }
        }
        Some(faces)
    }
}

struct PreparedVariant {
    id: Identifier,
    attrs: BlockAttributes,
    texture: TextureSpec,
}

/// A fully validated record, ready to write.
struct PreparedBlock {
    family: Identifier,
    variants: Vec<PreparedVariant>,
    base_texture: TextureSpec,
    rotations: Vec<(Identifier, Compass)>,
}

fn label(def: &BlockDefinition) -> String {
    def.name.clone().unwrap_or_else(|| String::from("unnamed"))
}

fn tile_to_pixels(
    index: usize,
    name: &str,
    (column, row): (u16, u16),
) -> Result<TexCoord, DefinitionError> {
    match (column.checked_mul(TILE_SIZE), row.checked_mul(TILE_SIZE)) {
        (Some(x), Some(y)) => Ok([x, y]),
        _ => Err(DefinitionError::TextureOutOfRange {
            index,
            name: name.to_owned(),
            column,
            row,
        }),
    }
}

fn texture_spec(
    index: usize,
    name: &str,
    def: &VariantDefinition,
) -> Result<TextureSpec, DefinitionError> {
    let all = def.tex.map(|t| tile_to_pixels(index, name, t)).transpose()?;
    let directions = def
        .tex_direction
        .iter()
        .map(|(dir, t)| tile_to_pixels(index, name, *t).map(|px| (*dir, px)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TextureSpec { all, directions })
}

fn prepare_variant(
    index: usize,
    name: &str,
    id: Identifier,
    def: &VariantDefinition,
) -> Result<PreparedVariant, DefinitionError> {
    let color = match def.mapcolor.as_deref() {
        None => None,
        Some(&[r, g, b]) => Some([r, g, b, 0xff]),
        Some(&[r, g, b, a]) => Some([r, g, b, a]),
        Some(other) => {
            return Err(DefinitionError::BadColor {
                index,
                name: name.to_owned(),
                channels: other.len(),
            });
        }
    };
    let attrs = BlockAttributes {
        name: def.name.clone(),
        aka: def.aka.clone(),
        category: def.category.clone(),
        light_emission: def.brightness,
        light_absorption: def.opacity,
        color,
        texture: None,
        string_id: def.id_str.clone(),
    };
    if let Some(level) = attrs.invalid_light_level() {
        return Err(DefinitionError::Invalid {
            index,
            name: name.to_owned(),
            source: RegistryError::LightLevelOutOfRange { level },
        });
    }
    Ok(PreparedVariant {
        id,
        attrs,
        texture: texture_spec(index, name, def)?,
    })
}

fn prepare(index: usize, def: &BlockDefinition) -> Result<PreparedBlock, DefinitionError> {
    let name = label(def);
    let invalid = |source: RegistryError| DefinitionError::Invalid {
        index,
        name: name.clone(),
        source,
    };
    let primary = def.id.ok_or_else(|| DefinitionError::MissingId {
        index,
        name: name.clone(),
    })?;
    let family = Identifier::new(primary, 0).map_err(invalid)?;
    let base = def.base();

    let variants = if def.data.is_empty() {
        vec![prepare_variant(index, &name, family, &base)?]
    } else {
        def.data
            .iter()
            .map(|(&variant, over)| {
                let id = Identifier::new(primary, variant).map_err(invalid)?;
                prepare_variant(index, &name, id, &over.merged_over(&base))
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let rotations = def
        .tex_direction_data
        .iter()
        .map(|(&variant, &facing)| {
            Identifier::new(primary, variant)
                .map(|id| (id, facing))
                .map_err(invalid)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PreparedBlock {
        family,
        variants,
        base_texture: texture_spec(index, &name, &base)?,
        rotations,
    })
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Registry {
    /// Loads every record of a parsed document. Malformed entries are
    /// reported at their position like any other rejected record.
    pub fn load_document(&mut self, document: &DefinitionDocument) -> LoadReport {
        self.load_prepared(document.blocks.iter().enumerate().map(|(index, record)| {
            match record {
                DefinitionRecord::Block(def) => prepare(index, def),
                DefinitionRecord::Malformed(message) => Err(DefinitionError::Malformed {
                    index,
                    message: message.clone(),
                }),
            }
        }))
    }

    /// Parses and loads a document from RON text.
    pub fn load_ron_str(&mut self, source: &str) -> Result<LoadReport, DocumentError> {
        let document = DefinitionDocument::from_ron_str(source)?;
        Ok(self.load_document(&document))
    }

    /// Reads, parses and loads a document from disk.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, DocumentError> {
        let document = DefinitionDocument::from_path(path)?;
        Ok(self.load_document(&document))
    }

    /// Applies records in order. Rejected records are logged, collected in the
    /// report and skipped; they never abort the load.
    pub fn load_definitions<'d>(
        &mut self,
        definitions: impl IntoIterator<Item = &'d BlockDefinition>,
    ) -> LoadReport {
        self.load_prepared(
            definitions
                .into_iter()
                .enumerate()
                .map(|(index, def)| prepare(index, def)),
        )
    }

    fn load_prepared(
        &mut self,
        records: impl IntoIterator<Item = Result<PreparedBlock, DefinitionError>>,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        for record in records {
            report.records += 1;
            match record {
                Ok(block) => report.defined += self.apply(block),
                Err(err) => {
                    tracing::warn!(registry = %self.label(), error = %err, "skipping block record");
                    report.failures.push(err);
                }
            }
        }
        tracing::debug!(
            registry = %self.label(),
            records = report.records,
            defined = report.defined,
            failed = report.failures.len(),
            "loaded block definitions"
        );
        report
    }

    fn apply(&mut self, block: PreparedBlock) -> usize {
        let written = block.variants.len();
        for variant in block.variants {
            let mut attrs = variant.attrs;
            attrs.texture = variant.texture.resolve(self.store().texture(variant.id));
            self.define(variant.id, &attrs);
        }

        if !block.rotations.is_empty() {
            let current = self.store().texture(block.family);
            let base = block.base_texture.resolve(current).unwrap_or(current);
            for (id, facing) in block.rotations {
                self.set_slot_texture(id, rotate_to(&base, facing));
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{Face, NO_TEXTURE};

    fn load(source: &str) -> (Registry, LoadReport) {
        let mut reg = Registry::new("test", "Unused");
        let report = reg.load_ron_str(source).unwrap();
        (reg, report)
    }

    #[test]
    fn test_basic_record() {
        let (reg, report) = load(
            r#"(blocks: [
                (id: 1, name: "Stone", type: "NORMAL", mapcolor: [125, 125, 125], tex: (1, 0)),
            ])"#,
        );
        assert!(report.is_clean());
        assert_eq!(report.defined, 1);
        let stone = reg.lookup_by_identifier(1, 7).unwrap();
        assert_eq!(stone.name(), "Stone");
        assert_eq!(stone.color(), [125, 125, 125, 255]);
        assert_eq!(stone.texture(), uniform([16, 0]));
    }

    #[test]
    fn test_missing_id_skips_record_only() {
        let (reg, report) = load(
            r#"(blocks: [
                (name: "Nameless"),
                (id: 3, name: "Dirt"),
            ])"#,
        );
        assert_eq!(report.records, 2);
        assert_eq!(report.defined, 1);
        assert!(matches!(
            report.failures.as_slice(),
            [DefinitionError::MissingId { index: 0, .. }]
        ));
        assert_eq!(reg.lookup(3).unwrap().name(), "Dirt");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_data_overrides_merge_over_base() {
        let (reg, report) = load(
            r#"(blocks: [
                (id: 35, name: "White Wool", type: "NORMAL", opacity: 15, data: {
                    0: (),
                    1: (name: "Orange Wool", aka: "Tan"),
                    14: (name: "Red Wool"),
                }),
            ])"#,
        );
        assert_eq!(report.defined, 3);
        assert_eq!(reg.lookup_by_identifier(35, 0).unwrap().name(), "White Wool");
        assert_eq!(reg.lookup_by_identifier(35, 1).unwrap().name(), "Orange Wool");
        assert_eq!(reg.lookup_by_identifier(35, 1).unwrap().aka(), "Tan");
        assert_eq!(reg.lookup_by_identifier(35, 14).unwrap().name(), "Red Wool");
        // Undeclared variants keep the variant-0 fan-out.
        assert_eq!(reg.lookup_by_identifier(35, 5).unwrap().name(), "White Wool");
    }

    #[test]
    fn test_tex_direction_over_uniform_tex() {
        let (reg, _) = load(
            r#"(blocks: [
                (id: 2, name: "Grass", tex: (3, 0), tex_direction: {TOP: (0, 0), BOTTOM: (2, 0)}),
            ])"#,
        );
        let tex = reg.lookup(2).unwrap().texture();
        assert_eq!(tex[Face::Top.index()], [0, 0]);
        assert_eq!(tex[Face::Bottom.index()], [32, 0]);
        assert_eq!(tex[Face::North.index()], [48, 0]);
        assert_eq!(tex[Face::East.index()], [48, 0]);
    }

    #[test]
    fn test_tex_direction_data_rotates_record_texture() {
        let (reg, report) = load(
            r#"(blocks: [
                (id: 61, name: "Furnace", tex: (13, 2), tex_direction: {FORWARD: (12, 2), TOP: (14, 3)},
                 tex_direction_data: {2: NORTH, 3: SOUTH, 4: WEST, 5: EAST}),
            ])"#,
        );
        assert!(report.is_clean());
        let front = [12 * 16, 32];
        let side = [13 * 16, 32];
        let north = reg.lookup_by_identifier(61, 2).unwrap().texture();
        assert_eq!(north[Face::North.index()], front);
        let south = reg.lookup_by_identifier(61, 3).unwrap().texture();
        assert_eq!(south[Face::South.index()], front);
        assert_eq!(south[Face::North.index()], side);
        let west = reg.lookup_by_identifier(61, 4).unwrap().texture();
        assert_eq!(west[Face::West.index()], front);
        let east = reg.lookup_by_identifier(61, 5).unwrap().texture();
        assert_eq!(east[Face::East.index()], front);
        assert_eq!(east[Face::Top.index()], [14 * 16, 48]);
        // Unlisted variants keep the unrotated fan-out.
        let plain = reg.lookup_by_identifier(61, 0).unwrap().texture();
        assert_eq!(plain[Face::North.index()], front);
    }

    #[test]
    fn test_bad_color_rejects_whole_record() {
        let (reg, report) = load(
            r#"(blocks: [
                (id: 4, name: "Cobblestone", mapcolor: [1, 2]),
            ])"#,
        );
        assert!(matches!(
            report.failures.as_slice(),
            [DefinitionError::BadColor { channels: 2, .. }]
        ));
        assert!(reg.is_empty());
        assert_eq!(reg.lookup(4).unwrap().name(), "Unused");
    }

    #[test]
    fn test_out_of_range_records_rejected() {
        let (reg, report) = load(
            r#"(blocks: [
                (id: 4096, name: "Too Far"),
                (id: 5, name: "Planks", data: {16: (name: "Bad Variant")}),
                (id: 6, name: "Glow", brightness: 16),
                (id: 7, name: "Huge", tex: (5000, 0)),
                (id: 8, name: "Water"),
            ])"#,
        );
        assert_eq!(report.failures.len(), 4);
        assert_eq!(
            report.failures.iter().map(DefinitionError::index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.lookup(5).unwrap().name(), "Unused");
        assert_eq!(reg.lookup(7).unwrap().texture(), uniform(NO_TEXTURE));
    }

    #[test]
    fn test_empty_document_leaves_defaults() {
        let (reg, report) = load("(blocks: [])");
        assert_eq!(report, LoadReport::default());
        assert!(reg.is_empty());
        let any = reg.lookup_by_identifier(100, 3).unwrap();
        assert_eq!(any.name(), "Unused");
        assert_eq!(any.light_absorption(), 15);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let (reg, report) = load(r#"(blocks: [(id: 9, name: "Ice", slipperiness: 98)])"#);
        assert!(report.is_clean());
        assert_eq!(reg.lookup(9).unwrap().name(), "Ice");
    }

    #[test]
    fn test_parse_error_is_document_error() {
        let mut reg = Registry::new("test", "Unused");
        let err = reg.load_ron_str("(blocks: [(id: )])").unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn test_mistyped_record_skipped_others_load() {
        let bad_records = [
            r#"(id: 70000, name: "Huge")"#,
            r#"(id: 2, name: "Glow", brightness: 300)"#,
            r#"(id: 2, name: "Red", mapcolor: [300, 0, 0])"#,
            r#"(id: 2, name: "Grass", tex: "grass")"#,
            r#"(id: 2, tex_direction: {SIDEWAYS: (1, 0)})"#,
        ];
        for bad in bad_records {
            let source =
                format!(r#"(blocks: [(id: 1, name: "Stone"), {bad}, (id: 3, name: "Dirt")])"#);
            let (reg, report) = load(&source);
            assert_eq!(report.records, 3, "{bad}");
            assert_eq!(report.defined, 2, "{bad}");
            assert!(
                matches!(
                    report.failures.as_slice(),
                    [DefinitionError::Malformed { index: 1, .. }]
                ),
                "{bad}: {:?}",
                report.failures
            );
            assert_eq!(reg.lookup(1).unwrap().name(), "Stone");
            assert_eq!(reg.lookup(2).unwrap().name(), "Unused");
            assert_eq!(reg.lookup(3).unwrap().name(), "Dirt");
            assert_eq!(reg.len(), 2);
        }
    }

    #[test]
    fn test_malformed_entry_kept_in_document() {
        let doc = DefinitionDocument::from_ron_str(r#"(blocks: [(id: "one"), (id: 4)])"#).unwrap();
        assert!(matches!(doc.blocks[0], DefinitionRecord::Malformed(_)));
        let typed: Vec<_> = doc.definitions().map(|def| def.id).collect();
        assert_eq!(typed, vec![Some(4)]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.ron");
        std::fs::write(&path, r#"(blocks: [(id: 12, name: "Sand", id_str: "sand")])"#).unwrap();
        let mut reg = Registry::new("file", "Unused");
        let report = reg.load_path(&path).unwrap();
        assert!(report.is_clean());
        assert_eq!(reg.lookup(12).unwrap().string_id(), "sand");
    }
}
