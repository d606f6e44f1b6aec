//! The four built-in block palettes and the context that owns them.
//!
//! Each [`Edition`] ships a RON definition document embedded in the crate.
//! [`Editions`] loads all four, optionally from an override directory, and
//! converts block arrays between them through one shared [`ConversionCache`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use quarry_config::Config;
use thiserror::Error;

use crate::attributes::BlockAttributes;
use crate::cache::{ConversionCache, DEFAULT_FALLBACK};
use crate::conversion::{Conversion, ConversionError};
use crate::definition::{DefinitionDocument, DocumentError, LoadReport};
use crate::face::{Face, FaceTextures, TILE_SIZE, TexCoord, uniform};
use crate::identifier::Identifier;
use crate::registry::{Registry, RegistryError};

/// Errors raised while building the edition registries.
#[derive(Debug, Error)]
pub enum EditionError {
    #[error("unknown edition {0:?}")]
    UnknownEdition(String),

    #[error("failed to load the {edition} definitions")]
    Document {
        edition: Edition,
        #[source]
        source: DocumentError,
    },

    #[error("invalid fallback identifier")]
    InvalidFallback(#[source] RegistryError),
}

/// A block palette with its own numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Edition {
    Alpha,
    Classic,
    Indev,
    Pocket,
}

impl Edition {
    pub const ALL: [Edition; 4] = [
        Edition::Alpha,
        Edition::Classic,
        Edition::Indev,
        Edition::Pocket,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Edition::Alpha => "Alpha",
            Edition::Classic => "Classic",
            Edition::Indev => "Indev",
            Edition::Pocket => "Pocket",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|edition| edition.name().eq_ignore_ascii_case(name))
    }

    /// Display name of every identifier the edition never defines.
    pub fn default_block_name(self) -> &'static str {
        match self {
            Edition::Alpha => "Future Block!",
            Edition::Classic => "Not present in Classic",
            Edition::Indev => "Not present in Indev",
            Edition::Pocket => "Unused Block",
        }
    }

    /// File name looked up in a definitions override directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Edition::Alpha => "alpha.ron",
            Edition::Classic => "classic.ron",
            Edition::Indev => "indev.ron",
            Edition::Pocket => "pocket.ron",
        }
    }

    /// The embedded definition document text.
    pub fn builtin_source(self) -> &'static str {
        match self {
            Edition::Alpha => include_str!("../assets/alpha.ron"),
            Edition::Classic => include_str!("../assets/classic.ron"),
            Edition::Indev => include_str!("../assets/indev.ron"),
            Edition::Pocket => include_str!("../assets/pocket.ron"),
        }
    }

    pub fn builtin_document(self) -> Result<DefinitionDocument, DocumentError> {
        DefinitionDocument::from_ron_str(self.builtin_source())
    }

    /// Builds this edition's registry.
    ///
    /// `<directory>/<file_name>` replaces the embedded document when it exists.
    pub fn load(self, directory: Option<&Path>) -> Result<(Registry, LoadReport), EditionError> {
        let wrap = |source| EditionError::Document {
            edition: self,
            source,
        };
        let mut registry = Registry::new(self.name(), self.default_block_name());

        let override_path = directory
            .map(|dir| dir.join(self.file_name()))
            .filter(|path| path.is_file());
        let report = match override_path {
            Some(path) => {
                tracing::debug!(edition = %self, path = %path.display(), "loading definition override");
                registry.load_path(&path).map_err(wrap)?
            }
            None => registry.load_document(&self.builtin_document().map_err(wrap)?),
        };

        if self == Edition::Alpha {
            define_huge_mushrooms(&mut registry);
        }

        if report.is_clean() {
            tracing::info!(edition = %self, blocks = registry.len(), "loaded edition");
        } else {
            tracing::warn!(
                edition = %self,
                blocks = registry.len(),
                rejected = report.failures.len(),
                "loaded edition with rejected records"
            );
        }
        Ok((registry, report))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Edition {
    type Err = EditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| EditionError::UnknownEdition(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Huge mushrooms
// ---------------------------------------------------------------------------

const fn tile(column: u16, row: u16) -> TexCoord {
    [column * TILE_SIZE, row * TILE_SIZE]
}

const PORE: TexCoord = tile(14, 8);
const STEM: TexCoord = tile(13, 8);

/// `(primary id, colour, cap tile)`.
const HUGE_MUSHROOMS: [(u16, &str, TexCoord); 2] =
    [(99, "Brown", tile(14, 7)), (100, "Red", tile(13, 7))];

/// Variants 1 to 10 in order, with the lateral faces that show the cap.
const CAP_PARTS: [(&str, &[Face]); 9] = [
    ("Northwest", &[Face::North, Face::West]),
    ("North", &[Face::North]),
    ("Northeast", &[Face::North, Face::East]),
    ("West", &[Face::West]),
    ("Top", &[]),
    ("East", &[Face::East]),
    ("Southwest", &[Face::South, Face::West]),
    ("South", &[Face::South]),
    ("Southeast", &[Face::South, Face::East]),
];

fn cap_faces(cap: TexCoord, outward: &[Face]) -> FaceTextures {
    let mut faces = uniform(PORE);
    faces[Face::Top.index()] = cap;
    for face in outward {
        faces[face.index()] = cap;
    }
    faces
}

fn stem_faces() -> FaceTextures {
    let mut faces = uniform(STEM);
    faces[Face::Top.index()] = PORE;
    faces[Face::Bottom.index()] = PORE;
    faces
}

/// Per-part faces of the huge mushroom blocks, which the document format
/// cannot express.
fn define_huge_mushrooms(registry: &mut Registry) {
    for (primary, colour, cap) in HUGE_MUSHROOMS {
        let parts = CAP_PARTS
            .iter()
            .map(|&(part, outward)| (part, cap_faces(cap, outward)))
            .chain(std::iter::once(("Stem", stem_faces())));
        for (variant, (part, faces)) in (1u8..).zip(parts) {
            let attrs = BlockAttributes::named(format!("Huge {colour} Mushroom ({part})"))
                .with_texture(faces);
            if let Err(err) = registry.define_block(primary, variant, &attrs) {
                tracing::warn!(registry = %registry.label(), error = %err, "skipping huge mushroom part");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Editions
// ---------------------------------------------------------------------------

/// All four edition registries plus the conversion cache between them.
///
/// Registries are loaded up front and never modified afterwards, so the
/// context can be shared across threads by reference.
pub struct Editions {
    registries: Vec<Registry>,
    reports: Vec<LoadReport>,
    cache: ConversionCache,
}

impl Editions {
    /// Loads the embedded documents with the default fallback.
    pub fn builtin() -> Result<Self, EditionError> {
        Self::load(None, DEFAULT_FALLBACK)
    }

    /// Loads using the fallback, override directory and prewarm flag of `config`.
    pub fn from_config(config: &Config) -> Result<Self, EditionError> {
        let (primary, variant) = config.conversion.fallback();
        let fallback = Identifier::new(primary, variant).map_err(EditionError::InvalidFallback)?;
        let editions = Self::load(config.definitions.directory.as_deref(), fallback)?;
        if config.conversion.prewarm {
            editions.prewarm();
        }
        Ok(editions)
    }

    pub fn load(directory: Option<&Path>, fallback: Identifier) -> Result<Self, EditionError> {
        let mut registries = Vec::with_capacity(Edition::ALL.len());
        let mut reports = Vec::with_capacity(Edition::ALL.len());
        for edition in Edition::ALL {
            let (registry, report) = edition.load(directory)?;
            registries.push(registry);
            reports.push(report);
        }
        Ok(Self {
            registries,
            reports,
            cache: ConversionCache::new(fallback),
        })
    }

    pub fn get(&self, edition: Edition) -> &Registry {
        &self.registries[edition.index()]
    }

    /// Case-insensitive lookup by edition name.
    pub fn by_name(&self, name: &str) -> Option<&Registry> {
        Edition::from_name(name).map(|edition| self.get(edition))
    }

    /// What happened while loading `edition`'s document.
    pub fn report(&self, edition: Edition) -> &LoadReport {
        &self.reports[edition.index()]
    }

    pub fn cache(&self) -> &ConversionCache {
        &self.cache
    }

    /// The conversion from `source` identifiers to `destination` identifiers.
    pub fn conversion(&self, destination: Edition, source: Edition) -> Conversion {
        self.cache.get(self.get(destination), self.get(source))
    }

    /// Batch conversion of parallel primary / variant arrays.
    pub fn convert_blocks(
        &self,
        destination: Edition,
        source: Edition,
        primaries: &[u16],
        variants: Option<&[u8]>,
    ) -> Result<(Vec<u16>, Vec<u8>), ConversionError> {
        self.conversion(destination, source).convert(primaries, variants)
    }

    /// Builds every ordered pair of distinct editions. Returns the number of
    /// pairs visited.
    pub fn prewarm(&self) -> usize {
        let mut pairs = 0;
        for destination in Edition::ALL {
            for source in Edition::ALL.into_iter().filter(|&s| s != destination) {
                self.conversion(destination, source);
                pairs += 1;
            }
        }
        tracing::info!(pairs, tables = self.cache.len(), "prewarmed conversion tables");
        pairs
    }
}

impl fmt::Debug for Editions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editions")
            .field("registries", &self.registries)
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(p: u16, v: u8) -> Identifier {
        Identifier::new(p, v).unwrap()
    }

    #[test]
    fn test_edition_names() {
        assert_eq!(Edition::from_name("alpha"), Some(Edition::Alpha));
        assert_eq!(Edition::from_name(" POCKET "), Some(Edition::Pocket));
        assert_eq!(Edition::from_name("beta"), None);
        assert_eq!("Indev".parse::<Edition>().unwrap(), Edition::Indev);
        assert!(matches!(
            "beta".parse::<Edition>(),
            Err(EditionError::UnknownEdition(name)) if name == "beta"
        ));
        for edition in Edition::ALL {
            assert_eq!(Edition::from_name(&edition.to_string()), Some(edition));
        }
    }

    #[test]
    fn test_builtin_documents_load_cleanly() {
        for edition in Edition::ALL {
            let (registry, report) = edition.load(None).unwrap();
            assert!(report.is_clean(), "{edition}: {:?}", report.failures);
            assert!(!registry.is_empty());
            assert_eq!(registry.label(), edition.name());
            assert_eq!(registry.default_name(), edition.default_block_name());
        }
    }

    #[test]
    fn test_undefined_slots_use_edition_placeholder() {
        let (classic, _) = Edition::Classic.load(None).unwrap();
        assert_eq!(classic.lookup(200).unwrap().name(), "Not present in Classic");
        let (alpha, _) = Edition::Alpha.load(None).unwrap();
        assert_eq!(alpha.lookup(4000).unwrap().name(), "Future Block!");
    }

    #[test]
    fn test_huge_mushroom_parts() {
        let (alpha, _) = Edition::Alpha.load(None).unwrap();
        let northwest = alpha.lookup_by_identifier(99, 1).unwrap();
        assert_eq!(northwest.name(), "Huge Brown Mushroom (Northwest)");
        assert_eq!(northwest.category(), "HUGE_MUSHROOM");
        let cap = tile(14, 7);
        assert_eq!(northwest.texture(), [PORE, cap, cap, PORE, PORE, cap]);

        let south = alpha.lookup_by_identifier(100, 8).unwrap();
        assert_eq!(south.name(), "Huge Red Mushroom (South)");
        let cap = tile(13, 7);
        assert_eq!(south.texture(), [PORE, PORE, cap, PORE, cap, PORE]);

        let stem = alpha.lookup_by_identifier(100, 10).unwrap();
        assert_eq!(stem.name(), "Huge Red Mushroom (Stem)");
        assert_eq!(stem.texture(), [STEM, STEM, PORE, PORE, STEM, STEM]);

        // Variant 0 keeps the document's plain definition.
        assert_eq!(alpha.lookup(99).unwrap().name(), "Huge Brown Mushroom");
        assert!(alpha.is_known(id(99, 5)));
    }

    #[test]
    fn test_override_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("classic.ron"),
            r#"(blocks: [(id: 1, name: "Rock")])"#,
        )
        .unwrap();

        let (classic, _) = Edition::Classic.load(Some(dir.path())).unwrap();
        assert_eq!(classic.len(), 1);
        assert_eq!(classic.lookup(1).unwrap().name(), "Rock");

        // No override file: the embedded document is used.
        let (indev, _) = Edition::Indev.load(Some(dir.path())).unwrap();
        assert_eq!(indev.lookup(1).unwrap().name(), "Stone");
    }

    #[test]
    fn test_broken_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pocket.ron"), "(blocks: [").unwrap();
        assert!(matches!(
            Edition::Pocket.load(Some(dir.path())),
            Err(EditionError::Document {
                edition: Edition::Pocket,
                source: DocumentError::Parse(_)
            })
        ));
    }

    #[test]
    fn test_from_config_fallback_and_prewarm() {
        let mut config = Config::default();
        config.conversion.fallback_primary = 1;
        config.conversion.prewarm = true;
        let editions = Editions::from_config(&config).unwrap();
        assert_eq!(editions.cache().fallback(), id(1, 0));
        assert_eq!(editions.cache().len(), 12);
        assert_eq!(editions.cache().builds(), 12);

        config.conversion.fallback_primary = 5000;
        assert!(matches!(
            Editions::from_config(&config),
            Err(EditionError::InvalidFallback(_))
        ));
    }

    #[test]
    fn test_same_edition_is_identity() {
        let editions = Editions::builtin().unwrap();
        assert!(editions.conversion(Edition::Indev, Edition::Indev).is_identity());
        assert!(editions.cache().is_empty());
        assert_eq!(
            editions.by_name("classic").map(Registry::label),
            Some("Classic")
        );
        assert!(editions.report(Edition::Alpha).is_clean());
    }
}
