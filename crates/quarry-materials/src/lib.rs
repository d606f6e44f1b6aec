//! Block registries for several game editions and conversion of block
//! identifiers between them.
//!
//! A [`Registry`] maps every `(primary, variant)` [`Identifier`] to a set of
//! display attributes, filled from RON definition documents. The
//! correspondence resolver matches one registry's known blocks onto another's
//! by name, and [`ConversionCache`] turns each result into a dense lookup
//! table built once per ordered registry pair.

pub mod attributes;
pub mod cache;
pub mod conversion;
pub mod correspondence;
pub mod definition;
pub mod descriptor;
pub mod editions;
pub mod face;
pub mod identifier;
pub mod named;
pub mod namespaced;
pub mod registry;
pub mod store;

pub use attributes::{AttributeKey, AttributeValue, BlockAttributes, MAX_LIGHT_LEVEL, Rgba};
pub use cache::{ConversionCache, DEFAULT_FALLBACK};
pub use conversion::{Conversion, ConversionError, ConversionTable};
pub use correspondence::{Correspondence, Filter, MatchRule, resolve_correspondence};
pub use definition::{
    BlockDefinition, DefinitionDocument, DefinitionError, DefinitionRecord, DocumentError,
    LoadReport, VariantDefinition,
};
pub use descriptor::BlockDescriptor;
pub use editions::{Edition, EditionError, Editions};
pub use face::{Compass, Face, FaceTextures, TexCoord, TextureDirection};
pub use identifier::{Identifier, PRIMARY_ID_LIMIT, VARIANT_LIMIT};
pub use named::{NamedBlocks, constant_name};
pub use namespaced::{namespaced_id, primary_for_namespaced};
pub use registry::{Registry, RegistryError, RegistryId};
pub use store::AttributeStore;
