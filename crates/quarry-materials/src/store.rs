//! Fixed-capacity parallel attribute tables.
//!
//! Every one of the `4096 × 16` slots holds a value for every attribute from
//! construction onward: the tables are default-filled first, then selectively
//! overwritten. Name, alias, category, colour and texture are stored per
//! variant; light levels and the namespaced string id are stored per primary id.

use std::ops::Range;
use std::sync::Arc;

use crate::attributes::{BlockAttributes, Rgba};
use crate::face::{FaceTextures, NO_TEXTURE, uniform};
use crate::identifier::{Identifier, PRIMARY_ID_LIMIT, SLOT_COUNT, VARIANT_LIMIT};

/// Category tag carried by slots that were never categorised.
pub const DEFAULT_CATEGORY: &str = "NORMAL";

/// Placeholder map colour (opaque magenta).
pub const DEFAULT_COLOR: Rgba = [0xc9, 0x77, 0xf0, 0xff];

pub const DEFAULT_LIGHT_EMISSION: u8 = 0;

pub const DEFAULT_LIGHT_ABSORPTION: u8 = 15;

/// Dense per-slot attribute storage.
pub struct AttributeStore {
    default_name: Arc<str>,
    names: Vec<Arc<str>>,
    aliases: Vec<Arc<str>>,
    categories: Vec<Arc<str>>,
    colors: Vec<Rgba>,
    textures: Vec<FaceTextures>,
    light_emission: Vec<u8>,
    light_absorption: Vec<u8>,
    string_ids: Vec<Arc<str>>,
}

impl AttributeStore {
    /// Creates a store with every slot at its default value.
    pub fn new(default_name: &str) -> Self {
        let default_name: Arc<str> = Arc::from(default_name);
        let empty: Arc<str> = Arc::from("");
        let normal: Arc<str> = Arc::from(DEFAULT_CATEGORY);
        Self {
            names: vec![Arc::clone(&default_name); SLOT_COUNT],
            aliases: vec![Arc::clone(&empty); SLOT_COUNT],
            categories: vec![normal; SLOT_COUNT],
            colors: vec![DEFAULT_COLOR; SLOT_COUNT],
            textures: vec![uniform(NO_TEXTURE); SLOT_COUNT],
            light_emission: vec![DEFAULT_LIGHT_EMISSION; PRIMARY_ID_LIMIT],
            light_absorption: vec![DEFAULT_LIGHT_ABSORPTION; PRIMARY_ID_LIMIT],
            string_ids: vec![empty; PRIMARY_ID_LIMIT],
            default_name,
        }
    }

    /// The placeholder name of never-defined slots.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn name(&self, id: Identifier) -> &str {
        &self.names[id.slot()]
    }

    pub fn aka(&self, id: Identifier) -> &str {
        &self.aliases[id.slot()]
    }

    pub fn category(&self, id: Identifier) -> &str {
        &self.categories[id.slot()]
    }

    pub fn color(&self, id: Identifier) -> Rgba {
        self.colors[id.slot()]
    }

    pub fn texture(&self, id: Identifier) -> FaceTextures {
        self.textures[id.slot()]
    }

    pub fn light_emission(&self, id: Identifier) -> u8 {
        self.light_emission[id.primary() as usize]
    }

    pub fn light_absorption(&self, id: Identifier) -> u8 {
        self.light_absorption[id.primary() as usize]
    }

    pub fn string_id(&self, id: Identifier) -> &str {
        &self.string_ids[id.primary() as usize]
    }

    /// Writes every present field of `attrs`.
    ///
    /// Variant 0 fans out to all sixteen variants of the primary id; any other
    /// variant writes its own slot only. Light levels are shared by the family
    /// regardless.
    pub(crate) fn write(&mut self, id: Identifier, attrs: &BlockAttributes) {
        let span = Self::span(id);
        if let Some(name) = &attrs.name {
            fill(&mut self.names[span.clone()], Arc::from(name.as_str()));
        }
        if let Some(aka) = &attrs.aka {
            fill(&mut self.aliases[span.clone()], Arc::from(aka.as_str()));
        }
        if let Some(category) = &attrs.category {
            fill(&mut self.categories[span.clone()], Arc::from(category.as_str()));
        }
        if let Some(color) = attrs.color {
            self.colors[span.clone()].fill(color);
        }
        if let Some(texture) = attrs.texture {
            self.textures[span].fill(texture);
        }
        let primary = id.primary() as usize;
        if let Some(level) = attrs.light_emission {
            self.light_emission[primary] = level;
        }
        if let Some(level) = attrs.light_absorption {
            self.light_absorption[primary] = level;
        }
        if let Some(string_id) = &attrs.string_id {
            self.string_ids[primary] = Arc::from(string_id.as_str());
        }
    }

    /// Overwrites the texture of exactly one slot, never fanning out.
    pub(crate) fn set_slot_texture(&mut self, id: Identifier, texture: FaceTextures) {
        self.textures[id.slot()] = texture;
    }

    /// Slots touched by a write to `id`.
    fn span(id: Identifier) -> Range<usize> {
        if id.is_family_default() {
            let start = id.slot();
            start..start + VARIANT_LIMIT
        } else {
            let slot = id.slot();
            slot..slot + 1
        }
    }
}

fn fill(slots: &mut [Arc<str>], value: Arc<str>) {
    for slot in slots {
        *slot = Arc::clone(&value);
    }
}
