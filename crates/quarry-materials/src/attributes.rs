//! Attribute bundles written by `define_block` and the closed key set read back
//! through [`BlockDescriptor::resolve`](crate::BlockDescriptor::resolve).

use crate::face::FaceTextures;

/// RGBA map colour.
pub type Rgba = [u8; 4];

/// Highest light emission / absorption level.
pub const MAX_LIGHT_LEVEL: u8 = 15;

/// Partial attribute bundle. `None` fields leave the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockAttributes {
    pub name: Option<String>,
    pub aka: Option<String>,
    pub category: Option<String>,
    /// 0–15.
    pub light_emission: Option<u8>,
    /// 0–15, 15 is fully opaque.
    pub light_absorption: Option<u8>,
    pub color: Option<Rgba>,
    pub texture: Option<FaceTextures>,
    /// Namespaced string id of the primary id.
    pub string_id: Option<String>,
}

impl BlockAttributes {
    /// A bundle that only sets the display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_aka(mut self, aka: impl Into<String>) -> Self {
        self.aka = Some(aka.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_light_emission(mut self, level: u8) -> Self {
        self.light_emission = Some(level);
        self
    }

    pub fn with_light_absorption(mut self, level: u8) -> Self {
        self.light_absorption = Some(level);
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_texture(mut self, texture: FaceTextures) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Returns the first light level above [`MAX_LIGHT_LEVEL`], if any.
    pub(crate) fn invalid_light_level(&self) -> Option<u8> {
        [self.light_emission, self.light_absorption]
            .into_iter()
            .flatten()
            .find(|&level| level > MAX_LIGHT_LEVEL)
    }
}

/// Attributes readable from a block descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Name,
    Aka,
    Category,
    LightEmission,
    LightAbsorption,
    Color,
    Texture,
    StringId,
}

/// A resolved attribute value, borrowing text from the owning registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeValue<'r> {
    Text(&'r str),
    Level(u8),
    Color(Rgba),
    Texture(FaceTextures),
}

impl<'r> AttributeValue<'r> {
    pub fn as_text(&self) -> Option<&'r str> {
        match *self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_level(&self) -> Option<u8> {
        match *self {
            AttributeValue::Level(l) => Some(l),
            _ => None,
        }
    }
}
