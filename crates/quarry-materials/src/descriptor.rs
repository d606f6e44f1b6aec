//! Non-owning block handles that read attributes from their registry on demand.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::attributes::{AttributeKey, AttributeValue, Rgba};
use crate::face::FaceTextures;
use crate::identifier::Identifier;
use crate::registry::Registry;

/// A `(registry, primary, variant)` view.
///
/// Holds no attribute data of its own, so every read reflects the registry's
/// current contents. Equality, ordering and hashing use the identifier only,
/// which makes descriptors from different registries comparable.
#[derive(Clone, Copy)]
pub struct BlockDescriptor<'r> {
    registry: &'r Registry,
    id: Identifier,
}

impl<'r> BlockDescriptor<'r> {
    pub(crate) fn new(registry: &'r Registry, id: Identifier) -> Self {
        Self { registry, id }
    }

    pub fn identifier(&self) -> Identifier {
        self.id
    }

    pub fn primary(&self) -> u16 {
        self.id.primary()
    }

    pub fn variant(&self) -> u8 {
        self.id.variant()
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Whether this identifier was explicitly defined, as opposed to holding defaults.
    pub fn is_known(&self) -> bool {
        self.registry.is_known(self.id)
    }

    pub fn name(&self) -> &'r str {
        self.registry.store().name(self.id)
    }

    pub fn aka(&self) -> &'r str {
        self.registry.store().aka(self.id)
    }

    pub fn category(&self) -> &'r str {
        self.registry.store().category(self.id)
    }

    pub fn light_emission(&self) -> u8 {
        self.registry.store().light_emission(self.id)
    }

    pub fn light_absorption(&self) -> u8 {
        self.registry.store().light_absorption(self.id)
    }

    pub fn color(&self) -> Rgba {
        self.registry.store().color(self.id)
    }

    pub fn texture(&self) -> FaceTextures {
        self.registry.store().texture(self.id)
    }

    pub fn string_id(&self) -> &'r str {
        self.registry.store().string_id(self.id)
    }

    /// Reads one attribute by key.
    pub fn resolve(&self, key: AttributeKey) -> AttributeValue<'r> {
        match key {
            AttributeKey::Name => AttributeValue::Text(self.name()),
            AttributeKey::Aka => AttributeValue::Text(self.aka()),
            AttributeKey::Category => AttributeValue::Text(self.category()),
            AttributeKey::LightEmission => AttributeValue::Level(self.light_emission()),
            AttributeKey::LightAbsorption => AttributeValue::Level(self.light_absorption()),
            AttributeKey::Color => AttributeValue::Color(self.color()),
            AttributeKey::Texture => AttributeValue::Texture(self.texture()),
            AttributeKey::StringId => AttributeValue::Text(self.string_id()),
        }
    }
}

impl<'a, 'b> PartialEq<BlockDescriptor<'b>> for BlockDescriptor<'a> {
    fn eq(&self, other: &BlockDescriptor<'b>) -> bool {
        self.id == other.id
    }
}

impl Eq for BlockDescriptor<'_> {}

impl PartialOrd for BlockDescriptor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BlockDescriptor<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for BlockDescriptor<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for BlockDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDescriptor")
            .field("registry", &self.registry.label())
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

impl fmt::Display for BlockDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Block {} ({}:{})>",
            self.name(),
            self.id.primary(),
            self.id.variant()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::BlockAttributes;

    #[test]
    fn test_resolve_matches_typed_accessors() {
        let mut reg = Registry::new("test", "Unused");
        reg.define_block(50, 0, &BlockAttributes::named("Torch").with_light_emission(14))
            .unwrap();
        let torch = reg.lookup_by_identifier(50, 0).unwrap();
        assert_eq!(torch.resolve(AttributeKey::Name), AttributeValue::Text("Torch"));
        assert_eq!(torch.resolve(AttributeKey::LightEmission), AttributeValue::Level(14));
        assert_eq!(torch.resolve(AttributeKey::LightAbsorption), AttributeValue::Level(15));
        assert_eq!(torch.resolve(AttributeKey::Color), AttributeValue::Color(torch.color()));
    }

    #[test]
    fn test_equality_ignores_registry() {
        let mut a = Registry::new("a", "A");
        let b = Registry::new("b", "B");
        a.define_block(1, 0, &BlockAttributes::named("Stone")).unwrap();
        let da = a.lookup_by_identifier(1, 0).unwrap();
        let db = b.lookup_by_identifier(1, 0).unwrap();
        assert_eq!(da, db);
        assert_ne!(da.name(), db.name());
        assert_ne!(da, b.lookup_by_identifier(1, 1).unwrap());
    }

    #[test]
    fn test_display_format() {
        let mut reg = Registry::new("test", "Unused");
        reg.define_block(35, 14, &BlockAttributes::named("Red Wool")).unwrap();
        let d = reg.lookup_by_identifier(35, 14).unwrap();
        assert_eq!(d.to_string(), "<Block Red Wool (35:14)>");
    }

    #[test]
    fn test_reflects_later_writes() {
        let mut reg = Registry::new("test", "Unused");
        reg.define_block(3, 0, &BlockAttributes::named("Dirt")).unwrap();
        let id = reg.lookup_by_identifier(3, 0).unwrap().identifier();
        reg.define_block(3, 0, &BlockAttributes::named("Soil")).unwrap();
        assert_eq!(reg.descriptor(id).name(), "Soil");
    }
}
