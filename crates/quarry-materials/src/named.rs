//! Name-keyed shortcuts to known blocks, generated from a loaded registry.

use std::collections::BTreeMap;

use crate::descriptor::BlockDescriptor;
use crate::identifier::Identifier;
use crate::registry::Registry;

/// Constant-style key for a display name: spaces and parentheses removed.
///
/// `"Huge Brown Mushroom (North)"` becomes `"HugeBrownMushroomNorth"`.
pub fn constant_name(display_name: &str) -> String {
    display_name
        .chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')'))
        .collect()
}

/// Sorted `constant name -> identifier` table over a registry's known blocks.
///
/// When two known blocks share a key, the lower identifier keeps it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedBlocks {
    entries: BTreeMap<String, Identifier>,
}

impl NamedBlocks {
    pub fn from_registry(registry: &Registry) -> Self {
        let mut entries: BTreeMap<String, Identifier> = BTreeMap::new();
        for &id in registry.known_identifiers() {
            let key = constant_name(registry.store().name(id));
            if key.is_empty() {
                continue;
            }
            entries
                .entry(key)
                .and_modify(|held| {
                    if id < *held {
                        *held = id;
                    }
                })
                .or_insert(id);
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<Identifier> {
        self.entries.get(key).copied()
    }

    /// Looks `key` up and resolves it against `registry`.
    pub fn descriptor<'r>(&self, registry: &'r Registry, key: &str) -> Option<BlockDescriptor<'r>> {
        self.get(key).map(|id| registry.descriptor(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Identifier)> + '_ {
        self.entries.iter().map(|(k, &id)| (k.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::BlockAttributes;

    #[test]
    fn test_constant_name() {
        assert_eq!(constant_name("Lapis Lazuli Block"), "LapisLazuliBlock");
        assert_eq!(constant_name("Huge Brown Mushroom (North)"), "HugeBrownMushroomNorth");
        assert_eq!(constant_name("Air"), "Air");
    }

    #[test]
    fn test_lower_identifier_wins() {
        let mut reg = Registry::new("test", "Unused");
        reg.define_block(44, 3, &BlockAttributes::named("Cobblestone Slab")).unwrap();
        reg.define_block(4, 0, &BlockAttributes::named("Stone")).unwrap();
        reg.define_block(1, 0, &BlockAttributes::named("Stone")).unwrap();
        let named = NamedBlocks::from_registry(&reg);
        assert_eq!(named.len(), 2);
        assert_eq!(named.get("Stone"), Some(Identifier::new(1, 0).unwrap()));
        assert_eq!(
            named.descriptor(&reg, "CobblestoneSlab").map(|d| d.variant()),
            Some(3)
        );
        assert!(named.get("Cobblestone Slab").is_none());
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mut reg = Registry::new("test", "Unused");
        reg.define_block(3, 0, &BlockAttributes::named("Dirt")).unwrap();
        reg.define_block(1, 0, &BlockAttributes::named("Bedrock")).unwrap();
        let named = NamedBlocks::from_registry(&reg);
        let keys: Vec<_> = named.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Bedrock", "Dirt"]);
    }
}
