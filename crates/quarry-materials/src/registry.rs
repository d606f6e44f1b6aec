//! Block registry: one edition's attribute tables plus the indexes built while
//! definitions are loaded.
//!
//! A registry is filled during a load phase through [`Registry::define_block`]
//! and treated as read-only afterwards. Every in-range identifier resolves,
//! defined or not; "known blocks" are the identifiers that were explicitly
//! defined, kept in first-definition order.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::attributes::BlockAttributes;
use crate::descriptor::BlockDescriptor;
use crate::face::FaceTextures;
use crate::identifier::Identifier;
use crate::store::AttributeStore;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by registry lookups and writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The identifier lies outside the `4096 × 16` identifier space.
    #[error("identifier {primary}:{variant} is out of range")]
    IdentifierOutOfRange {
        /// Requested primary id.
        primary: u32,
        /// Requested variant.
        variant: u32,
    },

    /// No known block carries this exact display name.
    #[error("no block named {0:?}")]
    NameNotFound(String),

    /// A light level above 15 was supplied.
    #[error("light level {level} exceeds 15")]
    LightLevelOutOfRange {
        /// The rejected level.
        level: u8,
    },
}

// ---------------------------------------------------------------------------
// RegistryId
// ---------------------------------------------------------------------------

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique registry identity, used to key conversion caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryId(u64);

impl RegistryId {
    fn next() -> Self {
        Self(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// One edition's block attributes and indexes.
pub struct Registry {
    id: RegistryId,
    label: String,
    store: AttributeStore,
    /// Defined identifiers in first-definition order.
    known: Vec<Identifier>,
    known_set: FxHashSet<Identifier>,
    /// Category tag -> known identifiers, in the order they entered the category.
    by_category: FxHashMap<String, Vec<Identifier>>,
}

impl Registry {
    /// Creates an all-default registry.
    ///
    /// `label` names the edition in logs; `default_name` is the display name of
    /// every slot that is never defined.
    pub fn new(label: impl Into<String>, default_name: &str) -> Self {
        Self {
            id: RegistryId::next(),
            label: label.into(),
            store: AttributeStore::new(default_name),
            known: Vec::new(),
            known_set: FxHashSet::default(),
            by_category: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> RegistryId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn default_name(&self) -> &str {
        self.store.default_name()
    }

    /// Direct access to the attribute tables.
    pub fn store(&self) -> &AttributeStore {
        &self.store
    }

    /// Writes a partial attribute bundle.
    ///
    /// Variant 0 writes the whole family; other variants write their own slot.
    /// Later writes win for the slots they touch. Redefining an identifier is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdentifierOutOfRange`] or
    /// [`RegistryError::LightLevelOutOfRange`]; nothing is written in that case.
    pub fn define_block(
        &mut self,
        primary: u16,
        variant: u8,
        attrs: &BlockAttributes,
    ) -> Result<Identifier, RegistryError> {
        let id = Identifier::new(primary, variant)?;
        if let Some(level) = attrs.invalid_light_level() {
            return Err(RegistryError::LightLevelOutOfRange { level });
        }
        self.define(id, attrs);
        Ok(id)
    }

    /// Write path for bundles whose light levels are already validated.
    pub(crate) fn define(&mut self, id: Identifier, attrs: &BlockAttributes) {
        let recategorised: Vec<(Identifier, String)> = if attrs.category.is_some() {
            self.known_in_span(id)
                .map(|k| (k, self.store.category(k).to_owned()))
                .collect()
        } else {
            Vec::new()
        };

        self.store.write(id, attrs);

        if self.known_set.insert(id) {
            self.known.push(id);
            self.by_category
                .entry(self.store.category(id).to_owned())
                .or_default()
                .push(id);
        }
        for (k, old) in recategorised {
            if self.store.category(k) != old {
                self.move_category(k, &old);
            }
        }
    }

    /// Known identifiers whose slots a write to `id` touches.
    fn known_in_span(&self, id: Identifier) -> impl Iterator<Item = Identifier> + '_ {
        let family = id.is_family_default();
        id.siblings()
            .filter(move |s| if family { true } else { *s == id })
            .filter(|s| self.known_set.contains(s))
    }

    fn move_category(&mut self, id: Identifier, old: &str) {
        if let Some(list) = self.by_category.get_mut(old) {
            list.retain(|&k| k != id);
            if list.is_empty() {
                self.by_category.remove(old);
            }
        }
        self.by_category
            .entry(self.store.category(id).to_owned())
            .or_default()
            .push(id);
    }

    /// Overwrites one slot's texture without touching the known-block indexes.
    pub(crate) fn set_slot_texture(&mut self, id: Identifier, texture: FaceTextures) {
        self.store.set_slot_texture(id, texture);
    }

    // -- lookups ------------------------------------------------------------

    /// Descriptor for an already validated identifier.
    pub fn descriptor(&self, id: Identifier) -> BlockDescriptor<'_> {
        BlockDescriptor::new(self, id)
    }

    /// Descriptor for `(primary, variant)`. Succeeds for every in-range pair.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdentifierOutOfRange`] for out-of-range input.
    pub fn lookup_by_identifier(
        &self,
        primary: u16,
        variant: u8,
    ) -> Result<BlockDescriptor<'_>, RegistryError> {
        Ok(self.descriptor(Identifier::new(primary, variant)?))
    }

    /// Descriptor for a primary id at its default variant 0.
    pub fn lookup(&self, primary: u16) -> Result<BlockDescriptor<'_>, RegistryError> {
        self.lookup_by_identifier(primary, 0)
    }

    /// First known block, in definition order, whose display name equals `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NameNotFound`] when nothing matches.
    pub fn lookup_by_name(&self, name: &str) -> Result<BlockDescriptor<'_>, RegistryError> {
        self.get_by_name(name)
            .ok_or_else(|| RegistryError::NameNotFound(name.to_owned()))
    }

    /// Like [`Registry::lookup_by_name`] but returns `None` when nothing matches.
    pub fn get_by_name(&self, name: &str) -> Option<BlockDescriptor<'_>> {
        self.known_blocks().find(|b| b.name() == name)
    }

    /// Loose multi-token search over display name and alias.
    ///
    /// The query and the block's name and alias are lowercased and split on
    /// whitespace. Walking the block's tokens in order, each block token
    /// consumes the first not-yet-consumed query token it contains. A block
    /// matches when every query token has been consumed. Results follow
    /// definition order.
    pub fn lookup_by_partial_name(&self, query: &str) -> Vec<BlockDescriptor<'_>> {
        let query = query.to_lowercase();
        let wanted: Vec<&str> = query.split_whitespace().collect();
        self.known_blocks()
            .filter(|b| tokens_consume_all(b.name(), b.aka(), &wanted))
            .collect()
    }

    // -- iteration ----------------------------------------------------------

    /// Known blocks in definition order.
    pub fn known_blocks(&self) -> impl Iterator<Item = BlockDescriptor<'_>> + '_ {
        self.known.iter().map(move |&id| self.descriptor(id))
    }

    pub fn known_identifiers(&self) -> &[Identifier] {
        &self.known
    }

    pub fn is_known(&self, id: Identifier) -> bool {
        self.known_set.contains(&id)
    }

    /// Known blocks carrying `category`.
    pub fn blocks_in_category(
        &self,
        category: &str,
    ) -> impl Iterator<Item = BlockDescriptor<'_>> + '_ {
        self.by_category
            .get(category)
            .into_iter()
            .flatten()
            .map(move |&id| self.descriptor(id))
    }

    /// Category tags currently in use, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.by_category.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn all_stairs(&self) -> Vec<BlockDescriptor<'_>> {
        self.known_blocks().filter(|b| b.name().contains("Stairs")).collect()
    }

    pub fn all_slabs(&self) -> Vec<BlockDescriptor<'_>> {
        self.known_blocks().filter(|b| b.name().contains("Slab")).collect()
    }

    /// Number of known blocks.
    pub fn len(&self) -> usize {
        self.known.len()
    }

    /// Returns `true` if nothing has been defined.
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("known", &self.known.len())
            .finish()
    }
}

/// Token-consumption rule behind [`Registry::lookup_by_partial_name`].
fn tokens_consume_all(name: &str, aka: &str, wanted: &[&str]) -> bool {
    let name = name.to_lowercase();
    let aka = aka.to_lowercase();
    let mut used = vec![false; wanted.len()];
    let mut matched = 0;
    for part in name.split_whitespace().chain(aka.split_whitespace()) {
        if let Some(j) = (0..wanted.len()).find(|&j| !used[j] && part.contains(wanted[j])) {
            used[j] = true;
            matched += 1;
        }
    }
    matched == wanted.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
