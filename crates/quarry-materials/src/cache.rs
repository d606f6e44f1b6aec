//! Lazily built conversion tables, shared between threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::conversion::{Conversion, ConversionError, ConversionTable};
use crate::correspondence::resolve_correspondence;
use crate::identifier::Identifier;
use crate::registry::{Registry, RegistryId};

/// Substitute for unmatched source blocks unless configured otherwise (wool).
pub const DEFAULT_FALLBACK: Identifier = match Identifier::try_const(35, 0) {
    Some(id) => id,
    None => panic!("default fallback out of range"),
};

/// Memoised conversions keyed by the ordered `(destination, source)` pair.
///
/// The first request for a pair runs the resolver and builds the table inside
/// the map's entry lock, so concurrent requests for the same pair build once.
/// Built tables are immutable and handed out as [`Arc`]s.
pub struct ConversionCache {
    fallback: Identifier,
    tables: DashMap<(RegistryId, RegistryId), Arc<ConversionTable>>,
    builds: AtomicUsize,
}

impl ConversionCache {
    pub fn new(fallback: Identifier) -> Self {
        Self {
            fallback,
            tables: DashMap::new(),
            builds: AtomicUsize::new(0),
        }
    }

    pub fn fallback(&self) -> Identifier {
        self.fallback
    }

    /// The conversion from `source` identifiers to `destination` identifiers.
    ///
    /// Returns [`Conversion::Identity`] without building anything when both
    /// arguments are the same registry.
    pub fn get(&self, destination: &Registry, source: &Registry) -> Conversion {
        if destination.id() == source.id() {
            return Conversion::Identity;
        }
        let key = (destination.id(), source.id());
        if let Some(table) = self.tables.get(&key) {
            return Conversion::Table(Arc::clone(table.value()));
        }
        let table = self
            .tables
            .entry(key)
            .or_insert_with(|| Arc::new(self.build(destination, source)));
        Conversion::Table(Arc::clone(table.value()))
    }

    /// One-shot batch conversion through the cached table for the pair.
    pub fn convert_identifiers(
        &self,
        destination: &Registry,
        source: &Registry,
        primaries: &[u16],
        variants: Option<&[u8]>,
    ) -> Result<(Vec<u16>, Vec<u8>), ConversionError> {
        self.get(destination, source).convert(primaries, variants)
    }

    /// Whether the pair already has a built table.
    pub fn contains(&self, destination: &Registry, source: &Registry) -> bool {
        self.tables.contains_key(&(destination.id(), source.id()))
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of resolver runs performed so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    fn build(&self, destination: &Registry, source: &Registry) -> ConversionTable {
        self.builds.fetch_add(1, Ordering::Relaxed);
        let correspondence = resolve_correspondence(source, destination);
        tracing::info!(
            source = %source.label(),
            destination = %destination.label(),
            filters = correspondence.filters.len(),
            unavailable = correspondence.unavailable.len(),
            "built conversion table"
        );
        if !correspondence.unavailable.is_empty() {
            let missing: Vec<&str> = correspondence
                .unavailable
                .iter()
                .map(|&id| source.store().name(id))
                .collect();
            tracing::debug!(source = %source.label(), destination = %destination.label(), ?missing, "unavailable blocks");
        }
        ConversionTable::from_correspondence(&correspondence, self.fallback)
    }
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK)
    }
}

impl std::fmt::Debug for ConversionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionCache")
            .field("fallback", &self.fallback)
            .field("tables", &self.tables.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::BlockAttributes;

    fn id(p: u16, v: u8) -> Identifier {
        Identifier::new(p, v).unwrap()
    }

    fn pair() -> (Registry, Registry) {
        let mut a = Registry::new("a", "A");
        a.define_block(1, 0, &BlockAttributes::named("Stone")).unwrap();
        a.define_block(2, 0, &BlockAttributes::named("Moss")).unwrap();
        let mut b = Registry::new("b", "B");
        b.define_block(4, 0, &BlockAttributes::named("Stone")).unwrap();
        (a, b)
    }

    #[test]
    fn test_same_registry_is_identity_without_build() {
        let (a, _) = pair();
        let cache = ConversionCache::default();
        let conv = cache.get(&a, &a);
        assert!(conv.is_identity());
        assert_eq!(conv.map(id(1, 0)), id(1, 0));
        assert_eq!(cache.builds(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_builds_once_per_ordered_pair() {
        let (a, b) = pair();
        let cache = ConversionCache::new(id(9, 0));
        let first = cache.get(&b, &a);
        let second = cache.get(&b, &a);
        assert_eq!(cache.builds(), 1);
        match (&first, &second) {
            (Conversion::Table(x), Conversion::Table(y)) => assert!(Arc::ptr_eq(x, y)),
            _ => panic!("expected tables"),
        }
        assert_eq!(first.map(id(1, 0)), id(4, 0));
        assert_eq!(first.map(id(2, 5)), id(9, 0));

        cache.get(&a, &b);
        assert_eq!(cache.builds(), 2);
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&a, &b));
    }

    #[test]
    fn test_convert_identifiers() {
        let (a, b) = pair();
        let cache = ConversionCache::default();
        let (p, v) = cache
            .convert_identifiers(&b, &a, &[1, 2, 3], Some(&[0, 0, 6]))
            .unwrap();
        assert_eq!(p, vec![4, 35, 3]);
        assert_eq!(v, vec![0, 0, 6]);
    }
}
