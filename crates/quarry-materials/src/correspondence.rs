//! Best-effort matching of one registry's known blocks onto another's by
//! display name and alias text.

use rustc_hash::FxHashMap;

use crate::identifier::Identifier;
use crate::registry::Registry;

/// Legacy colour names with no same-named block in later palettes.
const LEGACY_WOOL_NAMES: [&str; 2] = ["Indigo Wool", "Violet Wool"];
const LEGACY_WOOL_TARGET: &str = "Purple Wool";

/// Which rule produced a match, in the order the rules are tried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchRule {
    /// Identical display name.
    ExactName,
    /// Destination name starts with the source name.
    NamePrefix,
    /// Destination name contains the source name.
    NameSubstring,
    /// Destination alias text contains the source name.
    AkaSubstring,
    /// One of the legacy wool colours, mapped onto purple wool.
    LegacyColor,
}

/// One source identifier that maps somewhere other than itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Filter {
    pub source: Identifier,
    pub destination: Identifier,
    pub rule: MatchRule,
}

/// Result of matching a source registry against a destination registry.
///
/// Every known source block appears in exactly one place: as a [`Filter`], in
/// `unavailable`, or nowhere when it matched itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Correspondence {
    pub filters: Vec<Filter>,
    pub unavailable: Vec<Identifier>,
}

impl Correspondence {
    /// `(source, destination)` pairs in source known-block order.
    pub fn pairs(&self) -> impl Iterator<Item = (Identifier, Identifier)> + '_ {
        self.filters.iter().map(|f| (f.source, f.destination))
    }
}

/// Matches every known block of `source` against `destination`.
///
/// Source blocks are visited in known-block order and each stops at the first
/// rule that yields a match:
///
/// 1. exact display name (a later-defined destination block wins ties);
/// 2. first destination name starting with the source name;
/// 3. first destination name containing the source name;
/// 4. first destination alias containing the source name;
/// 5. "Indigo Wool" / "Violet Wool" onto the exact "Purple Wool" entry.
///
/// Anything else is unavailable. Matches onto the same identifier are omitted.
pub fn resolve_correspondence(source: &Registry, destination: &Registry) -> Correspondence {
    let dest_store = destination.store();
    let dest_known = destination.known_identifiers();

    let mut by_name: FxHashMap<&str, Identifier> = FxHashMap::default();
    for &id in dest_known {
        by_name.insert(dest_store.name(id), id);
    }

    let mut result = Correspondence::default();
    for &from in source.known_identifiers() {
        let name = source.store().name(from);

        let found = by_name
            .get(name)
            .map(|&id| (id, MatchRule::ExactName))
            .or_else(|| {
                first_known(dest_known, |id| dest_store.name(id).starts_with(name))
                    .map(|id| (id, MatchRule::NamePrefix))
            })
            .or_else(|| {
                first_known(dest_known, |id| dest_store.name(id).contains(name))
                    .map(|id| (id, MatchRule::NameSubstring))
            })
            .or_else(|| {
                first_known(dest_known, |id| dest_store.aka(id).contains(name))
                    .map(|id| (id, MatchRule::AkaSubstring))
            })
            .or_else(|| {
                if LEGACY_WOOL_NAMES.contains(&name) {
                    by_name
                        .get(LEGACY_WOOL_TARGET)
                        .map(|&id| (id, MatchRule::LegacyColor))
                } else {
                    None
                }
            });

        match found {
            Some((to, rule)) => {
                if to != from {
                    tracing::debug!(
                        source = %source.label(),
                        destination = %destination.label(),
                        from = %from,
                        to = %to,
                        ?rule,
                        "{:?} -> {:?}",
                        name,
                        dest_store.name(to)
                    );
                    result.filters.push(Filter {
                        source: from,
                        destination: to,
                        rule,
                    });
                }
            }
            None => {
                tracing::debug!(
                    source = %source.label(),
                    destination = %destination.label(),
                    from = %from,
                    "no match for {:?}",
                    name
                );
                result.unavailable.push(from);
            }
        }
    }
    result
}

fn first_known(known: &[Identifier], pred: impl Fn(Identifier) -> bool) -> Option<Identifier> {
    known.iter().copied().find(|&id| pred(id))
}
