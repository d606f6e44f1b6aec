//! Dense remapping tables between two registries' identifier spaces.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::correspondence::Correspondence;
use crate::identifier::{Identifier, SLOT_COUNT, VARIANT_LIMIT};

/// Errors returned by batch conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("variant array has {actual} entries, primary array has {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("element {index} ({primary}:{variant}) is outside the identifier space")]
    IdentifierOutOfRange {
        index: usize,
        primary: u16,
        variant: u8,
    },
}

/// A total `[4096][16]` map from source identifier to destination identifier.
///
/// Immutable once built; share it behind an [`Arc`].
#[derive(Clone, PartialEq, Eq)]
pub struct ConversionTable {
    entries: Box<[Identifier]>,
}

impl ConversionTable {
    /// Every identifier maps to itself.
    pub fn identity() -> Self {
        Self {
            entries: (0..SLOT_COUNT).map(Identifier::from_slot).collect(),
        }
    }

    /// Builds a table from explicit matches and unmatched identifiers.
    ///
    /// Writes happen in four passes: unavailable family entries, unavailable
    /// specific entries, filter family entries, filter specific entries. A
    /// variant-0 entry covers all sixteen variants of its primary id, so a
    /// specific entry beats a family entry within a list and any filter beats
    /// the fallback.
    pub fn build(
        filters: &[(Identifier, Identifier)],
        unavailable: &[Identifier],
        fallback: Identifier,
    ) -> Self {
        let mut table = Self::identity();
        for family in [true, false] {
            for &from in unavailable.iter().filter(|id| id.is_family_default() == family) {
                table.write(from, fallback);
            }
        }
        for family in [true, false] {
            for &(from, to) in filters.iter().filter(|(id, _)| id.is_family_default() == family) {
                table.write(from, to);
            }
        }
        table
    }

    /// Builds the table for a resolver result.
    pub fn from_correspondence(correspondence: &Correspondence, fallback: Identifier) -> Self {
        let filters: Vec<_> = correspondence.pairs().collect();
        Self::build(&filters, &correspondence.unavailable, fallback)
    }

    /// The destination of `id`.
    #[inline]
    pub fn get(&self, id: Identifier) -> Identifier {
        self.entries[id.slot()]
    }

    /// Number of identifiers that do not map to themselves.
    pub fn remapped_count(&self) -> usize {
        self.entries
            .iter()
            .enumerate()
            .filter(|&(slot, id)| id.slot() != slot)
            .count()
    }

    fn write(&mut self, from: Identifier, to: Identifier) {
        let start = from.slot();
        let end = if from.is_family_default() {
            start + VARIANT_LIMIT
        } else {
            start + 1
        };
        self.entries[start..end].fill(to);
    }
}

impl fmt::Debug for ConversionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionTable")
            .field("remapped", &self.remapped_count())
            .finish()
    }
}

/// A conversion function between two registries.
#[derive(Clone, Debug)]
pub enum Conversion {
    /// Source and destination are the same registry.
    Identity,
    Table(Arc<ConversionTable>),
}

impl Conversion {
    pub fn is_identity(&self) -> bool {
        matches!(self, Conversion::Identity)
    }

    /// Maps one identifier.
    pub fn map(&self, id: Identifier) -> Identifier {
        match self {
            Conversion::Identity => id,
            Conversion::Table(table) => table.get(id),
        }
    }

    /// Batch remap of parallel primary / variant arrays.
    ///
    /// A missing variant array is read as all zeros. The inputs are left
    /// untouched and the outputs have the same length.
    ///
    /// # Errors
    ///
    /// [`ConversionError::LengthMismatch`] when the arrays differ in length,
    /// [`ConversionError::IdentifierOutOfRange`] for the first element outside
    /// the identifier space.
    pub fn convert(
        &self,
        primaries: &[u16],
        variants: Option<&[u8]>,
    ) -> Result<(Vec<u16>, Vec<u8>), ConversionError> {
        if let Some(variants) = variants
            && variants.len() != primaries.len()
        {
            return Err(ConversionError::LengthMismatch {
                expected: primaries.len(),
                actual: variants.len(),
            });
        }

        let mut out_primaries = Vec::with_capacity(primaries.len());
        let mut out_variants = Vec::with_capacity(primaries.len());
        for (index, &primary) in primaries.iter().enumerate() {
            let variant = variants.map_or(0, |v| v[index]);
            let id = Identifier::new(primary, variant).map_err(|_| {
                ConversionError::IdentifierOutOfRange {
                    index,
                    primary,
                    variant,
                }
            })?;
            let to = self.map(id);
            out_primaries.push(to.primary());
            out_variants.push(to.variant());
        }
        Ok((out_primaries, out_variants))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::PRIMARY_ID_LIMIT;

    fn id(p: u16, v: u8) -> Identifier {
        Identifier::new(p, v).unwrap()
    }

    const WOOL: Identifier = match Identifier::try_const(35, 0) {
        Some(id) => id,
        None => panic!(),
    };

    #[test]
    fn test_empty_build_is_identity() {
        let table = ConversionTable::build(&[], &[], WOOL);
        for p in (0..PRIMARY_ID_LIMIT as u16).step_by(37) {
            for v in 0..16 {
                assert_eq!(table.get(id(p, v)), id(p, v));
            }
        }
        assert_eq!(table, ConversionTable::identity());
        assert_eq!(table.remapped_count(), 0);
    }

    #[test]
    fn test_family_entry_fans_out() {
        let table = ConversionTable::build(&[(id(2, 0), id(3, 0))], &[], WOOL);
        for v in 0..16 {
            assert_eq!(table.get(id(2, v)), id(3, 0));
        }
        assert_eq!(table.get(id(1, 0)), id(1, 0));
    }

    #[test]
    fn test_specific_filter_beats_family_filter() {
        // The specific entry comes first in the list but still wins.
        let filters = [(id(17, 2), id(5, 2)), (id(17, 0), id(5, 0))];
        let table = ConversionTable::build(&filters, &[], WOOL);
        assert_eq!(table.get(id(17, 2)), id(5, 2));
        assert_eq!(table.get(id(17, 1)), id(5, 0));
    }

    #[test]
    fn test_filter_beats_fallback() {
        let table = ConversionTable::build(&[(id(44, 3), id(4, 0))], &[id(44, 0)], WOOL);
        assert_eq!(table.get(id(44, 3)), id(4, 0));
        assert_eq!(table.get(id(44, 0)), WOOL);
        assert_eq!(table.get(id(44, 7)), WOOL);
    }

    #[test]
    fn test_specific_unavailable_only_touches_one_slot() {
        let table = ConversionTable::build(&[], &[id(35, 9)], id(1, 0));
        assert_eq!(table.get(id(35, 9)), id(1, 0));
        assert_eq!(table.get(id(35, 8)), id(35, 8));
        assert_eq!(table.remapped_count(), 1);
    }

    #[test]
    fn test_convert_without_variants() {
        let table = ConversionTable::build(&[(id(2, 0), id(3, 0))], &[], WOOL);
        let conv = Conversion::Table(Arc::new(table));
        let primaries = vec![1, 2, 3];
        let (p, v) = conv.convert(&primaries, None).unwrap();
        assert_eq!(p, vec![1, 3, 3]);
        assert_eq!(v, vec![0, 0, 0]);
        assert_eq!(primaries, vec![1, 2, 3]);
    }

    #[test]
    fn test_convert_rejects_bad_input() {
        let conv = Conversion::Identity;
        assert_eq!(
            conv.convert(&[1, 2], Some(&[0])),
            Err(ConversionError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            conv.convert(&[1, 4096], None),
            Err(ConversionError::IdentifierOutOfRange {
                index: 1,
                primary: 4096,
                variant: 0
            })
        );
        assert!(matches!(
            conv.convert(&[1], Some(&[16])),
            Err(ConversionError::IdentifierOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_identity_conversion_copies() {
        let (p, v) = Conversion::Identity
            .convert(&[5, 6], Some(&[1, 2]))
            .unwrap();
        assert_eq!(p, vec![5, 6]);
        assert_eq!(v, vec![1, 2]);
    }
}
