//! Block identifiers: the `(primary, variant)` key space shared by every registry.
//!
//! A primary id selects a block type, the variant selects a sub-type, colour or
//! orientation within that type. Every registry addresses the same dense
//! `PRIMARY_ID_LIMIT × VARIANT_LIMIT` grid of slots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::RegistryError;

/// Number of addressable primary ids.
pub const PRIMARY_ID_LIMIT: usize = 4096;

/// Number of variants per primary id.
pub const VARIANT_LIMIT: usize = 16;

/// Total number of identifier slots in a registry.
pub const SLOT_COUNT: usize = PRIMARY_ID_LIMIT * VARIANT_LIMIT;

/// A validated `(primary, variant)` pair.
///
/// Construction goes through [`Identifier::new`], so every value in circulation
/// is inside the identifier space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u16, u8)", into = "(u16, u8)")]
pub struct Identifier {
    primary: u16,
    variant: u8,
}

impl Identifier {
    /// Creates an identifier, rejecting values outside the identifier space.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdentifierOutOfRange`] if `primary >= 4096`
    /// or `variant >= 16`.
    pub fn new(primary: u16, variant: u8) -> Result<Self, RegistryError> {
        if (primary as usize) < PRIMARY_ID_LIMIT && (variant as usize) < VARIANT_LIMIT {
            Ok(Self { primary, variant })
        } else {
            Err(RegistryError::IdentifierOutOfRange {
                primary: primary as u32,
                variant: variant as u32,
            })
        }
    }

    /// Compile-time constructor for well-known identifiers.
    ///
    /// Returns `None` when the pair is out of range.
    pub const fn try_const(primary: u16, variant: u8) -> Option<Self> {
        if (primary as usize) < PRIMARY_ID_LIMIT && (variant as usize) < VARIANT_LIMIT {
            Some(Self { primary, variant })
        } else {
            None
        }
    }

    /// The block type.
    pub fn primary(self) -> u16 {
        self.primary
    }

    /// The sub-type within the block type.
    pub fn variant(self) -> u8 {
        self.variant
    }

    /// Variant 0 stands for the whole primary id when writing.
    pub fn is_family_default(self) -> bool {
        self.variant == 0
    }

    /// The variant-0 identifier of this identifier's family.
    pub fn family(self) -> Self {
        Self {
            primary: self.primary,
            variant: 0,
        }
    }

    /// All sixteen identifiers sharing this primary id, in variant order.
    pub fn siblings(self) -> impl Iterator<Item = Identifier> {
        let primary = self.primary;
        (0..VARIANT_LIMIT as u8).map(move |variant| Identifier { primary, variant })
    }

    /// Flat index into `[primary][variant]` tables.
    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.primary as usize * VARIANT_LIMIT + self.variant as usize
    }

    #[inline]
    pub(crate) fn from_slot(slot: usize) -> Self {
        debug_assert!(slot < SLOT_COUNT);
        Self {
            primary: (slot / VARIANT_LIMIT) as u16,
            variant: (slot % VARIANT_LIMIT) as u8,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.primary, self.variant)
    }
}

impl TryFrom<(u16, u8)> for Identifier {
    type Error = RegistryError;

    fn try_from((primary, variant): (u16, u8)) -> Result<Self, Self::Error> {
        Self::new(primary, variant)
    }
}

impl From<Identifier> for (u16, u8) {
    fn from(id: Identifier) -> Self {
        (id.primary, id.variant)
    }
}
