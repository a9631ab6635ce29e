//! # Entity Handles
//!
//! Entities are lightweight identifiers consisting of:
//! - A slot index into the component pools
//! - A generation counter for safe slot reuse
//!
//! ```text
//!  31            16 15             0
//! +----------------+----------------+
//! |   generation   |      slot      |
//! +----------------+----------------+
//! ```
//!
//! Generation 0 is never handed out, so the all-zero handle is always invalid.

/// Handle to an entity in a [`World`](super::World).
///
/// A handle stays valid until the entity it names is destroyed. Once the slot
/// is reused, the generation differs and the old handle no longer resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// The explicit invalid handle.
    pub const NULL: Self = Self(0);

    /// Creates a handle from slot and generation.
    ///
    /// # Arguments
    ///
    /// * `slot` - The slot index (0 to 2^16-1)
    /// * `generation` - The generation counter (1 to 2^16-1 for live handles)
    #[inline]
    #[must_use]
    pub const fn new(slot: u16, generation: u16) -> Self {
        Self(((generation as u32) << 16) | (slot as u32))
    }

    /// Returns the slot portion of the handle.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Returns the packed representation.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Rebuilds a handle from its packed representation.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Checks if this is the invalid handle.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.slot(), self.generation())
    }
}

/// Bookkeeping for one slot of the entity table.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SlotEntry {
    /// Generation of the current (or last) occupant.
    pub generation: u16,
    /// Whether the slot is occupied.
    pub alive: bool,
}

impl SlotEntry {
    /// Advances the generation, skipping 0 on wrap.
    #[inline]
    pub fn bump_generation(&mut self) -> u16 {
        self.generation = match self.generation.wrapping_add(1) {
            0 => 1,
            g => g,
        };
        self.generation
    }
}
