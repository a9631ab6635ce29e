//! Typed indices into the content tables.
//!
//! "No reference" is always `Option::None`; there is no sentinel id.

use std::collections::HashMap;
use std::marker::PhantomData;

macro_rules! content_id {
    ($($(#[$meta:meta])* $name:ident;)+) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
            #[repr(transparent)]
            pub struct $name(pub u16);

            impl $name {
                /// Returns the id as a table index.
                #[inline]
                #[must_use]
                pub const fn index(self) -> usize {
                    self.0 as usize
                }
            }

            impl From<usize> for $name {
                #[allow(clippy::cast_possible_truncation)]
                fn from(index: usize) -> Self {
                    Self(index as u16)
                }
            }
        )+
    };
}

content_id! {
    /// Index of an entity template.
    PrefabId;
    /// Index of an attack definition.
    AttackId;
    /// Index of an item definition.
    ItemId;
    /// Index of an item type.
    ItemTypeId;
    /// Index of a status effect definition.
    StatusEffectId;
    /// Index of a loot table.
    LootTableId;
    /// Index of an animation definition.
    AnimationId;
    /// Interned sprite name.
    SpriteId;
    /// Interned sound name.
    SoundId;
    /// Interned particle effect name.
    ParticlesId;
    /// Index of a villager record owned by the villager module.
    VillagerId;
}

/// Interning table for asset names the simulation only passes through.
///
/// Sprites, sounds and particle effects are owned by the presentation
/// layer. The simulation stores their ids and hands them back in events.
#[derive(Clone, Debug)]
pub struct AssetTable<I> {
    names: Vec<String>,
    index: HashMap<String, u16>,
    _id: PhantomData<I>,
}

impl<I> Default for AssetTable<I> {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            index: HashMap::new(),
            _id: PhantomData,
        }
    }
}

impl<I: From<usize> + Copy> AssetTable<I> {
    /// Returns the id of `name`, interning it if new.
    pub fn intern(&mut self, name: &str) -> I {
        if let Some(&i) = self.index.get(name) {
            return I::from(usize::from(i));
        }
        #[allow(clippy::cast_possible_truncation)]
        let i = self.names.len() as u16;
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), i);
        I::from(usize::from(i))
    }

    /// Looks up an interned name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<I> {
        self.index.get(name).map(|&i| I::from(usize::from(i)))
    }

    /// Name behind an index.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
