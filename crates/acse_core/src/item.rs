use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::generation::{Generation, ItemWidth};

/// An item reference. Equality and hashing only look at `id`; on 32-bit
/// generations the upper half word carries per-slot flags which are kept so
/// the word can be written back unchanged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Item {
    pub id: u16,
    #[serde(default)]
    pub flags: u16,
}

impl Item {
    pub const fn new(id: u16) -> Self {
        Self { id, flags: 0 }
    }

    pub const fn from_u32(raw: u32) -> Self {
        Self {
            id: raw as u16,
            flags: (raw >> 16) as u16,
        }
    }

    pub const fn to_u32(self) -> u32 {
        self.id as u32 | (self.flags as u32) << 16
    }

    pub const fn low_byte(self) -> u8 {
        self.id as u8
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}", self.id)
    }
}

/// Fixed-capacity item list that remembers which record it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub generation: Generation,
    pub owner_index: usize,
    pub items: Vec<Item>,
}

impl Inventory {
    pub fn new(generation: Generation, owner_index: usize, items: Vec<Item>) -> Self {
        Self {
            generation,
            owner_index,
            items,
        }
    }

    pub fn empty(generation: Generation, owner_index: usize, capacity: usize) -> Self {
        Self::new(generation, owner_index, vec![Item::default(); capacity])
    }

    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn item_width(&self) -> ItemWidth {
        self.generation.item_width()
    }

    pub fn contains(&self, item: Item) -> bool {
        self.items.contains(&item)
    }
}
