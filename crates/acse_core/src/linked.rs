use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Player data that is stored (and owned) by the player's house record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedData {
    pub bed: Option<Item>,
}

/// Keyed access to the records that hold a player's linked data, addressed by
/// player index. `None` means the player has no such record (no house yet).
pub trait LinkedRecords {
    fn linked_data(&self, index: usize) -> Option<LinkedData>;
    fn set_linked_data(&mut self, index: usize, data: LinkedData);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoLinkedRecords;

impl LinkedRecords for NoLinkedRecords {
    fn linked_data(&self, _index: usize) -> Option<LinkedData> {
        None
    }

    fn set_linked_data(&mut self, index: usize, _data: LinkedData) {
        log::debug!("player {index}: no house record to receive linked data");
    }
}

/// In-memory house store; stands in for the house record format.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HouseBeds {
    houses: BTreeMap<usize, LinkedData>,
}

impl HouseBeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, data: LinkedData) {
        self.houses.insert(index, data);
    }

    pub fn get(&self, index: usize) -> Option<&LinkedData> {
        self.houses.get(&index)
    }
}

impl LinkedRecords for HouseBeds {
    fn linked_data(&self, index: usize) -> Option<LinkedData> {
        self.houses.get(&index).copied()
    }

    fn set_linked_data(&mut self, index: usize, data: LinkedData) {
        self.houses.insert(index, data);
    }
}
