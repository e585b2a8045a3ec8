use std::fmt;

use serde::{Deserialize, Serialize};

use crate::blob::SaveBuffer;
use crate::generation::Generation;
use crate::linked::HouseBeds;
use crate::mapper::RecordMapper;
use crate::quirks;
use crate::record::{Field, FieldValue, PlayerRecord};
use crate::schema::SchemaRegistry;

use super::error::CoreError;

/// Where the player blocks sit inside a whole save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLayout {
    /// Start of the game's data region; the base of absolute overrides.
    pub save_data_start: usize,
    pub first_offset: usize,
    pub stride: usize,
    pub count: usize,
}

impl PlayerLayout {
    pub const fn for_generation(generation: Generation) -> Self {
        let (save_data_start, first_offset, stride) = match generation {
            Generation::DoubutsuNoMori | Generation::AnimalForest => (0, 0x20, 0x590),
            Generation::AnimalCrossing => (0x26040, 0x26040 + 0x20, 0x2440),
            Generation::WildWorld => (0, 0x0C, 0x228C),
            Generation::CityFolk => (0, 0x1140, 0x86C0),
            Generation::NewLeaf => (0, 0x20, 0x9F10),
            Generation::WelcomeAmiibo => (0, 0xA0, 0xA480),
        };
        Self {
            save_data_start,
            first_offset,
            stride,
            count: 4,
        }
    }

    /// Start of player `index`'s block, or `None` when it does not fit in a
    /// `usize`.
    pub const fn record_offset(&self, index: usize) -> Option<usize> {
        match self.stride.checked_mul(index) {
            Some(step) => self.first_offset.checked_add(step),
            None => None,
        }
    }

    fn checked_record_offset(&self, index: usize, blob_len: usize) -> Result<usize, CoreError> {
        self.record_offset(index).ok_or(CoreError::OutOfBounds {
            offset: self.first_offset,
            len: self.stride.saturating_mul(index),
            blob_len,
        })
    }
}

pub struct Engine {
    schemas: SchemaRegistry,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("generations", &self.schemas.generations().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct Session {
    generation: Generation,
    layout: PlayerLayout,
    schemas: SchemaRegistry,
    original: Vec<u8>,
    players: Vec<PlayerRecord>,
    houses: HouseBeds,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            schemas: SchemaRegistry::builtin(),
        }
    }

    /// An engine over caller-supplied schemas, validated up front.
    pub fn with_schemas(schemas: SchemaRegistry) -> Result<Self, CoreError> {
        for generation in schemas.generations() {
            schemas.get(generation)?.validate(generation)?;
        }
        Ok(Self { schemas })
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Opens a save with the default player layout and no house records.
    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        generation: Generation,
    ) -> Result<Session, CoreError> {
        self.open(
            bytes,
            generation,
            PlayerLayout::for_generation(generation),
            HouseBeds::new(),
        )
    }

    pub fn open<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        generation: Generation,
        layout: PlayerLayout,
        houses: HouseBeds,
    ) -> Result<Session, CoreError> {
        let bytes = bytes.as_ref();
        if layout.stride == 0 && layout.count > 1 {
            return Err(CoreError::InvalidInput(
                "player stride must be non-zero when more than one player is read".to_string(),
            ));
        }

        let blob = SaveBuffer::new(bytes.to_vec(), layout.save_data_start);
        let mapper = RecordMapper::new(&self.schemas);
        let players = (0..layout.count)
            .map(|index| {
                let base = layout.checked_record_offset(index, bytes.len())?;
                mapper.decode(&blob, base, index, generation, &houses)
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "opened {generation} save: {} of {} player slots in use",
            players.iter().filter(|p| p.exists()).count(),
            layout.count
        );

        Ok(Session {
            generation,
            layout,
            schemas: self.schemas.clone(),
            original: bytes.to_vec(),
            players,
            houses,
        })
    }
}

impl Session {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn layout(&self) -> &PlayerLayout {
        &self.layout
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Result<&PlayerRecord, CoreError> {
        self.players.get(index).ok_or_else(|| self.no_such_player(index))
    }

    pub fn player_mut(&mut self, index: usize) -> Result<&mut PlayerRecord, CoreError> {
        let err = self.no_such_player(index);
        self.players.get_mut(index).ok_or(err)
    }

    /// Sets `field` on player `index`. Fails with `InvalidInput` when the
    /// edit could never reach the saved bytes.
    pub fn set_field(
        &mut self,
        index: usize,
        field: Field,
        value: FieldValue,
    ) -> Result<Option<FieldValue>, CoreError> {
        if !self.player(index)?.exists() {
            return Err(CoreError::InvalidInput(format!(
                "player {index} is an empty slot and cannot be edited"
            )));
        }
        if !self.stores(index, field)? {
            return Err(CoreError::InvalidInput(format!(
                "{field} is not stored in {} saves",
                self.generation
            )));
        }
        self.player_mut(index)?.set(field, value)
    }

    /// Whether an edit to `field` on player `index` reaches the saved bytes.
    pub fn stores(&self, index: usize, field: Field) -> Result<bool, CoreError> {
        let schema = self.schemas.get(self.generation)?;
        Ok(match field {
            Field::Reset if quirks::reset_flag_offset(self.generation).is_some() => true,
            Field::Bed => self.houses.get(index).is_some(),
            _ => {
                schema.offset(field).is_some()
                    || quirks::packed_into(field, self.generation)
                        .is_some_and(|carrier| schema.offset(carrier).is_some())
            }
        })
    }

    pub fn houses(&self) -> &HouseBeds {
        &self.houses
    }

    pub fn to_bytes_unmodified(&self) -> Vec<u8> {
        self.original.clone()
    }

    /// Re-encodes every player into a copy of the original bytes. Beds set on
    /// a player are written back to that player's house record.
    pub fn to_bytes_modified(&mut self) -> Result<Vec<u8>, CoreError> {
        let mut blob = SaveBuffer::new(self.original.clone(), self.layout.save_data_start);
        let mapper = RecordMapper::new(&self.schemas);
        for player in &self.players {
            let base = self
                .layout
                .checked_record_offset(player.index(), self.original.len())?;
            mapper.encode(player, &mut blob, base, self.generation, &mut self.houses)?;
        }
        Ok(blob.into_bytes())
    }

    fn no_such_player(&self, index: usize) -> CoreError {
        CoreError::InvalidInput(format!(
            "player {index} does not exist; this save has {} slots",
            self.players.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layouts_fit_four_players() {
        for generation in Generation::ALL {
            let layout = PlayerLayout::for_generation(generation);
            assert_eq!(layout.count, 4);
            assert!(layout.record_offset(3) > Some(layout.first_offset));
        }
        let ac = PlayerLayout::for_generation(Generation::AnimalCrossing);
        assert_eq!(ac.record_offset(0), Some(0x26060));
        assert_eq!(ac.record_offset(1), Some(0x26060 + 0x2440));
    }

    #[test]
    fn record_offset_overflow_is_none() {
        let layout = PlayerLayout {
            save_data_start: 0,
            first_offset: usize::MAX - 4,
            stride: 0x100,
            count: 2,
        };
        assert_eq!(layout.record_offset(0), Some(usize::MAX - 4));
        assert_eq!(layout.record_offset(1), None);
        let wide = PlayerLayout {
            stride: usize::MAX,
            first_offset: 0,
            ..layout
        };
        assert_eq!(wide.record_offset(2), None);
    }

    #[test]
    fn engine_debug_lists_generations() {
        let text = format!("{:?}", Engine::new());
        assert!(text.contains("WildWorld"));
    }
}
