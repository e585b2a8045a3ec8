//! Generation-specific corrections that sit outside the per-kind codecs.
//!
//! Some layouts overlay two logical values in one byte or nibble pair. Those
//! are unpacked right after the schema loop on decode and packed right
//! before it on encode. The remaining overrides relocate a field to an
//! absolute position outside the player block.

use crate::generation::Generation;
use crate::record::{Field, FieldValue, PlayerRecord};

/// Bit in the reset byte that marks a pending Mr. Resetti visit.
pub const RESET_FLAG_BIT: u8 = 0x02;

const WILD_WORLD_MAX_TAN: u8 = 3;
const WILD_WORLD_MAX_HAIR_COLOR: u8 = 7;
const CITY_FOLK_MAX_TAN: u8 = 7;
const CITY_FOLK_MAX_HAIR_TYPE: u8 = 0x19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuirkGroup {
    /// HairColor byte = HairColor | Tan << 4, HairType byte = FaceType | HairType << 4.
    WildWorldNibbles,
    /// Tan stored shifted left by one; FaceType's high nibble is kept as EyeColor.
    CityFolkShifted,
}

impl QuirkGroup {
    pub fn for_generation(generation: Generation) -> Option<Self> {
        match generation {
            Generation::WildWorld => Some(Self::WildWorldNibbles),
            Generation::CityFolk => Some(Self::CityFolkShifted),
            _ => None,
        }
    }

    /// Raw bytes to logical values. Out-of-range values are clamped.
    pub fn unpack(self, record: &mut PlayerRecord) {
        match self {
            Self::WildWorldNibbles => {
                if let Some(FieldValue::Byte(packed)) = record.get(Field::HairColor).cloned() {
                    let mut hair_color = packed & 0x0F;
                    let mut tan = (packed >> 4) & 0x0F;
                    if tan > WILD_WORLD_MAX_TAN {
                        log::warn!("player {}: tan {tan} out of range, using 0", record.index());
                        tan = 0;
                    }
                    if hair_color > WILD_WORLD_MAX_HAIR_COLOR {
                        log::warn!(
                            "player {}: hair color {hair_color} out of range, using 0",
                            record.index()
                        );
                        hair_color = 0;
                    }
                    record.insert(Field::HairColor, FieldValue::Byte(hair_color));
                    record.insert(Field::Tan, FieldValue::Byte(tan));
                }
                if let Some(FieldValue::Byte(packed)) = record.get(Field::HairType).cloned() {
                    record.insert(Field::FaceType, FieldValue::Byte(packed & 0x0F));
                    record.insert(Field::HairType, FieldValue::Byte(packed >> 4));
                }
            }
            Self::CityFolkShifted => {
                if let Some(FieldValue::Byte(stored)) = record.get(Field::Tan).cloned() {
                    // Tan is stored pre-shifted; the low bit is not understood.
                    let mut tan = stored >> 1;
                    if tan > CITY_FOLK_MAX_TAN {
                        log::warn!("player {}: tan {tan} out of range, using 0", record.index());
                        tan = 0;
                    }
                    record.insert(Field::Tan, FieldValue::Byte(tan));
                }
                if let Some(FieldValue::Byte(hair_type)) = record.get(Field::HairType).cloned()
                    && hair_type > CITY_FOLK_MAX_HAIR_TYPE
                {
                    log::warn!(
                        "player {}: hair type {hair_type:#x} out of range, using {CITY_FOLK_MAX_HAIR_TYPE:#x}",
                        record.index()
                    );
                    record.insert(Field::HairType, FieldValue::Byte(CITY_FOLK_MAX_HAIR_TYPE));
                }
                if let Some(FieldValue::Byte(face)) = record.get(Field::FaceType).cloned() {
                    // Not a real eye color, just a holder for the high nibble.
                    record.insert(Field::EyeColor, FieldValue::Byte(face & 0xF0));
                    record.insert(Field::FaceType, FieldValue::Byte(face & 0x0F));
                }
            }
        }
    }

    /// Logical values back to the raw bytes the schema loop writes.
    pub fn pack(self, record: &mut PlayerRecord) {
        match self {
            Self::WildWorldNibbles => {
                if record.get(Field::HairColor).is_some() {
                    let packed = (record.byte(Field::HairColor) & 0x0F)
                        | (record.byte(Field::Tan) & 0x0F) << 4;
                    record.insert(Field::HairColor, FieldValue::Byte(packed));
                }
                if record.get(Field::HairType).is_some() {
                    let packed = (record.byte(Field::FaceType) & 0x0F)
                        | (record.byte(Field::HairType) & 0x0F) << 4;
                    record.insert(Field::HairType, FieldValue::Byte(packed));
                }
            }
            Self::CityFolkShifted => {
                if record.get(Field::Tan).is_some() {
                    let shifted = record.byte(Field::Tan) << 1;
                    record.insert(Field::Tan, FieldValue::Byte(shifted));
                }
                if record.get(Field::FaceType).is_some() {
                    let combined = record
                        .byte(Field::EyeColor)
                        .wrapping_add(record.byte(Field::FaceType));
                    record.insert(Field::FaceType, FieldValue::Byte(combined));
                }
            }
        }
    }
}

/// Offset of the reset byte inside the player block, for generations that
/// keep the reset flag as a single bit rather than a schema word.
pub fn reset_flag_offset(generation: Generation) -> Option<usize> {
    match generation {
        Generation::CityFolk => Some(0x8670),
        Generation::NewLeaf => Some(0x5702),
        Generation::WelcomeAmiibo => Some(0x570A),
        _ => None,
    }
}

/// Absolute position of a field that lives outside the player block.
///
/// Dressers on the DS and Wii sit in a separate packed region, one stride per
/// player, regardless of the schema's nominal offset. `Some(None)` means the
/// field is relocated but its position does not fit in a `usize`.
pub fn relocated_offset(
    field: Field,
    generation: Generation,
    save_data_start: usize,
    index: usize,
) -> Option<Option<usize>> {
    let (base, stride): (usize, usize) = match (field, generation) {
        (Field::Dressers, Generation::WildWorld) => (0x15430, 0xB4),
        (Field::Dressers, Generation::CityFolk) => (0x1F3038, 0x140),
        _ => return None,
    };
    Some(
        stride
            .checked_mul(index)
            .and_then(|slot| slot.checked_add(base))
            .and_then(|rel| rel.checked_add(save_data_start)),
    )
}

/// The field whose stored byte also carries `field`, when `field` has no
/// bytes of its own in `generation`.
pub fn packed_into(field: Field, generation: Generation) -> Option<Field> {
    match (QuirkGroup::for_generation(generation)?, field) {
        (QuirkGroup::WildWorldNibbles, Field::Tan) => Some(Field::HairColor),
        (QuirkGroup::WildWorldNibbles, Field::FaceType) => Some(Field::HairType),
        (QuirkGroup::CityFolkShifted, Field::EyeColor) => Some(Field::FaceType),
        _ => None,
    }
}
