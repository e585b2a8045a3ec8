use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core_api::CoreError;
use crate::date::DateRecord;
use crate::generation::Generation;
use crate::item::{Inventory, Item};
use crate::town_pass::TownPassCard;

/// Logical player fields. Names are stable across generations; only their
/// placement in the save differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Name,
    TownName,
    Identifier,
    TownIdentifier,
    Gender,
    FaceType,
    EyeColor,
    HairType,
    HairColor,
    Tan,
    Bells,
    Debt,
    Savings,
    HeldItem,
    InventoryBackground,
    Shirt,
    Hat,
    FaceItem,
    Pants,
    Socks,
    Shoes,
    Pockets,
    Dressers,
    Emotions,
    Birthday,
    LastPlayDate,
    NewLeafBells,
    NewLeafDebt,
    NewLeafSavings,
    MeowCoupons,
    IslandMedals,
    Reset,
    TownPassCardImage,
    Bed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Byte,
    UInt16,
    UInt32,
    ByteArray,
    FixedString,
    ItemRef,
    ItemArray,
    Inventory,
    SplitInt32Pair,
    DateRecord,
    ImageBlob,
    BoolWord,
    /// Supplied by a linked record rather than read from the player block.
    Linked,
}

impl Field {
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Name | Self::TownName => FieldKind::FixedString,
            Self::Identifier | Self::TownIdentifier => FieldKind::UInt16,
            Self::Gender
            | Self::FaceType
            | Self::EyeColor
            | Self::HairType
            | Self::HairColor
            | Self::Tan => FieldKind::Byte,
            Self::Bells | Self::Debt | Self::Savings => FieldKind::UInt32,
            Self::HeldItem
            | Self::InventoryBackground
            | Self::Shirt
            | Self::Hat
            | Self::FaceItem
            | Self::Pants
            | Self::Socks
            | Self::Shoes => FieldKind::ItemRef,
            Self::Pockets => FieldKind::Inventory,
            Self::Dressers => FieldKind::ItemArray,
            Self::Emotions => FieldKind::ByteArray,
            Self::Birthday | Self::LastPlayDate => FieldKind::DateRecord,
            Self::NewLeafBells
            | Self::NewLeafDebt
            | Self::NewLeafSavings
            | Self::MeowCoupons
            | Self::IslandMedals => FieldKind::SplitInt32Pair,
            Self::Reset => FieldKind::BoolWord,
            Self::TownPassCardImage => FieldKind::ImageBlob,
            Self::Bed => FieldKind::Linked,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::TownName => "TownName",
            Self::Identifier => "Identifier",
            Self::TownIdentifier => "TownIdentifier",
            Self::Gender => "Gender",
            Self::FaceType => "FaceType",
            Self::EyeColor => "EyeColor",
            Self::HairType => "HairType",
            Self::HairColor => "HairColor",
            Self::Tan => "Tan",
            Self::Bells => "Bells",
            Self::Debt => "Debt",
            Self::Savings => "Savings",
            Self::HeldItem => "HeldItem",
            Self::InventoryBackground => "InventoryBackground",
            Self::Shirt => "Shirt",
            Self::Hat => "Hat",
            Self::FaceItem => "FaceItem",
            Self::Pants => "Pants",
            Self::Socks => "Socks",
            Self::Shoes => "Shoes",
            Self::Pockets => "Pockets",
            Self::Dressers => "Dressers",
            Self::Emotions => "Emotions",
            Self::Birthday => "Birthday",
            Self::LastPlayDate => "LastPlayDate",
            Self::NewLeafBells => "NewLeafBells",
            Self::NewLeafDebt => "NewLeafDebt",
            Self::NewLeafSavings => "NewLeafSavings",
            Self::MeowCoupons => "MeowCoupons",
            Self::IslandMedals => "IslandMedals",
            Self::Reset => "Reset",
            Self::TownPassCardImage => "TownPassCardImage",
            Self::Bed => "Bed",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Two words that together hold one obfuscated quantity. Merging them is
/// left to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitInt32Pair {
    pub int1: u32,
    pub int2: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Byte(u8),
    U16(u16),
    U32(u32),
    Bytes(Vec<u8>),
    Text(String),
    Item(Item),
    Items(Vec<Item>),
    Inventory(Inventory),
    Split(SplitInt32Pair),
    Date(DateRecord),
    TownPassCard(TownPassCard),
    Flag(bool),
}

impl FieldValue {
    /// Whether this value can be stored in a field of `kind`.
    pub fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (Self::Byte(_), FieldKind::Byte)
                | (Self::U16(_), FieldKind::UInt16)
                | (Self::U32(_), FieldKind::UInt32)
                | (Self::Bytes(_), FieldKind::ByteArray)
                | (Self::Text(_), FieldKind::FixedString)
                | (Self::Item(_), FieldKind::ItemRef | FieldKind::Linked)
                | (Self::Items(_), FieldKind::ItemArray)
                | (Self::Inventory(_), FieldKind::Inventory)
                | (Self::Split(_), FieldKind::SplitInt32Pair)
                | (Self::Date(_), FieldKind::DateRecord)
                | (Self::TownPassCard(_), FieldKind::ImageBlob)
                | (Self::Flag(_), FieldKind::BoolWord)
        )
    }

    /// The value a field of `kind` holds on a record that does not exist.
    pub fn zero(kind: FieldKind, generation: Generation, index: usize) -> Self {
        match kind {
            FieldKind::Byte => Self::Byte(0),
            FieldKind::UInt16 => Self::U16(0),
            FieldKind::UInt32 => Self::U32(0),
            FieldKind::ByteArray => Self::Bytes(Vec::new()),
            FieldKind::FixedString => Self::Text(String::new()),
            FieldKind::ItemRef | FieldKind::Linked => Self::Item(Item::default()),
            FieldKind::ItemArray => Self::Items(Vec::new()),
            FieldKind::Inventory => Self::Inventory(Inventory::new(generation, index, Vec::new())),
            FieldKind::SplitInt32Pair => Self::Split(SplitInt32Pair::default()),
            FieldKind::DateRecord => Self::Date(DateRecord::default()),
            FieldKind::ImageBlob => Self::TownPassCard(TownPassCard {
                raw: Vec::new(),
                image: None,
            }),
            FieldKind::BoolWord => Self::Flag(false),
        }
    }
}

/// A decoded player, independent of the generation it was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    generation: Generation,
    index: usize,
    exists: bool,
    values: BTreeMap<Field, FieldValue>,
}

impl PlayerRecord {
    pub fn new(generation: Generation, index: usize) -> Self {
        Self {
            generation,
            index,
            exists: true,
            values: BTreeMap::new(),
        }
    }

    /// An empty slot: no values, every accessor yields its zero value.
    pub fn sentinel(generation: Generation, index: usize) -> Self {
        Self {
            exists: false,
            ..Self::new(generation, index)
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// The stored value, or the field's zero value when absent.
    pub fn value(&self, field: Field) -> FieldValue {
        self.get(field)
            .cloned()
            .unwrap_or_else(|| FieldValue::zero(field.kind(), self.generation, self.index))
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Stores `value`, rejecting values of the wrong kind for `field`.
    pub fn set(
        &mut self,
        field: Field,
        value: FieldValue,
    ) -> Result<Option<FieldValue>, CoreError> {
        if !value.fits(field.kind()) {
            return Err(CoreError::InvalidInput(format!(
                "{field} holds {:?} values, got {value:?}",
                field.kind()
            )));
        }
        Ok(self.values.insert(field, value))
    }

    pub fn remove(&mut self, field: Field) -> Option<FieldValue> {
        self.values.remove(&field)
    }

    pub(crate) fn insert(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    pub fn byte(&self, field: Field) -> u8 {
        match self.get(field) {
            Some(FieldValue::Byte(v)) => *v,
            _ => 0,
        }
    }

    pub fn u32(&self, field: Field) -> u32 {
        match self.get(field) {
            Some(FieldValue::U32(v)) => *v,
            _ => 0,
        }
    }

    pub fn text(&self, field: Field) -> &str {
        match self.get(field) {
            Some(FieldValue::Text(v)) => v,
            _ => "",
        }
    }

    pub fn item(&self, field: Field) -> Option<Item> {
        match self.get(field) {
            Some(FieldValue::Item(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn flag(&self, field: Field) -> Option<bool> {
        match self.get(field) {
            Some(FieldValue::Flag(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        self.text(Field::Name)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.insert(Field::Name, FieldValue::Text(name.into()));
    }

    pub fn bells(&self) -> u32 {
        self.u32(Field::Bells)
    }

    /// Stores the value unchecked; generations without a `Bells` offset drop
    /// it on encode. `Session::set_field` refuses such edits instead.
    pub fn set_bells(&mut self, bells: u32) {
        self.insert(Field::Bells, FieldValue::U32(bells));
    }

    pub fn pockets(&self) -> Option<&Inventory> {
        match self.get(Field::Pockets) {
            Some(FieldValue::Inventory(inv)) => Some(inv),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_yields_zero_values() {
        let record = PlayerRecord::sentinel(Generation::AnimalCrossing, 3);
        assert!(!record.exists());
        assert!(record.is_empty());
        assert_eq!(record.value(Field::Bells), FieldValue::U32(0));
        assert_eq!(record.value(Field::Name), FieldValue::Text(String::new()));
        assert_eq!(record.name(), "");
        assert_eq!(record.flag(Field::Reset), None);
    }

    #[test]
    fn set_rejects_mismatched_kind() {
        let mut record = PlayerRecord::new(Generation::WildWorld, 0);
        let err = record
            .set(Field::Bells, FieldValue::Text("lots".into()))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));

        record.set(Field::Bed, FieldValue::Item(Item::new(0x1234))).unwrap();
        assert_eq!(record.item(Field::Bed), Some(Item::new(0x1234)));
    }

    #[test]
    fn every_field_kind_has_a_fitting_zero() {
        let fields = [
            Field::Name,
            Field::Identifier,
            Field::Gender,
            Field::Bells,
            Field::Shirt,
            Field::Pockets,
            Field::Dressers,
            Field::Emotions,
            Field::Birthday,
            Field::NewLeafBells,
            Field::Reset,
            Field::TownPassCardImage,
            Field::Bed,
        ];
        for field in fields {
            let zero = FieldValue::zero(field.kind(), Generation::NewLeaf, 0);
            assert!(zero.fits(field.kind()), "{field}");
        }
    }
}
