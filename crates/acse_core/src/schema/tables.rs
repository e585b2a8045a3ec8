use crate::generation::Generation;
use crate::record::Field;

use super::{FieldEntry, Schema};

const DOUBUTSU_NO_MORI: &[FieldEntry] = &[
    FieldEntry::at(Field::Name, 0x00).with_size(6),
    FieldEntry::at(Field::TownName, 0x06).with_size(6),
    FieldEntry::at(Field::Identifier, 0x0C),
    FieldEntry::at(Field::TownIdentifier, 0x0E),
    FieldEntry::at(Field::Gender, 0x10),
    FieldEntry::at(Field::FaceType, 0x11),
    FieldEntry::absent(Field::HairType),
    FieldEntry::absent(Field::HairColor),
    FieldEntry::at(Field::Tan, 0x48),
    FieldEntry::at(Field::Bells, 0x38),
    FieldEntry::at(Field::Debt, 0x3C),
    FieldEntry::absent(Field::Savings),
    FieldEntry::at(Field::HeldItem, 0x40),
    FieldEntry::at(Field::InventoryBackground, 0x32),
    FieldEntry::at(Field::Shirt, 0x44),
    FieldEntry::at(Field::Pockets, 0x14).with_count(15),
    FieldEntry::absent(Field::Dressers),
    FieldEntry::absent(Field::Birthday),
    FieldEntry::absent(Field::Reset),
    FieldEntry::absent(Field::Bed),
];

const ANIMAL_FOREST: &[FieldEntry] = &[
    FieldEntry::at(Field::Name, 0x00).with_size(8),
    FieldEntry::at(Field::TownName, 0x08).with_size(8),
    FieldEntry::at(Field::Identifier, 0x10),
    FieldEntry::at(Field::TownIdentifier, 0x12),
    FieldEntry::at(Field::Gender, 0x14),
    FieldEntry::at(Field::FaceType, 0x15),
    FieldEntry::absent(Field::HairType),
    FieldEntry::absent(Field::HairColor),
    FieldEntry::at(Field::Tan, 0x4A),
    FieldEntry::at(Field::Bells, 0x3C),
    FieldEntry::at(Field::Debt, 0x40),
    FieldEntry::absent(Field::Savings),
    FieldEntry::at(Field::HeldItem, 0x44),
    FieldEntry::at(Field::InventoryBackground, 0x36),
    FieldEntry::at(Field::Shirt, 0x48),
    FieldEntry::at(Field::Pockets, 0x18).with_count(15),
    FieldEntry::absent(Field::Dressers),
    FieldEntry::absent(Field::Birthday),
    FieldEntry::absent(Field::Reset),
    FieldEntry::absent(Field::Bed),
];

const ANIMAL_CROSSING: &[FieldEntry] = &[
    FieldEntry::at(Field::Name, 0x00).with_size(8),
    FieldEntry::at(Field::TownName, 0x08).with_size(8),
    FieldEntry::at(Field::Identifier, 0x10),
    FieldEntry::at(Field::TownIdentifier, 0x12),
    FieldEntry::at(Field::Gender, 0x14),
    FieldEntry::at(Field::FaceType, 0x15),
    FieldEntry::absent(Field::HairType),
    FieldEntry::absent(Field::HairColor),
    FieldEntry::at(Field::Tan, 0x1240),
    FieldEntry::at(Field::Bells, 0x8C),
    FieldEntry::at(Field::Debt, 0x90),
    FieldEntry::at(Field::Savings, 0x122C),
    FieldEntry::at(Field::HeldItem, 0x98),
    FieldEntry::at(Field::InventoryBackground, 0x86),
    FieldEntry::at(Field::Shirt, 0x9C),
    FieldEntry::at(Field::Pockets, 0x68).with_count(15),
    FieldEntry::absent(Field::Dressers),
    FieldEntry::at(Field::Emotions, 0x10A0).with_count(4),
    FieldEntry::at(Field::Birthday, 0x1084).with_size(2),
    FieldEntry::at(Field::LastPlayDate, 0x1088).with_size(8),
    FieldEntry::at(Field::Reset, 0x1234),
    FieldEntry::absent(Field::Bed),
];

// HairType and HairColor carry FaceType and Tan in their high nibbles.
const WILD_WORLD: &[FieldEntry] = &[
    FieldEntry::at(Field::Name, 0x2282).with_size(8),
    FieldEntry::at(Field::TownName, 0x2276).with_size(8),
    FieldEntry::at(Field::Identifier, 0x2280),
    FieldEntry::at(Field::TownIdentifier, 0x2274),
    FieldEntry::at(Field::Gender, 0x228A),
    FieldEntry::absent(Field::FaceType),
    FieldEntry::at(Field::HairType, 0x223C),
    FieldEntry::at(Field::HairColor, 0x223D),
    FieldEntry::absent(Field::Tan),
    FieldEntry::at(Field::Bells, 0x1B40),
    FieldEntry::at(Field::Debt, 0x1B44),
    FieldEntry::at(Field::Savings, 0x21E4),
    FieldEntry::at(Field::Shirt, 0x223E),
    FieldEntry::at(Field::Hat, 0x2240),
    FieldEntry::at(Field::FaceItem, 0x2242),
    FieldEntry::at(Field::Pockets, 0x1B22).with_count(15),
    // Relocated into the shared dresser region by the quirk layer.
    FieldEntry::at(Field::Dressers, 0).with_count(90),
    FieldEntry::at(Field::Emotions, 0x2250).with_count(4),
    FieldEntry::at(Field::Birthday, 0x2270).with_size(2),
    FieldEntry::absent(Field::Reset),
    FieldEntry::absent(Field::Bed),
];

const CITY_FOLK: &[FieldEntry] = &[
    FieldEntry::at(Field::Name, 0x8004).with_size(16),
    FieldEntry::at(Field::TownName, 0x8014).with_size(16),
    FieldEntry::at(Field::Identifier, 0x8000),
    FieldEntry::at(Field::TownIdentifier, 0x8002),
    FieldEntry::at(Field::Gender, 0x8024),
    FieldEntry::at(Field::FaceType, 0x8025),
    FieldEntry::absent(Field::EyeColor),
    FieldEntry::at(Field::HairType, 0x8026),
    FieldEntry::at(Field::HairColor, 0x8027),
    FieldEntry::at(Field::Tan, 0x8028),
    FieldEntry::at(Field::Bells, 0x802C),
    FieldEntry::at(Field::Savings, 0x8030),
    FieldEntry::at(Field::Debt, 0x8034),
    FieldEntry::at(Field::HeldItem, 0x8060),
    FieldEntry::at(Field::Shirt, 0x8062),
    FieldEntry::at(Field::Hat, 0x8064),
    FieldEntry::at(Field::FaceItem, 0x8066),
    FieldEntry::at(Field::Pockets, 0x8040).with_count(15),
    FieldEntry::at(Field::Dressers, 0).with_count(160),
    FieldEntry::at(Field::Emotions, 0x8080).with_count(4),
    FieldEntry::at(Field::Birthday, 0x8070).with_size(2),
    FieldEntry::at(Field::LastPlayDate, 0x8074).with_size(8),
    FieldEntry::absent(Field::Reset),
    FieldEntry::absent(Field::Bed),
];

const NEW_LEAF: &[FieldEntry] = &[
    FieldEntry::at(Field::Hat, 0x04),
    FieldEntry::at(Field::FaceItem, 0x08),
    FieldEntry::at(Field::Shirt, 0x10),
    FieldEntry::at(Field::Pants, 0x14),
    FieldEntry::at(Field::Socks, 0x18),
    FieldEntry::at(Field::Shoes, 0x1C),
    FieldEntry::at(Field::HeldItem, 0x20),
    FieldEntry::at(Field::HairType, 0x24),
    FieldEntry::at(Field::HairColor, 0x25),
    FieldEntry::at(Field::FaceType, 0x26),
    FieldEntry::at(Field::EyeColor, 0x27),
    FieldEntry::at(Field::Tan, 0x28),
    FieldEntry::at(Field::Identifier, 0x55A6),
    FieldEntry::at(Field::Name, 0x55A8).with_size(0x12),
    FieldEntry::at(Field::TownIdentifier, 0x55BA),
    FieldEntry::at(Field::TownName, 0x55BC).with_size(0x12),
    FieldEntry::at(Field::Gender, 0x55CE),
    FieldEntry::at(Field::Birthday, 0x55D4).with_size(2),
    FieldEntry::at(Field::Emotions, 0x5710).with_count(4),
    FieldEntry::at(Field::TownPassCardImage, 0x5738),
    FieldEntry::at(Field::NewLeafSavings, 0x6B6C),
    FieldEntry::at(Field::NewLeafDebt, 0x6B74),
    FieldEntry::at(Field::IslandMedals, 0x6B7C),
    FieldEntry::at(Field::Pockets, 0x6BD0).with_count(16),
    FieldEntry::at(Field::NewLeafBells, 0x6F08),
    FieldEntry::absent(Field::MeowCoupons),
    FieldEntry::absent(Field::Bells),
    FieldEntry::absent(Field::Reset),
    FieldEntry::absent(Field::Bed),
];

const WELCOME_AMIIBO: &[FieldEntry] = &[
    FieldEntry::at(Field::Hat, 0x04),
    FieldEntry::at(Field::FaceItem, 0x08),
    FieldEntry::at(Field::Shirt, 0x10),
    FieldEntry::at(Field::Pants, 0x14),
    FieldEntry::at(Field::Socks, 0x18),
    FieldEntry::at(Field::Shoes, 0x1C),
    FieldEntry::at(Field::HeldItem, 0x20),
    FieldEntry::at(Field::HairType, 0x24),
    FieldEntry::at(Field::HairColor, 0x25),
    FieldEntry::at(Field::FaceType, 0x26),
    FieldEntry::at(Field::EyeColor, 0x27),
    FieldEntry::at(Field::Tan, 0x28),
    FieldEntry::at(Field::Identifier, 0x55A6),
    FieldEntry::at(Field::Name, 0x55A8).with_size(0x12),
    FieldEntry::at(Field::TownIdentifier, 0x55BA),
    FieldEntry::at(Field::TownName, 0x55BC).with_size(0x12),
    FieldEntry::at(Field::Gender, 0x55CE),
    FieldEntry::at(Field::Birthday, 0x55D4).with_size(2),
    FieldEntry::at(Field::Emotions, 0x5718).with_count(4),
    FieldEntry::at(Field::TownPassCardImage, 0x5740),
    FieldEntry::at(Field::NewLeafSavings, 0x6B6C),
    FieldEntry::at(Field::NewLeafDebt, 0x6B74),
    FieldEntry::at(Field::IslandMedals, 0x6B7C),
    FieldEntry::at(Field::Pockets, 0x6BD0).with_count(16),
    FieldEntry::at(Field::NewLeafBells, 0x6F08),
    FieldEntry::at(Field::MeowCoupons, 0x8D1C),
    FieldEntry::absent(Field::Bells),
    FieldEntry::absent(Field::Reset),
    FieldEntry::absent(Field::Bed),
];

pub(super) fn builtin(generation: Generation) -> Schema {
    let entries = match generation {
        Generation::DoubutsuNoMori => DOUBUTSU_NO_MORI,
        Generation::AnimalForest => ANIMAL_FOREST,
        Generation::AnimalCrossing => ANIMAL_CROSSING,
        Generation::WildWorld => WILD_WORLD,
        Generation::CityFolk => CITY_FOLK,
        Generation::NewLeaf => NEW_LEAF,
        Generation::WelcomeAmiibo => WELCOME_AMIIBO,
    };
    Schema::new(entries.to_vec())
}
