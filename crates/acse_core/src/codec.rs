//! Decode/encode logic per field kind.
//!
//! [`resolve`] turns a schema entry into a [`Codec`] for one generation; the
//! codec then reads or writes the value at an absolute offset. Whether a
//! field exists at all, and where, is the schema's business.

use crate::blob::{BlobRead, BlobWrite};
use crate::core_api::CoreError;
use crate::date::DateRecord;
use crate::generation::{Endian, Generation, ItemWidth, Platform};
use crate::item::{Inventory, Item};
use crate::record::{Field, FieldKind, FieldValue, SplitInt32Pair};
use crate::schema::FieldEntry;
use crate::text;
use crate::town_pass::{ImageCodec, TOWN_PASS_CARD_SIZE, TownPassCard};

/// Word written for a set GameCube boolean.
pub const TRUE_WORD: u32 = 0x250C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Byte,
    U16,
    U32,
    Bytes { count: usize },
    Text { size: usize },
    /// `mirror_low_byte` also stores the id's low byte just before the word.
    Item { mirror_low_byte: bool },
    Items { count: usize },
    Inventory { count: usize },
    Split { writable: bool },
    Date { size: usize, writable: bool },
    TownPassCard,
    BoolWord,
}

/// Per-call state the codecs need besides the blob.
pub struct CodecContext<'a> {
    pub generation: Generation,
    pub index: usize,
    pub images: &'a dyn ImageCodec,
}

pub fn resolve(entry: &FieldEntry, generation: Generation) -> Result<Codec, CoreError> {
    let field = entry.field;
    let platform = generation.platform();
    let kind = field.kind();

    let codec = match kind {
        FieldKind::Byte => Codec::Byte,
        FieldKind::UInt16 => Codec::U16,
        FieldKind::UInt32 => Codec::U32,
        FieldKind::ByteArray => Codec::Bytes {
            count: require(entry.count, field, "count")?,
        },
        FieldKind::FixedString => Codec::Text {
            size: require(entry.size, field, "size")?,
        },
        FieldKind::ItemRef => Codec::Item {
            mirror_low_byte: field == Field::Shirt && platform.is_legacy_console(),
        },
        FieldKind::ItemArray => Codec::Items {
            count: require(entry.count, field, "count")?,
        },
        FieldKind::Inventory => Codec::Inventory {
            count: require(entry.count, field, "count")?,
        },
        FieldKind::SplitInt32Pair => Codec::Split {
            writable: platform == Platform::N3ds,
        },
        FieldKind::DateRecord => Codec::Date {
            size: require(entry.size, field, "size")?,
            writable: field == Field::Birthday
                && matches!(platform, Platform::Gcn | Platform::Nds | Platform::Wii),
        },
        FieldKind::ImageBlob if platform == Platform::N3ds => Codec::TownPassCard,
        FieldKind::BoolWord if platform == Platform::Gcn => Codec::BoolWord,
        FieldKind::ImageBlob | FieldKind::BoolWord | FieldKind::Linked => {
            return Err(CoreError::UnmappedFieldType {
                field,
                kind,
                generation,
            });
        }
    };

    Ok(codec)
}

fn require(
    value: Option<usize>,
    field: Field,
    companion: &'static str,
) -> Result<usize, CoreError> {
    value.ok_or(CoreError::MissingCompanion { field, companion })
}

impl Codec {
    /// Reads the value at `offset`. `None` means the layout carries no
    /// value there (a date block at offset zero).
    pub fn decode<B: BlobRead + ?Sized>(
        self,
        ctx: &CodecContext<'_>,
        blob: &B,
        offset: usize,
    ) -> Result<Option<FieldValue>, CoreError> {
        let generation = ctx.generation;
        let endian = generation.endian();

        let value = match self {
            Self::Byte => FieldValue::Byte(blob.read_u8(offset)?),
            Self::U16 => FieldValue::U16(blob.read_u16(offset, endian)?),
            Self::U32 => FieldValue::U32(blob.read_u32(offset, endian)?),
            Self::Bytes { count } => {
                FieldValue::Bytes(blob.read_bytes(offset, count)?.to_vec())
            }
            Self::Text { size } => FieldValue::Text(text::decode(
                blob.read_bytes(offset, size)?,
                generation.platform(),
            )),
            Self::Item { .. } => FieldValue::Item(read_items(blob, offset, 1, generation)?[0]),
            Self::Items { count } => {
                FieldValue::Items(read_items(blob, offset, count, generation)?)
            }
            Self::Inventory { count } => FieldValue::Inventory(Inventory::new(
                generation,
                ctx.index,
                read_items(blob, offset, count, generation)?,
            )),
            Self::Split { .. } => {
                let words = blob.read_u32_array(offset, 2, Endian::Little)?;
                FieldValue::Split(SplitInt32Pair {
                    int1: words[0],
                    int2: words[1],
                })
            }
            Self::Date { size, .. } => {
                if offset == 0 {
                    return Ok(None);
                }
                FieldValue::Date(DateRecord::from_bytes(blob.read_bytes(offset, size)?))
            }
            Self::TownPassCard => {
                let raw = blob.read_bytes(offset, TOWN_PASS_CARD_SIZE)?.to_vec();
                let image = ctx.images.decode(&raw);
                FieldValue::TownPassCard(TownPassCard { raw, image })
            }
            Self::BoolWord => FieldValue::Flag(blob.read_u32(offset, endian)? != 0),
        };

        Ok(Some(value))
    }

    pub fn encode<B: BlobWrite + ?Sized>(
        self,
        ctx: &CodecContext<'_>,
        blob: &mut B,
        offset: usize,
        field: Field,
        value: &FieldValue,
    ) -> Result<(), CoreError> {
        let generation = ctx.generation;
        let endian = generation.endian();

        match (self, value) {
            (Self::Byte, FieldValue::Byte(v)) => blob.write_u8(offset, *v),
            (Self::U16, FieldValue::U16(v)) => blob.write_u16(offset, *v, endian),
            (Self::U32, FieldValue::U32(v)) => blob.write_u32(offset, *v, endian),
            (Self::Bytes { count }, FieldValue::Bytes(bytes)) => {
                let mut fixed = bytes.clone();
                fixed.resize(count, 0);
                blob.write_bytes(offset, &fixed)
            }
            (Self::Text { size }, FieldValue::Text(s)) => {
                blob.write_bytes(offset, &text::encode(s, size, generation.platform()))
            }
            (Self::Item { mirror_low_byte }, FieldValue::Item(item)) => {
                write_items(blob, offset, &[*item], generation.item_width(), generation)?;
                if mirror_low_byte {
                    let before = offset.checked_sub(1).ok_or(CoreError::OutOfBounds {
                        offset,
                        len: 1,
                        blob_len: blob.bytes().len(),
                    })?;
                    blob.write_u8(before, item.low_byte())?;
                }
                Ok(())
            }
            (Self::Items { count }, FieldValue::Items(items)) => {
                let items = fit(items, count, field);
                write_items(blob, offset, &items, generation.item_width(), generation)
            }
            (Self::Inventory { count }, FieldValue::Inventory(inventory)) => {
                if inventory.generation != generation {
                    log::warn!(
                        "{field} was read from {} but is written to {generation}",
                        inventory.generation
                    );
                }
                let items = fit(&inventory.items, count, field);
                write_items(blob, offset, &items, inventory.item_width(), generation)
            }
            (Self::Split { writable }, FieldValue::Split(pair)) => {
                if !writable {
                    return Ok(());
                }
                blob.write_u32_array(
                    offset,
                    &[pair.int1, pair.int2],
                    Endian::Little,
                )
            }
            (Self::Date { writable, .. }, FieldValue::Date(date)) => {
                if !writable {
                    return Ok(());
                }
                blob.write_bytes(offset, &date.to_month_day_bytes())
            }
            (Self::TownPassCard, FieldValue::TownPassCard(card)) => {
                if card.raw.len() != TOWN_PASS_CARD_SIZE {
                    log::warn!(
                        "town pass card holds {:#x} bytes, expected {TOWN_PASS_CARD_SIZE:#x}; leaving it untouched",
                        card.raw.len()
                    );
                    return Ok(());
                }
                blob.write_bytes(offset, &card.raw)
            }
            (Self::BoolWord, FieldValue::Flag(set)) => {
                blob.write_u32(offset, if *set { TRUE_WORD } else { 0 }, endian)
            }
            (codec, value) => Err(CoreError::InvalidInput(format!(
                "cannot encode {value:?} for {field} with {codec:?}"
            ))),
        }
    }
}

fn read_items<B: BlobRead + ?Sized>(
    blob: &B,
    offset: usize,
    count: usize,
    generation: Generation,
) -> Result<Vec<Item>, CoreError> {
    Ok(match generation.item_width() {
        ItemWidth::Word16 => blob
            .read_u16_array(offset, count, generation.endian())?
            .into_iter()
            .map(Item::new)
            .collect(),
        ItemWidth::Word32 => blob
            .read_u32_array(offset, count, Endian::Little)?
            .into_iter()
            .map(Item::from_u32)
            .collect(),
    })
}

fn write_items<B: BlobWrite + ?Sized>(
    blob: &mut B,
    offset: usize,
    items: &[Item],
    width: ItemWidth,
    generation: Generation,
) -> Result<(), CoreError> {
    match width {
        ItemWidth::Word16 => {
            let words: Vec<u16> = items.iter().map(|item| item.id).collect();
            blob.write_u16_array(offset, &words, generation.endian())
        }
        ItemWidth::Word32 => {
            let words: Vec<u32> = items.iter().map(|item| item.to_u32()).collect();
            blob.write_u32_array(offset, &words, Endian::Little)
        }
    }
}

/// Pads with empty items or truncates so exactly `count` slots are written.
fn fit(items: &[Item], count: usize, field: Field) -> Vec<Item> {
    if items.len() != count {
        log::warn!(
            "{field} holds {} items but its layout has {count} slots",
            items.len()
        );
    }
    let mut out = items.to_vec();
    out.resize(count, Item::default());
    out
}
