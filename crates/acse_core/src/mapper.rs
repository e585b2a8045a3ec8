use crate::blob::{BlobRead, BlobWrite, checked_offset};
use crate::codec::{self, CodecContext};
use crate::core_api::CoreError;
use crate::generation::Generation;
use crate::linked::LinkedRecords;
use crate::quirks::{self, QuirkGroup, RESET_FLAG_BIT};
use crate::record::{Field, FieldValue, PlayerRecord};
use crate::schema::{FieldEntry, SchemaRegistry};
use crate::town_pass::{ImageCodec, JpegCodec};

/// Maps player blocks to [`PlayerRecord`]s and back, driven by the schema of
/// each generation.
///
/// Decoding only reads the blob, so one mapper can decode different players
/// from several threads. Encoding needs `&mut` access to the blob.
#[derive(Clone, Copy)]
pub struct RecordMapper<'a> {
    schemas: &'a SchemaRegistry,
    images: &'a dyn ImageCodec,
}

impl<'a> RecordMapper<'a> {
    pub fn new(schemas: &'a SchemaRegistry) -> Self {
        Self {
            schemas,
            images: &JpegCodec,
        }
    }

    pub fn with_image_codec(mut self, images: &'a dyn ImageCodec) -> Self {
        self.images = images;
        self
    }

    pub fn decode<B: BlobRead + ?Sized>(
        &self,
        blob: &B,
        base_offset: usize,
        index: usize,
        generation: Generation,
        linked: &dyn LinkedRecords,
    ) -> Result<PlayerRecord, CoreError> {
        let schema = self.schemas.get(generation)?;
        let blob_len = blob.bytes().len();
        let identifier =
            blob.read_u8(checked_offset(base_offset, schema.identifier_offset()?, blob_len)?)?;
        if identifier == 0x00 || identifier == 0xFF {
            log::debug!("player {index} ({generation}) at {base_offset:#x}: empty slot");
            return Ok(PlayerRecord::sentinel(generation, index));
        }

        let ctx = CodecContext {
            generation,
            index,
            images: self.images,
        };
        let mut record = PlayerRecord::new(generation, index);

        for entry in schema.entries() {
            let Some(offset) = field_offset(entry, blob, base_offset, index, generation)? else {
                continue;
            };
            let codec = codec::resolve(entry, generation)?;
            if let Some(value) = codec.decode(&ctx, blob, offset)? {
                log::trace!("player {index}: {} at {offset:#x}", entry.field);
                record.insert(entry.field, value);
            }
        }

        if let Some(group) = QuirkGroup::for_generation(generation) {
            group.unpack(&mut record);
        }

        if let Some(at) = quirks::reset_flag_offset(generation) {
            let at = checked_offset(base_offset, at, blob_len)?;
            let reset = blob.read_u8(at)? & RESET_FLAG_BIT != 0;
            record.insert(Field::Reset, FieldValue::Flag(reset));
        }

        if let Some(bed) = linked.linked_data(index).and_then(|data| data.bed) {
            record.insert(Field::Bed, FieldValue::Item(bed));
        }

        log::debug!(
            "player {index} ({generation}) at {base_offset:#x}: decoded {} fields",
            record.len()
        );
        Ok(record)
    }

    pub fn encode<B: BlobWrite + ?Sized>(
        &self,
        record: &PlayerRecord,
        blob: &mut B,
        base_offset: usize,
        generation: Generation,
        linked: &mut dyn LinkedRecords,
    ) -> Result<(), CoreError> {
        let index = record.index();
        if !record.exists() {
            log::debug!("player {index}: empty slot, nothing to write");
            return Ok(());
        }
        if record.generation() != generation {
            return Err(CoreError::InvalidInput(format!(
                "player {index} was decoded as {} and cannot be written as {generation}",
                record.generation()
            )));
        }
        let schema = self.schemas.get(generation)?;

        if let Some(bed) = record.item(Field::Bed) {
            match linked.linked_data(index) {
                Some(mut data) => {
                    data.bed = Some(bed);
                    linked.set_linked_data(index, data);
                }
                None => log::debug!("player {index}: no house record, bed {bed} not stored"),
            }
        }

        let mut raw = record.clone();
        if let Some(group) = QuirkGroup::for_generation(generation) {
            group.pack(&mut raw);
        }

        if let Some(at) = quirks::reset_flag_offset(generation)
            && let Some(reset) = raw.flag(Field::Reset)
        {
            let at = checked_offset(base_offset, at, blob.bytes().len())?;
            let current = blob.read_u8(at)?;
            let updated = if reset {
                current | RESET_FLAG_BIT
            } else {
                current & !RESET_FLAG_BIT
            };
            blob.write_u8(at, updated)?;
        }

        let ctx = CodecContext {
            generation,
            index,
            images: self.images,
        };

        for entry in schema.entries() {
            let Some(offset) = field_offset(entry, &*blob, base_offset, index, generation)? else {
                continue;
            };
            let codec = codec::resolve(entry, generation)?;
            let Some(value) = raw.get(entry.field) else {
                continue;
            };
            codec.encode(&ctx, blob, offset, entry.field, value)?;
        }

        log::debug!("player {index} ({generation}) at {base_offset:#x}: written");
        Ok(())
    }
}

/// Where `entry` lives for this player, or `None` when the schema leaves it
/// out.
fn field_offset<B: BlobRead + ?Sized>(
    entry: &FieldEntry,
    blob: &B,
    base_offset: usize,
    index: usize,
    generation: Generation,
) -> Result<Option<usize>, CoreError> {
    let Some(nominal) = entry.offset else {
        return Ok(None);
    };
    let blob_len = blob.bytes().len();
    let save_data_start = blob.save_data_start();
    match quirks::relocated_offset(entry.field, generation, save_data_start, index) {
        Some(Some(offset)) => Ok(Some(offset)),
        Some(None) => Err(CoreError::OutOfBounds {
            offset: save_data_start,
            len: usize::MAX,
            blob_len,
        }),
        None => checked_offset(base_offset, nominal, blob_len).map(Some),
    }
}
