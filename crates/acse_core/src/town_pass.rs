use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Size of the town pass card region on the 3DS.
pub const TOWN_PASS_CARD_SIZE: usize = 0x1400;

/// Turns a raw embedded picture into something displayable.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, raw: &[u8]) -> Option<DynamicImage>;
}

/// The town pass card region holds a JPEG followed by zero fill.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegCodec;

impl ImageCodec for JpegCodec {
    fn decode(&self, raw: &[u8]) -> Option<DynamicImage> {
        match image::load_from_memory_with_format(raw, ImageFormat::Jpeg) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("town pass card is not a decodable JPEG: {e}");
                None
            }
        }
    }
}

/// Keeps the raw bytes only.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawOnlyCodec;

impl ImageCodec for RawOnlyCodec {
    fn decode(&self, _raw: &[u8]) -> Option<DynamicImage> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct TownPassCard {
    pub raw: Vec<u8>,
    pub image: Option<DynamicImage>,
}

impl TownPassCard {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.dimensions())
    }
}

impl PartialEq for TownPassCard {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Serialize for TownPassCard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TownPassCard", 3)?;
        state.serialize_field("bytes", &self.raw.len())?;
        state.serialize_field("width", &self.dimensions().map(|(w, _)| w))?;
        state.serialize_field("height", &self.dimensions().map(|(_, h)| h))?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fill_is_not_an_image() {
        let raw = vec![0u8; TOWN_PASS_CARD_SIZE];
        assert!(JpegCodec.decode(&raw).is_none());
        assert!(RawOnlyCodec.decode(&raw).is_none());
    }

    #[test]
    fn cards_compare_by_raw_bytes() {
        let a = TownPassCard {
            raw: vec![1, 2, 3],
            image: None,
        };
        let b = TownPassCard {
            raw: vec![1, 2, 3],
            image: Some(DynamicImage::new_rgb8(1, 1)),
        };
        assert_eq!(a, b);
        assert_eq!(b.dimensions(), Some((1, 1)));
    }
}
