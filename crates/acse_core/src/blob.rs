use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::core_api::CoreError;
use crate::generation::Endian;

/// `base + delta`, or `OutOfBounds` when the sum does not fit in a `usize`.
pub fn checked_offset(base: usize, delta: usize, blob_len: usize) -> Result<usize, CoreError> {
    base.checked_add(delta).ok_or(CoreError::OutOfBounds {
        offset: base,
        len: delta,
        blob_len,
    })
}

fn array_len(
    offset: usize,
    count: usize,
    width: usize,
    blob_len: usize,
) -> Result<usize, CoreError> {
    count.checked_mul(width).ok_or(CoreError::OutOfBounds {
        offset,
        len: usize::MAX,
        blob_len,
    })
}

/// Read access to a save image. Every offset is absolute within the blob.
pub trait BlobRead {
    fn bytes(&self) -> &[u8];

    /// Start of the game data inside the container (after any card/file header).
    fn save_data_start(&self) -> usize {
        0
    }

    fn read_bytes(&self, offset: usize, len: usize) -> Result<&[u8], CoreError> {
        let bytes = self.bytes();
        offset
            .checked_add(len)
            .and_then(|end| bytes.get(offset..end))
            .ok_or(CoreError::OutOfBounds {
                offset,
                len,
                blob_len: bytes.len(),
            })
    }

    fn read_u8(&self, offset: usize) -> Result<u8, CoreError> {
        self.read_bytes(offset, 1).map(|b| b[0])
    }

    fn read_u16(&self, offset: usize, endian: Endian) -> Result<u16, CoreError> {
        let buf = self.read_bytes(offset, 2)?;
        Ok(match endian {
            Endian::Big => BigEndian::read_u16(buf),
            Endian::Little => LittleEndian::read_u16(buf),
        })
    }

    fn read_u32(&self, offset: usize, endian: Endian) -> Result<u32, CoreError> {
        let buf = self.read_bytes(offset, 4)?;
        Ok(match endian {
            Endian::Big => BigEndian::read_u32(buf),
            Endian::Little => LittleEndian::read_u32(buf),
        })
    }

    fn read_u16_array(
        &self,
        offset: usize,
        count: usize,
        endian: Endian,
    ) -> Result<Vec<u16>, CoreError> {
        let len = array_len(offset, count, 2, self.bytes().len())?;
        let buf = self.read_bytes(offset, len)?;
        let mut out = vec![0u16; count];
        match endian {
            Endian::Big => BigEndian::read_u16_into(buf, &mut out),
            Endian::Little => LittleEndian::read_u16_into(buf, &mut out),
        }
        Ok(out)
    }

    fn read_u32_array(
        &self,
        offset: usize,
        count: usize,
        endian: Endian,
    ) -> Result<Vec<u32>, CoreError> {
        let len = array_len(offset, count, 4, self.bytes().len())?;
        let buf = self.read_bytes(offset, len)?;
        let mut out = vec![0u32; count];
        match endian {
            Endian::Big => BigEndian::read_u32_into(buf, &mut out),
            Endian::Little => LittleEndian::read_u32_into(buf, &mut out),
        }
        Ok(out)
    }
}

/// Write access to a save image. Writers must be exclusive per blob.
pub trait BlobWrite: BlobRead {
    fn bytes_mut(&mut self) -> &mut [u8];

    fn span_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8], CoreError> {
        let bytes = self.bytes_mut();
        let blob_len = bytes.len();
        offset
            .checked_add(len)
            .and_then(|end| bytes.get_mut(offset..end))
            .ok_or(CoreError::OutOfBounds {
                offset,
                len,
                blob_len,
            })
    }

    fn write_bytes(&mut self, offset: usize, data: &[u8]) -> Result<(), CoreError> {
        self.span_mut(offset, data.len())?.copy_from_slice(data);
        Ok(())
    }

    fn write_u8(&mut self, offset: usize, value: u8) -> Result<(), CoreError> {
        self.span_mut(offset, 1)?[0] = value;
        Ok(())
    }

    fn write_u16(&mut self, offset: usize, value: u16, endian: Endian) -> Result<(), CoreError> {
        let buf = self.span_mut(offset, 2)?;
        match endian {
            Endian::Big => BigEndian::write_u16(buf, value),
            Endian::Little => LittleEndian::write_u16(buf, value),
        }
        Ok(())
    }

    fn write_u32(&mut self, offset: usize, value: u32, endian: Endian) -> Result<(), CoreError> {
        let buf = self.span_mut(offset, 4)?;
        match endian {
            Endian::Big => BigEndian::write_u32(buf, value),
            Endian::Little => LittleEndian::write_u32(buf, value),
        }
        Ok(())
    }

    fn write_u16_array(
        &mut self,
        offset: usize,
        values: &[u16],
        endian: Endian,
    ) -> Result<(), CoreError> {
        let buf = self.span_mut(offset, values.len() * 2)?;
        match endian {
            Endian::Big => BigEndian::write_u16_into(values, buf),
            Endian::Little => LittleEndian::write_u16_into(values, buf),
        }
        Ok(())
    }

    fn write_u32_array(
        &mut self,
        offset: usize,
        values: &[u32],
        endian: Endian,
    ) -> Result<(), CoreError> {
        let buf = self.span_mut(offset, values.len() * 4)?;
        match endian {
            Endian::Big => BigEndian::write_u32_into(values, buf),
            Endian::Little => LittleEndian::write_u32_into(values, buf),
        }
        Ok(())
    }
}

impl BlobRead for [u8] {
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl BlobWrite for [u8] {
    fn bytes_mut(&mut self) -> &mut [u8] {
        self
    }
}

impl BlobRead for Vec<u8> {
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl BlobWrite for Vec<u8> {
    fn bytes_mut(&mut self) -> &mut [u8] {
        self
    }
}

/// An owned save image that knows where its game data begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveBuffer {
    bytes: Vec<u8>,
    save_data_start: usize,
}

impl SaveBuffer {
    pub fn new(bytes: Vec<u8>, save_data_start: usize) -> Self {
        Self {
            bytes,
            save_data_start,
        }
    }

    pub fn zeroed(len: usize, save_data_start: usize) -> Self {
        Self::new(vec![0u8; len], save_data_start)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl BlobRead for SaveBuffer {
    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn save_data_start(&self) -> usize {
        self.save_data_start
    }
}

impl BlobWrite for SaveBuffer {
    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_honour_byte_order() {
        let data = [0x12u8, 0x34, 0x56, 0x78];
        assert_eq!(data[..].read_u16(0, Endian::Big).unwrap(), 0x1234);
        assert_eq!(data[..].read_u16(0, Endian::Little).unwrap(), 0x3412);
        assert_eq!(data[..].read_u32(0, Endian::Big).unwrap(), 0x1234_5678);
        assert_eq!(data[..].read_u32(0, Endian::Little).unwrap(), 0x7856_3412);
    }

    #[test]
    fn arrays_use_requested_order() {
        let mut buf = SaveBuffer::zeroed(8, 0);
        buf.write_u16_array(0, &[0x0102, 0x0304], Endian::Little)
            .unwrap();
        assert_eq!(&buf.bytes()[..4], &[0x02, 0x01, 0x04, 0x03]);
        assert_eq!(
            buf.read_u16_array(0, 2, Endian::Little).unwrap(),
            vec![0x0102, 0x0304]
        );

        buf.write_u32_array(0, &[0xAABB_CCDD, 0x1122_3344], Endian::Big)
            .unwrap();
        assert_eq!(
            buf.read_u32_array(0, 2, Endian::Big).unwrap(),
            vec![0xAABB_CCDD, 0x1122_3344]
        );
    }

    #[test]
    fn out_of_bounds_reports_span() {
        let data = vec![0u8; 4];
        let err = data.read_u32(2, Endian::Big).unwrap_err();
        assert!(matches!(
            err,
            CoreError::OutOfBounds {
                offset: 2,
                len: 4,
                blob_len: 4
            }
        ));

        let mut data = data;
        assert!(data.write_u16(usize::MAX, 1, Endian::Big).is_err());
    }

    #[test]
    fn overflowing_offsets_are_out_of_bounds() {
        assert_eq!(checked_offset(0x10, 0x20, 4), Ok(0x30));
        let err = checked_offset(usize::MAX - 4, 0x2280, 4).unwrap_err();
        assert!(matches!(err, CoreError::OutOfBounds { blob_len: 4, .. }));

        let data = vec![0u8; 4];
        let err = data.read_u32_array(0, usize::MAX / 2, Endian::Big).unwrap_err();
        assert!(matches!(err, CoreError::OutOfBounds { offset: 0, .. }));
    }
}
