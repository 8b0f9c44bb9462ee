/*!
 * Data Views
 * Borrowed byte views with endian-aware decoding
 */

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

use crate::core::types::{ByteOrder, Size};
use crate::memory::types::{MapError, MapResult};

/// Borrowed view over mapped bytes
///
/// Carries the byte order and pointer width in effect when the view was
/// produced so structured decoding matches the remote's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataView<'a> {
    bytes: &'a [u8],
    byte_order: ByteOrder,
    address_byte_size: u32,
}

impl<'a> DataView<'a> {
    pub fn new(bytes: &'a [u8], byte_order: ByteOrder, address_byte_size: u32) -> Self {
        Self {
            bytes,
            byte_order,
            address_byte_size,
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> Size {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn address_byte_size(&self) -> u32 {
        self.address_byte_size
    }

    /// Decode an unsigned integer of `size` bytes at `*offset`, advancing it
    pub fn read_uint(&self, offset: &mut Size, size: Size) -> MapResult<u64> {
        if size == 0 {
            return Err(MapError::ZeroSize);
        }
        if size > 8 {
            return Err(MapError::UnsupportedSize(size));
        }

        let end = offset.checked_add(size).ok_or(MapError::ShortShadow)?;
        let slice = self.bytes.get(*offset..end).ok_or(MapError::ShortShadow)?;

        let value = match self.byte_order {
            ByteOrder::Little => LittleEndian::read_uint(slice, size),
            ByteOrder::Big => BigEndian::read_uint(slice, size),
            ByteOrder::Invalid => return Err(MapError::InvalidByteOrder),
        };

        *offset = end;
        Ok(value)
    }

    pub fn read_u8(&self, offset: &mut Size) -> MapResult<u8> {
        self.read_uint(offset, 1).map(|v| v as u8)
    }

    pub fn read_u16(&self, offset: &mut Size) -> MapResult<u16> {
        self.read_uint(offset, 2).map(|v| v as u16)
    }

    pub fn read_u32(&self, offset: &mut Size) -> MapResult<u32> {
        self.read_uint(offset, 4).map(|v| v as u32)
    }

    pub fn read_u64(&self, offset: &mut Size) -> MapResult<u64> {
        self.read_uint(offset, 8)
    }
}
