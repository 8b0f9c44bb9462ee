/*!
 * Scalar Values
 * Fixed-width unsigned integers marshalled across the host/remote boundary
 */

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

use crate::core::types::{ByteOrder, Size};
use crate::memory::types::{MapError, MapResult};

/// An unsigned scalar with a natural byte width
///
/// The value is held zero-extended to 64 bits; the natural width is what a
/// scalar write uses when the caller doesn't force a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
    value: u64,
    byte_size: Size,
}

impl Scalar {
    pub fn new(value: u64, byte_size: Size) -> Self {
        Self { value, byte_size }
    }

    /// Natural width in bytes
    pub fn byte_size(&self) -> Size {
        self.byte_size
    }

    /// Value zero-extended to 64 bits
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Encode the scalar into `buf` using `order`, returning the bytes written
    ///
    /// The value is truncated to `buf.len()` bytes; widths outside 1..=8 are
    /// unsupported.
    pub fn to_memory_data(&self, buf: &mut [u8], order: ByteOrder) -> MapResult<Size> {
        let size = buf.len();

        if size == 0 {
            return Err(MapError::ZeroSize);
        }
        if size > 8 {
            return Err(MapError::UnsupportedSize(size));
        }

        let value = if size < 8 {
            self.value & ((1u64 << (size * 8)) - 1)
        } else {
            self.value
        };

        match order {
            ByteOrder::Little => LittleEndian::write_uint(buf, value, size),
            ByteOrder::Big => BigEndian::write_uint(buf, value, size),
            ByteOrder::Invalid => return Err(MapError::InvalidByteOrder),
        }

        Ok(size)
    }
}

impl From<u8> for Scalar {
    fn from(value: u8) -> Self {
        Self::new(value as u64, 1)
    }
}

impl From<u16> for Scalar {
    fn from(value: u16) -> Self {
        Self::new(value as u64, 2)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::new(value as u64, 4)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self::new(value, 8)
    }
}
