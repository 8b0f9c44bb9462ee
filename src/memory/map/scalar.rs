/*!
 * Scalar Marshalling
 * Endian- and width-correct integer I/O layered on raw memory operations
 */

use super::MemoryMap;
use crate::core::data::DataView;
use crate::core::limits::SCALAR_BUFFER_SIZE;
use crate::core::scalar::Scalar;
use crate::core::types::{Address, Size, UNKNOWN_ADDRESS_BYTE_SIZE};
use crate::memory::types::{MapError, MapResult};

impl MemoryMap {
    /// Write `scalar` at `addr`, encoded with the current byte order
    ///
    /// A `size` of `None` uses the scalar's natural width.
    pub fn write_scalar(
        &mut self,
        addr: Address,
        scalar: &Scalar,
        size: Option<Size>,
    ) -> MapResult<()> {
        let size = size.unwrap_or_else(|| scalar.byte_size());

        if size == 0 {
            return Err(MapError::ZeroSize);
        }
        if size > SCALAR_BUFFER_SIZE {
            return Err(MapError::UnsupportedSize(size));
        }

        let mut buf = [0u8; SCALAR_BUFFER_SIZE];
        let written = scalar.to_memory_data(&mut buf[..size], self.byte_order())?;

        self.write_memory(addr, &buf[..written])
    }

    /// Read an unsigned scalar of `size` bytes at `addr`
    ///
    /// Only widths of 1, 2, 4, and 8 bytes decode; the raw read happens
    /// first, so range errors surface before width errors.
    pub fn read_scalar(&self, addr: Address, size: Size) -> MapResult<Scalar> {
        if size == 0 {
            return Err(MapError::ZeroSize);
        }

        let bytes = self.read_memory(addr, size)?;
        let view = DataView::new(&bytes, self.byte_order(), self.address_byte_size());

        let mut offset = 0;
        let value = match size {
            1 | 2 | 4 | 8 => view.read_uint(&mut offset, size)?,
            _ => return Err(MapError::UnsupportedSize(size)),
        };

        Ok(Scalar::new(value, size))
    }

    /// Write a pointer-width scalar at `addr`
    pub fn write_pointer(&mut self, addr: Address, pointer: Address) -> MapResult<()> {
        let scalar = Scalar::from(pointer);

        let width = self.address_byte_size();
        let size = if width == UNKNOWN_ADDRESS_BYTE_SIZE {
            None
        } else {
            Some(width as Size)
        };

        self.write_scalar(addr, &scalar, size)
    }

    /// Read a pointer-width scalar at `addr`
    pub fn read_pointer(&self, addr: Address) -> MapResult<Address> {
        let scalar = self.read_scalar(addr, self.address_byte_size() as Size)?;
        Ok(scalar.value())
    }
}
