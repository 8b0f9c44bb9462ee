/*!
 * Memory I/O
 * Policy-routed reads and writes across the host/remote boundary
 */

use log::debug;

use super::MemoryMap;
use crate::core::data::DataView;
use crate::core::types::{Address, Size};
use crate::memory::types::{AllocationPolicy, MapError, MapResult};

impl MemoryMap {
    /// Write `bytes` at `addr`
    ///
    /// Ranges outside every allocation are forwarded to the remote when it is
    /// alive; without a remote the write fails.
    pub fn write_memory(&mut self, addr: Address, bytes: &[u8]) -> MapResult<()> {
        let size = bytes.len();
        let process = self.process();

        let allocation = match self.find_allocation_mut(addr, size) {
            Some(allocation) => allocation,
            None => {
                return match process {
                    Some(process) => process.write_memory(addr, bytes).map_err(MapError::from),
                    None => Err(MapError::OutOfRange {
                        addr,
                        end: addr + size as Address,
                    }),
                };
            }
        };

        let offset = (addr - allocation.aligned_start) as Size;

        match allocation.policy {
            AllocationPolicy::HostOnly => {
                if allocation.shadow.is_empty() {
                    return Err(MapError::EmptyShadow);
                }
                allocation.shadow[offset..offset + size].copy_from_slice(bytes);
            }
            AllocationPolicy::Mirror => {
                if allocation.shadow.is_empty() {
                    return Err(MapError::EmptyShadow);
                }
                allocation.shadow[offset..offset + size].copy_from_slice(bytes);
                if let Some(process) = process {
                    process.write_memory(addr, bytes)?;
                }
            }
            AllocationPolicy::ProcessOnly => {
                // Without a remote there is nowhere to store the bytes.
                if let Some(process) = process {
                    process.write_memory(addr, bytes)?;
                }
            }
        }

        debug!(
            "write_memory(0x{:x}, {}) went to [0x{:x}..0x{:x})",
            addr,
            size,
            allocation.aligned_start,
            allocation.end()
        );

        Ok(())
    }

    /// Read `size` bytes at `addr`
    ///
    /// Ranges outside every allocation fall back to the remote, then to the
    /// target's static memory.
    pub fn read_memory(&self, addr: Address, size: Size) -> MapResult<Vec<u8>> {
        let process = self.process();

        let allocation = match self.find_allocation(addr, size) {
            Some(allocation) => allocation,
            None => {
                if let Some(process) = process {
                    return process.read_memory(addr, size).map_err(MapError::from);
                }

                if let Some(target) = self.target() {
                    return target
                        .read_static_memory(addr, size)
                        .map_err(MapError::from);
                }

                return Err(MapError::OutOfRange {
                    addr,
                    end: addr + size as Address,
                });
            }
        };

        let offset = (addr - allocation.aligned_start) as Size;

        if offset > allocation.size {
            return Err(MapError::OutOfRange {
                addr,
                end: addr + size as Address,
            });
        }

        let bytes = match allocation.policy {
            AllocationPolicy::HostOnly => {
                if allocation.shadow.is_empty() {
                    return Err(MapError::EmptyShadow);
                }
                if allocation.shadow.len() < offset + size {
                    return Err(MapError::ShortShadow);
                }
                allocation.shadow[offset..offset + size].to_vec()
            }
            AllocationPolicy::Mirror => match process {
                // The remote is the source of truth once it is live.
                Some(process) => process.read_memory(addr, size)?,
                None => {
                    if allocation.shadow.is_empty() {
                        return Err(MapError::EmptyShadow);
                    }
                    allocation.shadow[offset..offset + size].to_vec()
                }
            },
            AllocationPolicy::ProcessOnly => match process {
                Some(process) => process.read_memory(addr, size)?,
                None => vec![0u8; size],
            },
        };

        debug!(
            "read_memory(0x{:x}, {}) came from [0x{:x}..0x{:x})",
            addr,
            size,
            allocation.aligned_start,
            allocation.end()
        );

        Ok(bytes)
    }

    /// Bytes remaining from `addr` to the end of its containing allocation
    pub fn get_alloc_size(&self, addr: Address) -> MapResult<Size> {
        let allocation = self
            .find_allocation(addr, 0)
            .ok_or(MapError::NotFound(addr))?;

        Ok((allocation.end() - addr) as Size)
    }

    /// Borrow a decoding view over `size` bytes at `addr`
    ///
    /// The view reflects the remote's current bytes: `Mirror` regions refresh
    /// their whole shadow from a live remote first. `ProcessOnly` regions have
    /// no host bytes to view.
    pub fn get_memory_data(&mut self, addr: Address, size: Size) -> MapResult<DataView<'_>> {
        if size == 0 {
            return Err(MapError::ZeroSize);
        }

        let byte_order = self.byte_order();
        let address_byte_size = self.address_byte_size();
        let process = self.process();

        let allocation = self
            .find_allocation_mut(addr, size)
            .ok_or(MapError::OutOfRange {
                addr,
                end: addr + size as Address,
            })?;

        match allocation.policy {
            AllocationPolicy::ProcessOnly => return Err(MapError::HostUnavailable),
            AllocationPolicy::Mirror => {
                if allocation.shadow.is_empty() {
                    return Err(MapError::EmptyShadow);
                }

                // A mirror with no live remote has no bytes to refresh from.
                let process = process.ok_or(MapError::EmptyShadow)?;
                let bytes = process.read_memory(allocation.aligned_start, allocation.size)?;
                if bytes.len() != allocation.shadow.len() {
                    return Err(MapError::ShortShadow);
                }
                allocation.shadow.copy_from_slice(&bytes);
            }
            AllocationPolicy::HostOnly => {
                if allocation.shadow.is_empty() {
                    return Err(MapError::EmptyShadow);
                }
            }
        }

        let offset = (addr - allocation.aligned_start) as Size;
        let bytes = &allocation.shadow[offset..offset + size];

        Ok(DataView::new(bytes, byte_order, address_byte_size))
    }
}
