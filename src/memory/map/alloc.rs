/*!
 * Allocation Operations
 * malloc, free, and leak over the dual-space index
 */

use log::{debug, warn};

use super::MemoryMap;
use crate::core::types::{Address, Permissions, Size, INVALID_ADDRESS};
use crate::memory::types::{Allocation, AllocationPolicy, MapError, MapResult};

impl MemoryMap {
    /// Allocate a region under `policy` and return its aligned start address
    ///
    /// `size` is rounded up to `alignment` (a zero size allocates one
    /// alignment unit). A `Mirror` request silently downgrades to `HostOnly`
    /// when the remote is missing or refuses JIT allocation; the downgraded
    /// policy is what the allocation records.
    pub fn malloc(
        &mut self,
        size: Size,
        alignment: Size,
        permissions: Permissions,
        policy: AllocationPolicy,
        zero_memory: bool,
    ) -> MapResult<Address> {
        debug_assert!(alignment.is_power_of_two());

        let mut policy = policy;
        let mask = alignment - 1;

        // Rounding over-pads by up to alignment-1 bytes when the size is not
        // already a multiple; callers rely on the exact sizes this produces.
        let allocation_size = if size == 0 {
            alignment
        } else if size & mask != 0 {
            (size + alignment) & !mask
        } else {
            size
        };

        let raw_start = match policy {
            AllocationPolicy::HostOnly => {
                let addr = self.find_space(allocation_size);
                if addr == INVALID_ADDRESS {
                    return Err(MapError::AddressSpaceFull);
                }
                addr
            }
            AllocationPolicy::Mirror => {
                match self.process().filter(|p| p.can_jit() && p.is_alive()) {
                    Some(process) => {
                        let result = if zero_memory {
                            process.callocate_memory(allocation_size, permissions)
                        } else {
                            process.allocate_memory(allocation_size, permissions)
                        };
                        result.map_err(MapError::RemoteAllocFailed)?
                    }
                    None => {
                        warn!(
                            "downgrading mirror allocation to host-only: \
                             remote process is missing or can't JIT"
                        );
                        policy = AllocationPolicy::HostOnly;
                        let addr = self.find_space(allocation_size);
                        if addr == INVALID_ADDRESS {
                            return Err(MapError::AddressSpaceFull);
                        }
                        addr
                    }
                }
            }
            AllocationPolicy::ProcessOnly => {
                let process = self.process().ok_or(MapError::RemoteRequired)?;
                if !(process.can_jit() && process.is_alive()) {
                    return Err(MapError::RemoteUnsupported);
                }

                let result = if zero_memory {
                    process.callocate_memory(allocation_size, permissions)
                } else {
                    process.allocate_memory(allocation_size, permissions)
                };
                result.map_err(MapError::RemoteAllocFailed)?
            }
        };

        let mask = mask as Address;
        let aligned_start = (raw_start + mask) & !mask;

        self.allocations.insert(
            aligned_start,
            Allocation::new(
                raw_start,
                aligned_start,
                allocation_size,
                permissions,
                alignment,
                policy,
            ),
        );

        debug!(
            "malloc({}, {}, 0x{:x}, {}) -> 0x{:x}",
            allocation_size,
            alignment,
            permissions.bits(),
            policy,
            aligned_start
        );

        Ok(aligned_start)
    }

    /// Free the allocation whose aligned start is exactly `addr`
    pub fn free(&mut self, addr: Address) -> MapResult<()> {
        let allocation = match self.allocations.get(&addr) {
            Some(allocation) => allocation,
            None => {
                warn!("attempted to free unknown allocation 0x{:x}", addr);
                return Err(MapError::NotFound(addr));
            }
        };

        let raw_start = allocation.raw_start;

        match allocation.policy {
            AllocationPolicy::HostOnly => {
                // The pseudo-heap address may have come from a live remote
                // allocator; release it there while the remote can still JIT.
                if let Some(process) = self.process().filter(|p| p.can_jit() && p.is_alive()) {
                    let _ = process.deallocate_memory(raw_start);
                }
            }
            AllocationPolicy::Mirror | AllocationPolicy::ProcessOnly => {
                if let Some(process) = self.process() {
                    let _ = process.deallocate_memory(raw_start);
                }
            }
        }

        if let Some(allocation) = self.allocations.remove(&addr) {
            debug!(
                "free(0x{:x}) released [0x{:x}..0x{:x})",
                addr,
                allocation.aligned_start,
                allocation.end()
            );
        }

        Ok(())
    }

    /// Mark the allocation at `addr` to survive shutdown
    ///
    /// Idempotent; `free` still works on a leaked allocation.
    pub fn leak(&mut self, addr: Address) -> MapResult<()> {
        let allocation = self
            .allocations
            .get_mut(&addr)
            .ok_or(MapError::NotFound(addr))?;

        allocation.leak = true;
        Ok(())
    }
}

impl Drop for MemoryMap {
    /// Free every non-leaked allocation; remote failures are swallowed and
    /// remote deallocation is skipped entirely when the process is gone
    fn drop(&mut self) {
        while let Some((addr, leak)) = self
            .allocations
            .iter()
            .next()
            .map(|(addr, allocation)| (*addr, allocation.leak))
        {
            if leak {
                self.allocations.remove(&addr);
            } else {
                let _ = self.free(addr);
            }
        }
    }
}
