/*!
 * Memory Map
 * Dual-space allocation index with host/remote routing
 *
 * The map owns an ordered index of disjoint allocations keyed by their
 * aligned start address, plus weak handles to the target and the remote
 * process. Every operation re-resolves the weak handles for the duration of
 * one call and degrades to the host-only view when the remote is gone.
 */

mod alloc;
mod io;
mod scalar;

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use crate::core::limits::HOST_ALLOCATION_GAP;
use crate::core::types::{
    intervals_intersect, Address, ByteOrder, Permissions, Size, INVALID_ADDRESS,
    UNKNOWN_ADDRESS_BYTE_SIZE,
};
use crate::memory::types::{Allocation, AllocationPolicy, MapStats};
use crate::remote::{Process, Target};

/// Dual-space memory map
///
/// Regions live on the host, in the remote process, or mirrored on both
/// sides; clients address all of them with remote-style addresses and the
/// map routes each operation to the right side(s).
pub struct MemoryMap {
    target: Option<Weak<dyn Target>>,
    process: Option<Weak<dyn Process>>,
    allocations: BTreeMap<Address, Allocation>,
}

impl MemoryMap {
    /// Create a detached map with no target or process attached
    pub fn new() -> Self {
        Self {
            target: None,
            process: None,
            allocations: BTreeMap::new(),
        }
    }

    /// Attach the target descriptor (held weakly)
    pub fn with_target(mut self, target: &Arc<dyn Target>) -> Self {
        self.target = Some(Arc::downgrade(target));
        self
    }

    /// Attach the remote process (held weakly)
    pub fn with_process(mut self, process: &Arc<dyn Process>) -> Self {
        self.process = Some(Arc::downgrade(process));
        self
    }

    pub(crate) fn process(&self) -> Option<Arc<dyn Process>> {
        self.process.as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn target(&self) -> Option<Arc<dyn Target>> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    /// Byte order of the remote, falling back to the target architecture
    pub fn byte_order(&self) -> ByteOrder {
        if let Some(process) = self.process() {
            return process.byte_order();
        }

        if let Some(target) = self.target() {
            return target.byte_order();
        }

        ByteOrder::Invalid
    }

    /// Pointer width of the remote, falling back to the target architecture
    pub fn address_byte_size(&self) -> u32 {
        if let Some(process) = self.process() {
            return process.address_byte_size();
        }

        if let Some(target) = self.target() {
            return target.address_byte_size();
        }

        UNKNOWN_ADDRESS_BYTE_SIZE
    }

    /// Find an address suitable for a new allocation of `size` bytes
    ///
    /// A live JIT-capable remote supplies real memory; otherwise addresses
    /// come from the bump-only host pseudo-heap. Returns `INVALID_ADDRESS`
    /// when no space can be produced.
    pub fn find_space(&self, size: Size) -> Address {
        if size == 0 {
            return INVALID_ADDRESS;
        }

        if let Some(process) = self.process().filter(|p| p.can_jit() && p.is_alive()) {
            let permissions = Permissions::READABLE | Permissions::WRITABLE;
            return match process.allocate_memory(size, permissions) {
                Ok(addr) => addr,
                Err(_) => INVALID_ADDRESS,
            };
        }

        match self.allocations.iter().next_back() {
            None => 0,
            Some((_, last)) => align_up(last.end(), HOST_ALLOCATION_GAP as Address),
        }
    }

    /// Whether any allocation's interval intersects `[addr, addr+size)`
    pub fn intersects_allocation(&self, addr: Address, size: Size) -> bool {
        if addr == INVALID_ADDRESS {
            return false;
        }

        // Only the candidate at or after `addr` and its immediate predecessor
        // can intersect: the indexed intervals are pairwise disjoint.
        if let Some((_, after)) = self.allocations.range(addr..).next() {
            if intervals_intersect(addr, size, after.aligned_start, after.size) {
                return true;
            }
        }

        if let Some((_, before)) = self.allocations.range(..addr).next_back() {
            if intervals_intersect(addr, size, before.aligned_start, before.size) {
                return true;
            }
        }

        false
    }

    /// The unique allocation whose interval encloses `[addr, addr+size)`
    ///
    /// Two-probe search: the last entry keyed at or before `addr` is the only
    /// possible container because the intervals are disjoint.
    pub(crate) fn find_allocation(&self, addr: Address, size: Size) -> Option<&Allocation> {
        if addr == INVALID_ADDRESS {
            return None;
        }

        let (_, allocation) = self.allocations.range(..=addr).next_back()?;

        if allocation.aligned_start <= addr && allocation.end() >= addr + size as Address {
            return Some(allocation);
        }

        None
    }

    pub(crate) fn find_allocation_mut(
        &mut self,
        addr: Address,
        size: Size,
    ) -> Option<&mut Allocation> {
        if addr == INVALID_ADDRESS {
            return None;
        }

        let (_, allocation) = self.allocations.range_mut(..=addr).next_back()?;

        if allocation.aligned_start <= addr && allocation.end() >= addr + size as Address {
            return Some(allocation);
        }

        None
    }

    /// Number of live allocations
    pub fn allocation_count(&self) -> usize {
        self.allocations.len()
    }

    /// Iterate live allocations in address order
    pub fn allocations(&self) -> impl Iterator<Item = &Allocation> {
        self.allocations.values()
    }

    /// Aggregate statistics over live allocations
    pub fn stats(&self) -> MapStats {
        let mut stats = MapStats::default();

        for allocation in self.allocations.values() {
            stats.allocation_count += 1;
            stats.host_bytes += allocation.shadow.len();
            if allocation.policy != AllocationPolicy::HostOnly {
                stats.remote_bytes += allocation.size;
            }
            if allocation.leak {
                stats.leaked_count += 1;
            }
        }

        stats
    }
}

impl Default for MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Round `addr` up to the next multiple of `align` (a power of two)
pub(crate) fn align_up(addr: Address, align: Address) -> Address {
    (addr + align - 1) & !(align - 1)
}
