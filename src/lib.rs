/*!
 * Dual-Space Memory Map
 * Host/remote memory allocation and I/O for JIT expression evaluation
 */

pub mod core;
pub mod memory;
pub mod remote;

pub use crate::core::{
    intervals_intersect, Address, ByteOrder, DataView, Permissions, Scalar, Size, INVALID_ADDRESS,
    UNKNOWN_ADDRESS_BYTE_SIZE,
};
pub use memory::{Allocation, AllocationPolicy, MapError, MapResult, MapStats, MemoryMap};
pub use remote::{Process, RemoteError, Target};
