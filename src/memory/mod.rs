/*!
 * Memory Map Module
 * Dual-space allocation and I/O
 */

pub mod map;
pub mod types;

pub use map::MemoryMap;
pub use types::{Allocation, AllocationPolicy, MapError, MapResult, MapStats};
