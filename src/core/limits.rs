/*!
 * Limits and Constants
 * Centralized constants for the host pseudo-heap and scalar marshalling
 */

use crate::core::types::Size;

/// Spacing of the host pseudo-heap (4KB)
/// Successive host-only allocations start at the next multiple of this value
/// past the previous allocation's end; freed ranges are never reused.
pub const HOST_ALLOCATION_GAP: Size = 4096;

/// Scratch buffer size for scalar encoding (bytes)
/// Upper bound on any scalar width the map marshals to the remote.
pub const SCALAR_BUFFER_SIZE: Size = 32;
