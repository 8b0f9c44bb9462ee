/*!
 * Core Types
 * Addresses, sizes, byte order, and permission bits
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Address in the remote process's address space
pub type Address = u64;

/// Size type for memory operations
pub type Size = usize;

/// Sentinel address meaning "no such address"
pub const INVALID_ADDRESS: Address = u64::MAX;

/// Sentinel pointer width reported when neither process nor target is available
pub const UNKNOWN_ADDRESS_BYTE_SIZE: u32 = u32::MAX;

/// Byte order of the remote process or target architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    Invalid,
    Little,
    Big,
}

/// Advisory permission bitmask forwarded verbatim to the remote allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(u32);

impl Permissions {
    pub const READABLE: Permissions = Permissions(1);
    pub const WRITABLE: Permissions = Permissions(2);
    pub const EXECUTABLE: Permissions = Permissions(4);

    /// Raw bits as handed to the remote
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl From<u32> for Permissions {
    fn from(bits: u32) -> Self {
        Permissions(bits)
    }
}

impl BitOr for Permissions {
    type Output = Permissions;

    fn bitor(self, rhs: Permissions) -> Permissions {
        Permissions(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Permissions) {
        self.0 |= rhs.0;
    }
}

impl fmt::LowerHex for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Whether the half-open intervals `[a1, a1+s1)` and `[a2, a2+s2)` overlap
///
/// Defined only for non-empty intervals: each start must lie strictly before
/// the other's end.
pub const fn intervals_intersect(a1: Address, s1: Size, a2: Address, s2: Size) -> bool {
    a2 < a1 + s1 as Address && a1 < a2 + s2 as Address
}
