/*!
 * Memory Map Types
 * Allocation records, policies, errors, and statistics
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::types::{Address, Permissions, Size};
use crate::remote::RemoteError;

/// Memory map operation result
pub type MapResult<T> = Result<T, MapError>;

/// Memory map errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum MapError {
    #[error("invalid allocation policy")]
    InvalidPolicy,

    #[error("address space is full")]
    AddressSpaceFull,

    #[error("remote allocation failed: {0}")]
    RemoteAllocFailed(RemoteError),

    #[error("no remote process, and this memory must live in the remote")]
    RemoteRequired,

    #[error("remote process doesn't support allocating memory")]
    RemoteUnsupported,

    #[error("allocation doesn't exist: 0x{0:x}")]
    NotFound(Address),

    #[error("no allocation contains [0x{addr:x}..0x{end:x}) and no fallback is available")]
    OutOfRange { addr: Address, end: Address },

    #[error("shadow buffer is empty")]
    EmptyShadow,

    #[error("read would pass the end of the shadow buffer")]
    ShortShadow,

    #[error("unsupported scalar size: {0}")]
    UnsupportedSize(Size),

    #[error("size was zero")]
    ZeroSize,

    #[error("byte order is unknown")]
    InvalidByteOrder,

    #[error("memory lives only in the remote process")]
    HostUnavailable,

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
}

/// Which side(s) own an allocation's bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Bytes live only in a host-side shadow buffer; the address is synthesized
    HostOnly,
    /// Bytes live only in the remote process; no host shadow
    ProcessOnly,
    /// Bytes live on both sides; the remote is the source of truth when alive
    Mirror,
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationPolicy::HostOnly => write!(f, "host-only"),
            AllocationPolicy::ProcessOnly => write!(f, "process-only"),
            AllocationPolicy::Mirror => write!(f, "mirror"),
        }
    }
}

/// One live region of the map
#[derive(Debug, Clone)]
pub struct Allocation {
    /// Unaligned base returned by the backing allocator
    pub(crate) raw_start: Address,
    /// User-visible start, `raw_start` rounded up to `alignment`
    pub(crate) aligned_start: Address,
    /// Rounded-up allocation size
    pub(crate) size: Size,
    /// Advisory permission bits forwarded to the remote
    pub(crate) permissions: Permissions,
    /// Power-of-two byte alignment
    pub(crate) alignment: Size,
    /// Effective policy, recorded after any downgrade
    pub(crate) policy: AllocationPolicy,
    /// Host shadow bytes; empty unless the policy keeps a host copy
    pub(crate) shadow: Vec<u8>,
    /// Skip freeing this allocation at shutdown
    pub(crate) leak: bool,
}

impl Allocation {
    pub(crate) fn new(
        raw_start: Address,
        aligned_start: Address,
        size: Size,
        permissions: Permissions,
        alignment: Size,
        policy: AllocationPolicy,
    ) -> Self {
        let shadow = match policy {
            AllocationPolicy::HostOnly | AllocationPolicy::Mirror => vec![0u8; size],
            AllocationPolicy::ProcessOnly => Vec::new(),
        };

        Self {
            raw_start,
            aligned_start,
            size,
            permissions,
            alignment,
            policy,
            shadow,
            leak: false,
        }
    }

    /// End of the user-visible interval (exclusive)
    pub(crate) fn end(&self) -> Address {
        self.aligned_start + self.size as Address
    }

    pub fn raw_start(&self) -> Address {
        self.raw_start
    }

    pub fn aligned_start(&self) -> Address {
        self.aligned_start
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn alignment(&self) -> Size {
        self.alignment
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    pub fn is_leaked(&self) -> bool {
        self.leak
    }
}

/// Aggregate statistics over live allocations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapStats {
    pub allocation_count: usize,
    /// Bytes held in host shadow buffers
    pub host_bytes: Size,
    /// Bytes of regions backed by the remote process
    pub remote_bytes: Size,
    pub leaked_count: usize,
}
