/*!
 * Remote Interface Traits
 * Contracts the map consumes; implementations live with the debugger host
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Address, ByteOrder, Permissions, Size};

/// Error reported by the remote process or the target
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Architecture-level facts and static memory of the debug target
pub trait Target: Send + Sync {
    /// Architectural byte order
    fn byte_order(&self) -> ByteOrder;

    /// Architectural pointer width in bytes
    fn address_byte_size(&self) -> u32;

    /// Read file-backed memory at `addr` (e.g. sections of the target image)
    ///
    /// Returns exactly `size` bytes on success.
    fn read_static_memory(&self, addr: Address, size: Size) -> Result<Vec<u8>, RemoteError>;
}

/// The controlled remote (inferior) process
pub trait Process: Send + Sync {
    fn is_alive(&self) -> bool;

    /// Whether the process accepts JIT allocation requests
    fn can_jit(&self) -> bool;

    /// Allocate `size` bytes in the remote with the given permission bits
    fn allocate_memory(&self, size: Size, permissions: Permissions)
        -> Result<Address, RemoteError>;

    /// Allocate `size` bytes and zero them
    fn callocate_memory(
        &self,
        size: Size,
        permissions: Permissions,
    ) -> Result<Address, RemoteError>;

    fn deallocate_memory(&self, addr: Address) -> Result<(), RemoteError>;

    /// Read `size` bytes of remote memory; returns exactly `size` bytes on success
    fn read_memory(&self, addr: Address, size: Size) -> Result<Vec<u8>, RemoteError>;

    fn write_memory(&self, addr: Address, bytes: &[u8]) -> Result<(), RemoteError>;

    fn byte_order(&self) -> ByteOrder;

    fn address_byte_size(&self) -> u32;
}
