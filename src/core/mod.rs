/*!
 * Core Types and Helpers
 * Shared primitives used across the map
 */

pub mod data;
pub mod limits;
pub mod scalar;
pub mod types;

pub use data::DataView;
pub use scalar::Scalar;
pub use types::{
    intervals_intersect, Address, ByteOrder, Permissions, Size, INVALID_ADDRESS,
    UNKNOWN_ADDRESS_BYTE_SIZE,
};
