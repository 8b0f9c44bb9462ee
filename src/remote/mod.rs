/*!
 * Remote Interfaces
 * Thin adapters to the inferior process and the target descriptor
 */

pub mod traits;

pub use traits::{Process, RemoteError, Target};
