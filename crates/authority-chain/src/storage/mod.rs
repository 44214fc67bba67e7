//! Persistent storage.
//!
//! - [`registry`] — [`FileRoleRegistry`], a directory of versioned JSON
//!   files holding role definitions, credentials, DID documents and status
//!   lists.

pub mod registry;

pub use registry::FileRoleRegistry;
